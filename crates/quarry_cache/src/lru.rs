//! Bounded least-recently-used store.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity map that evicts its least recently used entry.
///
/// Entries live in a slot vector linked into a recency list by index
/// (head = most recent). The map points keys at slots, so lookup, promotion
/// and eviction are all O(1). Slots are only ever reused by eviction, so the
/// vector has no holes.
#[derive(Debug, Clone)]
pub struct LruStore<K, V> {
    map: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruStore<K, V> {
    /// Create a store; a capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            map: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `key` is resident. Does not touch recency.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.promote(idx);
        Some(&self.nodes[idx].value)
    }

    /// Look up `key` without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|&idx| &self.nodes[idx].value)
    }

    /// Insert or replace `key`, making it most recently used.
    ///
    /// Returns the evicted entry when a new key pushed the store past capacity.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            self.nodes[idx].value = value;
            self.promote(idx);
            return None;
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };

        if self.nodes.len() < self.capacity {
            let idx = self.nodes.len();
            self.nodes.push(node);
            self.map.insert(key, idx);
            self.attach_front(idx);
            return None;
        }

        // Full: the tail slot is reused for the new entry.
        let idx = self.tail?;
        self.detach(idx);
        let evicted = std::mem::replace(&mut self.nodes[idx], node);
        self.map.remove(&evicted.key);
        self.map.insert(key, idx);
        self.attach_front(idx);
        Some((evicted.key, evicted.value))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        std::iter::successors(self.head, move |&idx| self.nodes[idx].next)
            .map(move |idx| (&self.nodes[idx].key, &self.nodes[idx].value))
    }

    fn promote(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.attach_front(idx);
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn attach_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        match self.head {
            Some(h) => self.nodes[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(store: &LruStore<&'static str, i32>) -> Vec<&'static str> {
        store.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_recency_order_follows_access() {
        let mut store = LruStore::new(3);
        store.put("a", 1);
        store.put("b", 2);
        store.put("c", 3);
        assert_eq!(keys(&store), vec!["c", "b", "a"]);

        store.get(&"a");
        assert_eq!(keys(&store), vec!["a", "c", "b"]);

        store.put("b", 20);
        assert_eq!(keys(&store), vec!["b", "a", "c"]);
        assert_eq!(store.peek(&"b"), Some(&20));
    }

    #[test]
    fn test_eviction_reuses_tail_slot() {
        let mut store = LruStore::new(2);
        store.put("a", 1);
        store.put("b", 2);
        assert_eq!(store.put("c", 3), Some(("a", 1)));
        assert_eq!(store.len(), 2);
        assert_eq!(keys(&store), vec!["c", "b"]);
        assert_eq!(store.put("d", 4), Some(("b", 2)));
        assert_eq!(keys(&store), vec!["d", "c"]);
    }

    #[test]
    fn test_single_slot_store() {
        let mut store = LruStore::new(0);
        assert_eq!(store.capacity(), 1);
        store.put("a", 1);
        store.get(&"a");
        assert_eq!(store.put("b", 2), Some(("a", 1)));
        assert_eq!(keys(&store), vec!["b"]);
    }

    #[test]
    fn test_peek_does_not_promote() {
        let mut store = LruStore::new(2);
        store.put("a", 1);
        store.put("b", 2);
        assert_eq!(store.peek(&"a"), Some(&1));
        assert_eq!(store.put("c", 3), Some(("a", 1)));
    }

    #[test]
    fn test_clear_resets_links() {
        let mut store = LruStore::new(2);
        store.put("a", 1);
        store.put("b", 2);
        store.clear();
        assert!(store.is_empty());
        assert!(!store.contains(&"a"));
        store.put("c", 3);
        assert_eq!(keys(&store), vec!["c"]);
    }
}
