//! Tests for the ResultCache implementation.

use quarry_cache::{Fingerprint, ResultCache};
use quarry_core::{ResultSet, ScalarValue};
use std::sync::Arc;
use std::thread;

fn key(n: i64) -> Fingerprint {
    Fingerprint::compute("view", "SELECT x FROM t WHERE (x = ?)", &[ScalarValue::Int(n)])
}

fn result(n: i64) -> ResultSet {
    ResultSet::new(vec!["x".to_string()], vec![vec![ScalarValue::Int(n)]])
}

#[test]
fn test_cache_put_and_get() {
    let cache = ResultCache::new(10);
    cache.put(key(1), result(1));

    let hit = cache.get(&key(1));
    assert_eq!(hit.as_deref(), Some(&result(1)));

    // Non-existent key should return None
    assert!(cache.get(&key(2)).is_none());
}

#[test]
fn test_cache_hit_on_empty_result_is_distinct_from_miss() {
    let cache = ResultCache::new(2);
    cache.put(key(1), ResultSet::empty(vec!["x".to_string()]));

    let hit = cache.get(&key(1)).unwrap();
    assert_eq!(hit.row_count(), 0);
}

#[test]
fn test_cache_clear() {
    let cache = ResultCache::new(10);
    cache.put(key(1), result(1));
    cache.put(key(2), result(2));
    assert_eq!(cache.len(), 2);

    cache.clear();

    assert!(cache.is_empty());
    assert!(cache.get(&key(1)).is_none());
    assert!(cache.get(&key(2)).is_none());
}

#[test]
fn test_cache_update_existing_key() {
    let cache = ResultCache::new(10);
    cache.put(key(1), result(1));
    cache.put(key(1), result(100));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&key(1)).as_deref(), Some(&result(100)));
}

#[test]
fn test_cache_lru_eviction() {
    let cache = ResultCache::new(2);
    cache.put(key(1), result(1));
    cache.put(key(2), result(2));

    // This should evict the least recently used entry (1)
    cache.put(key(3), result(3));

    assert_eq!(cache.len(), 2);
    assert!(!cache.contains(&key(1)));
    assert!(cache.contains(&key(2)));
    assert!(cache.contains(&key(3)));
}

#[test]
fn test_cache_capacity_plus_one_leaves_capacity_resident() {
    let capacity = 5;
    let cache = ResultCache::new(capacity);
    for n in 0..=capacity as i64 {
        cache.put(key(n), result(n));
    }

    assert_eq!(cache.len(), capacity);
    assert!(!cache.contains(&key(0)));
    for n in 1..=capacity as i64 {
        assert!(cache.contains(&key(n)));
    }
}

#[test]
fn test_cache_hit_promotes_recency() {
    let cache = ResultCache::new(3);
    cache.put(key(1), result(1));
    cache.put(key(2), result(2));
    cache.put(key(3), result(3));

    // 1 becomes most recently used, so 2 is next to go
    assert!(cache.get(&key(1)).is_some());
    cache.put(key(4), result(4));
    assert!(cache.contains(&key(1)));
    assert!(!cache.contains(&key(2)));

    // Two more inserts push 1 out once it is least recently used again
    cache.put(key(5), result(5));
    assert!(cache.contains(&key(1)));
    cache.put(key(6), result(6));
    assert!(!cache.contains(&key(1)));
}

#[test]
fn test_cache_replacement_promotes_recency() {
    let cache = ResultCache::new(2);
    cache.put(key(1), result(1));
    cache.put(key(2), result(2));
    cache.put(key(1), result(10));
    cache.put(key(3), result(3));

    assert!(cache.contains(&key(1)));
    assert!(!cache.contains(&key(2)));
}

#[test]
fn test_cache_zero_capacity_is_clamped() {
    let cache = ResultCache::new(0);
    assert_eq!(cache.capacity(), 1);

    cache.put(key(1), result(1));
    cache.put(key(2), result(2));
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(&key(2)));
}

#[test]
fn test_cache_stats() {
    let cache = ResultCache::new(1);
    assert_eq!(cache.stats().hit_rate(), 0.0);

    cache.put(key(1), result(1));
    cache.get(&key(1));
    cache.get(&key(2));
    cache.put(key(2), result(2));

    let stats = cache.stats();
    assert_eq!(*stats.hits(), 1);
    assert_eq!(*stats.misses(), 1);
    assert_eq!(*stats.insertions(), 2);
    assert_eq!(*stats.evictions(), 1);
    assert_eq!(*stats.entries(), 1);
    assert_eq!(stats.hit_rate(), 0.5);

    cache.clear();
    assert_eq!(*cache.stats().entries(), 0);
    assert_eq!(*cache.stats().hits(), 1);
}

#[test]
fn test_cache_shared_across_threads() {
    let cache = Arc::new(ResultCache::new(8));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for n in 0..50 {
                    let k = key(t * 100 + n);
                    cache.put(k, result(n));
                    cache.get(&k);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 8);
    let stats = cache.stats();
    assert_eq!(*stats.insertions(), 200);
    assert_eq!(*stats.evictions(), 192);
}
