//! Compile, cache and fetch orchestration.

use crate::{RowSource, Settings};
use derive_getters::Getters;
use parking_lot::Mutex;
use quarry_cache::{Fingerprint, ResultCache};
use quarry_compiler::{CompiledView, ViewCompiler};
use quarry_core::{Catalog, ResultSet, RuntimeParams, ViewSet};
use quarry_error::{QuarryError, QuarryErrorKind, QuarryResult};
use quarry_filter::ColumnFilters;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Result of running a view.
#[derive(Debug, Clone, Getters)]
pub struct RunOutcome {
    /// Statement that was (or would have been) executed
    compiled: CompiledView,
    /// Cache key of the statement
    fingerprint: Fingerprint,
    /// Rows, shared with the cache
    result: Arc<ResultSet>,
    /// Whether the rows came from the cache
    from_cache: bool,
}

impl RunOutcome {
    /// Rows that pass every column filter, in fetch order.
    pub fn filtered(&self, filters: &ColumnFilters) -> ResultSet {
        filters.apply(&self.result)
    }
}

/// Loaded configuration plus the result cache that serves it.
///
/// The cache is cleared whenever the configuration is swapped by
/// [`ViewSession::reload`], since reused view ids may now mean different SQL.
#[derive(Debug)]
pub struct ViewSession {
    compiler: ViewCompiler,
    views: ViewSet,
    cache: Arc<ResultCache>,
    last_keys: Mutex<HashMap<String, Fingerprint>>,
}

impl ViewSession {
    /// Create a session over a catalog and views, sharing `cache`.
    pub fn new(catalog: Catalog, views: ViewSet, cache: Arc<ResultCache>) -> Self {
        Self {
            compiler: ViewCompiler::new(catalog),
            views,
            cache,
            last_keys: Mutex::new(HashMap::new()),
        }
    }

    /// Load catalog and views named by `settings`, with a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded.
    pub fn from_settings(settings: &Settings) -> QuarryResult<Self> {
        let catalog = settings.load_catalog()?;
        let views = settings.load_views()?;
        info!(
            connections = catalog.connections().len(),
            views = views.len(),
            cache_capacity = *settings.cache_capacity(),
            "Loaded configuration"
        );
        Ok(Self::new(
            catalog,
            views,
            Arc::new(ResultCache::new(*settings.cache_capacity())),
        ))
    }

    /// Loaded views.
    pub fn views(&self) -> &ViewSet {
        &self.views
    }

    /// Loaded catalog.
    pub fn catalog(&self) -> &Catalog {
        self.compiler.catalog()
    }

    /// Shared result cache.
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Compile a view by id without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns `UnknownView` for an unknown id, or the compile error.
    pub fn compile(&self, view_id: &str, params: &RuntimeParams) -> QuarryResult<CompiledView> {
        let view = self.views.get(view_id).ok_or_else(|| {
            QuarryError::new(QuarryErrorKind::UnknownView(view_id.to_string()))
        })?;
        Ok(self.compiler.compile(view, params)?)
    }

    /// Run a view: serve it from the cache when the same statement was
    /// fetched before, otherwise fetch through `source` and cache the rows.
    ///
    /// # Errors
    ///
    /// Returns compile errors, or the source error when a fetch fails.
    /// Nothing is cached on failure.
    #[instrument(skip(self, params, source), fields(fingerprint = tracing::field::Empty))]
    pub async fn run(
        &self,
        view_id: &str,
        params: &RuntimeParams,
        source: &dyn RowSource,
    ) -> QuarryResult<RunOutcome> {
        let compiled = self.compile(view_id, params)?;
        let fingerprint = Fingerprint::compute(view_id, compiled.sql(), compiled.binds());
        tracing::Span::current().record("fingerprint", tracing::field::display(&fingerprint));

        if let Some(result) = self.cache.get(&fingerprint) {
            self.remember(view_id, fingerprint);
            return Ok(RunOutcome {
                compiled,
                fingerprint,
                result,
                from_cache: true,
            });
        }

        debug!(connection = %compiled.connection(), "Fetching rows");
        let result = Arc::new(source.fetch(&compiled).await?);
        self.cache.put(fingerprint, Arc::clone(&result));
        self.remember(view_id, fingerprint);
        info!(rows = result.row_count(), "Fetched view");

        Ok(RunOutcome {
            compiled,
            fingerprint,
            result,
            from_cache: false,
        })
    }

    /// Rows of the last run of `view_id`, if they are still cached.
    ///
    /// Counts as a cache access, so the entry becomes most recently used.
    pub fn last_result(&self, view_id: &str) -> Option<Arc<ResultSet>> {
        let key = *self.last_keys.lock().get(view_id)?;
        self.cache.get(&key)
    }

    /// Swap in new configuration and drop everything cached under the old one.
    pub fn reload(&mut self, catalog: Catalog, views: ViewSet) {
        info!(views = views.len(), "Reloading configuration");
        self.compiler = ViewCompiler::new(catalog);
        self.views = views;
        self.cache.clear();
        self.last_keys.lock().clear();
    }

    fn remember(&self, view_id: &str, fingerprint: Fingerprint) {
        self.last_keys.lock().insert(view_id.to_string(), fingerprint);
    }
}
