//! Aspect container
//!
//! Wraps targets in proxies. The interceptor table for a type is resolved
//! on first use and cached, so every proxy of the same type shares one table.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};
use weave_core::{PipelineConfig, Result, Target};

use crate::proxy::Proxy;
use crate::resolver::MetadataResolver;
use crate::table::InterceptorTable;

pub struct AspectContainer {
    resolver: Arc<dyn MetadataResolver>,
    config: PipelineConfig,
    tables: DashMap<String, Arc<InterceptorTable>>,
}

impl AspectContainer {
    pub fn new(resolver: Arc<dyn MetadataResolver>) -> Self {
        Self::with_config(resolver, PipelineConfig::default())
    }

    pub fn with_config(resolver: Arc<dyn MetadataResolver>, config: PipelineConfig) -> Self {
        Self {
            resolver,
            config,
            tables: DashMap::new(),
        }
    }

    /// Wrap `target`. Types without declarations get an empty table, so the
    /// proxy passes everything straight through.
    pub fn proxy<T: Target>(&self, target: T) -> Result<Proxy<T>> {
        let table = self.table_for(target.type_name())?;
        Ok(Proxy::new(target, table).with_after_halt(self.config.after_halt))
    }

    /// The cached table for `type_name`, building it if needed.
    pub fn table_for(&self, type_name: &str) -> Result<Arc<InterceptorTable>> {
        if let Some(table) = self.tables.get(type_name) {
            return Ok(Arc::clone(table.value()));
        }

        let table = Arc::new(InterceptorTable::from_resolver(self.resolver.as_ref(), type_name)?);
        if table.is_empty() {
            debug!(type_name, "no intercepted members");
        } else {
            info!(type_name, "built interceptor table");
        }

        // Another thread may have built the same table meanwhile; keep the first.
        let entry = self.tables.entry(type_name.to_string()).or_insert(table);
        Ok(Arc::clone(entry.value()))
    }

    /// Drop the cached table for `type_name`. Existing proxies keep theirs.
    pub fn invalidate(&self, type_name: &str) -> bool {
        self.tables.remove(type_name).is_some()
    }

    pub fn cached_types(&self) -> usize {
        self.tables.len()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
