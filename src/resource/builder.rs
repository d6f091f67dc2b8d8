use super::events::WeightObserver;
use super::manager::ResourceManager;
use super::Source;
use crate::config::PoolConfig;
use crate::weight::{WeightItem, WeightStrategy};
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Builder for [`ResourceManager`].
///
/// Sources added without an explicit weight start from the configured
/// `initial_weight`/`min_weight`/`max_weight`. When the same source is added
/// twice, the first entry wins.
pub struct ResourceManagerBuilder<S: Source> {
    config: PoolConfig,
    strategy: Option<Arc<dyn WeightStrategy>>,
    sources: Vec<(S, Option<WeightItem>)>,
    observers: Vec<Arc<dyn WeightObserver<S>>>,
}

impl<S: Source> ResourceManagerBuilder<S> {
    pub fn new() -> Self {
        Self {
            config: PoolConfig::default(),
            strategy: None,
            sources: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Default weights and strategy. An explicit [`with_strategy`](Self::with_strategy) still wins.
    pub fn with_config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn WeightStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_source(mut self, source: S) -> Self {
        self.sources.push((source, None));
        self
    }

    pub fn with_weighted_source(mut self, source: S, weight: WeightItem) -> Self {
        self.sources.push((source, Some(weight)));
        self
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = S>) -> Self {
        self.sources.extend(sources.into_iter().map(|s| (s, None)));
        self
    }

    /// Subscribe an observer before the pool is handed out.
    pub fn with_observer(mut self, observer: Arc<dyn WeightObserver<S>>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<ResourceManager<S>> {
        let initial = self.config.weight_item()?;
        let strategy = match self.strategy {
            Some(strategy) => strategy,
            None => self.config.strategy.build()?,
        };

        let mut resources: HashMap<S, WeightItem> = HashMap::with_capacity(self.sources.len());
        for (source, weight) in self.sources {
            resources.entry(source).or_insert(weight.unwrap_or(initial));
        }
        debug!(
            sources = resources.len(),
            strategy = ?strategy,
            "building resource manager"
        );

        let manager = ResourceManager::new(resources, strategy)?;
        for observer in self.observers {
            manager.subscribe(observer);
        }
        Ok(manager)
    }
}

impl<S: Source> Default for ResourceManagerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
