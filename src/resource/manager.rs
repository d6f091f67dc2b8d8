use super::events::{FnObserver, ObserverId, ObserverRegistry, WeightEvent, WeightEventKind, WeightObserver};
use super::{ResourcePool, Snapshot, Source};
use crate::weight::{DefaultStrategy, WeightItem, WeightStrategy};
use crate::{Error, ErrorContext, Result};
use arc_swap::ArcSwap;
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Concurrent weighted pool of resources.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct ResourceManager<S: Source> {
    pool: ArcSwap<HashMap<S, WeightItem>>,
    strategy: Arc<dyn WeightStrategy>,
    observers: ObserverRegistry<S>,
}

impl<S: Source> fmt::Debug for ResourceManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceManager")
            .field("resources", &**self.pool.load())
            .field("strategy", &self.strategy)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn check_not_empty<S>(resources: &HashMap<S, WeightItem>) -> Result<()> {
    if resources.is_empty() {
        return Err(Error::validation_with_context(
            "source collection must not be empty",
            ErrorContext::new()
                .with_field_path("resources")
                .with_source("resource_manager"),
        ));
    }
    Ok(())
}

impl<S: Source> ResourceManager<S> {
    /// Build a pool from explicit weights and a strategy.
    pub fn new(
        resources: impl IntoIterator<Item = (S, WeightItem)>,
        strategy: Arc<dyn WeightStrategy>,
    ) -> Result<Self> {
        let resources: HashMap<S, WeightItem> = resources.into_iter().collect();
        check_not_empty(&resources)?;
        Ok(Self {
            pool: ArcSwap::from_pointee(resources),
            strategy,
            observers: ObserverRegistry::new(),
        })
    }

    /// Build a pool from bare identifiers: duplicates collapse, every source
    /// starts at [`WeightItem::default`], and [`DefaultStrategy`] drives the weights.
    pub fn from_sources(sources: impl IntoIterator<Item = S>) -> Result<Self> {
        Self::new(
            sources.into_iter().map(|s| (s, WeightItem::default())),
            Arc::new(DefaultStrategy::new()),
        )
    }

    pub fn strategy(&self) -> &Arc<dyn WeightStrategy> {
        &self.strategy
    }

    pub fn resources(&self) -> Snapshot<S> {
        self.pool.load_full()
    }

    /// Weighted random pick using the calling thread's generator.
    pub fn select_randomly(&self) -> S {
        self.select_with(&mut rand::thread_rng())
    }

    /// Weighted random pick using a caller-supplied generator.
    ///
    /// # Panics
    ///
    /// If the snapshot's weights do not cover the drawn value, which the
    /// `WeightItem` invariants rule out.
    pub fn select_with<R: Rng>(&self, rng: &mut R) -> S {
        let pool = self.pool.load();
        let total: u64 = pool.values().map(|w| w.weight() as u64).sum();
        let mut draw = rng.gen_range(0..total);
        for (source, weight) in pool.iter() {
            let weight = weight.weight() as u64;
            if draw < weight {
                return source.clone();
            }
            draw -= weight;
        }
        panic!("invalid weight in the resource collection: total {} not covered", total);
    }

    /// Apply the strategy to `source` and publish the result if it changed.
    pub fn update_weight(&self, source: &S, success: bool) {
        loop {
            let current = self.pool.load_full();
            let Some(old) = current.get(source) else {
                return;
            };
            let new = self.strategy.update_weight(old, success);
            if new == *old {
                return;
            }

            let mut next = HashMap::clone(&current);
            // insert keeps the stored key, so held handles survive
            next.insert(source.clone(), new);
            let next = Arc::new(next);

            let prev = self.pool.compare_and_swap(&current, Arc::clone(&next));
            if Arc::ptr_eq(&prev, &current) {
                debug!(
                    source = ?source,
                    success,
                    old_weight = old.weight(),
                    new_weight = new.weight(),
                    "resource weight updated"
                );
                self.publish(current, next);
                return;
            }
        }
    }

    /// Replace the resource set.
    ///
    /// Sources present before and after keep both their stored key and their
    /// learned weight; the supplied weight is only used for new sources.
    /// Sources missing from `resources` are dropped.
    pub fn update_resources(&self, resources: HashMap<S, WeightItem>) -> Result<()> {
        check_not_empty(&resources)?;
        loop {
            let current = self.pool.load_full();
            let merged: HashMap<S, WeightItem> = resources
                .iter()
                .map(|(source, weight)| match current.get_key_value(source) {
                    Some((kept, learned)) => (kept.clone(), *learned),
                    None => (source.clone(), *weight),
                })
                .collect();
            if merged == *current {
                return Ok(());
            }

            let next = Arc::new(merged);
            let prev = self.pool.compare_and_swap(&current, Arc::clone(&next));
            if Arc::ptr_eq(&prev, &current) {
                info!(
                    previous = current.len(),
                    current = next.len(),
                    "resource set replaced"
                );
                self.publish(current, next);
                return Ok(());
            }
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn WeightObserver<S>>) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn subscribe_fn<F>(&self, func: F) -> ObserverId
    where
        F: Fn(&WeightEvent<S>) + Send + Sync + 'static,
    {
        self.observers.register(Arc::new(FnObserver::new(func)))
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn publish(&self, old: Snapshot<S>, new: Snapshot<S>) {
        let at_bottom = new.values().all(WeightItem::is_at_bottom);
        let mut event = WeightEvent {
            kind: WeightEventKind::WeightUpdated,
            old,
            new,
        };
        self.observers.notify(&event);
        if at_bottom {
            warn!(sources = event.new.len(), "all sources reached minimum weight");
            event.kind = WeightEventKind::AllSourcesAtBottom;
            self.observers.notify(&event);
        }
    }
}

impl<S: Source> ResourcePool<S> for ResourceManager<S> {
    fn resources(&self) -> Snapshot<S> {
        ResourceManager::resources(self)
    }

    fn select_randomly(&self) -> S {
        ResourceManager::select_randomly(self)
    }

    fn update_weight(&self, source: &S, success: bool) {
        ResourceManager::update_weight(self, source, success)
    }

    fn update_resources(&self, resources: HashMap<S, WeightItem>) -> Result<()> {
        ResourceManager::update_resources(self, resources)
    }

    fn subscribe(&self, observer: Arc<dyn WeightObserver<S>>) -> ObserverId {
        ResourceManager::subscribe(self, observer)
    }

    fn unsubscribe(&self, id: ObserverId) -> bool {
        ResourceManager::unsubscribe(self, id)
    }
}
