//! Weight change notifications.
//!
//! Observers are registered on a [`ResourceManager`](super::ResourceManager)
//! and called synchronously, after the new snapshot has been published.

use super::{Snapshot, Source};
use crate::weight::WeightItem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightEventKind {
    /// The pool changed: a weight moved, or the resource set was replaced.
    WeightUpdated,
    /// After the change every source sits on its own floor.
    AllSourcesAtBottom,
}

/// A published pool change, carrying both snapshots.
#[derive(Debug, Clone)]
pub struct WeightEvent<S> {
    pub kind: WeightEventKind,
    pub old: Snapshot<S>,
    pub new: Snapshot<S>,
}

/// One source's transition between the two snapshots of a [`WeightEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightChange<'a, S> {
    pub source: &'a S,
    /// `None` when the source was added.
    pub old: Option<WeightItem>,
    /// `None` when the source was removed.
    pub new: Option<WeightItem>,
}

impl<S: Source> WeightEvent<S> {
    /// Sources whose entry differs between `old` and `new`, including additions and removals.
    pub fn changes(&self) -> Vec<WeightChange<'_, S>> {
        let mut changes: Vec<WeightChange<'_, S>> = self
            .new
            .iter()
            .filter_map(|(source, new)| {
                let old = self.old.get(source).copied();
                (old != Some(*new)).then_some(WeightChange {
                    source,
                    old,
                    new: Some(*new),
                })
            })
            .collect();
        changes.extend(
            self.old
                .iter()
                .filter(|(source, _)| !self.new.contains_key(*source))
                .map(|(source, old)| WeightChange {
                    source,
                    old: Some(*old),
                    new: None,
                }),
        );
        changes
    }
}

/// Receives pool change notifications.
pub trait WeightObserver<S>: Send + Sync {
    fn notify(&self, event: &WeightEvent<S>);
}

/// Adapts a closure into a [`WeightObserver`].
pub struct FnObserver<F> {
    func: F,
}

impl<F> FnObserver<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<S, F> WeightObserver<S> for FnObserver<F>
where
    F: Fn(&WeightEvent<S>) + Send + Sync,
{
    fn notify(&self, event: &WeightEvent<S>) {
        (self.func)(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub(crate) struct ObserverRegistry<S> {
    next_id: AtomicU64,
    observers: RwLock<Vec<(ObserverId, Arc<dyn WeightObserver<S>>)>>,
}

impl<S> ObserverRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn register(&self, observer: Arc<dyn WeightObserver<S>>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, observer));
        id
    }

    pub(crate) fn unregister(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let len = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() < len
    }

    pub(crate) fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub(crate) fn notify(&self, event: &WeightEvent<S>) {
        // Call outside the lock so observers may (un)subscribe re-entrantly.
        let observers: Vec<Arc<dyn WeightObserver<S>>> = {
            let guard = self.observers.read().unwrap_or_else(|e| e.into_inner());
            guard.iter().map(|(_, o)| Arc::clone(o)).collect()
        };
        for observer in observers {
            observer.notify(event);
        }
    }
}

/// Emits every pool change as a structured `tracing` event.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    pool: String,
}

impl TracingObserver {
    pub fn new(pool: impl Into<String>) -> Self {
        Self { pool: pool.into() }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("default")
    }
}

impl<S: Source> WeightObserver<S> for TracingObserver {
    fn notify(&self, event: &WeightEvent<S>) {
        match event.kind {
            WeightEventKind::WeightUpdated => {
                for change in event.changes() {
                    info!(
                        pool = self.pool.as_str(),
                        source = ?change.source,
                        old_weight = change.old.map(|w| w.weight()),
                        new_weight = change.new.map(|w| w.weight()),
                        "resource weight changed"
                    );
                }
            }
            WeightEventKind::AllSourcesAtBottom => {
                warn!(
                    pool = self.pool.as_str(),
                    sources = event.new.len(),
                    "all sources reached minimum weight"
                );
            }
        }
    }
}

/// In-memory observer keeping the most recent events.
pub struct RecordingObserver<S> {
    events: Mutex<Vec<WeightEvent<S>>>,
    max_events: usize,
}

impl<S: Clone> RecordingObserver<S> {
    pub fn new(max: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            max_events: max,
        }
    }

    pub fn events(&self) -> Vec<WeightEvent<S>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self, kind: WeightEventKind) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Clone + Send + Sync> WeightObserver<S> for RecordingObserver<S> {
    fn notify(&self, event: &WeightEvent<S>) {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event.clone());
        if events.len() > self.max_events {
            events.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    type Src = &'static str;

    fn snapshot(entries: &[(Src, u32)]) -> Snapshot<Src> {
        Arc::new(
            entries
                .iter()
                .map(|(k, w)| (*k, WeightItem::with_max(*w, 100).unwrap()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_changes_lists_added_removed_and_moved() {
        let event = WeightEvent {
            kind: WeightEventKind::WeightUpdated,
            old: snapshot(&[("a", 10), ("b", 20), ("c", 30)]),
            new: snapshot(&[("a", 10), ("b", 25), ("d", 40)]),
        };
        let mut changes = event.changes();
        changes.sort_by_key(|c| *c.source);

        assert_eq!(changes.len(), 3);
        assert_eq!(*changes[0].source, "b");
        assert_eq!(changes[0].new.map(|w| w.weight()), Some(25));
        assert_eq!(*changes[1].source, "c");
        assert!(changes[1].new.is_none());
        assert_eq!(*changes[2].source, "d");
        assert!(changes[2].old.is_none());
    }

    #[test]
    fn test_registry_unregister() {
        let registry: ObserverRegistry<Src> = ObserverRegistry::new();
        let id = registry.register(Arc::new(FnObserver::new(|_: &WeightEvent<Src>| {})));
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_recording_observer_caps_history() {
        let recorder = RecordingObserver::new(2);
        for kind in [
            WeightEventKind::WeightUpdated,
            WeightEventKind::WeightUpdated,
            WeightEventKind::AllSourcesAtBottom,
        ] {
            recorder.notify(&WeightEvent {
                kind,
                old: snapshot(&[("a", 10)]),
                new: snapshot(&[("a", 1)]),
            });
        }
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.count(WeightEventKind::AllSourcesAtBottom), 1);
        recorder.clear();
        assert!(recorder.is_empty());
    }
}
