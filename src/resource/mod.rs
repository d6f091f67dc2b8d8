//! 资源模块：带权重的资源池、随机选择与权重反馈。
//!
//! # Resource Pool Module
//!
//! A [`ResourceManager`] owns the mapping `source -> WeightItem` for one set of
//! interchangeable backends (base URLs, connection strings, channel handles).
//!
//! ## Concurrency
//!
//! The pool is published as an immutable [`Snapshot`] behind an
//! [`arc_swap::ArcSwap`]:
//! - readers (`select_randomly`, `resources`) load the current snapshot and never block
//! - writers (`update_weight`, `update_resources`) build a new snapshot and
//!   compare-and-swap it in, recomputing from the fresh snapshot when they lose a race
//!
//! A writer therefore never drops another writer's change to a different key,
//! and never re-inserts a key that a concurrent `update_resources` removed.
//!
//! ## Notifications
//!
//! Observers see [`WeightEvent`]s after the new snapshot is visible:
//! [`WeightEventKind::WeightUpdated`] on every change, followed by
//! [`WeightEventKind::AllSourcesAtBottom`] when every source sits on its floor.
//!
//! ```rust
//! use weighted_retry::resource::{ResourceManager, ResourcePool};
//!
//! let pool = ResourceManager::from_sources(["http://a", "http://b"]).unwrap();
//! let picked = pool.select_randomly();
//! pool.update_weight(&picked, false);
//! assert_eq!(pool.resources()[&picked].weight(), 10);
//! ```

pub mod builder;
pub mod events;
pub mod manager;

pub use builder::ResourceManagerBuilder;
pub use events::{
    FnObserver, ObserverId, RecordingObserver, TracingObserver, WeightChange, WeightEvent,
    WeightEventKind, WeightObserver,
};
pub use manager::ResourceManager;

use crate::weight::WeightItem;
use crate::Result;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Read-only view of a pool at one point in time.
pub type Snapshot<S> = Arc<HashMap<S, WeightItem>>;

/// Requirements on a resource key.
///
/// Keys are compared and hashed to locate their weight; they are cloned out of
/// the pool on selection, so a key holding an expensive handle should keep it
/// behind an `Arc`.
pub trait Source: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> Source for T where T: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Weighted pool of interchangeable resources.
///
/// Collaborators (HTTP, gRPC, database layers) depend on this trait rather
/// than on [`ResourceManager`], so selection and feedback can be mocked.
pub trait ResourcePool<S: Source>: Send + Sync {
    /// Current snapshot.
    fn resources(&self) -> Snapshot<S>;

    /// Pick a source with probability proportional to its weight.
    fn select_randomly(&self) -> S;

    /// Feed one observed outcome back into the pool. Unknown sources are ignored.
    fn update_weight(&self, source: &S, success: bool);

    /// Replace the resource set, keeping learned weights of sources that stay.
    fn update_resources(&self, resources: HashMap<S, WeightItem>) -> Result<()>;

    fn subscribe(&self, observer: Arc<dyn WeightObserver<S>>) -> ObserverId;

    fn unsubscribe(&self, id: ObserverId) -> bool;
}
