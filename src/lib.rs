//! # weighted-retry
//!
//! 客户端加权负载均衡与重试引擎：按权重随机选择资源，根据成功/失败自适应调整权重。
//!
//! Client-side weighted load balancing and retry engine for sets of
//! interchangeable remote resources (database connection strings, gRPC
//! channels, HTTP base URLs).
//!
//! ## Overview
//!
//! Each call picks one resource at random, weighted by how well it has been
//! doing, runs a caller-supplied operation against it, and moves that
//! resource's weight up or down according to the outcome. Failed attempts are
//! retried on a fresh pick for as long as the retry predicate allows.
//!
//! ## Core Philosophy
//!
//! - **Caller-Owned I/O**: the engine never talks to the network; operations are closures
//! - **Lock-Free Reads**: selection works on an immutable snapshot of the pool
//! - **Errors Untouched**: the operation's own error type comes back unchanged
//! - **Sync and Async**: separate entry points, chosen at compile time
//!
//! ## Quick Start
//!
//! ```rust
//! use weighted_retry::{predicate, ResourceManager, ResourcePoolExt};
//!
//! let pool = ResourceManager::from_sources([
//!     "https://eu.example.com".to_string(),
//!     "https://us.example.com".to_string(),
//! ])?;
//!
//! let status: Result<u16, String> = pool.execute_action(
//!     |base_url, attempt| {
//!         // issue the request against `base_url` here
//!         let _ = (base_url, attempt);
//!         Ok(200)
//!     },
//!     predicate::max_attempts(3),
//!     None,
//! );
//! assert_eq!(status, Ok(200));
//! # Ok::<(), weighted_retry::Error>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`weight`] | Bounded weights and weight strategies |
//! | [`resource`] | The weighted pool, its builder and change notifications |
//! | [`retry`] | The retry loop, predicates and diagnostics |
//! | [`ext`] | Retry entry points bound to a pool |
//! | [`config`] | YAML/JSON configuration |

pub mod config;
pub mod ext;
pub mod resource;
pub mod retry;
pub mod weight;

// Re-export main types for convenience
pub use config::{PoolConfig, RetryPolicyConfig, StrategyConfig};
pub use ext::ResourcePoolExt;
pub use resource::{
    ObserverId, RecordingObserver, ResourceManager, ResourceManagerBuilder, ResourcePool,
    Snapshot, Source, TracingObserver, WeightEvent, WeightEventKind, WeightObserver,
};
pub use retry::{predicate, OnError, RetryAction, RetryActionResult, RetryDiagnostics};
pub use weight::{
    DefaultStrategy, Exponential, FixedDelta, Noop, Split, WeightItem, WeightStrategy,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
