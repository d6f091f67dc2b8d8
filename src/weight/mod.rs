//! 权重模块：有界权重值与权重调整策略。
//!
//! # Weight Module
//!
//! Bounded selection weights and the strategies that move them after each
//! observed success or failure.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`WeightItem`] | Immutable `(weight, min, max)` triple with clamped updates |
//! | [`FixedDelta`] | Linear `±delta` |
//! | [`Exponential`] | Multiply on success, divide on failure |
//! | [`Noop`] | Identity |
//! | [`Split`] | Different strategies for success and failure |
//! | [`DefaultStrategy`] | `Split(FixedDelta(1000), Exponential(100))` |
//!
//! ```rust
//! use weighted_retry::weight::{DefaultStrategy, WeightItem, WeightStrategy};
//!
//! let strategy = DefaultStrategy::new();
//! let degraded = strategy.update_weight(&WeightItem::default(), false);
//! assert_eq!(degraded.weight(), 10);
//! ```

pub mod item;
pub mod strategy;

pub use item::{WeightItem, DEFAULT_MAX_WEIGHT, DEFAULT_MIN_WEIGHT, DEFAULT_WEIGHT};
pub use strategy::{
    DefaultStrategy, Exponential, FixedDelta, Noop, Split, WeightStrategy,
    DEFAULT_DECREMENT_MAGNITUDE, DEFAULT_INCREMENT_DELTA,
};
