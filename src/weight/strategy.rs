//! Weight manipulation strategies.
//!
//! A strategy is a pure function from `(old weight, success)` to a new weight.
//! Bounds are enforced by [`WeightItem::set_new_weight`], so every strategy
//! expresses its result as a delta and lets the item clamp it.

use super::item::WeightItem;
use crate::{Error, ErrorContext, Result};
use std::fmt;
use std::sync::Arc;

/// Delta applied on success by [`DefaultStrategy`].
pub const DEFAULT_INCREMENT_DELTA: i64 = 1000;
/// Divisor applied on failure by [`DefaultStrategy`].
pub const DEFAULT_DECREMENT_MAGNITUDE: f64 = 100.0;

/// Decides how a resource's weight moves after an observed success or failure.
pub trait WeightStrategy: Send + Sync + fmt::Debug {
    fn update_weight(&self, original: &WeightItem, success: bool) -> WeightItem;
}

impl<T: WeightStrategy + ?Sized> WeightStrategy for Arc<T> {
    fn update_weight(&self, original: &WeightItem, success: bool) -> WeightItem {
        (**self).update_weight(original, success)
    }
}

/// Adds `delta` on success, subtracts it on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelta {
    delta: i64,
}

impl FixedDelta {
    pub fn new(delta: i64) -> Self {
        Self { delta }
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }
}

impl WeightStrategy for FixedDelta {
    fn update_weight(&self, original: &WeightItem, success: bool) -> WeightItem {
        let delta = if success {
            self.delta
        } else {
            self.delta.saturating_neg()
        };
        original.set_new_weight(delta)
    }
}

/// Multiplies the weight by `magnitude` on success and divides by it on failure.
///
/// The product is rounded half away from zero before being turned back into an
/// integer delta, so `Exponential(1.5)` takes 5 to 8 and `Exponential(2)`
/// takes 5 down to 3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    magnitude: f64,
}

impl Exponential {
    pub fn new(magnitude: f64) -> Result<Self> {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(Error::validation_with_context(
                "magnitude cannot be equal or lesser than 0",
                ErrorContext::new()
                    .with_field_path("magnitude")
                    .with_details(format!("got {}", magnitude))
                    .with_source("exponential_strategy"),
            ));
        }
        Ok(Self { magnitude })
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }
}

impl WeightStrategy for Exponential {
    fn update_weight(&self, original: &WeightItem, success: bool) -> WeightItem {
        let current = original.weight() as f64;
        let target = if success {
            current * self.magnitude
        } else {
            current / self.magnitude
        };
        // `as` saturates for out-of-range floats
        let delta = (target.round() as i64).saturating_sub(original.weight() as i64);
        original.set_new_weight(delta)
    }
}

/// Leaves every weight untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Noop;

impl WeightStrategy for Noop {
    fn update_weight(&self, original: &WeightItem, _success: bool) -> WeightItem {
        *original
    }
}

/// Delegates successes to `increment` and failures to `decrement`.
#[derive(Clone)]
pub struct Split {
    increment: Arc<dyn WeightStrategy>,
    decrement: Arc<dyn WeightStrategy>,
}

impl Split {
    pub fn new(
        increment: impl WeightStrategy + 'static,
        decrement: impl WeightStrategy + 'static,
    ) -> Self {
        Self {
            increment: Arc::new(increment),
            decrement: Arc::new(decrement),
        }
    }

    pub fn increment(&self) -> &Arc<dyn WeightStrategy> {
        &self.increment
    }

    pub fn decrement(&self) -> &Arc<dyn WeightStrategy> {
        &self.decrement
    }
}

impl fmt::Debug for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Split")
            .field("increment", &self.increment)
            .field("decrement", &self.decrement)
            .finish()
    }
}

impl WeightStrategy for Split {
    fn update_weight(&self, original: &WeightItem, success: bool) -> WeightItem {
        let strategy = if success {
            &self.increment
        } else {
            &self.decrement
        };
        strategy.update_weight(original, success)
    }
}

/// Production default: linear recovery by 1000 on success, division by 100 on failure.
#[derive(Debug, Clone)]
pub struct DefaultStrategy {
    inner: Split,
}

impl DefaultStrategy {
    pub fn new() -> Self {
        Self {
            inner: Split::new(
                FixedDelta::new(DEFAULT_INCREMENT_DELTA),
                Exponential {
                    magnitude: DEFAULT_DECREMENT_MAGNITUDE,
                },
            ),
        }
    }
}

impl Default for DefaultStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightStrategy for DefaultStrategy {
    fn update_weight(&self, original: &WeightItem, success: bool) -> WeightItem {
        self.inner.update_weight(original, success)
    }
}
