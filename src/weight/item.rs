use crate::{Error, ErrorContext, Result};

/// Weight assigned to [`WeightItem::default`]: fully healthy.
pub const DEFAULT_WEIGHT: u32 = 1000;
/// Upper bound assigned to [`WeightItem::default`].
pub const DEFAULT_MAX_WEIGHT: u32 = 1000;
/// Floor assigned to [`WeightItem::default`]. Never zero, so a degraded
/// resource still gets picked now and then.
pub const DEFAULT_MIN_WEIGHT: u32 = 1;

/// Immutable, bounded selection weight of a single resource.
///
/// Invariant: `1 <= min_weight <= weight <= max_weight`. Every mutation
/// produces a new value through [`WeightItem::set_new_weight`], which clamps
/// into the bounds, so strategies never have to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeightItem {
    weight: u32,
    min_weight: u32,
    max_weight: u32,
}

impl WeightItem {
    pub fn new(weight: u32, min_weight: u32, max_weight: u32) -> Result<Self> {
        if min_weight < 1 {
            return Err(Error::validation_with_context(
                "min_weight must be equal or greater than 1",
                ErrorContext::new()
                    .with_field_path("min_weight")
                    .with_details(format!("got {}", min_weight))
                    .with_source("weight_item"),
            ));
        }
        if weight < min_weight {
            return Err(Error::validation_with_context(
                "weight must be equal or greater than min_weight",
                ErrorContext::new()
                    .with_field_path("weight")
                    .with_details(format!("weight {} < min_weight {}", weight, min_weight))
                    .with_source("weight_item"),
            ));
        }
        if weight > max_weight {
            return Err(Error::validation_with_context(
                "weight must be equal or lesser than max_weight",
                ErrorContext::new()
                    .with_field_path("weight")
                    .with_details(format!("weight {} > max_weight {}", weight, max_weight))
                    .with_source("weight_item"),
            ));
        }
        Ok(Self {
            weight,
            min_weight,
            max_weight,
        })
    }

    /// Shorthand for a floor of 1.
    pub fn with_max(weight: u32, max_weight: u32) -> Result<Self> {
        Self::new(weight, DEFAULT_MIN_WEIGHT, max_weight)
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn min_weight(&self) -> u32 {
        self.min_weight
    }

    pub fn max_weight(&self) -> u32 {
        self.max_weight
    }

    /// True when the weight sits on its floor.
    pub fn is_at_bottom(&self) -> bool {
        self.weight == self.min_weight
    }

    /// Derive a new item by adding `delta`, clamped into `[min_weight, max_weight]`.
    pub fn set_new_weight(&self, delta: i64) -> Self {
        let target = (self.weight as i64).saturating_add(delta);
        let clamped = target.clamp(self.min_weight as i64, self.max_weight as i64);
        Self {
            // clamped lies between two u32 values
            weight: clamped as u32,
            min_weight: self.min_weight,
            max_weight: self.max_weight,
        }
    }
}

impl Default for WeightItem {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            min_weight: DEFAULT_MIN_WEIGHT,
            max_weight: DEFAULT_MAX_WEIGHT,
        }
    }
}
