//! Observation window of the point process: time horizon `T` and rectangular
//! spatial domain `S`.
//!
//! Both are validated on construction and immutable afterwards. `T` enters the
//! likelihood through the first-event compensator (`t − t_min`), `S` through
//! its area `|S|` in the base-rate compensator; both bound the simulator.
use crate::hawkes::errors::{HawkesError, HawkesResult};

/// Closed time interval `[min, max]` with `0 ≤ min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeHorizon {
    pub min: f64,
    pub max: f64,
}

impl TimeHorizon {
    /// # Errors
    /// - [`HawkesError::InvalidTimeHorizon`] for non-finite bounds, a negative
    ///   start, or `min ≥ max`.
    pub fn new(min: f64, max: f64) -> HawkesResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(HawkesError::InvalidTimeHorizon {
                min,
                max,
                reason: "bounds must be finite",
            });
        }
        if min < 0.0 {
            return Err(HawkesError::InvalidTimeHorizon {
                min,
                max,
                reason: "event times are non-negative, so the horizon must start at or after 0",
            });
        }
        if min >= max {
            return Err(HawkesError::InvalidTimeHorizon { min, max, reason: "need min < max" });
        }
        Ok(Self { min, max })
    }

    pub fn length(&self) -> f64 {
        self.max - self.min
    }
}

/// Axis-aligned rectangle `[x_min, x_max] × [y_min, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialDomain {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl SpatialDomain {
    /// # Errors
    /// - [`HawkesError::InvalidSpatialDomain`] naming the first offending axis
    ///   (0 = x, 1 = y).
    pub fn new(x: (f64, f64), y: (f64, f64)) -> HawkesResult<Self> {
        for (axis, &(min, max)) in [x, y].iter().enumerate() {
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(HawkesError::InvalidSpatialDomain { axis, min, max });
            }
        }
        Ok(Self { x, y })
    }

    /// Area `|S|`.
    pub fn area(&self) -> f64 {
        (self.x.1 - self.x.0) * (self.y.1 - self.y.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x.0 && x <= self.x.1 && y >= self.y.0 && y <= self.y.1
    }
}
