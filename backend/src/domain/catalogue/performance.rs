//! Performance rows: at most one per car, removed with the car.

use std::num::IntErrorKind;

use super::engine::patched;
use super::{CarId, CatalogueValidationError, PerformanceId, Quantity};

/// Finite, non-negative 0-100 km/h time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Acceleration(f64);

impl Acceleration {
    /// Validate a time in seconds.
    pub fn new(seconds: f64) -> Result<Self, CatalogueValidationError> {
        if seconds.is_finite() && seconds >= 0.0 {
            Ok(Self(seconds))
        } else {
            Err(CatalogueValidationError::InvalidDecimal {
                field: "acceleration_0_100",
                value: seconds.to_string(),
            })
        }
    }

    /// Seconds from 0 to 100 km/h.
    #[must_use]
    pub const fn seconds(self) -> f64 {
        self.0
    }
}

/// Stored performance record.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    /// Store-assigned identifier.
    pub id: PerformanceId,
    /// Owning car.
    pub car_id: CarId,
    /// Top speed in km/h.
    pub top_speed: Option<u32>,
    /// 0-100 km/h time in seconds.
    pub acceleration_0_100: Option<f64>,
}

/// Validated performance record ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceDraft {
    /// Owning car.
    pub car_id: CarId,
    /// Top speed.
    pub top_speed: Option<Quantity>,
    /// Acceleration time.
    pub acceleration_0_100: Option<Acceleration>,
}

/// Partial performance update; `Some(None)` clears a column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformancePatch {
    /// Top speed update.
    pub top_speed: Option<Option<Quantity>>,
    /// Acceleration update.
    pub acceleration_0_100: Option<Option<Acceleration>>,
}

impl PerformancePatch {
    /// Apply the patch to a stored record.
    #[must_use]
    pub fn apply(&self, performance: &Performance) -> Performance {
        Performance {
            id: performance.id,
            car_id: performance.car_id,
            top_speed: patched(self.top_speed, performance.top_speed),
            acceleration_0_100: match self.acceleration_0_100 {
                Some(value) => value.map(Acceleration::seconds),
                None => performance.acceleration_0_100,
            },
        }
    }
}

/// Filter applied by performance searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceSearch {
    /// Query was not an integer; every record matches.
    All,
    /// Records whose top speed is at least this value.
    MinTopSpeed(i64),
}

impl PerformanceSearch {
    /// Interpret a free-text query. Integers too large for `i64` saturate,
    /// so a huge threshold matches nothing rather than everything.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        match query.trim().parse::<i64>() {
            Ok(min) => Self::MinTopSpeed(min),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => Self::MinTopSpeed(i64::MAX),
                IntErrorKind::NegOverflow => Self::MinTopSpeed(i64::MIN),
                _ => Self::All,
            },
        }
    }

    /// Whether a record with `top_speed` passes the filter. Records without a
    /// top speed only pass [`Self::All`].
    #[must_use]
    pub fn matches(self, top_speed: Option<u32>) -> bool {
        match self {
            Self::All => true,
            Self::MinTopSpeed(min) => top_speed.is_some_and(|speed| i64::from(speed) >= min),
        }
    }
}
