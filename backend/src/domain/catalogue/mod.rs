//! Catalogue entities: companies, fuel types, engines, cars and performance.
//!
//! Read models (`NamedReference`, `Engine`, `Car`, `Performance`) carry public
//! fields because they are plain snapshots of stored rows. Write models
//! (drafts and patches) are built from validated newtypes so adapters can
//! persist them without re-checking invariants.
//!
//! Integer measurements are stored in PostgreSQL `INTEGER` columns, so every
//! [`Quantity`] is bounded by `i32::MAX`.

mod car;
mod engine;
mod performance;
mod reference;

pub use car::{Car, CarDraft, CarName, CarPatch, SeatCount};
pub use engine::{Engine, EngineDraft, EnginePatch, EngineType};
pub use performance::{
    Acceleration, Performance, PerformanceDraft, PerformancePatch, PerformanceSearch,
};
pub use reference::{NamedReference, ReferenceKind, ReferenceName};

use serde_json::json;

use super::Error;

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a database-assigned identifier.
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Raw identifier value.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a company or fuel type row.
    ReferenceId
);
define_entity_id!(
    /// Identifier of an engine row.
    EngineId
);
define_entity_id!(
    /// Identifier of a car row.
    CarId
);
define_entity_id!(
    /// Identifier of a performance row.
    PerformanceId
);

/// Largest value an `INTEGER` column accepts.
const MAX_STORED: u32 = i32::MAX.unsigned_abs();

/// Validation failures raised while building catalogue write models.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueValidationError {
    /// A required text field was missing or blank.
    #[error("{field} must not be empty")]
    Empty {
        /// Offending field.
        field: &'static str,
    },
    /// A text field exceeded its column width.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum permitted characters.
        max: usize,
    },
    /// A numeric field was negative or beyond the stored range.
    #[error("{field} must be between 0 and 2147483647, got {value}")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
        /// Rejected value, rendered for diagnostics.
        value: String,
    },
    /// A count that must be at least one was zero.
    #[error("{field} must be positive")]
    NotPositive {
        /// Offending field.
        field: &'static str,
    },
    /// A floating point field was negative, infinite or NaN.
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidDecimal {
        /// Offending field.
        field: &'static str,
        /// Rejected value, rendered for diagnostics.
        value: String,
    },
}

impl CatalogueValidationError {
    /// Name of the field that failed validation.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotPositive { field }
            | Self::InvalidDecimal { field, .. } => field,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "empty_field",
            Self::TooLong { .. } => "too_long",
            Self::OutOfRange { .. } => "out_of_range",
            Self::NotPositive { .. } => "not_positive",
            Self::InvalidDecimal { .. } => "invalid_decimal",
        }
    }
}

impl From<CatalogueValidationError> for Error {
    fn from(err: CatalogueValidationError) -> Self {
        let details = json!({ "field": err.field(), "code": err.code() });
        Self::invalid_request(err.to_string()).with_details(details)
    }
}

/// Trim `raw` and enforce a non-empty value of at most `max` characters.
fn bounded_text(
    field: &'static str,
    raw: &str,
    max: usize,
) -> Result<String, CatalogueValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogueValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(CatalogueValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Non-negative integer measurement (cc, horsepower, torque, price, speed).
///
/// # Examples
/// ```
/// use car_catalogue::domain::catalogue::Quantity;
///
/// let cc = Quantity::from_i64("cc", 1200).expect("in range");
/// assert_eq!(cc.get(), 1200);
/// assert!(Quantity::from_i64("cc", -1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u32);

impl Quantity {
    /// Validate a signed input such as a JSON number.
    pub fn from_i64(field: &'static str, value: i64) -> Result<Self, CatalogueValidationError> {
        u32::try_from(value)
            .ok()
            .filter(|candidate| *candidate <= MAX_STORED)
            .map(Self)
            .ok_or_else(|| CatalogueValidationError::OutOfRange {
                field,
                value: value.to_string(),
            })
    }

    /// Validate an unsigned input such as a parsed CSV cell.
    pub fn from_u64(field: &'static str, value: u64) -> Result<Self, CatalogueValidationError> {
        u32::try_from(value)
            .ok()
            .filter(|candidate| *candidate <= MAX_STORED)
            .map(Self)
            .ok_or_else(|| CatalogueValidationError::OutOfRange {
                field,
                value: value.to_string(),
            })
    }

    /// Underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Value as stored in an `INTEGER` column.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

/// Validate an optional signed quantity.
pub fn optional_quantity(
    field: &'static str,
    value: Option<i64>,
) -> Result<Option<Quantity>, CatalogueValidationError> {
    value.map(|raw| Quantity::from_i64(field, raw)).transpose()
}
