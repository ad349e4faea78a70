//! Shared dimension entities: companies and fuel types.

use std::fmt;

use super::{CatalogueValidationError, ReferenceId, bounded_text};

/// Which dimension table a reference lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// Car manufacturer.
    Company,
    /// Fuel or energy source.
    FuelType,
}

impl ReferenceKind {
    /// Human-readable label used in messages and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::FuelType => "fuel type",
        }
    }

    /// Column width of the `name` column.
    #[must_use]
    pub const fn max_name_len(self) -> usize {
        match self {
            Self::Company => 100,
            Self::FuelType => 50,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trimmed, non-empty reference name within the column width.
///
/// Lookups compare names exactly after trimming, so `"Toyota "` and
/// `"Toyota"` resolve to the same company while `"toyota"` does not.
///
/// # Examples
/// ```
/// use car_catalogue::domain::catalogue::{ReferenceKind, ReferenceName};
///
/// let name = ReferenceName::new(ReferenceKind::Company, "  Toyota ").expect("valid");
/// assert_eq!(name.as_str(), "Toyota");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceName(String);

impl ReferenceName {
    /// Validate a raw name for the given kind.
    pub fn new(kind: ReferenceKind, raw: &str) -> Result<Self, CatalogueValidationError> {
        bounded_text("name", raw, kind.max_name_len()).map(Self)
    }

    /// Borrow the normalised name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ReferenceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ReferenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored company or fuel type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedReference {
    /// Store-assigned identifier.
    pub id: ReferenceId,
    /// Unique name.
    pub name: String,
}
