//! Car rows and their write models.

use super::engine::patched;
use super::{CarId, CatalogueValidationError, EngineId, Quantity, ReferenceId, bounded_text};

const CAR_NAME_MAX: usize = 200;

/// Trimmed, non-empty car model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarName(String);

impl CarName {
    /// Trim and validate a raw name.
    pub fn new(raw: &str) -> Result<Self, CatalogueValidationError> {
        bounded_text("name", raw, CAR_NAME_MAX).map(Self)
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Seat count of at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeatCount(Quantity);

impl SeatCount {
    /// Validate a seat count.
    pub fn new(seats: Quantity) -> Result<Self, CatalogueValidationError> {
        if seats.get() == 0 {
            return Err(CatalogueValidationError::NotPositive { field: "seats" });
        }
        Ok(Self(seats))
    }

    /// Underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Value as stored in an `INTEGER` column.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self.0.as_i32()
    }
}

/// Stored car joined with its company and fuel type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    /// Store-assigned identifier.
    pub id: CarId,
    /// Model name.
    pub name: String,
    /// Owning company.
    pub company_id: ReferenceId,
    /// Owning company's name.
    pub company_name: String,
    /// Engine backing this car, if any.
    pub engine_id: Option<EngineId>,
    /// Fuel type, if known.
    pub fuel_type_id: Option<ReferenceId>,
    /// Fuel type name, if known.
    pub fuel_type_name: Option<String>,
    /// Price in whole currency units.
    pub price: Option<u32>,
    /// Seat count.
    pub seats: Option<u32>,
}

/// Validated car ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDraft {
    /// Model name.
    pub name: CarName,
    /// Owning company.
    pub company_id: ReferenceId,
    /// Engine reference.
    pub engine_id: Option<EngineId>,
    /// Fuel type reference.
    pub fuel_type_id: Option<ReferenceId>,
    /// Price.
    pub price: Option<Quantity>,
    /// Seat count.
    pub seats: Option<SeatCount>,
}

/// Partial car update.
///
/// `name` and `company_id` are replaced only when present since both columns
/// are mandatory. Optional columns use a nested option where `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarPatch {
    /// Replacement name.
    pub name: Option<CarName>,
    /// Replacement company.
    pub company_id: Option<ReferenceId>,
    /// Engine update.
    pub engine_id: Option<Option<EngineId>>,
    /// Fuel type update.
    pub fuel_type_id: Option<Option<ReferenceId>>,
    /// Price update.
    pub price: Option<Option<Quantity>>,
    /// Seat count update.
    pub seats: Option<Option<SeatCount>>,
}

impl CarPatch {
    /// Apply the patch to a stored car, leaving the joined names untouched.
    ///
    /// Callers that change `company_id` or `fuel_type_id` must refresh the
    /// joined names from the store.
    #[must_use]
    pub fn apply(&self, car: &Car) -> Car {
        Car {
            id: car.id,
            name: self
                .name
                .as_ref()
                .map_or_else(|| car.name.clone(), |name| name.as_str().to_owned()),
            company_id: self.company_id.unwrap_or(car.company_id),
            company_name: car.company_name.clone(),
            engine_id: self.engine_id.unwrap_or(car.engine_id),
            fuel_type_id: self.fuel_type_id.unwrap_or(car.fuel_type_id),
            fuel_type_name: car.fuel_type_name.clone(),
            price: patched(self.price, car.price),
            seats: match self.seats {
                Some(seats) => seats.map(SeatCount::get),
                None => car.seats,
            },
        }
    }
}
