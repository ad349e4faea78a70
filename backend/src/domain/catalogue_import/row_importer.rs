//! Turns one catalogue row into engine, car and performance rows.

use crate::domain::catalogue::{
    Acceleration, CarDraft, CarName, CatalogueValidationError, EngineDraft, EngineType,
    PerformanceDraft, Quantity, ReferenceKind, SeatCount,
};
use crate::domain::field_parser::{self, FieldParseError};
use crate::domain::ports::{ImportStoreError, ImportTransaction};

use super::resolver::{ResolveError, get_or_create};
use super::{CatalogueRow, EntityCounts, columns};

/// Why a row was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// A required cell is missing or blank.
    #[error("missing required column '{column}'")]
    MissingField {
        /// Header of the missing cell.
        column: &'static str,
    },
    /// A cell parsed but failed entity validation.
    #[error("invalid value in '{column}': {source}")]
    Invalid {
        /// Header of the offending cell.
        column: &'static str,
        /// Validation failure.
        source: CatalogueValidationError,
    },
    /// A numeric cell overflowed.
    #[error("cannot parse '{column}': {source}")]
    Unparsable {
        /// Header of the offending cell.
        column: &'static str,
        /// Parse failure.
        source: FieldParseError,
    },
    /// The store rejected a write, e.g. a constraint violation.
    #[error(transparent)]
    Store(#[from] ImportStoreError),
}

impl RowError {
    fn resolving(column: &'static str) -> impl FnOnce(ResolveError) -> Self {
        move |err| match err {
            ResolveError::Invalid(source) => Self::Invalid { column, source },
            ResolveError::Store(source) => Self::Store(source),
        }
    }

    fn invalid(column: &'static str) -> impl FnOnce(CatalogueValidationError) -> Self {
        move |source| Self::Invalid { column, source }
    }
}

type IntegerParser = fn(Option<&str>) -> Result<Option<u64>, FieldParseError>;

fn required<'r>(row: &'r CatalogueRow, column: &'static str) -> Result<&'r str, RowError> {
    row.cell(column).ok_or(RowError::MissingField { column })
}

fn quantity(
    row: &CatalogueRow,
    column: &'static str,
    field: &'static str,
    parse: IntegerParser,
) -> Result<Option<Quantity>, RowError> {
    parse(row.cell(column))
        .map_err(|source| RowError::Unparsable { column, source })?
        .map(|value| Quantity::from_u64(field, value))
        .transpose()
        .map_err(RowError::invalid(column))
}

/// Import one row through `tx`.
///
/// Writes happen in dependency order: references, engine, car, then
/// performance. The caller owns the savepoint that undoes a partial row.
pub async fn import_row(
    tx: &mut dyn ImportTransaction,
    row: &CatalogueRow,
) -> Result<EntityCounts, RowError> {
    let company_name = required(row, columns::COMPANY)?;
    let company = get_or_create(tx, ReferenceKind::Company, Some(company_name))
        .await
        .map_err(RowError::resolving(columns::COMPANY))?
        .ok_or(RowError::MissingField {
            column: columns::COMPANY,
        })?;
    let fuel_type = get_or_create(tx, ReferenceKind::FuelType, row.cell(columns::FUEL_TYPE))
        .await
        .map_err(RowError::resolving(columns::FUEL_TYPE))?;

    let engine = EngineDraft {
        engine_type: EngineType::new(required(row, columns::ENGINE)?)
            .map_err(RowError::invalid(columns::ENGINE))?,
        cc: quantity(row, columns::CAPACITY, "cc", field_parser::parse_numeric)?,
        horsepower: quantity(
            row,
            columns::HORSEPOWER,
            "horsepower",
            field_parser::parse_numeric,
        )?,
        torque: quantity(row, columns::TORQUE, "torque", field_parser::parse_numeric)?,
    };
    let engine_id = tx.insert_engine(&engine).await?;

    let seats = quantity(row, columns::SEATS, "seats", field_parser::parse_numeric)?
        .map(SeatCount::new)
        .transpose()
        .map_err(RowError::invalid(columns::SEATS))?;
    let car = CarDraft {
        name: CarName::new(required(row, columns::CAR_NAME)?)
            .map_err(RowError::invalid(columns::CAR_NAME))?,
        company_id: company.reference.id,
        engine_id: Some(engine_id),
        fuel_type_id: fuel_type.as_ref().map(|resolved| resolved.reference.id),
        price: quantity(row, columns::PRICE, "price", field_parser::parse_price)?,
        seats,
    };
    let car_id = tx.insert_car(&car).await?;

    let performance = PerformanceDraft {
        car_id,
        top_speed: quantity(
            row,
            columns::TOP_SPEED,
            "top_speed",
            field_parser::parse_numeric,
        )?,
        acceleration_0_100: field_parser::parse_float(row.cell(columns::ACCELERATION))
            .map(Acceleration::new)
            .transpose()
            .map_err(RowError::invalid(columns::ACCELERATION))?,
    };
    tx.insert_performance(&performance).await?;

    Ok(EntityCounts {
        companies: usize::from(company.created),
        fuel_types: fuel_type.map_or(0, |resolved| usize::from(resolved.created)),
        engines: 1,
        cars: 1,
        performances: 1,
    })
}
