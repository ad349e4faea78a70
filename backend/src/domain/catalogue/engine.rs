//! Engine rows. One engine is created per imported car; the schema does not
//! make the relationship exclusive.

use super::{CatalogueValidationError, EngineId, Quantity, bounded_text};

const ENGINE_TYPE_MAX: usize = 50;

/// Engine type label such as `"V8"` or `"Electric"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineType(String);

impl EngineType {
    /// Trim and validate a raw label.
    pub fn new(raw: &str) -> Result<Self, CatalogueValidationError> {
        bounded_text("type", raw, ENGINE_TYPE_MAX).map(Self)
    }

    /// Borrow the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    /// Store-assigned identifier.
    pub id: EngineId,
    /// Engine type label.
    pub engine_type: String,
    /// Displacement in cc, or battery capacity for electric drivetrains.
    pub cc: Option<u32>,
    /// Power output in horsepower.
    pub horsepower: Option<u32>,
    /// Torque in Nm.
    pub torque: Option<u32>,
}

/// Validated engine ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineDraft {
    /// Engine type label.
    pub engine_type: EngineType,
    /// Displacement or battery capacity.
    pub cc: Option<Quantity>,
    /// Power output.
    pub horsepower: Option<Quantity>,
    /// Torque.
    pub torque: Option<Quantity>,
}

/// Partial engine update.
///
/// `engine_type` is only replaced when present. The numeric fields use a
/// nested option: `None` leaves the column untouched while `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnginePatch {
    /// Replacement type label.
    pub engine_type: Option<EngineType>,
    /// Displacement update.
    pub cc: Option<Option<Quantity>>,
    /// Horsepower update.
    pub horsepower: Option<Option<Quantity>>,
    /// Torque update.
    pub torque: Option<Option<Quantity>>,
}

impl EnginePatch {
    /// Apply the patch to a stored engine, returning the updated snapshot.
    #[must_use]
    pub fn apply(&self, engine: &Engine) -> Engine {
        Engine {
            id: engine.id,
            engine_type: self
                .engine_type
                .as_ref()
                .map_or_else(|| engine.engine_type.clone(), |ty| ty.as_str().to_owned()),
            cc: patched(self.cc, engine.cc),
            horsepower: patched(self.horsepower, engine.horsepower),
            torque: patched(self.torque, engine.torque),
        }
    }
}

pub(super) fn patched(update: Option<Option<Quantity>>, current: Option<u32>) -> Option<u32> {
    match update {
        Some(value) => value.map(Quantity::get),
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Engine {
        Engine {
            id: EngineId::new(3),
            engine_type: "V8".to_owned(),
            cc: Some(3990),
            horsepower: Some(963),
            torque: Some(800),
        }
    }

    #[test]
    fn empty_patch_leaves_engine_unchanged() {
        assert_eq!(EnginePatch::default().apply(&stored()), stored());
    }

    #[test]
    fn patch_clears_and_replaces_fields() {
        let patch = EnginePatch {
            engine_type: Some(EngineType::new("V12").expect("valid")),
            cc: Some(None),
            horsepower: Some(Some(Quantity::from_i64("horsepower", 1000).expect("valid"))),
            torque: None,
        };

        let updated = patch.apply(&stored());

        assert_eq!(updated.engine_type, "V12");
        assert_eq!(updated.cc, None);
        assert_eq!(updated.horsepower, Some(1000));
        assert_eq!(updated.torque, Some(800));
    }

    #[test]
    fn engine_type_rejects_blank_labels() {
        assert_eq!(
            EngineType::new("  "),
            Err(CatalogueValidationError::Empty { field: "type" })
        );
    }
}
