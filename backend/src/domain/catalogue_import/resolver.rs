//! Get-or-create lookup for companies and fuel types.

use crate::domain::catalogue::{
    CatalogueValidationError, NamedReference, ReferenceKind, ReferenceName,
};
use crate::domain::ports::{ImportStoreError, ImportTransaction};

/// A resolved reference and whether this call inserted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The existing or newly inserted row.
    pub reference: NamedReference,
    /// `true` when this call inserted the row.
    pub created: bool,
}

/// Failure to resolve a reference name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The name is blank or too long for its column.
    #[error(transparent)]
    Invalid(#[from] CatalogueValidationError),
    /// Lookup or insert failed.
    #[error(transparent)]
    Store(#[from] ImportStoreError),
}

/// Find the `kind` row named `name` (after trimming) or insert it.
///
/// A missing name resolves to `None` without touching the store. Inserts go
/// through the open transaction, so a later lookup in the same run sees rows
/// created by earlier ones.
pub async fn get_or_create(
    tx: &mut dyn ImportTransaction,
    kind: ReferenceKind,
    name: Option<&str>,
) -> Result<Option<Resolution>, ResolveError> {
    let Some(raw) = name else {
        return Ok(None);
    };
    let name = ReferenceName::new(kind, raw)?;

    if let Some(reference) = tx.find_reference(kind, &name).await? {
        return Ok(Some(Resolution {
            reference,
            created: false,
        }));
    }

    let reference = tx.insert_reference(kind, &name).await?;
    tracing::debug!(kind = %kind, name = %reference.name, id = %reference.id, "created reference");
    Ok(Some(Resolution {
        reference,
        created: true,
    }))
}
