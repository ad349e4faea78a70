//! Dispatch from [`ReferenceKind`](crate::domain::catalogue::ReferenceKind)
//! to the matching `(id, name)` table.

/// Evaluate `$body` with `$table` bound to the schema module of `$kind`.
///
/// Both tables share the `id`/`name` layout, so the same query text
/// type-checks against either.
macro_rules! with_reference_table {
    ($kind:expr, $table:ident => $body:expr) => {
        match $kind {
            $crate::domain::catalogue::ReferenceKind::Company => {
                use $crate::outbound::persistence::schema::companies as $table;
                $body
            }
            $crate::domain::catalogue::ReferenceKind::FuelType => {
                use $crate::outbound::persistence::schema::fuel_types as $table;
                $body
            }
        }
    };
}

pub(crate) use with_reference_table;

/// Escape `%`, `_` and `\` so user text matches literally inside `LIKE`.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
