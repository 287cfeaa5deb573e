//! Helpers for classifying database errors.

/// Primary key constraint guarding short-code uniqueness.
const SHORT_CODE_CONSTRAINT: &str = "links_pkey";

/// Returns true if the error is a unique violation on the short-code key.
///
/// Violations on other constraints are not treated as code collisions.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_CODE_CONSTRAINT) | None)
}
