//! Persistence operations over the diesel schema.
//!
//! Every function takes a plain `&mut SqliteConnection` so callers decide whether it runs
//! inside a larger transaction. Deletions spell out their cascade and set-null steps
//! instead of leaning on the database's foreign key actions.

pub mod bookmarks;
pub mod comments;
pub mod recipes;
pub mod users;

use chrono::{NaiveDateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

pub(crate) fn is_unique_violation(e: &DieselError) -> bool {
    matches!(
        e,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

pub(crate) fn is_foreign_key_violation(e: &DieselError) -> bool {
    matches!(
        e,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

/// Creation timestamp for new rows, UTC.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
