//! SQLite connection bootstrap for the student store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Ensure the fixed `students`/`phones` schema exists before use.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Schema creation is idempotent (`CREATE ... IF NOT EXISTS`).

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Connectivity, constraint and syntax failures from the SQLite layer.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
