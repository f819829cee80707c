//! Repository contracts and SQLite persistence for students.
//!
//! # Responsibility
//! - Define the student data-access contract.
//! - Keep SQL text and column names inside this module.
//!
//! # Invariants
//! - Not-found is `None` or an empty `Vec`, never an error.
//! - Rejected writes are `Ok(false)`; SQLite failures propagate as `Err`.
//! - The store emits no logs and no user-facing output.

pub mod row_types;
pub mod student_repo;
