//! Domain model for enrolled students and their phones.
//!
//! # Responsibility
//! - Define the in-memory shapes the store hydrates from SQL rows.
//! - Guard identity assignment for not-yet-persisted students.
//!
//! # Invariants
//! - A student id is assigned at most once.
//! - Phones are only attached through an explicit load step.

pub mod student;
