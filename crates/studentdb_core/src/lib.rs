//! Student records over SQLite.
//! This crate owns the mapping between `students`/`phones` rows and domain values.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::student::{Phone, PhoneId, Student, StudentError, StudentId};
pub use repo::student_repo::{
    PhoneLoading, RepoError, RepoResult, SqliteStudentRepository, StudentListQuery,
    StudentRepository,
};
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
