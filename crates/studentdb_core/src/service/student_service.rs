//! Student use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for student registration and lookup.
//! - Emit metadata-only diagnostic events around repository writes.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Log events carry ids and statuses only, never names or phone numbers.

use crate::model::student::{Student, StudentId};
use crate::repo::student_repo::{PhoneLoading, RepoResult, StudentListQuery, StudentRepository};
use chrono::NaiveDate;
use log::{info, warn};

/// Use-case service wrapper for student persistence.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and inserts a new student.
    ///
    /// # Contract
    /// - Returns the persisted student with its generated id.
    /// - Returns `Ok(None)` when the insert reported failure.
    pub fn register_student(
        &self,
        name: impl Into<String>,
        birth_date: NaiveDate,
    ) -> RepoResult<Option<Student>> {
        let mut student = Student::new(name, birth_date);
        if !self.save_student(&mut student)? {
            return Ok(None);
        }
        Ok(Some(student))
    }

    /// Inserts or updates depending on whether `student` has an id.
    pub fn save_student(&self, student: &mut Student) -> RepoResult<bool> {
        let action = if student.is_new() { "insert" } else { "update" };
        let saved = self.repo.save(student)?;
        if saved {
            info!(
                "event=student_save module=service status=ok action={action} id={}",
                student.id().unwrap_or_default()
            );
        } else {
            warn!("event=student_save module=service status=rejected action={action}");
        }
        Ok(saved)
    }

    /// Deletes the student's row.
    pub fn remove_student(&self, student: &Student) -> RepoResult<bool> {
        let removed = self.repo.remove(student)?;
        match (removed, student.id()) {
            (true, Some(id)) => info!("event=student_remove module=service status=ok id={id}"),
            _ => warn!("event=student_remove module=service status=rejected"),
        }
        Ok(removed)
    }

    /// Gets one student without phones.
    pub fn find_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.find_student(id)
    }

    /// Gets one student and loads its phones.
    pub fn find_student_with_phones(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.find_student_with(id, PhoneLoading::Eager)
    }

    /// Lists every student with phones.
    pub fn all_students(&self) -> RepoResult<Vec<Student>> {
        self.repo.all_students()
    }

    /// Lists students born on `birth_date` with phones.
    pub fn students_born_on(&self, birth_date: NaiveDate) -> RepoResult<Vec<Student>> {
        self.repo.students_born_on(birth_date)
    }

    /// Lists students using filter and hydration options.
    pub fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>> {
        self.repo.list_students(query)
    }

    /// Appends the student's phones; see `StudentRepository::fill_phones`.
    pub fn fill_phones(&self, student: &mut Student) -> RepoResult<usize> {
        self.repo.fill_phones(student)
    }
}
