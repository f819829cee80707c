//! Student and phone domain types.
//!
//! # Responsibility
//! - Hold student identity, name and birth date.
//! - Own the phone collection filled by the store.
//!
//! # Invariants
//! - `id` is `None` until the first successful insert, then never changes.
//! - `birth_date` is a calendar date with no time or timezone component.
//! - Constructing a `Student` never loads phones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Database-generated student identity.
pub type StudentId = i64;

/// Database-generated phone identity.
pub type PhoneId = i64;

/// Domain rule violations for `Student`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentError {
    /// The student was already persisted under `current`.
    IdAlreadyAssigned {
        current: StudentId,
        attempted: StudentId,
    },
}

impl Display for StudentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdAlreadyAssigned { current, attempted } => write!(
                f,
                "student already has id {current}; refusing to reassign to {attempted}"
            ),
        }
    }
}

impl Error for StudentError {}

/// Phone number owned by one student.
///
/// The owning student id is not stored here; the relation is rebuilt by
/// querying `phones.student_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub id: PhoneId,
    pub area_code: String,
    pub number: String,
}

impl Phone {
    pub fn new(id: PhoneId, area_code: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id,
            area_code: area_code.into(),
            number: number.into(),
        }
    }

    /// Display form `(<area code>) <number>`.
    pub fn formatted(&self) -> String {
        format!("({}) {}", self.area_code, self.number)
    }
}

/// Student record with its (optionally loaded) phones.
///
/// Serialize-only: identity comes from `assign_id` or hydration, never from input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    id: Option<StudentId>,
    name: String,
    /// Serialized as `YYYY-MM-DD`.
    birth_date: NaiveDate,
    phones: Vec<Phone>,
}

impl Student {
    /// Creates a student that has not been persisted yet.
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date,
            phones: Vec::new(),
        }
    }

    /// Creates a student for an existing row.
    ///
    /// Used by hydration paths; the phone collection starts empty.
    pub fn with_id(id: StudentId, name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: Some(id),
            ..Self::new(name, birth_date)
        }
    }

    pub fn id(&self) -> Option<StudentId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    /// Returns whether this student still lacks a database identity.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Records the identity generated by the first insert.
    ///
    /// # Errors
    /// - `StudentError::IdAlreadyAssigned` when an id is already present.
    pub fn assign_id(&mut self, id: StudentId) -> Result<(), StudentError> {
        if let Some(current) = self.id {
            return Err(StudentError::IdAlreadyAssigned {
                current,
                attempted: id,
            });
        }
        self.id = Some(id);
        Ok(())
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_birth_date(&mut self, birth_date: NaiveDate) {
        self.birth_date = birth_date;
    }

    /// Appends one phone. Does not deduplicate.
    pub fn add_phone(&mut self, phone: Phone) {
        self.phones.push(phone);
    }

    /// Whole years completed on `date`.
    ///
    /// Returns `None` when `date` is before the birth date.
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        date.years_since(self.birth_date)
    }
}

#[cfg(test)]
mod tests {
    use super::{Phone, Student, StudentError};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
    }

    #[test]
    fn new_student_has_no_id_and_no_phones() {
        let student = Student::new("Ana", date(2001, 5, 3));
        assert!(student.is_new());
        assert_eq!(student.id(), None);
        assert!(student.phones().is_empty());
    }

    #[test]
    fn assign_id_only_once() {
        let mut student = Student::new("Ana", date(2001, 5, 3));
        student.assign_id(7).expect("first assignment should succeed");
        assert_eq!(student.id(), Some(7));

        let err = student.assign_id(8).expect_err("second assignment must fail");
        assert_eq!(
            err,
            StudentError::IdAlreadyAssigned {
                current: 7,
                attempted: 8
            }
        );
        assert_eq!(student.id(), Some(7));
    }

    #[test]
    fn age_on_counts_completed_years_only() {
        let student = Student::new("Ana", date(2001, 5, 3));
        assert_eq!(student.age_on(date(2021, 5, 2)), Some(19));
        assert_eq!(student.age_on(date(2021, 5, 3)), Some(20));
        assert_eq!(student.age_on(date(2000, 1, 1)), None);
    }

    #[test]
    fn phone_formats_area_code_in_parentheses() {
        let phone = Phone::new(1, "24", "99999-9999");
        assert_eq!(phone.formatted(), "(24) 99999-9999");
    }

    #[test]
    fn add_phone_keeps_duplicates() {
        let mut student = Student::with_id(1, "Ana", date(2001, 5, 3));
        let phone = Phone::new(1, "24", "1234-5678");
        student.add_phone(phone.clone());
        student.add_phone(phone);
        assert_eq!(student.phones().len(), 2);
    }
}
