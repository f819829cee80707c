//! Typed row structs for `students` and `phones`.
//!
//! Rows are read column-by-name into these structs first, then converted
//! into domain values, so the column contract lives in one place.

use crate::model::student::{Phone, PhoneId, Student, StudentId};
use crate::repo::student_repo::{RepoError, RepoResult};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::ValueRef;
use rusqlite::Row;

/// Wire format for `students.birth_date`.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const STUDENT_SELECT_SQL: &str = "SELECT id, name, birth_date FROM students";

pub(crate) const PHONE_SELECT_SQL: &str = "SELECT id, area_code, number FROM phones";

/// Raw `students` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub id: StudentId,
    pub name: Option<String>,
    pub birth_date: Option<String>,
}

impl StudentRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: text_column(row, "name")?,
            birth_date: text_column(row, "birth_date")?,
        })
    }

    /// Builds a `Student` with an empty phone collection.
    pub fn into_student(self) -> RepoResult<Student> {
        let name = self.name.ok_or_else(|| {
            RepoError::InvalidData(format!("null name for student {}", self.id))
        })?;
        let raw_date = self.birth_date.ok_or_else(|| {
            RepoError::InvalidData(format!("null birth_date for student {}", self.id))
        })?;
        let birth_date = parse_birth_date(&raw_date).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid birth_date `{raw_date}` in students.birth_date for student {}",
                self.id
            ))
        })?;

        Ok(Student::with_id(self.id, name, birth_date))
    }
}

/// Raw `phones` row. `student_id` is filtered on but not selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRow {
    pub id: PhoneId,
    pub area_code: Option<String>,
    pub number: Option<String>,
}

impl PhoneRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            area_code: text_column(row, "area_code")?,
            number: text_column(row, "number")?,
        })
    }

    pub fn into_phone(self) -> RepoResult<Phone> {
        match (self.area_code, self.number) {
            (Some(area_code), Some(number)) => Ok(Phone::new(self.id, area_code, number)),
            _ => Err(RepoError::InvalidData(format!(
                "null area_code or number for phone {}",
                self.id
            ))),
        }
    }
}

pub fn format_birth_date(date: NaiveDate) -> String {
    date.format(BIRTH_DATE_FORMAT).to_string()
}

/// Accepts `YYYY-MM-DD`, or a datetime whose date part is `YYYY-MM-DD`.
fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, BIRTH_DATE_FORMAT) {
        return Some(date);
    }

    let (date, remainder) = NaiveDate::parse_and_remainder(value, BIRTH_DATE_FORMAT).ok()?;
    let time = remainder.strip_prefix(|c: char| c == ' ' || c == 'T')?;
    NaiveTime::parse_from_str(time, "%H:%M:%S%.f").ok()?;
    Some(date)
}

/// Reads a text-affinity column, rendering INTEGER/REAL storage as text.
fn text_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    match row.get_ref(column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(value.to_string())),
        ValueRef::Real(value) => Ok(Some(value.to_string())),
        ValueRef::Text(_) | ValueRef::Blob(_) => row.get(column),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_birth_date, parse_birth_date, PhoneRow, StudentRow};
    use crate::repo::student_repo::RepoError;
    use chrono::NaiveDate;

    #[test]
    fn birth_date_uses_iso_calendar_format() {
        let date = NaiveDate::from_ymd_opt(2001, 5, 3).unwrap();
        assert_eq!(format_birth_date(date), "2001-05-03");
    }

    #[test]
    fn student_row_converts_to_student_without_phones() {
        let row = StudentRow {
            id: 4,
            name: Some("Ana".to_string()),
            birth_date: Some("2001-05-03".to_string()),
        };
        let student = row.into_student().unwrap();
        assert_eq!(student.id(), Some(4));
        assert_eq!(student.name(), "Ana");
        assert_eq!(
            student.birth_date(),
            NaiveDate::from_ymd_opt(2001, 5, 3).unwrap()
        );
        assert!(student.phones().is_empty());
    }

    #[test]
    fn student_row_rejects_malformed_date() {
        let row = StudentRow {
            id: 1,
            name: Some("Ana".to_string()),
            birth_date: Some("03/05/2001".to_string()),
        };
        let err = row.into_student().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("03/05/2001")));
    }

    #[test]
    fn birth_date_accepts_datetime_and_keeps_day() {
        let expected = NaiveDate::from_ymd_opt(2001, 5, 3);
        assert_eq!(parse_birth_date("2001-05-03 00:00:00"), expected);
        assert_eq!(parse_birth_date("2001-05-03T13:45:10.250"), expected);
        assert_eq!(parse_birth_date("2001-05-03 noon"), None);
        assert_eq!(parse_birth_date("2001-05-03x"), None);
    }

    #[test]
    fn phone_row_rejects_missing_number() {
        let row = PhoneRow {
            id: 9,
            area_code: Some("21".to_string()),
            number: None,
        };
        assert!(matches!(row.into_phone(), Err(RepoError::InvalidData(_))));
    }
}
