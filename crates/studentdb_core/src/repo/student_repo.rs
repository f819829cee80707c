//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate `students`/`phones` rows to `Student`/`Phone` and back.
//! - Use bound parameters for every value that reaches SQL.
//!
//! # Invariants
//! - List reads hydrate phones by default; `find_student` does not.
//! - `fill_phones` appends; calling it twice duplicates phones.
//! - Each query's rows are fully collected before the next query starts.

use crate::db::schema::{table_exists, table_has_column, REQUIRED_COLUMNS};
use crate::db::DbError;
use crate::model::student::{Phone, Student, StudentError, StudentId};
use crate::repo::row_types::{
    format_birth_date, PhoneRow, StudentRow, PHONE_SELECT_SQL, STUDENT_SELECT_SQL,
};
use chrono::NaiveDate;
use rusqlite::{named_params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by student persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Connectivity, constraint or syntax failure from SQLite.
    Db(DbError),
    /// Domain rule violation while applying a write result.
    Student(StudentError),
    /// Connection lacks a table the store depends on.
    MissingRequiredTable(&'static str),
    /// Table exists but lacks a column the store reads or writes.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted into a domain value.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Student(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "student repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "student repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Student(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<StudentError> for RepoError {
    fn from(value: StudentError) -> Self {
        Self::Student(value)
    }
}

/// Whether a read also loads each student's phones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhoneLoading {
    /// Issue one phone query per returned student.
    #[default]
    Eager,
    /// Return students with an empty phone collection.
    Skip,
}

/// Filter and hydration options for listing students.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentListQuery {
    /// Exact calendar-day match on `birth_date`.
    pub birth_date: Option<NaiveDate>,
    pub phones: PhoneLoading,
}

/// Repository interface for student reads and writes.
pub trait StudentRepository {
    /// Lists students matching `query` in id order.
    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>>;

    /// Loads one student by id with the requested phone policy.
    fn find_student_with(
        &self,
        id: StudentId,
        phones: PhoneLoading,
    ) -> RepoResult<Option<Student>>;

    /// Appends the student's phone rows; returns how many were appended.
    fn fill_phones(&self, student: &mut Student) -> RepoResult<usize>;

    /// Inserts a new student row and assigns the generated id onto `student`.
    ///
    /// # Contract
    /// - Mutates `student` in place: `id()` goes from `None` to `Some`.
    /// - Returns `Ok(false)` without touching SQL when `student` already has an id.
    fn insert(&self, student: &mut Student) -> RepoResult<bool>;

    /// Overwrites name and birth date of the row matching `student.id()`.
    ///
    /// Zero matched rows is still `Ok(true)`. A student without id is `Ok(false)`.
    fn update(&self, student: &Student) -> RepoResult<bool>;

    /// Deletes the row matching `student.id()`.
    ///
    /// Zero matched rows is still `Ok(true)`. A student without id is `Ok(false)`.
    fn remove(&self, student: &Student) -> RepoResult<bool>;

    /// Every student, phones loaded.
    fn all_students(&self) -> RepoResult<Vec<Student>> {
        self.list_students(&StudentListQuery::default())
    }

    /// Students born exactly on `birth_date`, phones loaded.
    fn students_born_on(&self, birth_date: NaiveDate) -> RepoResult<Vec<Student>> {
        self.list_students(&StudentListQuery {
            birth_date: Some(birth_date),
            ..StudentListQuery::default()
        })
    }

    /// One student by id, phones not loaded.
    fn find_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.find_student_with(id, PhoneLoading::Skip)
    }

    /// Inserts new students and updates persisted ones.
    fn save(&self, student: &mut Student) -> RepoResult<bool> {
        if student.is_new() {
            return self.insert(student);
        }
        self.update(student)
    }
}

/// SQLite-backed student repository over a borrowed connection.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Creates a repository after checking the required tables and columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_student_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn phones_of(&self, student_id: StudentId) -> RepoResult<Vec<Phone>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PHONE_SELECT_SQL} WHERE student_id = ?1 ORDER BY id;"
        ))?;
        let rows = stmt
            .query_map([student_id], PhoneRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(PhoneRow::into_phone).collect()
    }

    fn hydrate(&self, rows: Vec<StudentRow>, phones: PhoneLoading) -> RepoResult<Vec<Student>> {
        let mut students = Vec::with_capacity(rows.len());
        for row in rows {
            let mut student = row.into_student()?;
            if phones == PhoneLoading::Eager {
                self.fill_phones(&mut student)?;
            }
            students.push(student);
        }
        Ok(students)
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>> {
        let rows = match query.birth_date {
            Some(birth_date) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{STUDENT_SELECT_SQL} WHERE birth_date = ?1 ORDER BY id;"
                ))?;
                let rows = stmt
                    .query_map([format_birth_date(birth_date)], StudentRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id;"))?;
                let rows = stmt
                    .query_map([], StudentRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        self.hydrate(rows, query.phones)
    }

    fn find_student_with(
        &self,
        id: StudentId,
        phones: PhoneLoading,
    ) -> RepoResult<Option<Student>> {
        let row = self
            .conn
            .query_row(
                &format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                StudentRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row], phones)?.pop()),
            None => Ok(None),
        }
    }

    fn fill_phones(&self, student: &mut Student) -> RepoResult<usize> {
        let Some(student_id) = student.id() else {
            return Ok(0);
        };

        let phones = self.phones_of(student_id)?;
        let appended = phones.len();
        for phone in phones {
            student.add_phone(phone);
        }
        Ok(appended)
    }

    fn insert(&self, student: &mut Student) -> RepoResult<bool> {
        if !student.is_new() {
            return Ok(false);
        }

        let changed = self.conn.execute(
            "INSERT INTO students (name, birth_date) VALUES (:name, :birth_date);",
            named_params! {
                ":name": student.name(),
                ":birth_date": format_birth_date(student.birth_date()),
            },
        )?;
        if changed == 0 {
            return Ok(false);
        }

        student.assign_id(self.conn.last_insert_rowid())?;
        Ok(true)
    }

    fn update(&self, student: &Student) -> RepoResult<bool> {
        let Some(id) = student.id() else {
            return Ok(false);
        };

        self.conn.execute(
            "UPDATE students SET name = :name, birth_date = :birth_date WHERE id = :id;",
            named_params! {
                ":name": student.name(),
                ":birth_date": format_birth_date(student.birth_date()),
                ":id": id,
            },
        )?;
        Ok(true)
    }

    fn remove(&self, student: &Student) -> RepoResult<bool> {
        let Some(id) = student.id() else {
            return Ok(false);
        };

        self.conn.execute("DELETE FROM students WHERE id = ?1;", [id])?;
        Ok(true)
    }
}

fn ensure_student_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}
