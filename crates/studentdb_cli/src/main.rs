//! `studentdb` command line front end.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Own every user-facing message; the core store prints nothing.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use studentdb_core::db::open_db;
use studentdb_core::{
    default_log_level, init_logging, LogConfig, PhoneLoading, SqliteStudentRepository, Student,
    StudentId, StudentListQuery, StudentService,
};

const DELETED_MESSAGE: &str = "Student deleted!";

#[derive(Debug, Parser)]
#[command(name = "studentdb", version, about = "Manage student records in SQLite")]
struct Cli {
    /// SQLite database file; created when missing.
    #[arg(long, env = "STUDENTDB_PATH", default_value = "students.sqlite3")]
    db: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "STUDENTDB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotated log files. Logging is off when unset.
    #[arg(long, env = "STUDENTDB_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List students with their phones.
    List {
        /// Only students born on this day (YYYY-MM-DD).
        #[arg(long)]
        born_on: Option<NaiveDate>,
        /// Do not load phones.
        #[arg(long)]
        no_phones: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show one student.
    Show {
        id: StudentId,
        /// Also load phones.
        #[arg(long)]
        phones: bool,
        #[arg(long)]
        json: bool,
    },
    /// Register a new student.
    Add { name: String, birth_date: NaiveDate },
    /// Change name and/or birth date.
    Update {
        id: StudentId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        born_on: Option<NaiveDate>,
    },
    /// Delete a student.
    Remove { id: StudentId },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        let config = LogConfig::new(level, log_dir)?;
        init_logging(&config)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        studentdb_core::core_version()
    );

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn)?);

    match cli.command {
        Command::List {
            born_on,
            no_phones,
            json,
        } => {
            let query = StudentListQuery {
                birth_date: born_on,
                phones: if no_phones {
                    PhoneLoading::Skip
                } else {
                    PhoneLoading::Eager
                },
            };
            let students = service.list_students(&query)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&students)?)?;
            } else {
                for student in &students {
                    write_student(out, student)?;
                }
            }
        }
        Command::Show { id, phones, json } => {
            let found = if phones {
                service.find_student_with_phones(id)?
            } else {
                service.find_student(id)?
            };
            let Some(student) = found else {
                bail!("student {id} not found");
            };
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&student)?)?;
            } else {
                write_student(out, &student)?;
            }
        }
        Command::Add { name, birth_date } => match service.register_student(name, birth_date)? {
            Some(student) => writeln!(out, "{}", student.id().unwrap_or_default())?,
            None => bail!("student was not inserted"),
        },
        Command::Update { id, name, born_on } => {
            let Some(mut student) = service.find_student(id)? else {
                bail!("student {id} not found");
            };
            if let Some(name) = name {
                student.rename(name);
            }
            if let Some(born_on) = born_on {
                student.set_birth_date(born_on);
            }
            if !service.save_student(&mut student)? {
                bail!("student {id} was not updated");
            }
        }
        Command::Remove { id } => {
            let Some(student) = service.find_student(id)? else {
                bail!("student {id} not found");
            };
            if !service.remove_student(&student)? {
                bail!("student {id} was not deleted");
            }
            writeln!(out, "{DELETED_MESSAGE}")?;
        }
    }

    Ok(())
}

fn write_student(out: &mut impl Write, student: &Student) -> std::io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}",
        student.id().unwrap_or_default(),
        student.name(),
        student.birth_date()
    )?;
    for phone in student.phones() {
        writeln!(out, "\t{}", phone.formatted())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Command, DELETED_MESSAGE};
    use clap::Parser;
    use std::path::Path;

    fn run_command(db: &Path, args: &[&str]) -> anyhow::Result<String> {
        let db = db.to_str().expect("temp path should be valid UTF-8");
        let cli = Cli::try_parse_from(["studentdb", "--db", db].iter().chain(args))?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out).expect("cli output should be UTF-8"))
    }

    #[test]
    fn parses_add_with_iso_date() {
        let cli = Cli::try_parse_from(["studentdb", "add", "Ana", "2001-05-03"]).unwrap();
        match cli.command {
            Command::Add { name, birth_date } => {
                assert_eq!(name, "Ana");
                assert_eq!(birth_date.to_string(), "2001-05-03");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_iso_date() {
        assert!(Cli::try_parse_from(["studentdb", "add", "Ana", "03/05/2001"]).is_err());
    }

    #[test]
    fn remove_prints_confirmation_and_deletes_student() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("students.sqlite3");

        let id = run_command(&db, &["add", "Ana", "2001-05-03"]).unwrap();
        let id = id.trim();
        assert_eq!(id, "1");

        let removed = run_command(&db, &["remove", id]).unwrap();
        assert_eq!(removed.trim_end(), DELETED_MESSAGE);

        let err = run_command(&db, &["show", id]).unwrap_err();
        assert_eq!(err.to_string(), "student 1 not found");
    }

    #[test]
    fn remove_of_missing_student_fails_without_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("students.sqlite3");

        let err = run_command(&db, &["remove", "42"]).unwrap_err();
        assert_eq!(err.to_string(), "student 42 not found");
    }

    #[test]
    fn list_prints_one_line_per_student() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("students.sqlite3");

        run_command(&db, &["add", "Ana", "2001-05-03"]).unwrap();
        run_command(&db, &["add", "Bruno", "2002-01-10"]).unwrap();

        let listed = run_command(&db, &["list"]).unwrap();
        assert_eq!(listed, "1\tAna\t2001-05-03\n2\tBruno\t2002-01-10\n");
    }
}
