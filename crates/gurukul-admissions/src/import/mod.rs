//! CSV ingestion for the four admissions input tables.

mod parser;
mod values;

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::allocation::intake::AdmissionsDataset;

/// Input tables, each read from `<name>.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Students,
    Classes,
    Preferences,
    Applications,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Students,
        Table::Classes,
        Table::Preferences,
        Table::Applications,
    ];

    pub const fn file_name(self) -> &'static str {
        match self {
            Table::Students => "students.csv",
            Table::Classes => "classes.csv",
            Table::Preferences => "preferences.csv",
            Table::Applications => "applications.csv",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Row skipped because an identifying or required field was blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MalformedRecord {
    pub table: Table,
    pub line: u64,
    pub field: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct ImportedDataset {
    pub dataset: AdmissionsDataset,
    pub malformed: Vec<MalformedRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("required input {} is missing", path.display())]
    InputMissing { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid CSV data in {table}: {source}")]
    Csv { table: Table, source: csv::Error },
    #[error("invalid {field} '{value}' in {table} line {line}")]
    InvalidValue {
        table: Table,
        line: u64,
        field: &'static str,
        value: String,
    },
}

pub struct CsvImporter;

impl CsvImporter {
    /// Loads all four tables from `dir`.
    ///
    /// Every file is checked before any is parsed, so a missing table fails
    /// the import without partial results.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<ImportedDataset, ImportError> {
        let dir = dir.as_ref();
        if let Some(path) = Table::ALL
            .iter()
            .map(|table| dir.join(table.file_name()))
            .find(|path| !path.is_file())
        {
            return Err(ImportError::InputMissing { path });
        }

        let open = |table: Table| -> Result<File, ImportError> {
            let path = dir.join(table.file_name());
            File::open(&path).map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ImportError::InputMissing { path },
                _ => ImportError::Io { path, source },
            })
        };

        let imported = Self::from_readers(
            open(Table::Students)?,
            open(Table::Classes)?,
            open(Table::Preferences)?,
            open(Table::Applications)?,
        )?;

        info!(
            dir = %dir.display(),
            students = imported.dataset.students.len(),
            classes = imported.dataset.classes.len(),
            preferences = imported.dataset.preferences.len(),
            applications = imported.dataset.applications.len(),
            "admissions data loaded"
        );

        Ok(imported)
    }

    pub fn from_readers<S, C, P, A>(
        students: S,
        classes: C,
        preferences: P,
        applications: A,
    ) -> Result<ImportedDataset, ImportError>
    where
        S: Read,
        C: Read,
        P: Read,
        A: Read,
    {
        let mut malformed = Vec::new();
        let dataset = AdmissionsDataset {
            students: parser::read_table(students, Table::Students, parser::student, &mut malformed)?,
            classes: parser::read_table(classes, Table::Classes, parser::class, &mut malformed)?,
            preferences: parser::read_table(
                preferences,
                Table::Preferences,
                parser::preference,
                &mut malformed,
            )?,
            applications: parser::read_table(
                applications,
                Table::Applications,
                parser::application,
                &mut malformed,
            )?,
        };

        for record in &malformed {
            warn!(table = %record.table, line = record.line, field = record.field, "dropping row with blank required field");
        }

        Ok(ImportedDataset { dataset, malformed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::domain::{tag_set, ClassId, SchoolId, StudentId};
    use std::io::Cursor;

    const STUDENTS: &str = "student_id,age,fee_paid,test_score,completed_courses,student_type\n\
1,7,True,88.5,\"MATH101, SCI100\",day\n\
2,9,False,,,boarding\n\
,8,True,70,,day\n";
    const CLASSES: &str = "class_id,capacity,min_age,max_age,fee_required,min_score,prerequisites,student_type_restrictions\n\
101,2,5,10,True,60,,\n\
102,1.0,,,False,,MATH101,\"day, boarding\"\n";
    const PREFERENCES: &str = "student_id,class_id,rank,submission_date\n\
1,101,1,2024-01-01\n\
2,102,2,2024-01-02 10:15:00\n\
2,101,,2024-01-02\n";
    const APPLICATIONS: &str = "application_id,student_id,school_id,status\n\
A1,1,3,Pending\n\
A2,2,4,Pending\n";

    fn import(students: &str, classes: &str, preferences: &str) -> Result<ImportedDataset, ImportError> {
        CsvImporter::from_readers(
            Cursor::new(students.to_string()),
            Cursor::new(classes.to_string()),
            Cursor::new(preferences.to_string()),
            Cursor::new(APPLICATIONS),
        )
    }

    #[test]
    fn reads_typed_records_from_all_tables() {
        let imported = import(STUDENTS, CLASSES, PREFERENCES).expect("import succeeds");
        let dataset = imported.dataset;

        assert_eq!(dataset.students.len(), 2);
        let first = &dataset.students[0];
        assert_eq!(first.id, StudentId(1));
        assert!(first.fee_paid);
        assert_eq!(first.test_score, Some(88.5));
        assert_eq!(first.completed_courses, tag_set("MATH101,SCI100"));
        assert_eq!(dataset.students[1].test_score, None);
        assert!(!dataset.students[1].fee_paid);

        let open_class = &dataset.classes[1];
        assert_eq!(open_class.id, ClassId(102));
        assert_eq!(open_class.capacity, 1);
        assert_eq!(open_class.min_age, None);
        assert_eq!(
            open_class.student_type_restrictions,
            Some(tag_set("boarding,day"))
        );
        assert_eq!(dataset.classes[0].student_type_restrictions, None);

        assert_eq!(dataset.preferences.len(), 2);
        assert_eq!(dataset.applications[1].school_id, SchoolId(4));
    }

    #[test]
    fn blank_identifying_fields_are_reported_not_fatal() {
        let imported = import(STUDENTS, CLASSES, PREFERENCES).expect("import succeeds");

        assert_eq!(
            imported.malformed,
            vec![
                MalformedRecord {
                    table: Table::Students,
                    line: 4,
                    field: "student_id",
                },
                MalformedRecord {
                    table: Table::Preferences,
                    line: 4,
                    field: "rank",
                },
            ]
        );
    }

    #[test]
    fn blank_age_and_capacity_keep_the_row() {
        let students = "student_id,age,fee_paid,test_score,completed_courses,student_type\n1,,True,,,day\n";
        let classes = "class_id,capacity,min_age,max_age,fee_required,min_score,prerequisites,student_type_restrictions\n101,,5,10,False,,,\n";
        let imported = import(students, classes, PREFERENCES).expect("import succeeds");

        assert_eq!(imported.dataset.students.len(), 1);
        assert_eq!(imported.dataset.students[0].age, None);
        assert_eq!(imported.dataset.classes.len(), 1);
        assert_eq!(imported.dataset.classes[0].capacity, 0);
        assert!(imported
            .malformed
            .iter()
            .all(|record| record.table == Table::Preferences));
    }

    #[test]
    fn unparseable_values_fail_the_import() {
        let students = "student_id,age,fee_paid,test_score,completed_courses,student_type\n1,seven,True,,,day\n";
        let error = import(students, CLASSES, PREFERENCES).expect_err("bad age");

        match error {
            ImportError::InvalidValue {
                table, field, value, ..
            } => {
                assert_eq!(table, Table::Students);
                assert_eq!(field, "age");
                assert_eq!(value, "seven");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn missing_directory_reports_input_missing() {
        let error = CsvImporter::from_dir("./does-not-exist").expect_err("no inputs");
        match error {
            ImportError::InputMissing { path } => {
                assert!(path.ends_with("students.csv"));
            }
            other => panic!("expected missing input, got {other:?}"),
        }
    }
}
