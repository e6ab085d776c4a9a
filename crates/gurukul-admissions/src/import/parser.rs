use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::values::{
    empty_string_as_none, parse_decimal, parse_flag, parse_timestamp, parse_whole_number,
};
use super::{ImportError, MalformedRecord, Table};
use crate::allocation::domain::{
    tag_set, Application, Class, ClassId, Preference, SchoolId, Student, StudentId,
};

/// Result of converting one CSV row.
pub(crate) enum Parsed<T> {
    Record(T),
    Malformed { field: &'static str },
}

type Converter<Row, T> = fn(&RowContext, Row) -> Result<Parsed<T>, ImportError>;

pub(crate) fn read_table<R, Row, T>(
    reader: R,
    table: Table,
    convert: Converter<Row, T>,
    malformed: &mut Vec<MalformedRecord>,
) -> Result<Vec<T>, ImportError>
where
    R: Read,
    Row: DeserializeOwned,
{
    let csv_error = |source| ImportError::Csv { table, source };
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers().map_err(csv_error)?.clone();

    let mut records = Vec::new();
    let mut raw = csv::StringRecord::new();
    while csv_reader.read_record(&mut raw).map_err(csv_error)? {
        let line = raw.position().map(|position| position.line()).unwrap_or(0);
        let row: Row = raw.deserialize(Some(&headers)).map_err(csv_error)?;
        let context = RowContext { table, line };

        match convert(&context, row)? {
            Parsed::Record(record) => records.push(record),
            Parsed::Malformed { field } => malformed.push(MalformedRecord { table, line, field }),
        }
    }

    Ok(records)
}

pub(crate) struct RowContext {
    table: Table,
    line: u64,
}

impl RowContext {
    fn invalid(&self, field: &'static str, value: &str) -> ImportError {
        ImportError::InvalidValue {
            table: self.table,
            line: self.line,
            field,
            value: value.to_string(),
        }
    }

    fn whole(&self, field: &'static str, value: Option<&str>) -> Result<Option<u32>, ImportError> {
        value
            .map(|raw| parse_whole_number(raw).ok_or_else(|| self.invalid(field, raw)))
            .transpose()
    }

    fn decimal(&self, field: &'static str, value: Option<&str>) -> Result<Option<f64>, ImportError> {
        value
            .map(|raw| parse_decimal(raw).ok_or_else(|| self.invalid(field, raw)))
            .transpose()
    }

    fn flag(&self, field: &'static str, value: Option<&str>) -> Result<bool, ImportError> {
        value
            .map(|raw| parse_flag(raw).ok_or_else(|| self.invalid(field, raw)))
            .transpose()
            .map(|flag| flag.unwrap_or(false))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    student_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    age: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fee_paid: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    test_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    completed_courses: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    student_type: Option<String>,
}

pub(crate) fn student(context: &RowContext, row: StudentRow) -> Result<Parsed<Student>, ImportError> {
    let Some(id) = context.whole("student_id", row.student_id.as_deref())? else {
        return Ok(Parsed::Malformed { field: "student_id" });
    };

    Ok(Parsed::Record(Student {
        id: StudentId(id),
        age: context.whole("age", row.age.as_deref())?,
        fee_paid: context.flag("fee_paid", row.fee_paid.as_deref())?,
        test_score: context.decimal("test_score", row.test_score.as_deref())?,
        completed_courses: row.completed_courses.as_deref().map(tag_set).unwrap_or_default(),
        student_type: row.student_type.unwrap_or_default(),
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    class_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    capacity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    min_age: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    max_age: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fee_required: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    min_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    prerequisites: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    student_type_restrictions: Option<String>,
}

pub(crate) fn class(context: &RowContext, row: ClassRow) -> Result<Parsed<Class>, ImportError> {
    let Some(id) = context.whole("class_id", row.class_id.as_deref())? else {
        return Ok(Parsed::Malformed { field: "class_id" });
    };

    Ok(Parsed::Record(Class {
        id: ClassId(id),
        capacity: context
            .whole("capacity", row.capacity.as_deref())?
            .unwrap_or(0),
        min_age: context.whole("min_age", row.min_age.as_deref())?,
        max_age: context.whole("max_age", row.max_age.as_deref())?,
        fee_required: context.flag("fee_required", row.fee_required.as_deref())?,
        min_score: context.decimal("min_score", row.min_score.as_deref())?,
        prerequisites: row.prerequisites.as_deref().map(tag_set).unwrap_or_default(),
        student_type_restrictions: row
            .student_type_restrictions
            .as_deref()
            .map(tag_set)
            .filter(|allowed| !allowed.is_empty()),
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreferenceRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    student_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    class_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rank: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    submission_date: Option<String>,
}

pub(crate) fn preference(
    context: &RowContext,
    row: PreferenceRow,
) -> Result<Parsed<Preference>, ImportError> {
    let Some(student_id) = context.whole("student_id", row.student_id.as_deref())? else {
        return Ok(Parsed::Malformed { field: "student_id" });
    };
    let Some(class_id) = context.whole("class_id", row.class_id.as_deref())? else {
        return Ok(Parsed::Malformed { field: "class_id" });
    };
    let Some(rank) = context.whole("rank", row.rank.as_deref())? else {
        return Ok(Parsed::Malformed { field: "rank" });
    };
    let Some(raw_date) = row.submission_date.as_deref() else {
        return Ok(Parsed::Malformed {
            field: "submission_date",
        });
    };
    let submission_date =
        parse_timestamp(raw_date).ok_or_else(|| context.invalid("submission_date", raw_date))?;

    Ok(Parsed::Record(Preference {
        student_id: StudentId(student_id),
        class_id: ClassId(class_id),
        rank,
        submission_date,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    student_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    school_id: Option<String>,
}

pub(crate) fn application(
    context: &RowContext,
    row: ApplicationRow,
) -> Result<Parsed<Application>, ImportError> {
    let Some(student_id) = context.whole("student_id", row.student_id.as_deref())? else {
        return Ok(Parsed::Malformed { field: "student_id" });
    };
    let Some(school_id) = context.whole("school_id", row.school_id.as_deref())? else {
        return Ok(Parsed::Malformed { field: "school_id" });
    };

    Ok(Parsed::Record(Application {
        student_id: StudentId(student_id),
        school_id: SchoolId(school_id),
    }))
}
