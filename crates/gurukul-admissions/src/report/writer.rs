use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::allocation::AllocationOutcome;

pub const ENROLLMENTS_FILE: &str = "enrollments_new.csv";
pub const APPLICATIONS_FILE: &str = "applications_updated.csv";

/// Paths of the files produced by [`write_outputs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenReports {
    pub enrollments: Option<PathBuf>,
    pub applications: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Writes enrollment and status rows into `output_dir`.
///
/// A table with no rows is not written.
pub fn write_outputs<P: AsRef<Path>>(
    outcome: &AllocationOutcome,
    output_dir: P,
) -> Result<WrittenReports, ReportError> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = WrittenReports::default();

    if !outcome.enrollments.is_empty() {
        let path = output_dir.join(ENROLLMENTS_FILE);
        write_rows(&path, &outcome.enrollments)?;
        info!(rows = outcome.enrollments.len(), path = %path.display(), "enrollments written");
        written.enrollments = Some(path);
    }

    if !outcome.status_updates.is_empty() {
        let path = output_dir.join(APPLICATIONS_FILE);
        write_rows(&path, &outcome.status_updates)?;
        info!(rows = outcome.status_updates.len(), path = %path.display(), "application statuses written");
        written.applications = Some(path);
    }

    Ok(written)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ReportError> {
    let csv_error = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
