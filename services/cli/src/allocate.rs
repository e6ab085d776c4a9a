use chrono::{Local, NaiveDate};
use clap::Args;
use gurukul_admissions::allocation::AllocationEngine;
use gurukul_admissions::config::AppConfig;
use gurukul_admissions::error::AppError;
use gurukul_admissions::import::CsvImporter;
use gurukul_admissions::report::{write_outputs, AllocationSummary, WrittenReports};
use gurukul_admissions::telemetry;
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Default)]
pub(crate) struct AllocateArgs {
    /// Directory holding students.csv, classes.csv, preferences.csv and applications.csv
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Directory the enrollment and application reports are written to
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Enrollment and assignment date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) run_date: Option<NaiveDate>,
    /// Counter value for the first enrollment id
    #[arg(long)]
    pub(crate) enrollment_id_start: Option<u32>,
    /// Record an Ineligible status for applicants with no eligible preference
    #[arg(long)]
    pub(crate) emit_ineligible: bool,
}

pub(crate) fn run_allocation(args: AllocateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let AllocateArgs {
        data_dir,
        output_dir,
        run_date,
        enrollment_id_start,
        emit_ineligible,
    } = args;

    if let Some(dir) = data_dir {
        config.allocation.data_dir = dir;
    }
    if let Some(dir) = output_dir {
        config.allocation.output_dir = dir;
    }
    if let Some(start) = enrollment_id_start {
        config.allocation.policy.enrollment_id_start = start;
    }
    if emit_ineligible {
        config.allocation.policy.emit_ineligible_status = true;
    }
    let run_date = run_date.unwrap_or_else(|| Local::now().date_naive());

    println!("Gurukul Admissions Assignment");
    println!("=============================");

    let imported = CsvImporter::from_dir(&config.allocation.data_dir)?;
    for record in &imported.malformed {
        warn!(
            table = %record.table,
            line = record.line,
            field = record.field,
            "skipped malformed row"
        );
    }

    let outcome = AllocationEngine::new(config.allocation.policy.clone())
        .run(&imported.dataset, run_date)?;
    let written = write_outputs(&outcome, &config.allocation.output_dir)?;
    let summary = AllocationSummary::from_outcome(&outcome);

    render_written(&written, &summary);
    render_summary(&summary, imported.malformed.len(), outcome.rejections.len());

    println!("\nDone.");
    Ok(())
}

fn render_written(written: &WrittenReports, summary: &AllocationSummary) {
    if let Some(path) = &written.enrollments {
        println!(
            "\nCreated {} enrollments -> {}",
            summary.total_assignments,
            path.display()
        );
    }
    if let Some(path) = &written.applications {
        println!("Updated application statuses -> {}", path.display());
    }
}

fn render_summary(summary: &AllocationSummary, malformed: usize, rejections: usize) {
    println!("\nSummary:");
    println!("Total assignments made: {}", summary.total_assignments);
    println!("Remaining capacity per class:");
    for line in &summary.capacity {
        println!("  {}", line.render());
    }

    if summary.dropped_preferences > 0 {
        println!(
            "\n{} preferences dropped (unknown student or missing application)",
            summary.dropped_preferences
        );
    }
    if malformed > 0 {
        println!("{malformed} malformed rows skipped");
    }
    if rejections > 0 {
        println!("\n{} students waitlisted/denied", rejections);
    }
}
