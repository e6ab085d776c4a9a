mod summary;
mod writer;

pub use summary::{AllocationSummary, CapacityLine};
pub use writer::{write_outputs, ReportError, WrittenReports, APPLICATIONS_FILE, ENROLLMENTS_FILE};
