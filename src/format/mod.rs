pub mod perfdata;
pub mod report;

pub use perfdata::Perfdata;
pub use report::{Aggregator, ItemLine, Report, ReportTemplate, SummaryStyle};
