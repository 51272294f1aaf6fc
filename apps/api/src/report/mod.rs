// Report normalization: turns scoring-service reports of any schema generation
// into one canonical AnalysisView for presentation.
// Everything below handlers is synchronous and total; errors exist only at the HTTP edge.

pub mod band;
pub mod catalog;
pub mod extract;
pub mod handlers;
pub mod ingest;
pub mod lenient;
pub mod normalizer;
pub mod raw;

pub use catalog::CategoryKey;
pub use normalizer::{normalize_report, AnalysisView};
pub use raw::RawReport;
