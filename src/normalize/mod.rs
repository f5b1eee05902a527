mod errors;
mod export;
mod extraction;
mod extractor;

pub use errors::{ExtractionError, NormalizeError, RowError};
pub use export::{read_export, read_export_file};
pub use extraction::{ExtractionReport, FileResult, parse_extraction_output};
pub use extractor::ExtractionEngine;

/// Currency assumed when a source does not report one.
pub const DEFAULT_CURRENCY: &str = "CAD";
