//! Ingestion domain - bulk CSV import of companies and facilities

pub mod csv_file;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod rows;
pub mod templates;

pub use csv_file::{normalize_header, parse_csv, ParsedCsv, RawRow};
pub use error::IngestError;
pub use pipeline::{check_upload, import_csv};
pub use report::{CompanyOutcome, ImportReport, ImportStatus, RowError, SkippedRow};
pub use rows::{validate_row, ValidRow};
pub use templates::TemplateKind;
