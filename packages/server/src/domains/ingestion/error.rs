use thiserror::Error;

/// Upload problems that reject the whole file before anything is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("No file uploaded (expected multipart field 'file')")]
    MissingFile,

    #[error("Only .csv files are accepted, got '{0}'")]
    BadExtension(String),

    #[error("File is too large (limit {limit} bytes)")]
    TooLarge { limit: usize },

    #[error("Could not parse CSV: {0}")]
    Unparsable(String),

    #[error("CSV is missing required columns")]
    MissingColumns(Vec<String>),
}

impl IngestError {
    /// Extra lines for the error body's `details` array.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::MissingColumns(columns) => columns.clone(),
            _ => Vec::new(),
        }
    }
}
