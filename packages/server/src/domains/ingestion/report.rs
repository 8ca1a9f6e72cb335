use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// What the import did to one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOutcome {
    pub id: String,
    pub name: String,
    pub created: bool,
    pub color_updated: bool,
    pub facilities_created: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Every row was stored or matched an existing facility
    Success,
    /// Some rows were stored, some skipped or failed
    Partial,
    /// Nothing was stored
    Failed,
}

/// Summary returned by a CSV import.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub status: ImportStatus,
    pub total_rows: usize,
    /// Rows stored as a new facility or matched to an existing one
    pub processed: usize,
    pub skipped: usize,
    pub skipped_rows: Vec<SkippedRow>,
    pub failed: usize,
    pub errors: Vec<RowError>,
    pub companies: Vec<CompanyOutcome>,
    pub duplicates: usize,
    /// Facilities created by this import
    pub total_facilities: usize,
}

impl ImportReport {
    pub(crate) fn new(total_rows: usize) -> Self {
        Self {
            status: ImportStatus::Success,
            total_rows,
            processed: 0,
            skipped: 0,
            skipped_rows: Vec::new(),
            failed: 0,
            errors: Vec::new(),
            companies: Vec::new(),
            duplicates: 0,
            total_facilities: 0,
        }
    }

    pub(crate) fn skip(&mut self, row: usize, reason: impl Into<String>) {
        self.skipped += 1;
        self.skipped_rows.push(SkippedRow {
            row,
            reason: reason.into(),
        });
    }

    pub(crate) fn fail(&mut self, row: usize, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(RowError {
            row,
            message: message.into(),
        });
    }

    pub(crate) fn finish(mut self) -> Self {
        self.skipped_rows.sort_by_key(|s| s.row);
        self.errors.sort_by_key(|e| e.row);
        self.status = if self.processed == 0 && self.total_rows > 0 {
            ImportStatus::Failed
        } else if self.skipped + self.failed > 0 {
            ImportStatus::Partial
        } else {
            ImportStatus::Success
        };
        self
    }
}
