use serde::{Deserialize, Serialize};

/// Lifecycle status of a company or facility.
///
/// Records are never hard-deleted; every read filters on `Active` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "record_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Deleted,
}

