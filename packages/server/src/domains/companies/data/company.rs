use serde::{Deserialize, Serialize};

use crate::domains::companies::models::{Company, CompanyWithCount};

/// Company as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyData {
    pub id: String,
    pub name: String,
    pub legend_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_count: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Company> for CompanyData {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.to_string(),
            name: company.name,
            legend_color: company.legend_color,
            facility_count: None,
            created_at: company.created_at.to_rfc3339(),
            updated_at: company.updated_at.to_rfc3339(),
        }
    }
}

impl From<CompanyWithCount> for CompanyData {
    fn from(row: CompanyWithCount) -> Self {
        Self {
            facility_count: Some(row.facility_count),
            ..row.company.into()
        }
    }
}

/// The slice of a company embedded in each facility record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: String,
    pub name: String,
    pub legend_color: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyInput {
    pub name: String,
    #[serde(alias = "legend_color")]
    pub legend_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyInput {
    pub name: Option<String>,
    #[serde(alias = "legend_color")]
    pub legend_color: Option<String>,
}
