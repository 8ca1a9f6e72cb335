//! Companies domain - facility owners and their map legend colors

pub mod actions;
pub mod data;
pub mod models;

pub use data::{CompanyData, CompanySummary};
pub use models::{Company, CompanyWithCount};
