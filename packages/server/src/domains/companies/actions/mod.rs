//! Company actions - validation plus persistence, called from HTTP handlers
//! and the CSV import pipeline.

mod manage;
mod queries;

pub use manage::{create_company, delete_company, update_company};
pub use queries::{get_company, list_companies, load_active_company};
