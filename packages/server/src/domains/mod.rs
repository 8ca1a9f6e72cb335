pub mod companies;
pub mod facilities;
pub mod ingestion;
