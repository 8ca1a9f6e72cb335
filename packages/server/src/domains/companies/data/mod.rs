pub mod company;

pub use company::{CompanyData, CompanySummary, CreateCompanyInput, UpdateCompanyInput};
