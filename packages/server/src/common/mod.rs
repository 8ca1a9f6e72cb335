// Common types shared across domains and the HTTP layer

pub mod entity_ids;
pub mod error;
pub mod id;
pub mod status;
pub mod validation;

pub use entity_ids::*;
pub use error::{ApiError, ApiResult, NotFoundError, ValidationError};
pub use id::Id;
pub use status::RecordStatus;
pub use validation::{is_valid_hex_color, validate_company_name, validate_legend_color};
