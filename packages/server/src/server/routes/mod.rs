// HTTP routes
pub mod companies;
pub mod facilities;
pub mod health;
pub mod upload;

pub use companies::*;
pub use facilities::*;
pub use health::*;
pub use upload::*;

use crate::common::{ApiError, ApiResult, Id};

/// Parse a path id, answering 400 on garbage.
pub(crate) fn parse_path_id<T>(raw: &str, what: &str) -> ApiResult<Id<T>> {
    Id::parse(raw).map_err(|_| ApiError::bad_request(format!("Invalid {} id: {}", what, raw)))
}
