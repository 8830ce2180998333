pub mod auth;
pub mod rbac;
pub mod request_log;
pub mod response;

pub use auth::{require_bearer, AuthUser};
pub use rbac::{authorize, RbacGate};
pub use request_log::log_request;
pub use response::{ApiResponse, ApiResult};
