//! HTTP protocol layer module
//!
//! Response builders, decoupled from the deploy logic.

pub mod response;

pub use response::{build_error_response, build_health_response, build_redirect_response};
