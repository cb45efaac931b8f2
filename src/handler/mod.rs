//! Request handler module
//!
//! Routing layer in front of the deployer: health probes first, every other
//! request is a deploy request.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
