//! HTTP handlers.
//!
//! The service answers on every path; behaviour depends only on the method.

pub mod analyze;
pub mod status;

pub use analyze::{dispatch, panic_response};
