//! HTTP protocol layer module
//!
//! Response-building functionality, decoupled from specific business logic.

pub mod response;

pub use response::{error_response, ok_response, text_response, ResponseBody};
