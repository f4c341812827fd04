//! # REST API Interface Layer
//!
//! One module per resource. Handlers log the request line, call a single
//! domain service and map its result onto a status code. Error bodies are
//! plain text so the frontend can show them as-is.

pub mod child_apis;
pub mod enhancement_apis;
pub mod logging_apis;
pub mod memo_apis;
pub mod report_apis;
pub mod user_apis;
