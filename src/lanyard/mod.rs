//! Lanyard API module
//!
//! Contains types, the REST client, validation helpers and the text formatters.

pub mod client;
pub mod format;
pub mod types;
pub mod utils;
