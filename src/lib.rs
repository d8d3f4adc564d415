//! Lanyard MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing Discord presence data from
//! the Lanyard API. Provides tools for reading a user's presence, their
//! Spotify activity and their custom KV data.

pub mod config;
pub mod error;
pub mod lanyard;
pub mod mcp;

pub use config::Config;
pub use error::{LanyardMcpError, Result};
