//! Domain objects parsing and tool integrations
//!
//! Provides the core business logic of weather lookups exposed over the MCP protocol

pub mod tools;
pub mod weather;
