//! HTTP Transport layer for the Model Context Protocol
//!
//! Provides the external API routing, including the direct `/mcp` endpoint,
//! the `/sse` event-stream transport, and session bookkeeping.

pub mod handlers;
pub mod sessions;
