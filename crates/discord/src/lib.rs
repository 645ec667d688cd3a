//! Discord gateway and REST client library.
//!
//! Provides typed gateway frames and interaction payloads, the WebSocket
//! session loop (hello, identify, heartbeat, dispatch), slash-command
//! definitions, and a REST wrapper for command registration and
//! interaction replies.

pub mod api;
pub mod client;
pub mod commands;
pub mod messages;
pub mod session;
