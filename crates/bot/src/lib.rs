//! Render queue bot library.
//!
//! Exposes the building blocks (config, lifecycle controller, command
//! router, keep-alive routes) so integration tests and the binary
//! entrypoint can both access them.

pub mod commands;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod replies;
pub mod router;
pub mod routes;
pub mod state;
