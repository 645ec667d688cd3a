//! Domain types shared by the render-queue bot crates.
//!
//! Nothing in here performs I/O: the store lives in `renderq-db`, the
//! Discord transport in `renderq-discord`.

pub mod error;
pub mod permissions;
pub mod render_job;
pub mod types;
