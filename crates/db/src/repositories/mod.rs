//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod render_job_repo;

pub use render_job_repo::RenderJobRepo;
