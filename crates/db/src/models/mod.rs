//! Row models for the `renders` table.

pub mod render_job;
