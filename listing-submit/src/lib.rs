//! listing-submit
//!
//! The submission binary's library half: input handling, the pipeline that
//! ties manifest resolution, payload building, validation and the registry
//! client together, and the CI outputs a run reports.

pub mod cli;
pub mod config;
pub mod outputs;
pub mod pipeline;
pub mod summary;

pub use cli::Cli;
pub use config::{RunMode, SubmitConfig};
pub use pipeline::{Pipeline, RunOutcome, RunStatus};
