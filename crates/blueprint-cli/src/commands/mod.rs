//! Command implementations for blueprint-cli

pub mod capture;
pub mod generate;
pub mod log;
pub mod recording;

pub use capture::{Delimiter, run_capture};
pub use generate::{GenerateOptions, run_generate};
pub use log::{run_log_clear, run_log_list};
pub use recording::run_recording;
