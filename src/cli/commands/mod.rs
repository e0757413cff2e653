//! CLI command implementations.

mod config;
mod doctor;
mod run;

pub use config::run_config;
pub use doctor::run_doctor;
pub use run::{run_command, run_json};
