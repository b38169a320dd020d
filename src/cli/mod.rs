//! CLI argument parsing and command handling.

mod args;
pub mod species;
mod validators;

pub use args::{Cli, Command, ConfigAction, EvaluateArgs, PredictArgs};
