pub mod cli;
pub mod commands;
pub mod config;
pub mod consensus;
pub mod export;
pub mod genome;
pub mod matrix;
mod utils;
mod error;

pub use error::{AnalysisError, Result};
