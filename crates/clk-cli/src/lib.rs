//! Work-hour tracker CLI library.
//!
//! This crate provides the command-line interface of `clk`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{Config, Storage};
