//! Command-line interface module.

mod args;
pub mod combine;
pub mod init;

pub use args::{Cli, CombineArgs, Commands};
