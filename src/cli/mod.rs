//! Command-line interface module.

mod args;
pub mod assemble;
pub mod init;
pub mod serve;

pub use args::{Cli, Commands, ServeArgs};
