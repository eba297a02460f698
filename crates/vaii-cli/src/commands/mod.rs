//! Subcommands of the `vaii` binary.

pub mod assess;
pub mod config;
