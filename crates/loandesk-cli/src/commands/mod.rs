//! CLI subcommands

pub mod apply;
pub mod audit;
pub mod completions;
pub mod config;
pub mod decision;
pub mod list;
pub mod stats;
