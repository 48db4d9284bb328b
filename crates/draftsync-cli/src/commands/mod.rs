//! CLI subcommands, one module per command

pub mod compose;
pub mod config;
pub mod delete;
pub mod duplicate;
pub mod export;
pub mod list;
pub mod save;
pub mod stats;
pub mod sync;
pub mod update;
