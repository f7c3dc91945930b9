//! CLI subcommand implementations for the sitegrab binary.

pub mod clone_cmd;
pub mod doctor;
pub mod output;
