//! CLI commands

pub mod command;
pub mod encode;
pub mod options;
pub mod package;
