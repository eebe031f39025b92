//! CLI subcommands.

pub mod lists;
pub mod run;
pub mod users;
