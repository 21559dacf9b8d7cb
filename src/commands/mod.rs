//! CLI commands

pub mod build;
pub mod check;
pub mod clean;
pub mod list;
pub mod new;
pub mod show;
