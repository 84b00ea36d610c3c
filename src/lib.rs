//! Job application tracker: a persisted list of applications shown as a
//! kanban board, a sortable table and pipeline analytics.

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod repl;
pub mod tui;
