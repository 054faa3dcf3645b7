//! Reporting: terminal-friendly summaries of a forecast run.

pub mod format;

pub use format::*;
