//! Chart rendering.

pub mod chart;

pub use chart::*;
