//! Trend fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit a polynomial trend per tracked ingredient (parallel across ingredients)
//! - pick the model rung from the observation count
//! - evaluate at the target index and clamp at zero

pub mod forecast;
pub mod poly;

pub use forecast::*;
pub use poly::*;
