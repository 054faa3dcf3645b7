//! Usage aggregation and inventory analysis.
//!
//! Responsibilities:
//!
//! - join monthly sales against the factor table and total per-ingredient
//!   usage (`aggregate`)
//! - compare purchases against consumption and estimate stock runway
//!   (`inventory`)

pub mod aggregate;
pub mod inventory;

pub use aggregate::*;
pub use inventory::*;
