//! Demo data generation.
//!
//! Everything here exists for `larder demo`; the normal pipeline never
//! fabricates data.

pub mod sample;

pub use sample::*;
