//! Input/output helpers.
//!
//! - shared CSV column resolution (`columns`)
//! - factor table ingest (`factors`)
//! - monthly sales ingest (`sales`)
//! - shipment schedule ingest (`shipments`)
//! - plan JSON read/write (`plan`)
//! - usage CSV + forecast JSON exports (`export`)

pub mod columns;
pub mod export;
pub mod factors;
pub mod plan;
pub mod sales;
pub mod shipments;

pub use export::*;
pub use factors::*;
pub use plan::*;
pub use sales::*;
pub use shipments::*;
