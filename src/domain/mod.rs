//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the run plan and its month specs (`ForecastPlan`, `MonthSpec`)
//! - aggregation outputs (`MonthlyUsage`, `UsageHistory`, `SkippedMonth`)
//! - forecast outputs (`IngredientForecast`, `TrendKind`)
//! - inventory types (`ShipmentRecord`, `InventoryLevel`, `ReorderAdvice`)

pub mod types;

pub use types::*;
