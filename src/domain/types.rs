//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation and fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Row shape of a monthly sales export.
///
/// Only `item` files carry per-item counts that can be joined against the
/// factor table. `group` files hold category-level aggregates; there is no
/// item name to join on, so the month is recorded as skipped instead of
/// silently producing zero usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Item,
    Group,
}

/// Largest accepted time index (50 years of months). Chart axis labels
/// allocate one slot per index, so runaway indices are rejected during
/// validation instead.
pub const MAX_MONTH_INDEX: i64 = 600;

/// One month of sales history declared in the plan.
///
/// `index` is the month's position on the time axis. The forecast target sits
/// at index 0, so history months carry positive indices (the month right after
/// the target is 1, the next is 2, and so on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSpec {
    pub month: String,
    pub index: i64,
    pub source: PathBuf,
    #[serde(default)]
    pub granularity: Granularity,
}

/// The run plan (JSON).
///
/// Everything a forecast run needs is declared here: which ingredients to
/// track, where the factor table lives, and which monthly sales files feed the
/// trend. Paths are resolved relative to the plan file's directory so a plan
/// can sit next to its data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPlan {
    /// Display name of the month being forecast (time index 0).
    pub target_month: String,
    /// Ingredients to aggregate and forecast, in report/chart order.
    pub tracked_ingredients: Vec<String>,
    /// CSV mapping item names to per-ingredient quantities.
    pub factor_table: PathBuf,
    pub months: Vec<MonthSpec>,
    /// Optional shipment schedule CSV for inventory/reorder reporting.
    #[serde(default)]
    pub shipments: Option<PathBuf>,
    /// Maps lowercased external ingredient spellings (as they appear in the
    /// shipment schedule) to tracked ingredient names.
    #[serde(default)]
    pub ingredient_aliases: HashMap<String, String>,
}

/// A non-fatal problem with a single input row.
///
/// Collected during ingest and surfaced in the report; a bad row never aborts
/// the run on its own.
#[derive(Debug, Clone)]
pub struct RowIssue {
    pub line: u64,
    pub item: String,
    pub message: String,
}

/// The item → ingredient factor table, aligned to the tracked ingredient list.
///
/// `factors[item][i]` is the quantity of `tracked[i]` consumed by one sale of
/// `item`. Missing cells were already defaulted to 0 during load.
#[derive(Debug, Clone)]
pub struct FactorTable {
    pub tracked: Vec<String>,
    pub factors: HashMap<String, Vec<f64>>,
    pub rows_read: usize,
    pub row_issues: Vec<RowIssue>,
}

/// One row of a monthly sales file after parsing.
#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub item: String,
    pub count: f64,
}

/// Computed ingredient totals for one month.
///
/// `totals` is aligned to the tracked ingredient list. `rows_matched` counts
/// sales rows that joined against the factor table; the difference from
/// `rows_read` is the volume excluded by the inner join.
#[derive(Debug, Clone)]
pub struct MonthlyUsage {
    pub month: String,
    pub index: i64,
    pub totals: Vec<f64>,
    pub rows_read: usize,
    pub rows_matched: usize,
    pub row_issues: Vec<RowIssue>,
}

/// Why a configured month contributed no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file holds category aggregates, not per-item counts.
    AggregatedGranularity,
    /// The sales file does not exist.
    SourceMissing,
    /// The sales file exists but could not be processed.
    Malformed(String),
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            SkipReason::AggregatedGranularity => {
                "aggregated group-level data cannot be joined to per-item factors".to_string()
            }
            SkipReason::SourceMissing => "sales file not found".to_string(),
            SkipReason::Malformed(detail) => detail.clone(),
        }
    }
}

/// A configured month that was dropped from the trend, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedMonth {
    pub month: String,
    pub index: i64,
    pub reason: SkipReason,
}

/// All computed months plus the skip record, ready for fitting.
#[derive(Debug, Clone)]
pub struct UsageHistory {
    pub tracked: Vec<String>,
    /// Usable months in ascending time-index order.
    pub months: Vec<MonthlyUsage>,
    pub skipped: Vec<SkippedMonth>,
}

impl UsageHistory {
    /// The (index, total) series for one tracked ingredient slot.
    pub fn series(&self, slot: usize) -> Vec<(i64, f64)> {
        self.months
            .iter()
            .map(|m| (m.index, m.totals[slot]))
            .collect()
    }
}

/// Which trend model produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendKind {
    /// Degree-2 polynomial (3+ observed months).
    Quadratic,
    /// Straight line (exactly 2 observed months).
    Linear,
    /// Fewer than 2 observed months; the forecast defaults to 0.
    Insufficient,
}

impl TrendKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            TrendKind::Quadratic => "quadratic",
            TrendKind::Linear => "linear",
            TrendKind::Insufficient => "insufficient",
        }
    }
}

/// Forecast for one tracked ingredient at the target month.
#[derive(Debug, Clone)]
pub struct IngredientForecast {
    pub ingredient: String,
    /// Final forecast, clamped to be non-negative.
    pub predicted: f64,
    /// Model value before clamping (can be negative).
    pub raw: f64,
    pub trend: TrendKind,
    /// Number of months the model was fit on.
    pub observations: usize,
}

/// Delivery cadence of a recurring shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    /// Unrecognized cadence; contributes nothing to monthly purchases.
    Unknown,
}

impl Frequency {
    /// Average delivery cycles per month.
    pub fn cycles_per_month(self) -> f64 {
        match self {
            Frequency::Weekly => 4.33,
            Frequency::Biweekly => 2.16,
            Frequency::Monthly => 1.0,
            Frequency::Unknown => 0.0,
        }
    }
}

/// One recurring shipment from the schedule CSV.
///
/// `ingredient` is already canonical (aliases applied at load time) so it can
/// be compared directly against tracked ingredient names.
#[derive(Debug, Clone)]
pub struct ShipmentRecord {
    pub ingredient: String,
    /// Quantity per delivery, in `unit`.
    pub quantity: f64,
    pub unit: String,
    /// Deliveries per frequency cycle.
    pub deliveries: f64,
    pub frequency: Frequency,
}

/// Purchased vs used quantities for one ingredient over the month.
#[derive(Debug, Clone)]
pub struct InventoryLevel {
    pub ingredient: String,
    pub purchased: f64,
    pub used: f64,
    /// `purchased - used`; negative means the month consumed reserve stock.
    pub net: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderStatus {
    ReorderNow,
    Sufficient,
}

impl ReorderStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            ReorderStatus::ReorderNow => "Re-order Now",
            ReorderStatus::Sufficient => "Sufficient Stock",
        }
    }
}

/// Runway estimate for one ingredient at end of month.
#[derive(Debug, Clone)]
pub struct ReorderAdvice {
    pub ingredient: String,
    /// Stock carried into next month, floored at 0.
    pub end_of_month_stock: f64,
    pub avg_daily_usage: f64,
    /// Days the remaining stock lasts at the average daily burn rate.
    pub days_left: f64,
    pub status: ReorderStatus,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub plan_path: PathBuf,

    pub chart: Option<PathBuf>,
    pub chart_width: u32,
    pub chart_height: u32,

    pub export_usage: Option<PathBuf>,
    pub export_forecast: Option<PathBuf>,
}

/// A saved forecast file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub generated: NaiveDate,
    pub target_month: String,
    pub ingredients: Vec<String>,
    pub months: Vec<MonthRecord>,
    pub skipped: Vec<SkippedMonth>,
    pub predictions: Vec<PredictionRecord>,
}

/// One computed month as exported (diagnostics stripped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: String,
    pub index: i64,
    /// Aligned to the file's `ingredients` list.
    pub totals: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub ingredient: String,
    pub predicted: f64,
    pub trend: TrendKind,
}
