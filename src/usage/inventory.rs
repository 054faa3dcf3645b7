//! Inventory levels and reorder advice.
//!
//! When the plan carries a shipment schedule, the pipeline can go one step
//! past usage totals: compare what was purchased during a month against what
//! the menu consumed, and estimate how long the leftover stock lasts.
//!
//! All quantities are kept in the factor table's units (grams or counts);
//! shipment quantities quoted in pounds are converted on the way in.

use std::collections::HashMap;

use crate::domain::{
    InventoryLevel, MonthlyUsage, ReorderAdvice, ReorderStatus, ShipmentRecord,
};

pub const LBS_TO_GRAMS: f64 = 453.592;
pub const AVG_DAYS_IN_MONTH: f64 = 30.0;
/// Assumed lead time for shipments.
pub const REORDER_THRESHOLD_DAYS: f64 = 7.0;

/// Inventory view of a single month.
#[derive(Debug, Clone)]
pub struct MonthInventory {
    pub month: String,
    pub levels: Vec<InventoryLevel>,
    pub advice: Vec<ReorderAdvice>,
}

/// Total quantity purchased per ingredient over an average month.
///
/// Each schedule row contributes `quantity × deliveries × cycles_per_month`;
/// rows with an unknown cadence contribute nothing.
pub fn monthly_purchases(shipments: &[ShipmentRecord]) -> HashMap<String, f64> {
    let mut purchases: HashMap<String, f64> = HashMap::new();

    for s in shipments {
        let mut quantity = s.quantity * s.deliveries * s.frequency.cycles_per_month();
        if s.unit.eq_ignore_ascii_case("lbs") {
            quantity *= LBS_TO_GRAMS;
        }
        *purchases.entry(s.ingredient.clone()).or_insert(0.0) += quantity;
    }

    purchases
}

/// Purchased vs used for every scheduled ingredient, sorted by name.
pub fn inventory_levels(
    purchases: &HashMap<String, f64>,
    month: &MonthlyUsage,
    tracked: &[String],
) -> Vec<InventoryLevel> {
    let used = usage_by_ingredient(month, tracked);

    let mut levels: Vec<InventoryLevel> = purchases
        .iter()
        .map(|(ingredient, &purchased)| {
            let used = used.get(ingredient.as_str()).copied().unwrap_or(0.0);
            InventoryLevel {
                ingredient: ingredient.clone(),
                purchased,
                used,
                net: purchased - used,
            }
        })
        .collect();

    levels.sort_by(|a, b| a.ingredient.cmp(&b.ingredient));
    levels
}

/// Runway estimates, most urgent first.
///
/// Only ingredients that both appear in the schedule and were actually
/// consumed get advice; an unused ingredient has no burn rate to divide by.
pub fn reorder_advice(
    levels: &[InventoryLevel],
    month: &MonthlyUsage,
    tracked: &[String],
) -> Vec<ReorderAdvice> {
    let used = usage_by_ingredient(month, tracked);

    let mut advice: Vec<ReorderAdvice> = levels
        .iter()
        .filter_map(|level| {
            let monthly_usage = used.get(level.ingredient.as_str()).copied().unwrap_or(0.0);
            if monthly_usage <= 0.0 {
                return None;
            }

            let end_of_month_stock = level.net.max(0.0);
            let avg_daily_usage = monthly_usage / AVG_DAYS_IN_MONTH;
            let days_left = if avg_daily_usage > 0.0 {
                end_of_month_stock / avg_daily_usage
            } else {
                f64::INFINITY
            };
            let status = if days_left < REORDER_THRESHOLD_DAYS {
                ReorderStatus::ReorderNow
            } else {
                ReorderStatus::Sufficient
            };

            Some(ReorderAdvice {
                ingredient: level.ingredient.clone(),
                end_of_month_stock,
                avg_daily_usage,
                days_left,
                status,
            })
        })
        .collect();

    advice.sort_by(|a, b| a.days_left.total_cmp(&b.days_left));
    advice
}

/// Inventory + advice for one month.
pub fn analyze_month(
    shipments: &[ShipmentRecord],
    month: &MonthlyUsage,
    tracked: &[String],
) -> MonthInventory {
    let purchases = monthly_purchases(shipments);
    let levels = inventory_levels(&purchases, month, tracked);
    let advice = reorder_advice(&levels, month, tracked);

    MonthInventory {
        month: month.month.clone(),
        levels,
        advice,
    }
}

fn usage_by_ingredient<'a>(month: &MonthlyUsage, tracked: &'a [String]) -> HashMap<&'a str, f64> {
    tracked
        .iter()
        .zip(month.totals.iter())
        .map(|(name, &total)| (name.as_str(), total))
        .collect()
}
