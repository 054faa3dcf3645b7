//! Read/write plan JSON files.
//!
//! The plan is the "portable" description of a forecast run:
//! - the target month (time index 0) and the tracked ingredient list
//! - the factor table location
//! - each history month with its time index, sales file, and granularity
//! - optional shipment schedule + ingredient alias map
//!
//! The schema is defined by `domain::ForecastPlan`. Relative paths in the
//! plan are resolved against the plan file's directory, so a plan can travel
//! with its data.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::domain::{ForecastPlan, MAX_MONTH_INDEX};
use crate::error::AppError;

/// Read and validate a plan JSON file.
pub fn read_plan(path: &Path) -> Result<ForecastPlan, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open plan '{}': {e}", path.display())))?;
    let mut plan: ForecastPlan = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid plan JSON: {e}")))?;

    validate_plan(&plan)?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    plan.factor_table = resolve(base, &plan.factor_table);
    if let Some(shipments) = &plan.shipments {
        plan.shipments = Some(resolve(base, shipments));
    }
    for month in &mut plan.months {
        month.source = resolve(base, &month.source);
    }

    Ok(plan)
}

/// Write a plan JSON file.
pub fn write_plan(path: &Path, plan: &ForecastPlan) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create plan '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, plan)
        .map_err(|e| AppError::input(format!("Failed to write plan JSON: {e}")))?;
    Ok(())
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    // `join` keeps absolute paths as-is.
    base.join(path)
}

/// Structural checks that make downstream stages panic-free.
pub fn validate_plan(plan: &ForecastPlan) -> Result<(), AppError> {
    if plan.target_month.trim().is_empty() {
        return Err(AppError::input("Plan has an empty `target_month`."));
    }

    if plan.tracked_ingredients.is_empty() {
        return Err(AppError::input("Plan lists no tracked ingredients."));
    }
    let mut seen = HashSet::new();
    for ingredient in &plan.tracked_ingredients {
        if ingredient.trim().is_empty() {
            return Err(AppError::input("Plan contains a blank tracked ingredient."));
        }
        if !seen.insert(ingredient.to_ascii_lowercase()) {
            return Err(AppError::input(format!(
                "Tracked ingredient '{ingredient}' appears more than once."
            )));
        }
    }

    if plan.months.is_empty() {
        return Err(AppError::input("Plan lists no history months."));
    }
    let mut names = HashSet::new();
    let mut indices = HashSet::new();
    for month in &plan.months {
        if month.month.trim().is_empty() {
            return Err(AppError::input("Plan contains a month with no name."));
        }
        if month.index < 1 {
            return Err(AppError::input(format!(
                "Month '{}' has time index {}; history months sit at index 1 or later \
                 (0 is the forecast target).",
                month.month, month.index
            )));
        }
        if month.index > MAX_MONTH_INDEX {
            return Err(AppError::input(format!(
                "Month '{}' has time index {}; the largest supported index is {MAX_MONTH_INDEX}.",
                month.month, month.index
            )));
        }
        if !names.insert(month.month.to_ascii_lowercase()) {
            return Err(AppError::input(format!(
                "Month '{}' appears more than once in the plan.",
                month.month
            )));
        }
        if !indices.insert(month.index) {
            return Err(AppError::input(format!(
                "Time index {} is used by more than one month.",
                month.index
            )));
        }
    }

    Ok(())
}
