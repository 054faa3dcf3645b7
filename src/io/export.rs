//! Result exports.
//!
//! Two shapes leave the pipeline:
//! - a usage CSV (one row per computed month) that is easy to consume in
//!   spreadsheets or downstream scripts
//! - a forecast JSON bundle holding everything the chart needs, so a chart
//!   can be rendered later without re-reading the sales files

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{
    ForecastFile, IngredientForecast, MAX_MONTH_INDEX, MonthRecord, PredictionRecord, UsageHistory,
};
use crate::error::AppError;

/// Write per-month ingredient totals to a CSV file.
///
/// Month and ingredient names are user-authored, so rows go through the csv
/// writer, which quotes any field holding a comma or quote.
pub fn write_usage_csv(path: &Path, history: &UsageHistory) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::input(format!("Failed to create usage CSV '{}': {e}", path.display()))
    })?;

    let mut header = vec!["month".to_string(), "index".to_string()];
    header.extend(history.tracked.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| AppError::input(format!("Failed to write usage CSV header: {e}")))?;

    for month in &history.months {
        let mut record = vec![month.month.clone(), month.index.to_string()];
        record.extend(month.totals.iter().map(|v| format!("{v:.3}")));
        writer
            .write_record(&record)
            .map_err(|e| AppError::input(format!("Failed to write usage CSV row: {e}")))?;
    }

    writer.flush().map_err(|e| {
        AppError::input(format!("Failed to flush usage CSV '{}': {e}", path.display()))
    })?;
    Ok(())
}

/// Assemble the portable forecast bundle.
pub fn forecast_file(
    target_month: &str,
    history: &UsageHistory,
    forecasts: &[IngredientForecast],
    generated: NaiveDate,
) -> ForecastFile {
    ForecastFile {
        tool: "larder".to_string(),
        generated,
        target_month: target_month.to_string(),
        ingredients: history.tracked.clone(),
        months: history
            .months
            .iter()
            .map(|m| MonthRecord {
                month: m.month.clone(),
                index: m.index,
                totals: m.totals.clone(),
            })
            .collect(),
        skipped: history.skipped.clone(),
        predictions: forecasts
            .iter()
            .map(|f| PredictionRecord {
                ingredient: f.ingredient.clone(),
                predicted: f.predicted,
                trend: f.trend,
            })
            .collect(),
    }
}

/// Write a forecast JSON file.
pub fn write_forecast_json(path: &Path, bundle: &ForecastFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create forecast JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, bundle)
        .map_err(|e| AppError::input(format!("Failed to write forecast JSON: {e}")))?;
    Ok(())
}

/// Read a forecast JSON file.
///
/// Saved bundles can be hand-edited, so the shape the chart depends on is
/// checked after parsing: month indices within 1..=`MAX_MONTH_INDEX`, totals
/// and predictions aligned to the ingredient list.
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open forecast JSON '{}': {e}", path.display()))
    })?;
    let bundle: ForecastFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid forecast JSON: {e}")))?;
    check_bundle(&bundle).map_err(|detail| {
        AppError::input(format!("Invalid forecast JSON '{}': {detail}", path.display()))
    })?;
    Ok(bundle)
}

/// Shape checks for a loaded bundle.
fn check_bundle(bundle: &ForecastFile) -> Result<(), String> {
    let tracked = bundle.ingredients.len();
    for month in &bundle.months {
        if !(1..=MAX_MONTH_INDEX).contains(&month.index) {
            return Err(format!(
                "month '{}' has time index {}; expected 1 to {MAX_MONTH_INDEX}",
                month.month, month.index
            ));
        }
        if month.totals.len() != tracked {
            return Err(format!(
                "month '{}' carries {} totals for {tracked} ingredients",
                month.month,
                month.totals.len()
            ));
        }
    }
    for skip in &bundle.skipped {
        if !(1..=MAX_MONTH_INDEX).contains(&skip.index) {
            return Err(format!(
                "skipped month '{}' has time index {}; expected 1 to {MAX_MONTH_INDEX}",
                skip.month, skip.index
            ));
        }
    }
    if bundle.predictions.len() != tracked {
        return Err(format!("{} predictions for {tracked} ingredients", bundle.predictions.len()));
    }
    Ok(())
}
