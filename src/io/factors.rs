//! Factor table ingest.
//!
//! The factor table maps each sellable item to the quantity of every tracked
//! ingredient consumed by one sale. This module turns the CSV into a
//! `FactorTable` aligned to the plan's tracked ingredient order.
//!
//! Design goals:
//! - **Strict schema** for the item column and every tracked ingredient column
//!   (clear errors + exit code 2); a tracked ingredient the table cannot
//!   supply would silently forecast 0, so it is rejected up front
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Lenient cells**: a blank factor cell means the item uses none of that
//!   ingredient, so it loads as 0

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::domain::{FactorTable, RowIssue};
use crate::error::AppError;
use crate::io::columns::{
    ITEM_SPELLINGS, build_header_map, get_field, parse_opt_f64, resolve_column,
};

/// Load the item → ingredient factor table.
///
/// Column resolution is case-insensitive and the item column accepts the
/// usual export spellings (`Item Name`, `item_name`, `Item`).
pub fn load_factor_table(path: &Path, tracked: &[String]) -> Result<FactorTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open factor table '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read factor table headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    let Some(item_col) = resolve_column(&header_map, ITEM_SPELLINGS) else {
        return Err(AppError::input(format!(
            "Factor table '{}' is missing the `Item Name` column.",
            path.display()
        )));
    };

    // Every tracked ingredient must resolve to a column before any row work;
    // reporting the full missing list beats failing one column at a time.
    let mut slots = Vec::with_capacity(tracked.len());
    let mut missing = Vec::new();
    for ingredient in tracked {
        match header_map.get(&ingredient.to_ascii_lowercase()) {
            Some(&idx) => slots.push(idx),
            None => missing.push(ingredient.as_str()),
        }
    }
    if !missing.is_empty() {
        return Err(AppError::input(format!(
            "Ingredients not found in factor table '{}': {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let mut factors: HashMap<String, Vec<f64>> = HashMap::new();
    let mut row_issues = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header row is CSV line 1, so the first record sits at line 2.
        let line = (idx + 2) as u64;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_issues.push(RowIssue {
                    line,
                    item: String::new(),
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(item) = get_field(&record, item_col).map(str::to_string) else {
            row_issues.push(RowIssue {
                line,
                item: String::new(),
                message: "Missing item name.".to_string(),
            });
            continue;
        };

        let mut row = Vec::with_capacity(slots.len());
        for (&col, ingredient) in slots.iter().zip(tracked.iter()) {
            let cell = get_field(&record, col);
            match cell {
                None => row.push(0.0),
                Some(_) => match parse_opt_f64(cell) {
                    Some(v) => row.push(v),
                    None => {
                        row_issues.push(RowIssue {
                            line,
                            item: item.clone(),
                            message: format!("Unparseable `{ingredient}` value; treating as 0."),
                        });
                        row.push(0.0);
                    }
                },
            }
        }

        if factors.insert(item.clone(), row).is_some() {
            row_issues.push(RowIssue {
                line,
                item,
                message: "Duplicate item name; keeping the last occurrence.".to_string(),
            });
        }
    }

    if factors.is_empty() {
        return Err(AppError::no_data(format!(
            "Factor table '{}' has no usable rows.",
            path.display()
        )));
    }

    Ok(FactorTable {
        tracked: tracked.to_vec(),
        factors,
        rows_read,
        row_issues,
    })
}
