//! Shared CSV column helpers.
//!
//! The factor table, monthly sales files, and the shipment schedule all come
//! from spreadsheet exports with inconsistent header casing and wording, so
//! every reader resolves columns through the same normalized header map.

use std::collections::HashMap;

use csv::StringRecord;

/// Accepted spellings of the item column, normalized. POS exports title it
/// `Item Name`, spreadsheet re-saves produce `item_name` or plain `Item`.
pub const ITEM_SPELLINGS: &[&str] = &["item name", "item_name", "item"];

/// Map normalized header names to column indices.
pub fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

pub fn normalize_header_name(name: &str) -> String {
    // Excel saves UTF-8 CSVs with a BOM glued to the first header (so the
    // item column arrives as "﻿Item Name"); left in place it would read as a
    // missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Resolve a column by its accepted header spellings, first match wins.
///
/// Spreadsheet exports drift: one source titles the delivery count
/// `Shipments`, another `Number of shipments`. Readers list every spelling
/// they accept and report the canonical one when none is present.
pub fn resolve_column(header_map: &HashMap<String, usize>, spellings: &[&str]) -> Option<usize> {
    spellings
        .iter()
        .find_map(|name| header_map.get(*name).copied())
}

/// A cell by column index, trimmed, with blanks read as absent.
pub fn get_field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

pub fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

pub fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
