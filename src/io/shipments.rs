//! Shipment schedule ingest.
//!
//! The schedule lists recurring deliveries: ingredient, quantity per delivery,
//! unit, deliveries per cycle, and cadence. Unlike monthly sales files the
//! schedule is explicitly configured, so a broken schedule is a configuration
//! error and aborts the run.
//!
//! Supplier spellings rarely match the factor table ("Braised Chicken(g)" on
//! one side, "chicken thigh (pcs)" on the other), so the plan's alias map is
//! applied here and everything downstream works with canonical names.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::domain::{Frequency, RowIssue, ShipmentRecord};
use crate::error::AppError;
use crate::io::columns::{
    build_header_map, get_field, get_optional, get_required, parse_opt_f64, resolve_column,
};

/// Accepted spellings of the deliveries-per-cycle column.
const SHIPMENTS_SPELLINGS: &[&str] = &["shipments", "number of shipments"];

/// Parsed shipment rows plus ingest diagnostics.
#[derive(Debug, Clone)]
pub struct ShipmentsTable {
    pub records: Vec<ShipmentRecord>,
    pub rows_read: usize,
    pub row_issues: Vec<RowIssue>,
}

/// Read the shipment schedule CSV, mapping ingredient names through `aliases`.
///
/// Alias keys are matched case-insensitively against the raw ingredient cell.
pub fn read_shipments_csv(
    path: &Path,
    aliases: &HashMap<String, String>,
) -> Result<ShipmentsTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open shipment schedule '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read shipment headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    for column in ["ingredient", "quantity", "unit", "frequency"] {
        if !header_map.contains_key(column) {
            return Err(AppError::input(format!(
                "Shipment schedule '{}' is missing the `{column}` column.",
                path.display()
            )));
        }
    }
    let Some(shipments_col) = resolve_column(&header_map, SHIPMENTS_SPELLINGS) else {
        return Err(AppError::input(format!(
            "Shipment schedule '{}' is missing the `shipments` column.",
            path.display()
        )));
    };

    let lookup: HashMap<String, &str> = aliases
        .iter()
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.as_str()))
        .collect();

    let mut records = Vec::new();
    let mut row_issues = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
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

        let raw_name = match get_required(&record, &header_map, "ingredient") {
            Ok(v) => v,
            Err(e) => {
                row_issues.push(RowIssue {
                    line,
                    item: String::new(),
                    message: e,
                });
                continue;
            }
        };
        let ingredient = lookup
            .get(&raw_name.to_ascii_lowercase())
            .map(|s| s.to_string())
            .unwrap_or_else(|| raw_name.to_string());

        let quantity = match parse_opt_f64(get_optional(&record, &header_map, "quantity")) {
            Some(v) => v,
            None => {
                row_issues.push(RowIssue {
                    line,
                    item: ingredient,
                    message: "Missing or unparseable `quantity` value.".to_string(),
                });
                continue;
            }
        };

        let unit = get_optional(&record, &header_map, "unit")
            .unwrap_or("")
            .to_string();

        let deliveries = match get_field(&record, shipments_col) {
            None => 1.0,
            cell => match parse_opt_f64(cell) {
                Some(v) => v,
                None => {
                    row_issues.push(RowIssue {
                        line,
                        item: ingredient,
                        message: "Unparseable `shipments` value.".to_string(),
                    });
                    continue;
                }
            },
        };

        let frequency = parse_frequency(get_optional(&record, &header_map, "frequency"));

        records.push(ShipmentRecord {
            ingredient,
            quantity,
            unit,
            deliveries,
            frequency,
        });
    }

    Ok(ShipmentsTable {
        records,
        rows_read,
        row_issues,
    })
}

fn parse_frequency(cell: Option<&str>) -> Frequency {
    match cell.map(str::to_ascii_lowercase).as_deref() {
        Some("weekly") => Frequency::Weekly,
        Some("biweekly") => Frequency::Biweekly,
        Some("monthly") => Frequency::Monthly,
        _ => Frequency::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_fixture(name: &str, content: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("larder-ship-{}-{name}", std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_schedule_and_applies_aliases() {
        let path = write_fixture(
            "basic.csv",
            "Ingredient,Quantity,Unit,Shipments,Frequency\n\
             rice(g),50,lbs,2,weekly\n\
             Green Onion,3,lbs,1,biweekly\n",
        );
        let aliases = HashMap::from([("rice(g)".to_string(), "Rice(g)".to_string())]);

        let table = read_shipments_csv(&path, &aliases).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].ingredient, "Rice(g)");
        assert_eq!(table.records[0].frequency, Frequency::Weekly);
        assert_eq!(table.records[0].deliveries, 2.0);
        assert_eq!(table.records[1].ingredient, "Green Onion");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn shipments_column_accepts_long_spelling() {
        let path = write_fixture(
            "longcol.csv",
            "Ingredient,Quantity,Unit,Number of Shipments,Frequency\nEgg,30,count,3,weekly\n",
        );

        let table = read_shipments_csv(&path, &HashMap::new()).unwrap();
        assert_eq!(table.records[0].deliveries, 3.0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_frequency_parses_as_unknown() {
        let path = write_fixture(
            "freq.csv",
            "Ingredient,Quantity,Unit,Shipments,Frequency\nEgg,30,count,1,fortnightly\n",
        );

        let table = read_shipments_csv(&path, &HashMap::new()).unwrap();
        assert_eq!(table.records[0].frequency, Frequency::Unknown);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn bad_quantity_rows_are_reported_and_dropped() {
        let path = write_fixture(
            "badqty.csv",
            "Ingredient,Quantity,Unit,Shipments,Frequency\nEgg,many,count,1,weekly\n",
        );

        let table = read_shipments_csv(&path, &HashMap::new()).unwrap();
        assert!(table.records.is_empty());
        assert_eq!(table.rows_read, 1);
        assert_eq!(table.row_issues.len(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_columns_are_an_input_error() {
        let path = write_fixture("cols.csv", "Ingredient,Quantity\nEgg,30\n");

        let err = read_shipments_csv(&path, &HashMap::new()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("unit"));

        std::fs::remove_file(&path).ok();
    }
}
