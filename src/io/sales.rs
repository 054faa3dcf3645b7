//! Monthly sales ingest.
//!
//! One sales file covers one month of point-of-sale exports: an item name and
//! how many of that item sold. Unlike the factor table, a broken sales file
//! must not abort the run; the caller records the month as skipped and keeps
//! going, so read failures come back as `SalesReadError` instead of an
//! `AppError`.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::{RowIssue, SalesRecord};
use crate::io::columns::{
    ITEM_SPELLINGS, build_header_map, get_field, get_optional, parse_opt_f64, resolve_column,
};

/// Why a sales file could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum SalesReadError {
    /// The file does not exist.
    Missing,
    /// The file exists but is structurally unusable.
    Malformed(String),
}

/// Parsed sales rows plus ingest diagnostics.
#[derive(Debug, Clone)]
pub struct SalesTable {
    pub records: Vec<SalesRecord>,
    pub rows_read: usize,
    pub row_issues: Vec<RowIssue>,
}

/// Read one month's sales CSV.
///
/// Count cells that fail numeric parsing are coerced to 0 rather than
/// reported; totals stay comparable across months even when a few cells hold
/// stray text.
pub fn read_sales_csv(path: &Path) -> Result<SalesTable, SalesReadError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SalesReadError::Missing
        } else {
            SalesReadError::Malformed(format!("Failed to open sales file: {e}"))
        }
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| SalesReadError::Malformed(format!("Failed to read sales headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    let Some(item_col) = resolve_column(&header_map, ITEM_SPELLINGS) else {
        return Err(SalesReadError::Malformed("Missing required column: `item name`".to_string()));
    };
    if !header_map.contains_key("count") {
        return Err(SalesReadError::Malformed("Missing required column: `count`".to_string()));
    }

    let mut records = Vec::new();
    let mut row_issues = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = (idx + 2) as u64;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // A record-level parse failure means the export itself is
                // suspect; treat the whole month as unusable rather than fit
                // a trend on half a file.
                return Err(SalesReadError::Malformed(format!(
                    "CSV parse error at line {line}: {e}"
                )));
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

        let count = parse_opt_f64(get_optional(&record, &header_map, "count")).unwrap_or(0.0);

        records.push(SalesRecord { item, count });
    }

    Ok(SalesTable {
        records,
        rows_read,
        row_issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_fixture(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("larder-sales-{}-{name}", std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_item_counts() {
        let path = write_fixture(
            "basic.csv",
            "Item Name,Count,Amount\nChicken Rice,120,600.00\nRamen,45,405.00\n",
        );

        let table = read_sales_csv(&path).unwrap();
        assert_eq!(table.rows_read, 2);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].item, "Chicken Rice");
        assert_eq!(table.records[0].count, 120.0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unparseable_counts_coerce_to_zero() {
        let path = write_fixture("coerce.csv", "Item Name,Count\nSoup,n/a\nRamen,\n");

        let table = read_sales_csv(&path).unwrap();
        assert_eq!(table.records[0].count, 0.0);
        assert_eq!(table.records[1].count, 0.0);
        assert!(table.row_issues.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn blank_item_names_are_reported_and_dropped() {
        let path = write_fixture("noitem.csv", "Item Name,Count\n,10\nRamen,5\n");

        let table = read_sales_csv(&path).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.rows_read, 2);
        assert_eq!(table.row_issues.len(), 1);
        assert_eq!(table.row_issues[0].line, 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_reads_as_missing() {
        let err = read_sales_csv(Path::new("/no/such/sales.csv")).unwrap_err();
        assert_eq!(err, SalesReadError::Missing);
    }

    #[test]
    fn missing_count_column_reads_as_malformed() {
        let path = write_fixture("nocount.csv", "Item Name,Total\nNoodles,4500\n");

        let err = read_sales_csv(&path).unwrap_err();
        match err {
            SalesReadError::Malformed(msg) => assert!(msg.contains("count")),
            other => panic!("expected Malformed, got {other:?}"),
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn grouped_export_reads_as_malformed() {
        let path = write_fixture("grouped.csv", "Group,Total\nNoodles,4500\n");

        let err = read_sales_csv(&path).unwrap_err();
        match err {
            SalesReadError::Malformed(msg) => assert!(msg.contains("item name")),
            other => panic!("expected Malformed, got {other:?}"),
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn item_column_accepts_alternate_spellings() {
        let path = write_fixture("spelling.csv", "item,count\nRamen,45\n");

        let table = read_sales_csv(&path).unwrap();
        assert_eq!(table.records[0].item, "Ramen");
        assert_eq!(table.records[0].count, 45.0);

        std::fs::remove_file(&path).ok();
    }
}
