//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - aggregation/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{FactorTable, ForecastPlan, IngredientForecast, TrendKind, UsageHistory};
use crate::usage::MonthInventory;

/// Format the run header: target, sources, and how much data survived.
pub fn format_run_summary(
    plan: &ForecastPlan,
    factors: &FactorTable,
    history: &UsageHistory,
) -> String {
    let mut out = String::new();

    out.push_str("=== larder - Ingredient Usage Forecast ===\n");
    out.push_str(&format!("Target month: {} (index 0)\n", plan.target_month));
    out.push_str(&format!(
        "Factor table: {} ({} items)\n",
        plan.factor_table.display(),
        factors.factors.len()
    ));
    out.push_str(&format!(
        "Months: {} computed, {} skipped (of {} configured)\n",
        history.months.len(),
        history.skipped.len(),
        plan.months.len()
    ));
    out.push_str(&format!("Tracked: {}\n", history.tracked.join(", ")));

    out
}

/// Format the per-month usage table (one ingredient column per tracked slot).
pub fn format_usage_table(history: &UsageHistory) -> String {
    let mut out = String::new();

    out.push_str("Monthly usage:\n");
    let mut header = format!("{:<12} {:>5} {:>13}", "month", "index", "rows");
    for name in &history.tracked {
        header.push_str(&format!(" {:>14}", truncate(name, 14)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for month in &history.months {
        let mut line = format!(
            "{:<12} {:>5} {:>13}",
            truncate(&month.month, 12),
            month.index,
            format!("{}/{}", month.rows_matched, month.rows_read),
        );
        for total in &month.totals {
            line.push_str(&format!(" {:>14}", fmt_thousands(*total, 1)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    for skip in &history.skipped {
        out.push_str(&format!(
            "{:<12} {:>5}       (skipped: {})\n",
            truncate(&skip.month, 12),
            skip.index,
            skip.reason.describe()
        ));
    }

    out
}

/// Format data-quality findings, or an empty string when the inputs were clean.
pub fn format_data_issues(factors: &FactorTable, history: &UsageHistory) -> String {
    let mut out = String::new();

    if !factors.row_issues.is_empty() {
        out.push_str(&format!("Factor table issues ({}):\n", factors.row_issues.len()));
        push_issue_lines(&mut out, &factors.row_issues);
    }

    for month in &history.months {
        if !month.row_issues.is_empty() {
            out.push_str(&format!("{} issues ({}):\n", month.month, month.row_issues.len()));
            push_issue_lines(&mut out, &month.row_issues);
        }
        let unmatched = month.rows_read.saturating_sub(month.rows_matched);
        if unmatched > 0 {
            out.push_str(&format!(
                "{}: {unmatched} of {} sales rows matched no factor row and were excluded.\n",
                month.month, month.rows_read
            ));
        }
    }

    out
}

const MAX_ISSUE_LINES: usize = 5;

fn push_issue_lines(out: &mut String, issues: &[crate::domain::RowIssue]) {
    for issue in issues.iter().take(MAX_ISSUE_LINES) {
        if issue.item.is_empty() {
            out.push_str(&format!("  line {}: {}\n", issue.line, issue.message));
        } else {
            out.push_str(&format!(
                "  line {} ({}): {}\n",
                issue.line,
                truncate(&issue.item, 24),
                issue.message
            ));
        }
    }
    if issues.len() > MAX_ISSUE_LINES {
        out.push_str(&format!("  (+{} more)\n", issues.len() - MAX_ISSUE_LINES));
    }
}

/// Format the forecast table.
pub fn format_forecast_table(target_month: &str, forecasts: &[IngredientForecast]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Predicted {target_month} usage:\n"));
    out.push_str(
        format!("{:<24} {:>14} {:<12} {:>6}\n", "ingredient", "predicted", "model", "months")
            .trim_end(),
    );
    out.push('\n');

    for f in forecasts {
        let mut line = format!(
            "{:<24} {:>14} {:<12} {:>6}",
            truncate(&f.ingredient, 24),
            fmt_thousands(f.predicted, 2),
            f.trend.display_name(),
            f.observations,
        );
        if f.raw < 0.0 {
            line.push_str(&format!("   (clamped from {})", fmt_thousands(f.raw, 2)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if forecasts.iter().any(|f| f.trend == TrendKind::Insufficient) {
        out.push_str(
            "Note: `insufficient` rows had fewer than 2 observed months; 0 is a placeholder, \
             not a fitted value.\n",
        );
    }

    out
}

/// Format the inventory + reorder section.
pub fn format_inventory(inventory: &MonthInventory) -> String {
    let mut out = String::new();

    out.push_str(&format!("Inventory for {} (purchased vs used):\n", inventory.month));
    out.push_str(
        format!("{:<24} {:>14} {:>14} {:>14}\n", "ingredient", "purchased", "used", "net")
            .trim_end(),
    );
    out.push('\n');
    for level in &inventory.levels {
        out.push_str(&format!(
            "{:<24} {:>14} {:>14} {:>14}\n",
            truncate(&level.ingredient, 24),
            fmt_thousands(level.purchased, 1),
            fmt_thousands(level.used, 1),
            fmt_thousands(level.net, 1),
        ));
    }

    if !inventory.advice.is_empty() {
        out.push_str("\nReorder outlook (most urgent first):\n");
        out.push_str(
            format!(
                "{:<24} {:>14} {:>10} {:>10} {:<16}\n",
                "ingredient", "stock", "avg/day", "days left", "status"
            )
            .trim_end(),
        );
        out.push('\n');
        for advice in &inventory.advice {
            let days = if advice.days_left.is_finite() {
                format!("{}", advice.days_left.floor() as i64)
            } else {
                "n/a".to_string()
            };
            out.push_str(&format!(
                "{:<24} {:>14} {:>10} {:>10} {:<16}\n",
                truncate(&advice.ingredient, 24),
                fmt_thousands(advice.end_of_month_stock, 0),
                format!("{:.2}", advice.avg_daily_usage),
                days,
                advice.status.display_name(),
            ));
        }
    }

    out
}

/// Group an integer-and-fraction rendering with thousands separators.
pub fn fmt_thousands(v: f64, decimals: usize) -> String {
    let formatted = format!("{v:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let negative = int_part.starts_with('-');
    let digits = if negative { &int_part[1..] } else { int_part };

    let mut grouped = String::new();
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthlyUsage, TrendKind};

    #[test]
    fn thousands_grouping() {
        assert_eq!(fmt_thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(fmt_thousands(999.0, 0), "999");
        assert_eq!(fmt_thousands(1000.0, 0), "1,000");
        assert_eq!(fmt_thousands(-1234.5, 1), "-1,234.5");
        assert_eq!(fmt_thousands(0.0, 2), "0.00");
    }

    #[test]
    fn forecast_table_marks_clamped_rows() {
        let forecasts = vec![
            IngredientForecast {
                ingredient: "Rice(g)".to_string(),
                predicted: 182_000.25,
                raw: 182_000.25,
                trend: TrendKind::Quadratic,
                observations: 4,
            },
            IngredientForecast {
                ingredient: "Peas(g)".to_string(),
                predicted: 0.0,
                raw: -12.5,
                trend: TrendKind::Quadratic,
                observations: 4,
            },
        ];

        let table = format_forecast_table("May", &forecasts);
        assert!(table.contains("Predicted May usage:"));
        assert!(table.contains("182,000.25"));
        assert!(table.contains("quadratic"));
        assert!(table.contains("(clamped from -12.50)"));
        assert!(!table.contains("placeholder"));
    }

    #[test]
    fn forecast_table_notes_placeholder_zeros() {
        let forecasts = vec![IngredientForecast {
            ingredient: "Egg".to_string(),
            predicted: 0.0,
            raw: 0.0,
            trend: TrendKind::Insufficient,
            observations: 1,
        }];

        let table = format_forecast_table("May", &forecasts);
        assert!(table.contains("insufficient"));
        assert!(table.contains("placeholder"));
    }

    #[test]
    fn usage_table_lists_skipped_months() {
        use crate::domain::{SkipReason, SkippedMonth};

        let history = UsageHistory {
            tracked: vec!["Egg".to_string()],
            months: vec![MonthlyUsage {
                month: "June".to_string(),
                index: 1,
                totals: vec![720.0],
                rows_read: 25,
                rows_matched: 25,
                row_issues: vec![],
            }],
            skipped: vec![SkippedMonth {
                month: "October".to_string(),
                index: 5,
                reason: SkipReason::SourceMissing,
            }],
        };

        let table = format_usage_table(&history);
        assert!(table.contains("June"));
        assert!(table.contains("25/25"));
        assert!(table.contains("October"));
        assert!(table.contains("sales file not found"));
    }

    #[test]
    fn data_issue_lines_are_capped() {
        use crate::domain::RowIssue;

        let factors = FactorTable {
            tracked: vec!["Egg".to_string()],
            factors: std::collections::HashMap::new(),
            rows_read: 10,
            row_issues: (0..8)
                .map(|i| RowIssue {
                    line: i + 2,
                    item: String::new(),
                    message: "bad row".to_string(),
                })
                .collect(),
        };
        let history = UsageHistory {
            tracked: vec!["Egg".to_string()],
            months: vec![],
            skipped: vec![],
        };

        let text = format_data_issues(&factors, &history);
        assert!(text.contains("Factor table issues (8):"));
        assert!(text.contains("(+3 more)"));
    }
}
