//! Per-month usage aggregation.
//!
//! For each month in the plan this module joins the sales rows against the
//! factor table and totals ingredient consumption:
//!
//! ```text
//! total[ingredient] = Σ over joined items (count × factor[item][ingredient])
//! ```
//!
//! A month that cannot be computed is recorded as skipped, never fabricated:
//! group-granularity exports have no item names to join on, missing files may
//! simply not have been exported yet, and malformed files should be visible in
//! the report instead of contributing zeros to the trend. Even when every
//! month is skipped the history is still returned; the fit then has nothing
//! to work with and forecasts zero for every ingredient.
//!
//! Sales rows whose item has no factor row contribute nothing (inner join);
//! `rows_matched` makes the excluded volume visible.

use crate::domain::{
    FactorTable, ForecastPlan, Granularity, MonthSpec, MonthlyUsage, SkipReason, SkippedMonth,
    UsageHistory,
};
use crate::io::sales::{SalesReadError, read_sales_csv};

/// Aggregate a single month, or say why it cannot be.
pub fn aggregate_month(
    spec: &MonthSpec,
    factors: &FactorTable,
) -> Result<MonthlyUsage, SkipReason> {
    if spec.granularity == Granularity::Group {
        return Err(SkipReason::AggregatedGranularity);
    }

    let table = match read_sales_csv(&spec.source) {
        Ok(t) => t,
        Err(SalesReadError::Missing) => return Err(SkipReason::SourceMissing),
        Err(SalesReadError::Malformed(detail)) => return Err(SkipReason::Malformed(detail)),
    };

    let mut totals = vec![0.0; factors.tracked.len()];
    let mut rows_matched = 0usize;

    for record in &table.records {
        let Some(row) = factors.factors.get(&record.item) else {
            continue;
        };
        rows_matched += 1;
        for (slot, factor) in row.iter().enumerate() {
            totals[slot] += record.count * factor;
        }
    }

    Ok(MonthlyUsage {
        month: spec.month.clone(),
        index: spec.index,
        totals,
        rows_read: table.rows_read,
        rows_matched,
        row_issues: table.row_issues,
    })
}

/// Aggregate every plan month into a usage history.
pub fn aggregate_history(plan: &ForecastPlan, factors: &FactorTable) -> UsageHistory {
    let mut months = Vec::new();
    let mut skipped = Vec::new();

    for spec in &plan.months {
        match aggregate_month(spec, factors) {
            Ok(usage) => months.push(usage),
            Err(reason) => skipped.push(SkippedMonth {
                month: spec.month.clone(),
                index: spec.index,
                reason,
            }),
        }
    }

    // Plan order is presentation order; the trend wants the time axis.
    months.sort_by_key(|m| m.index);

    UsageHistory {
        tracked: factors.tracked.clone(),
        months,
        skipped,
    }
}
