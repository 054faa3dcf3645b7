//! Shared "forecast pipeline" logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! plan read -> factor load -> monthly aggregation -> trend fits -> bundle
//!
//! The command handlers can then focus on presentation (printing vs files).

use chrono::Utc;

use crate::domain::{
    FactorTable, ForecastFile, ForecastPlan, IngredientForecast, MonthlyUsage, RunConfig,
    UsageHistory,
};
use crate::error::AppError;
use crate::usage::MonthInventory;

/// All computed outputs of a single `larder forecast` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub plan: ForecastPlan,
    pub factors: FactorTable,
    pub history: UsageHistory,
    pub forecasts: Vec<IngredientForecast>,
    pub inventory: Option<MonthInventory>,
    pub bundle: ForecastFile,
}

/// Execute the full forecast pipeline and return the computed outputs.
pub fn run_forecast(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Read and validate the plan.
    let plan = crate::io::read_plan(&config.plan_path)?;

    run_forecast_with_plan(plan)
}

/// Execute the pipeline with an already-loaded plan.
pub fn run_forecast_with_plan(plan: ForecastPlan) -> Result<RunOutput, AppError> {
    // 2) Load the factor table for the tracked ingredients.
    let factors = crate::io::load_factor_table(&plan.factor_table, &plan.tracked_ingredients)?;

    // 3) Aggregate every configured month (skip-and-continue on bad sources).
    let history = crate::usage::aggregate_history(&plan, &factors);

    // 4) Fit per-ingredient trends and forecast the target month.
    let forecasts = crate::fit::forecast_usage(&history)?;

    // 5) Optional shipment supplement: inventory + reorder advice for the
    //    latest computed month.
    let inventory = match &plan.shipments {
        Some(path) => {
            let table = crate::io::read_shipments_csv(path, &plan.ingredient_aliases)?;
            latest_month(&history)
                .map(|month| crate::usage::analyze_month(&table.records, month, &history.tracked))
        }
        None => None,
    };

    let bundle = crate::io::forecast_file(
        &plan.target_month,
        &history,
        &forecasts,
        Utc::now().date_naive(),
    );

    Ok(RunOutput {
        plan,
        factors,
        history,
        forecasts,
        inventory,
        bundle,
    })
}

/// The most recent computed month (highest time index).
fn latest_month(history: &UsageHistory) -> Option<&MonthlyUsage> {
    // Months are sorted by index ascending after aggregation.
    history.months.last()
}
