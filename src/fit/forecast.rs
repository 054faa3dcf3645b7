//! Target-month forecasting.
//!
//! Each tracked ingredient contributes a short series of (time index, total)
//! points, one per usable month. The model rung is dictated by how many months
//! survived aggregation:
//!
//! - 3 or more: quadratic fit, evaluated at index 0
//! - exactly 2: straight line, evaluated at index 0 (the intercept)
//! - fewer:     no trend to extract; the forecast is 0
//!
//! A quadratic that cannot be solved (near-singular design matrix) degrades to
//! the linear rung rather than failing the run. Every forecast is clamped at
//! 0: a falling trend can extrapolate below zero, and negative usage has no
//! physical meaning.

use rayon::prelude::*;

use crate::domain::{IngredientForecast, TrendKind, UsageHistory};
use crate::error::AppError;
use crate::fit::poly;

/// Fit one series and evaluate it at the target index 0.
///
/// Returns the unclamped model value and the rung that produced it.
fn fit_series(xs: &[f64], ys: &[f64]) -> (f64, TrendKind) {
    if xs.len() >= 3 {
        if let Some(coeffs) = poly::polyfit(xs, ys, 2) {
            return (poly::eval(&coeffs, 0.0), TrendKind::Quadratic);
        }
    }
    if xs.len() >= 2 {
        if let Some(coeffs) = poly::polyfit(xs, ys, 1) {
            return (poly::eval(&coeffs, 0.0), TrendKind::Linear);
        }
    }
    (0.0, TrendKind::Insufficient)
}

/// Forecast the target month for every tracked ingredient.
///
/// History indices must be positive: index 0 is the forecast target itself,
/// so an observed month sitting at 0 means the plan wiring upstream is broken.
pub fn forecast_usage(history: &UsageHistory) -> Result<Vec<IngredientForecast>, AppError> {
    if let Some(m) = history.months.iter().find(|m| m.index == 0) {
        return Err(AppError::internal(format!(
            "Month '{}' carries time index 0, which is reserved for the forecast target.",
            m.month
        )));
    }

    // Ingredients are independent fits; rayon preserves input order through
    // collect, so the output still follows the tracked list.
    let forecasts: Vec<IngredientForecast> = history
        .tracked
        .par_iter()
        .enumerate()
        .map(|(slot, ingredient)| {
            let (xs, ys): (Vec<f64>, Vec<f64>) = history
                .series(slot)
                .into_iter()
                .map(|(index, total)| (index as f64, total))
                .unzip();
            let (raw, trend) = fit_series(&xs, &ys);
            IngredientForecast {
                ingredient: ingredient.clone(),
                predicted: raw.max(0.0),
                raw,
                trend,
                observations: xs.len(),
            }
        })
        .collect();

    Ok(forecasts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MonthlyUsage;

    fn history(tracked: &[&str], points: &[(&str, i64, Vec<f64>)]) -> UsageHistory {
        UsageHistory {
            tracked: tracked.iter().map(|s| s.to_string()).collect(),
            months: points
                .iter()
                .map(|(month, index, totals)| MonthlyUsage {
                    month: month.to_string(),
                    index: *index,
                    totals: totals.clone(),
                    rows_read: totals.len(),
                    rows_matched: totals.len(),
                    row_issues: vec![],
                })
                .collect(),
            skipped: vec![],
        }
    }

    #[test]
    fn quadratic_forecast_is_constant_term() {
        // y = 100 + 10x + 5x^2 at x = 1..4; the value at 0 is 100.
        let series: Vec<f64> = (1..=4)
            .map(|x| 100.0 + 10.0 * x as f64 + 5.0 * (x * x) as f64)
            .collect();
        let h = history(
            &["Rice(g)"],
            &[
                ("June", 1, vec![series[0]]),
                ("July", 2, vec![series[1]]),
                ("August", 3, vec![series[2]]),
                ("September", 4, vec![series[3]]),
            ],
        );

        let out = forecast_usage(&h).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].trend, TrendKind::Quadratic);
        assert_eq!(out[0].observations, 4);
        assert!((out[0].predicted - 100.0).abs() < 1e-6);
    }

    #[test]
    fn negative_extrapolation_clamps_to_zero() {
        // A peaked series whose quadratic dips below zero at index 0:
        // (1,10) (2,20) (3,10) fits -20 + 40x - 10x^2.
        let h = history(
            &["Peas(g)"],
            &[
                ("June", 1, vec![10.0]),
                ("July", 2, vec![20.0]),
                ("August", 3, vec![10.0]),
            ],
        );

        let out = forecast_usage(&h).unwrap();
        assert_eq!(out[0].trend, TrendKind::Quadratic);
        assert!((out[0].raw - (-20.0)).abs() < 1e-8);
        assert_eq!(out[0].predicted, 0.0);
    }

    #[test]
    fn two_months_fall_back_to_linear_intercept() {
        // (1,30) (2,20): slope -10, intercept 40.
        let h = history(&["Flour (g)"], &[("June", 1, vec![30.0]), ("July", 2, vec![20.0])]);

        let out = forecast_usage(&h).unwrap();
        assert_eq!(out[0].trend, TrendKind::Linear);
        assert!((out[0].predicted - 40.0).abs() < 1e-9);
    }

    #[test]
    fn one_month_yields_zero_forecast() {
        let h = history(&["Egg"], &[("June", 1, vec![500.0])]);

        let out = forecast_usage(&h).unwrap();
        assert_eq!(out[0].trend, TrendKind::Insufficient);
        assert_eq!(out[0].predicted, 0.0);
        assert_eq!(out[0].observations, 1);
    }

    #[test]
    fn empty_history_yields_zero_forecasts_for_all_tracked() {
        let h = history(&["Rice(g)", "Egg"], &[]);

        let out = forecast_usage(&h).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|f| f.predicted == 0.0));
        assert!(out.iter().all(|f| f.trend == TrendKind::Insufficient));
    }

    #[test]
    fn month_at_target_index_is_rejected() {
        let h = history(&["Rice(g)"], &[("May", 0, vec![1.0])]);

        let err = forecast_usage(&h).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn output_order_follows_tracked_list() {
        let h = history(
            &["Zucchini", "Apple", "Miso"],
            &[
                ("June", 1, vec![1.0, 2.0, 3.0]),
                ("July", 2, vec![1.0, 2.0, 3.0]),
            ],
        );

        let out = forecast_usage(&h).unwrap();
        let names: Vec<&str> = out.iter().map(|f| f.ingredient.as_str()).collect();
        assert_eq!(names, vec!["Zucchini", "Apple", "Miso"]);
    }
}
