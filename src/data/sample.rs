//! Synthetic demo dataset generation.
//!
//! `larder demo` writes a small bakery dataset to disk (a factor table, one
//! sales CSV per month, a shipment schedule, and a plan that ties them
//! together) and then runs the normal pipeline on it. The generated data
//! deliberately includes the rough edges the pipeline tolerates: an
//! aggregated-granularity month, a sales row with a non-numeric count, a
//! blank item name, and an item that matches no factor row.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Month, Utc};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{ForecastPlan, Granularity, MonthSpec};
use crate::error::AppError;
use crate::io::write_plan;

/// Ingredient columns of the generated factor table.
const TRACKED: [&str; 4] = ["Flour (g)", "Sugar (g)", "Butter (g)", "Chocolate (g)"];

/// Menu items with per-unit ingredient factors (grams) and a monthly base count.
const MENU: [(&str, [f64; 4], f64); 6] = [
    ("Butter Croissant", [55.0, 6.0, 30.0, 0.0], 620.0),
    ("Chocolate Croissant", [55.0, 8.0, 30.0, 20.0], 540.0),
    ("Sourdough Loaf", [500.0, 0.0, 0.0, 0.0], 180.0),
    ("Chocolate Cake Slice", [35.0, 40.0, 25.0, 45.0], 260.0),
    ("Blueberry Muffin", [60.0, 35.0, 20.0, 0.0], 410.0),
    ("Double Choc Cookie", [25.0, 20.0, 15.0, 30.0], 480.0),
];

/// Month-over-month growth applied to every base count.
const TREND_PER_MONTH: f64 = 0.04;

/// Noise standard deviation as a fraction of the base count.
const NOISE_FRACTION: f64 = 0.08;

/// What `generate_demo` wrote to disk.
#[derive(Debug, Clone)]
pub struct DemoDataset {
    pub plan_path: PathBuf,
    pub files_written: usize,
}

/// Month of the current date, used as the demo's forecast target.
pub fn current_month() -> Month {
    Month::try_from(Utc::now().month() as u8).unwrap_or(Month::January)
}

/// Write a complete demo dataset under `out_dir` and return the plan path.
///
/// `target` is the forecast target (time index 0); history months take the
/// `month_count` names after it. When four or more months are requested, the
/// last one is written grouped-by-category and marked as such in the plan.
pub fn generate_demo(
    out_dir: &Path,
    seed: u64,
    month_count: usize,
    target: Month,
) -> Result<DemoDataset, AppError> {
    if !(2..=12).contains(&month_count) {
        return Err(AppError::input("Demo months must be between 2 and 12."));
    }

    fs::create_dir_all(out_dir).map_err(|e| {
        AppError::input(format!("Failed to create demo directory '{}': {e}", out_dir.display()))
    })?;

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::internal(format!("Noise distribution error: {e}")))?;

    let mut files_written = 0;

    write_factor_table(&out_dir.join("ingredients.csv"))?;
    files_written += 1;

    let group_month = if month_count >= 4 { month_count } else { 0 };

    let mut months = Vec::with_capacity(month_count);
    for index in 1..=month_count {
        let month = month_after(target, index);
        let file_name = format!("{}_items.csv", month.name());
        let path = out_dir.join(&file_name);

        let granularity = if index == group_month {
            write_group_csv(&path)?;
            Granularity::Group
        } else {
            write_sales_csv(&path, index, &mut rng, &normal)?;
            Granularity::Item
        };
        files_written += 1;

        months.push(MonthSpec {
            month: month.name().to_string(),
            index: index as i64,
            source: PathBuf::from(file_name),
            granularity,
        });
    }

    write_shipments_csv(&out_dir.join("shipments.csv"))?;
    files_written += 1;

    let plan = ForecastPlan {
        target_month: target.name().to_string(),
        tracked_ingredients: TRACKED.iter().map(|s| s.to_string()).collect(),
        factor_table: PathBuf::from("ingredients.csv"),
        months,
        shipments: Some(PathBuf::from("shipments.csv")),
        ingredient_aliases: [
            ("ap flour", "Flour (g)"),
            ("cane sugar", "Sugar (g)"),
            ("european butter", "Butter (g)"),
            ("dark chocolate", "Chocolate (g)"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    };

    let plan_path = out_dir.join("plan.json");
    write_plan(&plan_path, &plan)?;
    files_written += 1;

    Ok(DemoDataset {
        plan_path,
        files_written,
    })
}

fn month_after(start: Month, offset: usize) -> Month {
    let mut month = start;
    for _ in 0..offset {
        month = month.succ();
    }
    month
}

fn write_factor_table(path: &Path) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "Item Name,{}", TRACKED.join(",")).map_err(write_err(path))?;
    for (item, factors, _) in MENU {
        let cells: Vec<String> = factors.iter().map(|f| format!("{f}")).collect();
        writeln!(file, "{item},{}", cells.join(",")).map_err(write_err(path))?;
    }

    Ok(())
}

fn write_sales_csv(
    path: &Path,
    index: usize,
    rng: &mut StdRng,
    normal: &Normal<f64>,
) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "Item Name,Count").map_err(write_err(path))?;
    for (item, _, base) in MENU {
        let trend = base * (1.0 + TREND_PER_MONTH * index as f64);
        let noise = normal.sample(rng) * base * NOISE_FRACTION;
        let count = (trend + noise).round().max(0.0) as i64;
        writeln!(file, "{item},{count}").map_err(write_err(path))?;
    }

    // Rows the pipeline has to tolerate rather than use.
    let special: i64 = rng.gen_range(40..=120);
    writeln!(file, "Seasonal Special,{special}").map_err(write_err(path))?;
    if index == 1 {
        writeln!(file, ",12").map_err(write_err(path))?;
        writeln!(file, "Blueberry Muffin,n/a").map_err(write_err(path))?;
    }

    Ok(())
}

fn write_group_csv(path: &Path) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "Group Name,Count").map_err(write_err(path))?;
    writeln!(file, "Pastries,1420").map_err(write_err(path))?;
    writeln!(file, "Breads,210").map_err(write_err(path))?;
    writeln!(file, "Cakes & Cookies,760").map_err(write_err(path))?;

    Ok(())
}

fn write_shipments_csv(path: &Path) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "Ingredient,Quantity,Unit,Shipments,Frequency").map_err(write_err(path))?;
    writeln!(file, "AP Flour,50,lbs,2,weekly").map_err(write_err(path))?;
    writeln!(file, "Cane Sugar,25,lbs,1,weekly").map_err(write_err(path))?;
    writeln!(file, "European Butter,36000,g,1,biweekly").map_err(write_err(path))?;
    writeln!(file, "Dark Chocolate,10000,g,2,monthly").map_err(write_err(path))?;
    writeln!(file, "Vanilla Extract,4,lbs,1,as-needed").map_err(write_err(path))?;

    Ok(())
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> AppError + '_ {
    move |e| AppError::input(format!("Failed to write '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("larder-demo-{tag}-{}", std::process::id()))
    }

    #[test]
    fn demo_dataset_round_trips_through_the_pipeline() {
        let dir = temp_dir("roundtrip");
        let dataset = generate_demo(&dir, 7, 6, Month::May).unwrap();
        assert_eq!(dataset.files_written, 9); // factors + 6 months + shipments + plan

        let config = crate::domain::RunConfig {
            plan_path: dataset.plan_path,
            chart: None,
            chart_width: 1200,
            chart_height: 600,
            export_usage: None,
            export_forecast: None,
        };
        let run = crate::app::pipeline::run_forecast(&config).unwrap();

        // 6 requested months: 5 item-level + 1 grouped (skipped).
        assert_eq!(run.history.months.len(), 5);
        assert_eq!(run.history.skipped.len(), 1);
        assert_eq!(run.history.skipped[0].month, "November");

        // Every tracked ingredient gets a finite, non-negative forecast.
        assert_eq!(run.forecasts.len(), 4);
        for f in &run.forecasts {
            assert!(f.predicted.is_finite() && f.predicted >= 0.0);
        }

        // Shipments are configured, so the inventory supplement is present.
        let inventory = run.inventory.unwrap();
        assert_eq!(inventory.month, "October");
        assert!(!inventory.levels.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn same_seed_writes_identical_sales() {
        let dir_a = temp_dir("seed-a");
        let dir_b = temp_dir("seed-b");
        generate_demo(&dir_a, 11, 4, Month::January).unwrap();
        generate_demo(&dir_b, 11, 4, Month::January).unwrap();

        let a = std::fs::read_to_string(dir_a.join("February_items.csv")).unwrap();
        let b = std::fs::read_to_string(dir_b.join("February_items.csv")).unwrap();
        assert_eq!(a, b);

        std::fs::remove_dir_all(&dir_a).ok();
        std::fs::remove_dir_all(&dir_b).ok();
    }

    #[test]
    fn small_demo_has_no_group_month() {
        let dir = temp_dir("small");
        generate_demo(&dir, 3, 3, Month::May).unwrap();

        let plan = crate::io::read_plan(&dir.join("plan.json")).unwrap();
        assert!(plan.months.iter().all(|m| m.granularity == Granularity::Item));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn month_count_is_validated() {
        let dir = temp_dir("invalid");
        let err = generate_demo(&dir, 1, 1, Month::May).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = generate_demo(&dir, 1, 13, Month::May).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
