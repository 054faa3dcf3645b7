//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the plan, factor table, and monthly sales sources
//! - aggregates usage and fits per-ingredient trends
//! - prints the report
//! - writes optional chart/export files

use clap::Parser;

use crate::cli::{Command, DemoArgs, ForecastArgs, PlotArgs};
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `larder` binary.
pub fn run() -> Result<(), AppError> {
    // We want `larder` and `larder --plan menu/plan.json` to behave like
    // `larder forecast ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Plot(args) => handle_plot(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    run_and_report(&config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let bundle = crate::io::read_forecast_json(&args.forecast)?;
    crate::plot::render_forecast_chart(&bundle, &args.out, args.chart_width, args.chart_height)?;

    println!("Chart written to {}", args.out.display());
    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let target = crate::data::current_month();
    let dataset = crate::data::generate_demo(&args.out_dir, args.seed, args.months, target)?;

    println!("Demo dataset: {} files under {}", dataset.files_written, args.out_dir.display());
    println!();

    let config = RunConfig {
        plan_path: dataset.plan_path,
        chart: args.chart,
        chart_width: 1200,
        chart_height: 600,
        export_usage: None,
        export_forecast: None,
    };
    run_and_report(&config)
}

/// Run the pipeline for `config` and print the full report.
fn run_and_report(config: &RunConfig) -> Result<(), AppError> {
    let run = pipeline::run_forecast(config)?;

    println!("{}", crate::report::format_run_summary(&run.plan, &run.factors, &run.history));
    println!("{}", crate::report::format_usage_table(&run.history));

    let issues = crate::report::format_data_issues(&run.factors, &run.history);
    if !issues.is_empty() {
        println!("{issues}");
    }

    println!("{}", crate::report::format_forecast_table(&run.plan.target_month, &run.forecasts));

    if let Some(inventory) = &run.inventory {
        println!("{}", crate::report::format_inventory(inventory));
    }

    // Optional exports.
    if let Some(path) = &config.export_usage {
        crate::io::write_usage_csv(path, &run.history)?;
    }
    if let Some(path) = &config.export_forecast {
        crate::io::write_forecast_json(path, &run.bundle)?;
    }
    if let Some(path) = &config.chart {
        crate::plot::render_forecast_chart(
            &run.bundle,
            path,
            config.chart_width,
            config.chart_height,
        )?;
        println!("Chart written to {}", path.display());
    }

    Ok(())
}

pub fn run_config_from_args(args: &ForecastArgs) -> RunConfig {
    RunConfig {
        plan_path: args.plan.clone(),
        chart: args.chart.clone(),
        chart_width: args.chart_width,
        chart_height: args.chart_height,
        export_usage: args.export_usage.clone(),
        export_forecast: args.export_forecast.clone(),
    }
}

/// Rewrite argv so `larder` defaults to `larder forecast`.
///
/// Rules:
/// - `larder`                     -> `larder forecast`
/// - `larder --plan x.json ...`   -> `larder forecast --plan x.json ...`
/// - `larder --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("forecast".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "forecast" | "plot" | "demo");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "forecast flags".
    if arg1.starts_with('-') {
        argv.insert(1, "forecast".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
