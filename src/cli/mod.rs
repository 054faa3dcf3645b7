//! Command-line parsing for the ingredient-usage forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation/fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "larder", version, about = "Ingredient usage aggregation & trend forecasting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate monthly sales into ingredient usage, fit trends, and forecast
    /// the target month.
    Forecast(ForecastArgs),
    /// Re-render the trend chart from a previously exported forecast JSON.
    Plot(PlotArgs),
    /// Write a synthetic sample dataset to disk and forecast it end-to-end.
    Demo(DemoArgs),
}

/// Options for a forecast run.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Forecast plan JSON (target month, tracked ingredients, month sources).
    #[arg(short = 'p', long, value_name = "JSON", default_value = "plan.json")]
    pub plan: PathBuf,

    /// Render the trend chart to this SVG file.
    #[arg(long, value_name = "SVG")]
    pub chart: Option<PathBuf>,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1200)]
    pub chart_width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 600)]
    pub chart_height: u32,

    /// Export the monthly usage table to CSV.
    #[arg(long = "export-usage", value_name = "CSV")]
    pub export_usage: Option<PathBuf>,

    /// Export the full forecast bundle (months + predictions) to JSON.
    #[arg(long = "export-forecast", value_name = "JSON")]
    pub export_forecast: Option<PathBuf>,
}

/// Options for re-plotting a saved forecast.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Forecast JSON produced by `larder forecast --export-forecast`.
    #[arg(long, value_name = "JSON")]
    pub forecast: PathBuf,

    /// Output SVG path.
    #[arg(long, value_name = "SVG", default_value = "forecast.svg")]
    pub out: PathBuf,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1200)]
    pub chart_width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 600)]
    pub chart_height: u32,
}

/// Options for the demo dataset generator.
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Directory to write the generated plan, factor table, and sales files into.
    #[arg(long, value_name = "DIR", default_value = "larder-demo")]
    pub out_dir: PathBuf,

    /// Random seed for the generated sales volumes.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of historical months to generate (the forecast target is extra).
    #[arg(long, default_value_t = 6)]
    pub months: usize,

    /// Render the trend chart for the generated dataset to this SVG file.
    #[arg(long, value_name = "SVG")]
    pub chart: Option<PathBuf>,
}
