//! Plotters-powered trend chart.
//!
//! Renders the usage history plus the target-month prediction to an SVG file
//! styled like the kitchen dashboard: dark slate background, one colored line
//! per ingredient, and the prediction highlighted in light gray with a
//! `Pred:` annotation.
//!
//! The chart is data-driven from a `ForecastFile`, so it can be rendered
//! straight after a run or later from a saved bundle without re-reading any
//! sales files.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::ForecastFile;
use crate::error::AppError;
use crate::report::fmt_thousands;

/// Dashboard background (dark slate).
const BG_COLOR: RGBColor = RGBColor(0x2d, 0x37, 0x48);
/// Prediction marker color (light gray, visible on the dark background).
const PREDICTION_COLOR: RGBColor = RGBColor(0xd3, 0xd3, 0xd3);

/// Per-ingredient line colors, cycled when the plan tracks more than eight.
const PALETTE: [RGBColor; 8] = [
    RGBColor(0x00, 0xbc, 0xd4), // cyan
    RGBColor(0xff, 0xc1, 0x07), // amber
    RGBColor(0x67, 0x3a, 0xb7), // deep purple
    RGBColor(0xe9, 0x1e, 0x63), // pink
    RGBColor(0x4c, 0xaf, 0x50), // green
    RGBColor(0xff, 0x57, 0x22), // deep orange
    RGBColor(0x03, 0xa9, 0xf4), // light blue
    RGBColor(0x8b, 0xc3, 0x4a), // light green
];

/// Render the forecast chart to `path` as SVG.
///
/// Bundles arrive through plan or forecast-JSON validation, so month indices
/// are bounded and every `totals` row matches the ingredient list.
pub fn render_forecast_chart(
    bundle: &ForecastFile,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let labels = axis_labels(bundle);
    let max_index = (labels.len() as i64 - 1).max(1);

    let y_max = max_total(bundle).max(1.0) * 1.1;

    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&BG_COLOR)
        .map_err(|e| AppError::input(format!("Failed to draw chart background: {e}")))?;

    let caption = format!("Ingredient Usage Trend and {} Prediction", bundle.target_month);

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24).into_font().color(&WHITE))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(-0.5..(max_index as f64 + 0.5), 0.0..y_max)
        .map_err(|e| AppError::input(format!("Failed to build chart: {e}")))?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Total Usage (Units/Grams/Count)")
        .x_labels(labels.len())
        .y_labels(10)
        // Subtle grid against the dark background.
        .bold_line_style(&WHITE.mix(0.15))
        .light_line_style(&TRANSPARENT)
        .x_label_formatter(&|x| month_label(&labels, *x))
        .y_label_formatter(&|y| fmt_thousands(*y, 0))
        .label_style(("sans-serif", 14).into_font().color(&WHITE))
        .axis_style(&WHITE)
        .draw()
        .map_err(|e| AppError::input(format!("Failed to draw chart mesh: {e}")))?;

    for (slot, ingredient) in bundle.ingredients.iter().enumerate() {
        let color = PALETTE[slot % PALETTE.len()];
        let points = series_points(bundle, slot);

        // A month skipped between two computed months leaves a hole in the
        // index sequence; break the line there instead of bridging the gap.
        let mut first_segment = true;
        for segment in split_segments(&points) {
            let series = chart
                .draw_series(LineSeries::new(
                    segment.iter().map(|&(i, v)| (i as f64, v)),
                    color.stroke_width(2),
                ))
                .map_err(|e| AppError::input(format!("Failed to draw series: {e}")))?;
            if first_segment {
                series
                    .label(format!("{ingredient} Trend"))
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                first_segment = false;
            }
        }

        let markers = points.iter().map(|&(i, v)| Circle::new((i as f64, v), 4, color.filled()));
        chart
            .draw_series(markers)
            .map_err(|e| AppError::input(format!("Failed to draw markers: {e}")))?;
    }

    // Highlight the predictions at index 0 and annotate each with its value.
    let prediction_points = chart
        .draw_series(bundle.predictions.iter().map(|p| {
            EmptyElement::at((0.0, p.predicted))
                + Circle::new((0, 0), 6, PREDICTION_COLOR.filled())
                + Text::new(
                    format!("Pred: {}", fmt_thousands(p.predicted, 0)),
                    (-10, -25),
                    ("sans-serif", 13).into_font().color(&WHITE),
                )
        }))
        .map_err(|e| AppError::input(format!("Failed to draw predictions: {e}")))?;
    prediction_points
        .label(format!("{} Prediction", bundle.target_month))
        .legend(|(x, y)| Circle::new((x + 10, y), 5, PREDICTION_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&BG_COLOR.mix(0.8))
        .border_style(&WHITE)
        .label_font(("sans-serif", 14).into_font().color(&WHITE))
        .draw()
        .map_err(|e| AppError::input(format!("Failed to draw legend: {e}")))?;

    root.present()
        .map_err(|e| AppError::input(format!("Failed to write chart '{}': {e}", path.display())))?;

    Ok(())
}

/// Month names by time index, slot 0 being the forecast target.
///
/// Skipped months still get an axis label so the gap in the series reads as
/// "data missing here", not "month does not exist".
fn axis_labels(bundle: &ForecastFile) -> Vec<String> {
    let max_index = bundle
        .months
        .iter()
        .map(|m| m.index)
        .chain(bundle.skipped.iter().map(|s| s.index))
        .max()
        .unwrap_or(0)
        .max(1);

    let mut labels = vec![String::new(); (max_index + 1) as usize];
    labels[0] = bundle.target_month.clone();
    for month in &bundle.months {
        labels[month.index as usize] = month.month.clone();
    }
    for skip in &bundle.skipped {
        labels[skip.index as usize] = skip.month.clone();
    }
    labels
}

fn month_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 0.25 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Largest value the y axis must accommodate.
fn max_total(bundle: &ForecastFile) -> f64 {
    bundle
        .months
        .iter()
        .flat_map(|m| m.totals.iter().copied())
        .chain(bundle.predictions.iter().map(|p| p.predicted))
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// One ingredient's chart series: the prediction at index 0 plus every
/// computed month, in index order.
fn series_points(bundle: &ForecastFile, slot: usize) -> Vec<(i64, f64)> {
    let mut points = Vec::with_capacity(bundle.months.len() + 1);
    if let Some(prediction) = bundle.predictions.get(slot) {
        points.push((0, prediction.predicted));
    }
    for month in &bundle.months {
        points.push((month.index, month.totals[slot]));
    }
    points.sort_by_key(|&(i, _)| i);
    points
}

/// Split a series into runs of consecutive indices.
fn split_segments(points: &[(i64, f64)]) -> Vec<Vec<(i64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(i64, f64)> = Vec::new();

    for &point in points {
        if let Some(&(prev, _)) = current.last() {
            if point.0 != prev + 1 {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(point);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthRecord, PredictionRecord, SkipReason, SkippedMonth, TrendKind};
    use chrono::NaiveDate;

    fn bundle() -> ForecastFile {
        ForecastFile {
            tool: "larder".to_string(),
            generated: NaiveDate::from_ymd_opt(2025, 11, 2).unwrap(),
            target_month: "May".to_string(),
            ingredients: vec!["Rice(g)".to_string()],
            months: vec![
                MonthRecord {
                    month: "June".to_string(),
                    index: 1,
                    totals: vec![100.0],
                },
                MonthRecord {
                    month: "August".to_string(),
                    index: 3,
                    totals: vec![140.0],
                },
            ],
            skipped: vec![
                SkippedMonth {
                    month: "July".to_string(),
                    index: 2,
                    reason: SkipReason::SourceMissing,
                },
                SkippedMonth {
                    month: "October".to_string(),
                    index: 5,
                    reason: SkipReason::AggregatedGranularity,
                },
            ],
            predictions: vec![PredictionRecord {
                ingredient: "Rice(g)".to_string(),
                predicted: 90.0,
                trend: TrendKind::Linear,
            }],
        }
    }

    #[test]
    fn axis_labels_cover_skipped_months_and_target() {
        let labels = axis_labels(&bundle());
        assert_eq!(labels, vec!["May", "June", "July", "August", "", "October"]);
    }

    #[test]
    fn series_includes_prediction_at_index_zero() {
        let points = series_points(&bundle(), 0);
        assert_eq!(points, vec![(0, 90.0), (1, 100.0), (3, 140.0)]);
    }

    #[test]
    fn segments_break_at_index_holes() {
        let points = vec![(0, 90.0), (1, 100.0), (3, 140.0), (4, 150.0)];
        let segments = split_segments(&points);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![(0, 90.0), (1, 100.0)]);
        assert_eq!(segments[1], vec![(3, 140.0), (4, 150.0)]);

        assert!(split_segments(&[]).is_empty());
        assert_eq!(split_segments(&[(2, 5.0)]).len(), 1);
    }

    #[test]
    fn renders_svg_file() {
        let path = std::env::temp_dir().join(format!("larder-chart-{}.svg", std::process::id()));

        render_forecast_chart(&bundle(), &path, 900, 600).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("</svg>"));

        std::fs::remove_file(&path).ok();
    }
}
