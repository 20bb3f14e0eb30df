use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::aggregate::department::DepartmentShare;
use crate::aggregate::term::TermMetric;
use crate::aggregate::trend::{TrendPoint, TrendSeries};
use crate::color::ColorMap;
use crate::data::columns;
use crate::error::Warning;

const CHART_HEIGHT: f32 = 260.0;
/// Donut hole radius relative to the outer radius.
const DONUT_HOLE: f64 = 0.70;
/// First slice starts here, counter-clockwise.
const DONUT_START_DEG: f64 = 140.0;
const DONUT_STEPS: usize = 180;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Show a panel warning in place of a chart.
pub fn warning(ui: &mut Ui, w: &Warning) {
    let color = match w {
        Warning::NoDepartmentSelected | Warning::EmptyDistribution => Color32::LIGHT_BLUE,
        _ => Color32::from_rgb(230, 170, 60),
    };
    ui.label(RichText::new(w.to_string()).color(color));
}

/// Axis formatter showing `labels[i]` at integer position `i`.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn position(labels: &[String], label: &str) -> Option<f64> {
    labels.iter().position(|l| l == label).map(|i| i as f64)
}

// ---------------------------------------------------------------------------
// Retention trend (line per term)
// ---------------------------------------------------------------------------

pub fn retention_chart(ui: &mut Ui, result: &Result<Vec<TrendSeries>, Warning>, colors: &ColorMap) {
    ui.heading("Retention trend by year and term");
    let series = match result {
        Ok(series) if series.is_empty() => {
            ui.label("No retention values for the current selection.");
            return;
        }
        Ok(series) => series,
        Err(w) => return warning(ui, w),
    };

    let mut years: Vec<String> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.year.clone()))
        .collect();
    years.sort();
    years.dedup();

    Plot::new("retention_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(columns::YEAR)
        .y_axis_label(columns::RETENTION)
        .x_axis_formatter(category_axis(years.clone()))
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for s in series {
                let name = s.term.clone().unwrap_or_else(|| columns::RETENTION.to_string());
                let color = s
                    .term
                    .as_deref()
                    .map(|t| colors.color_for(t))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let pts: Vec<[f64; 2]> = s
                    .points
                    .iter()
                    .filter_map(|p| Some([position(&years, &p.year)?, p.value]))
                    .collect();

                plot_ui.line(Line::new(PlotPoints::from(pts.clone())).name(&name).color(color).width(2.0));
                plot_ui.points(Points::new(PlotPoints::from(pts)).name(&name).color(color).radius(3.5));
            }
        });
}

// ---------------------------------------------------------------------------
// Satisfaction per year (bars)
// ---------------------------------------------------------------------------

pub fn satisfaction_chart(ui: &mut Ui, result: &Result<Vec<TrendPoint>, Warning>) {
    ui.heading("Student satisfaction by year (mean)");
    let points = match result {
        Ok(points) if points.is_empty() => {
            ui.label("No satisfaction values for the current selection.");
            return;
        }
        Ok(points) => points,
        Err(w) => return warning(ui, w),
    };

    let years: Vec<String> = points.iter().map(|p| p.year.clone()).collect();
    let bars: Vec<Bar> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Bar::new(i as f64, p.value)
                .name(&p.year)
                .width(0.6)
                .fill(Color32::from_rgb(70, 120, 190))
        })
        .collect();

    Plot::new("satisfaction_plot")
        .height(CHART_HEIGHT)
        .x_axis_label(columns::YEAR)
        .y_axis_label(columns::SATISFACTION)
        .x_axis_formatter(category_axis(years))
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(columns::SATISFACTION));
        });
}

// ---------------------------------------------------------------------------
// Term comparison (grouped bars)
// ---------------------------------------------------------------------------

pub fn term_chart(ui: &mut Ui, result: &Result<Vec<TermMetric>, Warning>, colors: &ColorMap) {
    ui.heading("Term comparison: applications, admitted, enrolled");
    let rows = match result {
        Ok(rows) if rows.is_empty() => {
            ui.label("No values to compare for the current selection.");
            return;
        }
        Ok(rows) => rows,
        Err(w) => return warning(ui, w),
    };

    let mut metrics: Vec<String> = Vec::new();
    let mut terms: Vec<String> = Vec::new();
    for r in rows {
        if !metrics.iter().any(|m| m == r.metric) {
            metrics.push(r.metric.to_string());
        }
        if !terms.contains(&r.term) {
            terms.push(r.term.clone());
        }
    }
    terms.sort();

    let group_width = 0.8;
    let bar_width = group_width / terms.len() as f64;

    let charts: Vec<BarChart> = terms
        .iter()
        .enumerate()
        .map(|(t_idx, term)| {
            let offset = -group_width / 2.0 + bar_width * (t_idx as f64 + 0.5);
            let bars = rows
                .iter()
                .filter(|r| &r.term == term)
                .filter_map(|r| {
                    let x = position(&metrics, r.metric)? + offset;
                    Some(Bar::new(x, r.value).width(bar_width * 0.95).name(format!("{term}: {}", r.metric)))
                })
                .collect();
            BarChart::new(bars).name(term).color(colors.color_for(term))
        })
        .collect();

    Plot::new("term_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Mean")
        .x_axis_formatter(category_axis(metrics))
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Department distribution (donut)
// ---------------------------------------------------------------------------

fn polar(radius: f64, angle: f64) -> [f64; 2] {
    [radius * angle.cos(), radius * angle.sin()]
}

pub fn department_chart(
    ui: &mut Ui,
    result: &Result<Vec<DepartmentShare>, Warning>,
    year: Option<&str>,
    colors: &ColorMap,
) {
    match year {
        Some(y) => ui.heading(format!("Enrollment by department ({y})")),
        None => ui.heading("Enrollment by department"),
    };
    let shares = match result {
        Ok(shares) => shares,
        Err(w) => return warning(ui, w),
    };

    let total: f64 = shares.iter().map(|s| s.value).sum();
    let mut start = DONUT_START_DEG.to_radians();

    Plot::new("department_plot")
        .height(CHART_HEIGHT + 40.0)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.4)
        .include_x(1.4)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            for share in shares {
                let frac = share.value / total;
                let sweep = frac * TAU;
                let color = colors.color_for(&share.label);
                let steps = ((frac * DONUT_STEPS as f64).ceil() as usize).max(1);
                let step = sweep / steps as f64;

                // Ring segments are not convex, so draw them as thin quads.
                for k in 0..steps {
                    let a0 = start + step * k as f64;
                    let a1 = a0 + step;
                    let quad = vec![
                        polar(DONUT_HOLE, a0),
                        polar(1.0, a0),
                        polar(1.0, a1),
                        polar(DONUT_HOLE, a1),
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(quad))
                            .name(&share.label)
                            .fill_color(color)
                            .stroke((0.0, color)),
                    );
                }

                let [x, y] = polar((1.0 + DONUT_HOLE) / 2.0, start + sweep / 2.0);
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(format!("{:.1}%", frac * 100.0)).color(Color32::WHITE),
                ));
                start += sweep;
            }
        });
}
