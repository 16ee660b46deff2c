use super::{normalize_code, resolve_base, ui};
use crate::core::chart::{ChartGeometry, build_geometry};
use crate::core::config::AppConfig;
use crate::core::{DateRange, DateRangePreset, HistoricalPoint, HistoricalRateProvider, resolve_range};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::path::PathBuf;
use tracing::{info, warn};

const LINE_COLOR: &str = "#2563eb";
const AXIS_COLOR: &str = "#64748b";

#[derive(Debug, Clone)]
pub struct HistoryOptions {
    pub base: Option<String>,
    pub target: String,
    pub range: DateRangePreset,
    /// Where to write the SVG chart, if anywhere.
    pub output: Option<PathBuf>,
}

pub async fn run(
    options: &HistoryOptions,
    config: &AppConfig,
    provider: &dyn HistoricalRateProvider,
) -> Result<()> {
    let base = resolve_base(options.base.as_deref(), config);
    let target = normalize_code(&options.target);
    if base == target {
        anyhow::bail!("Base and target currency must differ, both are {}", base);
    }
    let range = resolve_range(options.range);

    let pb = ui::new_spinner(&format!(
        "Fetching {} history for {}/{}...",
        options.range.label(),
        base,
        target
    ));
    let points = provider.historical_rates(&base, &target, &range).await;
    pb.finish_and_clear();
    let points = points?;

    println!(
        "{}",
        render_summary(&base, &target, options.range, &range, &points)
    );

    if let Some(path) = &options.output {
        match build_geometry(&points) {
            Some(geometry) => {
                std::fs::write(path, render_svg(&geometry, &target))
                    .with_context(|| format!("Failed to write chart to {}", path.display()))?;
                info!("Wrote chart to {}", path.display());
                println!("\nChart written to {}", path.display());
            }
            None => warn!("No data to chart for {}/{}", base, target),
        }
    }
    Ok(())
}

fn percent_change(first: f64, last: f64) -> Option<f64> {
    (first != 0.0).then(|| (last - first) / first * 100.0)
}

pub fn render_summary(
    base: &str,
    target: &str,
    preset: DateRangePreset,
    range: &DateRange,
    points: &[HistoricalPoint],
) -> String {
    let mut output = format!(
        "{} over {} ({})\n\n",
        ui::style_text(&format!("{base}/{target}"), ui::StyleType::Title),
        preset.label(),
        range
    );

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        output.push_str(&ui::style_text(
            "No data available for the selected period",
            ui::StyleType::Error,
        ));
        return output;
    };
    let low = points
        .iter()
        .min_by(|a, b| a.rate.total_cmp(&b.rate))
        .unwrap_or(first);
    let high = points
        .iter()
        .max_by(|a, b| a.rate.total_cmp(&b.rate))
        .unwrap_or(first);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Date"),
        ui::header_cell(&format!("Rate ({target})")),
    ]);
    for (label, point) in [("First", first), ("Last", last), ("Low", low), ("High", high)] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(point.date),
            ui::rate_cell(point.rate),
        ]);
    }
    if let Some(change) = percent_change(first.rate, last.rate) {
        table.add_row(vec![Cell::new("Change"), Cell::new(""), ui::change_cell(change)]);
    }
    output.push_str(&table.to_string());

    if let Some(geometry) = build_geometry(points) {
        let mut samples = ui::new_styled_table();
        samples.set_header(vec![ui::header_cell("Date"), ui::header_cell("Rate")]);
        for tick in &geometry.x_ticks {
            samples.add_row(vec![
                Cell::new(&tick.label),
                ui::rate_cell(points[tick.index].rate),
            ]);
        }
        output.push_str(&format!("\n\n{samples}"));
    }
    output.push_str(&format!("\n{} data points", points.len()));
    output
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the chart as a standalone SVG document.
pub fn render_svg(geometry: &ChartGeometry, target: &str) -> String {
    let left = geometry.margins.left;
    let right = left + geometry.plot_width();
    let top = geometry.margins.top;
    let baseline = geometry.baseline();

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" width=\"{w}\" height=\"{h}\" font-family=\"sans-serif\" font-size=\"12\">\n",
        w = geometry.width,
        h = geometry.height
    );

    for tick in &geometry.y_ticks {
        svg.push_str(&format!(
            "  <line x1=\"{left}\" y1=\"{y}\" x2=\"{right}\" y2=\"{y}\" stroke=\"{AXIS_COLOR}\" stroke-opacity=\"0.1\" stroke-width=\"1\"/>\n",
            y = tick.y
        ));
    }

    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"{LINE_COLOR}\" fill-opacity=\"0.1\"/>\n",
        geometry.area_path
    ));
    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"{LINE_COLOR}\" stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
        geometry.line_path
    ));

    svg.push_str(&format!(
        "  <line x1=\"{left}\" y1=\"{top}\" x2=\"{left}\" y2=\"{baseline}\" stroke=\"{AXIS_COLOR}\" stroke-opacity=\"0.2\" stroke-width=\"1\"/>\n"
    ));
    for tick in &geometry.y_ticks {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" dominant-baseline=\"middle\" fill=\"{AXIS_COLOR}\">{}</text>\n",
            left - 10.0,
            tick.y,
            escape_xml(&tick.label)
        ));
    }

    svg.push_str(&format!(
        "  <line x1=\"{left}\" y1=\"{baseline}\" x2=\"{right}\" y2=\"{baseline}\" stroke=\"{AXIS_COLOR}\" stroke-opacity=\"0.2\" stroke-width=\"1\"/>\n"
    ));
    for tick in &geometry.x_ticks {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" fill=\"{AXIS_COLOR}\">{}</text>\n",
            tick.x,
            baseline + 20.0,
            escape_xml(&tick.label)
        ));
    }

    for point in &geometry.points {
        svg.push_str(&format!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"3\" fill=\"{LINE_COLOR}\"><title>{}: {:.4} {}</title></circle>\n",
            point.x,
            point.y,
            point.date.format("%b %-d, %Y"),
            point.rate,
            escape_xml(target)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
