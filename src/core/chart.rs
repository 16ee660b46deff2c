//! Projects a historical rate series onto a fixed-size line and area chart.

use super::rates::HistoricalPoint;
use chrono::NaiveDate;
use serde::Serialize;

pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 400.0;
pub const MARGINS: Margins = Margins {
    top: 20.0,
    right: 20.0,
    bottom: 40.0,
    left: 60.0,
};

const Y_TICK_COUNT: usize = 5;
const MAX_X_TICKS: usize = 5;
/// Fraction of the rate range added above and below the plotted line.
const RATE_PADDING: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YTick {
    pub value: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XTick {
    pub index: usize,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
    pub rate: f64,
}

/// Drawing primitives for a rate series, in canvas pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// `M x y L x y ...` path through every point.
    pub line_path: String,
    /// Line path closed down to the baseline, for the fill under the line.
    pub area_path: String,
    pub y_ticks: Vec<YTick>,
    pub x_ticks: Vec<XTick>,
    pub points: Vec<PlotPoint>,
    pub min_rate: f64,
    pub max_rate: f64,
}

impl ChartGeometry {
    pub fn plot_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Pixel Y of the x axis.
    pub fn baseline(&self) -> f64 {
        self.margins.top + self.plot_height()
    }
}

struct Scale {
    len: usize,
    low: f64,
    span: f64,
    padding: f64,
    plot_width: f64,
    plot_height: f64,
}

impl Scale {
    fn new(len: usize, low: f64, high: f64) -> Self {
        let span = high - low;
        Self {
            len,
            low,
            span,
            padding: span * RATE_PADDING,
            plot_width: CANVAS_WIDTH - MARGINS.left - MARGINS.right,
            plot_height: CANVAS_HEIGHT - MARGINS.top - MARGINS.bottom,
        }
    }

    fn x(&self, index: usize) -> f64 {
        if self.len < 2 {
            return MARGINS.left + self.plot_width / 2.0;
        }
        MARGINS.left + (index as f64 / (self.len - 1) as f64) * self.plot_width
    }

    fn y(&self, rate: f64) -> f64 {
        MARGINS.top + self.plot_height
            - ((rate - self.low + self.padding) / (self.span + 2.0 * self.padding))
                * self.plot_height
    }
}

/// Value domain the Y axis spans. A flat series is widened around its value
/// so that the line sits at mid-height and the ticks stay distinct.
fn value_domain(min_rate: f64, max_rate: f64) -> (f64, f64) {
    if max_rate > min_rate {
        return (min_rate, max_rate);
    }
    let half = if min_rate == 0.0 {
        1.0
    } else {
        min_rate.abs() * RATE_PADDING
    };
    (min_rate - half, max_rate + half)
}

fn x_tick_indices(len: usize) -> Vec<usize> {
    let count = len.min(MAX_X_TICKS);
    if count < 2 {
        return vec![0; count];
    }
    (0..count).map(|i| (i * (len - 1)) / (count - 1)).collect()
}

/// Short axis label such as "Mar 5".
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Builds the chart geometry for `points`, or `None` when there is nothing to draw.
///
/// A single point is drawn at the horizontal centre with no line segments.
pub fn build_geometry(points: &[HistoricalPoint]) -> Option<ChartGeometry> {
    let first = points.first()?;

    let (min_rate, max_rate) = points
        .iter()
        .fold((first.rate, first.rate), |(min, max), p| {
            (min.min(p.rate), max.max(p.rate))
        });
    let (low, high) = value_domain(min_rate, max_rate);
    let scale = Scale::new(points.len(), low, high);

    let plotted: Vec<PlotPoint> = points
        .iter()
        .enumerate()
        .map(|(index, p)| PlotPoint {
            x: scale.x(index),
            y: scale.y(p.rate),
            date: p.date,
            rate: p.rate,
        })
        .collect();

    let line_path = plotted
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let command = if index == 0 { "M" } else { "L" };
            format!("{command} {} {}", p.x, p.y)
        })
        .collect::<Vec<_>>()
        .join(" ");

    let baseline = MARGINS.top + scale.plot_height;
    let area_path = format!(
        "{line_path} L {} {baseline} L {} {baseline} Z",
        scale.x(points.len() - 1),
        scale.x(0)
    );

    let y_ticks = (0..Y_TICK_COUNT)
        .map(|i| {
            let value = low + (high - low) * i as f64 / (Y_TICK_COUNT - 1) as f64;
            YTick {
                value,
                y: scale.y(value),
                label: format!("{value:.4}"),
            }
        })
        .collect();

    let x_ticks = x_tick_indices(points.len())
        .into_iter()
        .map(|index| XTick {
            index,
            x: scale.x(index),
            label: short_date_label(points[index].date),
        })
        .collect();

    Some(ChartGeometry {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        margins: MARGINS,
        line_path,
        area_path,
        y_ticks,
        x_ticks,
        points: plotted,
        min_rate,
        max_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(rates: &[f64]) -> Vec<HistoricalPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        rates
            .iter()
            .enumerate()
            .map(|(i, rate)| HistoricalPoint {
                date: start + chrono::Days::new(i as u64),
                rate: *rate,
            })
            .collect()
    }

    fn path_numbers(path: &str) -> Vec<f64> {
        path.split_whitespace()
            .filter_map(|token| token.parse::<f64>().ok())
            .collect()
    }

    fn assert_finite(geometry: &ChartGeometry) {
        for value in path_numbers(&geometry.line_path)
            .into_iter()
            .chain(path_numbers(&geometry.area_path))
        {
            assert!(value.is_finite(), "non-finite path coordinate");
        }
        for p in &geometry.points {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        for t in &geometry.y_ticks {
            assert!(t.y.is_finite() && t.value.is_finite());
        }
        for t in &geometry.x_ticks {
            assert!(t.x.is_finite());
        }
    }

    #[test]
    fn test_empty_series_has_no_geometry() {
        assert!(build_geometry(&[]).is_none());
    }

    #[test]
    fn test_increasing_series() {
        let geometry = build_geometry(&series(&[1.0, 1.1, 1.2, 1.3, 1.4])).unwrap();

        let commands: Vec<&str> = geometry
            .line_path
            .split_whitespace()
            .filter(|t| *t == "M" || *t == "L")
            .collect();
        assert_eq!(commands, vec!["M", "L", "L", "L", "L"]);

        assert_eq!(geometry.y_ticks.len(), 5);
        for pair in geometry.y_ticks.windows(2) {
            assert!(pair[1].value > pair[0].value);
            assert!(pair[1].y < pair[0].y);
        }
        assert_eq!(geometry.y_ticks[0].label, "1.0000");
        assert_eq!(geometry.y_ticks[4].label, "1.4000");

        // Higher rates are drawn higher up the canvas.
        for pair in geometry.points.windows(2) {
            assert!(pair[1].y < pair[0].y);
            assert!(pair[1].x > pair[0].x);
        }
        assert_finite(&geometry);
    }

    #[test]
    fn test_two_point_coordinates() {
        let geometry = build_geometry(&series(&[1.0, 2.0])).unwrap();
        let first = &geometry.points[0];
        let last = &geometry.points[1];

        assert_eq!(first.x, 60.0);
        assert_eq!(last.x, 780.0);
        assert!((first.y - (360.0 - 340.0 / 12.0)).abs() < 1e-9);
        assert!((last.y - (360.0 - 340.0 * 11.0 / 12.0)).abs() < 1e-9);
        // The padded band keeps the line off both borders.
        assert!(first.y < geometry.baseline());
        assert!(last.y > geometry.margins.top);

        assert!(geometry.line_path.starts_with("M 60 "));
        assert!(geometry.area_path.starts_with(&geometry.line_path));
        assert!(geometry.area_path.ends_with(" L 780 360 L 60 360 Z"));
        assert_eq!(geometry.min_rate, 1.0);
        assert_eq!(geometry.max_rate, 2.0);
    }

    #[test]
    fn test_flat_series_is_centred() {
        let geometry = build_geometry(&series(&[1.25, 1.25, 1.25])).unwrap();
        let mid = geometry.margins.top + geometry.plot_height() / 2.0;

        for p in &geometry.points {
            assert!((p.y - mid).abs() < 1e-9);
        }
        for pair in geometry.y_ticks.windows(2) {
            assert!(pair[1].y < pair[0].y);
        }
        assert_finite(&geometry);
    }

    #[test]
    fn test_flat_zero_series_is_finite() {
        let geometry = build_geometry(&series(&[0.0, 0.0])).unwrap();
        assert_finite(&geometry);
        assert_eq!(geometry.y_ticks[2].label, "0.0000");
    }

    #[test]
    fn test_single_point() {
        let geometry = build_geometry(&series(&[0.92])).unwrap();

        assert_eq!(geometry.points.len(), 1);
        assert_eq!(geometry.points[0].x, 420.0);
        assert!(!geometry.line_path.contains('L'));
        assert!(geometry.area_path.ends_with(" L 420 360 L 420 360 Z"));
        assert_eq!(geometry.x_ticks.len(), 1);
        assert_eq!(geometry.x_ticks[0].label, "Mar 1");
        assert_finite(&geometry);
    }

    #[test]
    fn test_x_ticks_are_spread_over_indices() {
        let rates: Vec<f64> = (0..22).map(|i| 1.0 + i as f64 / 100.0).collect();
        let geometry = build_geometry(&series(&rates)).unwrap();

        let indices: Vec<usize> = geometry.x_ticks.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 5, 10, 15, 21]);
        assert_eq!(geometry.x_ticks[0].label, "Mar 1");
        assert_eq!(geometry.x_ticks[4].label, "Mar 22");

        let short = build_geometry(&series(&[1.0, 1.1, 1.2])).unwrap();
        assert_eq!(short.x_ticks.len(), 3);
    }

    #[test]
    fn test_geometry_is_deterministic() {
        let input = series(&[1.3, 1.1, 1.4, 1.2]);
        assert_eq!(build_geometry(&input), build_geometry(&input));
    }
}
