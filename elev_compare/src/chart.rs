//! Backend-agnostic description of the overlay chart.

use crate::bounds::AxisBounds;
use crate::series::Series;
use crate::units::UnitSystem;

pub const CHART_TITLE: &str = "Elevation Comparison";
/// Opacity of the area under each profile.
pub const FILL_ALPHA: f64 = 0.2;
/// Padding for a zero-width distance axis, in display distance units.
pub const DEGENERATE_AXIS_PAD: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Ten-color qualitative palette ("tab10").
pub const PALETTE: [Rgb; 10] = [
    Rgb(31, 119, 180),
    Rgb(255, 127, 14),
    Rgb(44, 160, 44),
    Rgb(214, 39, 40),
    Rgb(148, 103, 189),
    Rgb(140, 86, 75),
    Rgb(227, 119, 194),
    Rgb(127, 127, 127),
    Rgb(188, 189, 34),
    Rgb(23, 190, 207),
];

/// Color for the series at `index`; wraps around the palette.
pub fn palette_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Lower edge of every filled region.
    pub fill_baseline: f64,
    pub series: Vec<ChartSeries>,
}

pub fn build_chart_spec(series: &[Series], bounds: &AxisBounds, units: UnitSystem) -> ChartSpec {
    let series = series
        .iter()
        .enumerate()
        .map(|(idx, s)| ChartSeries {
            label: s.label.clone(),
            points: s.points().collect(),
            color: palette_color(idx),
        })
        .collect();

    ChartSpec {
        title: CHART_TITLE.to_string(),
        x_label: format!("Distance ({})", units.distance_unit()),
        y_label: format!(
            "Elevation Difference from Start ({})",
            units.length_unit()
        ),
        x_range: bounds.x_range(DEGENERATE_AXIS_PAD),
        y_range: bounds.y_range(DEGENERATE_AXIS_PAD),
        fill_baseline: bounds.y_min,
        series,
    }
}
