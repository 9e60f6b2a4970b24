use std::io;
use std::panic;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use elev_compare::chart::FILL_ALPHA;
use elev_compare::{
    compare_files, ChartSpec, CompareConfig, Comparison, FileOutcome, FitDecoder, Rgb, UnitSystem,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare elevation from multiple FIT files", long_about = None)]
struct Cli {
    /// FIT file paths (2 or more)
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// Output PNG figure path
    #[arg(short, long, default_value = "elevation_comparison.png", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Additional SVG figure path
    #[arg(long, value_hint = ValueHint::FilePath)]
    svg: Option<PathBuf>,

    /// Disable plot generation
    #[arg(long, action = ArgAction::SetTrue)]
    no_plot: bool,

    /// Display unit system
    #[arg(long, value_enum, default_value_t = UnitsOpt::Imperial)]
    units: UnitsOpt,

    /// Vertical chart margin in display length units (ft or m)
    #[arg(long, default_value_t = 10.0)]
    margin: f64,

    /// Record field holding cumulative distance (metres)
    #[arg(long, default_value = "distance")]
    distance_field: String,

    /// Record field holding altitude (metres)
    #[arg(long, default_value = "altitude")]
    altitude_field: String,

    /// Print a JSON summary of the comparison to stdout
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum UnitsOpt {
    Imperial,
    Metric,
}

impl From<UnitsOpt> for UnitSystem {
    fn from(value: UnitsOpt) -> Self {
        match value {
            UnitsOpt::Imperial => UnitSystem::Imperial,
            UnitsOpt::Metric => UnitSystem::Metric,
        }
    }
}

#[derive(Clone, Copy)]
enum ChartKind {
    Png,
    Svg,
}

const CHART_SIZE: (u32, u32) = (1500, 700);

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    handle_compare(cli)
}

fn handle_compare(cli: Cli) -> Result<()> {
    let config = CompareConfig {
        units: cli.units.into(),
        margin: cli.margin,
        distance_field: cli.distance_field.clone(),
        altitude_field: cli.altitude_field.clone(),
    };

    let comparison = compare_files(cli.files.as_slice(), &FitDecoder, &config)?;
    log_outcomes(&comparison);

    if !cli.no_plot {
        let spec = comparison.chart_spec();
        render_to(&spec, &cli.output, ChartKind::Png)?;
        if let Some(path) = cli.svg.as_ref() {
            render_to(&spec, path, ChartKind::Svg)?;
        }
    }

    if cli.json {
        let text = serde_json::to_string_pretty(&comparison.report())
            .context("failed to serialize comparison report")?;
        println!("{}", text);
    }

    Ok(())
}

fn log_outcomes(comparison: &Comparison) {
    let skipped: Vec<&str> = comparison
        .outcomes
        .iter()
        .filter(|o| o.is_skipped())
        .map(FileOutcome::path)
        .collect();
    if !skipped.is_empty() {
        warn!("Skipped {} file(s): {}", skipped.len(), skipped.join(", "));
    }

    let length_unit = comparison.units.length_unit();
    for series in &comparison.series {
        if let Some((low, high)) = series.elevation_range() {
            info!(
                "{}: {} samples, range {:.0}..{:.0} {}, net {:+.0} {}",
                series.label,
                series.len(),
                low,
                high,
                length_unit,
                series.net_change(),
                length_unit
            );
        }
    }
}

fn render_to(spec: &ChartSpec, path: &Path, kind: ChartKind) -> Result<()> {
    render_chart_guard(spec, path, kind)
        .map_err(|err| anyhow!("failed to render {}: {}", path.display(), err))?;
    info!("Wrote plot: {}", path.display());
    Ok(())
}

fn render_chart_guard(spec: &ChartSpec, path: &Path, kind: ChartKind) -> Result<(), String> {
    let render = || -> Result<(), String> {
        let drawn = match kind {
            ChartKind::Png => {
                let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
                draw_overlay(root, spec)
            }
            ChartKind::Svg => {
                let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
                draw_overlay(root, spec)
            }
        };
        drawn.map_err(|e| format!("plotting error: {}", e))
    };

    panic::catch_unwind(panic::AssertUnwindSafe(render))
        .map_err(|_| "plotting backend panicked".to_string())?
}

fn draw_overlay<DB>(root: DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (x_min, x_max) = spec.x_range;
    let (y_min, y_max) = spec.y_range;
    let title_font = FontDesc::new(FontFamily::SansSerif, 26.0, FontStyle::Normal);
    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title.as_str(), title_font.color(&BLACK))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let axis_font = FontDesc::new(FontFamily::SansSerif, 18.0, FontStyle::Normal);
    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .light_line_style(&BLACK.mix(0.05))
        .bold_line_style(&BLACK.mix(0.2))
        .x_label_formatter(&|v| format!("{:.1}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .label_style(axis_font.color(&BLACK.mix(0.85)))
        .draw()?;

    for series in &spec.series {
        let color = to_rgb(series.color);
        chart.draw_series(AreaSeries::new(
            series.points.iter().copied(),
            spec.fill_baseline,
            &color.mix(FILL_ALPHA),
        ))?;
        chart
            .draw_series(LineSeries::new(
                series.points.iter().copied(),
                color.stroke_width(1),
            ))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(2)));
    }

    let legend_font = FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal);
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(legend_font.color(&BLACK))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn to_rgb(color: Rgb) -> RGBColor {
    let Rgb(r, g, b) = color;
    RGBColor(r, g, b)
}
