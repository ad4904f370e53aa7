use crate::aggregator::ResultSet;
use crate::config::PlotConfig;
use crate::error::{Result, ScaleplotError};
use crate::plot::PlotMode;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl From<&PlotConfig> for PlotStyle {
    fn from(config: &PlotConfig) -> Self {
        Self {
            title: config.title.clone(),
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            width: config.width,
            height: config.height,
        }
    }
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self::from(&PlotConfig::default())
    }
}

fn plot_error<E: std::fmt::Display>(error: E) -> ScaleplotError {
    ScaleplotError::Plot {
        message: error.to_string(),
    }
}

/// Padded `(min, max)` bounds for one axis.
///
/// Log axes are padded by a factor so the outermost markers stay visible and
/// reject non-positive values; linear axes are padded by a tenth of the span.
pub fn axis_range(values: &[f64], mode: PlotMode) -> Result<(f64, f64)> {
    if values.is_empty() {
        return Err(ScaleplotError::InvalidPlotData {
            message: "no points to plot".to_string(),
        });
    }

    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(ScaleplotError::InvalidPlotData {
            message: format!("value {} is not finite", bad),
        });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    match mode {
        PlotMode::LogLog => {
            if min <= 0.0 {
                return Err(ScaleplotError::InvalidPlotData {
                    message: format!("log scale needs positive values, got {}", min),
                });
            }
            Ok((min / 1.5, max * 1.5))
        }
        PlotMode::Linear => {
            let span = max - min;
            let pad = if span > 0.0 {
                span * 0.1
            } else if min != 0.0 {
                min.abs() * 0.1
            } else {
                1.0
            };
            Ok((min - pad, max + pad))
        }
    }
}

/// Axis bounds used when there is nothing to plot.
fn empty_range(mode: PlotMode) -> (f64, f64) {
    match mode {
        PlotMode::LogLog => (1.0, 10.0),
        PlotMode::Linear => (0.0, 1.0),
    }
}

// Shared between the linear and log-log charts, whose coordinate types differ.
macro_rules! draw_measurements {
    ($chart:expr, $points:expr, $style:expr) => {{
        $chart
            .configure_mesh()
            .x_desc($style.x_label.as_str())
            .y_desc($style.y_label.as_str())
            .x_labels($points.len().max(2))
            .draw()
            .map_err(plot_error)?;

        $chart
            .draw_series(LineSeries::new(
                $points.iter().copied(),
                BLUE.stroke_width(2),
            ))
            .map_err(plot_error)?;

        $chart
            .draw_series($points.iter().map(|&p| Circle::new(p, 5, BLUE.filled())))
            .map_err(plot_error)?;
    }};
}

/// Draws the timings as a line with a marker on every point and writes
/// the chart as a PNG image to `output_path`.
///
/// An empty result set still produces a chart with its title, axes and grid
/// over a fixed default range.
pub fn render(
    results: &ResultSet,
    mode: PlotMode,
    output_path: &Path,
    style: &PlotStyle,
) -> Result<()> {
    let points = results.points();
    let ((x_min, x_max), (y_min, y_max)) = if results.is_empty() {
        (empty_range(mode), empty_range(mode))
    } else {
        (
            axis_range(&results.keys(), mode)?,
            axis_range(&results.values(), mode)?,
        )
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    log::debug!(
        "rendering {} points ({}) to {}",
        points.len(),
        mode,
        output_path.display()
    );

    let root = BitMapBackend::new(output_path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(style.title.as_str(), ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70);

    match mode {
        PlotMode::Linear => {
            let mut chart = builder
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(plot_error)?;
            draw_measurements!(chart, points, style);
        }
        PlotMode::LogLog => {
            let mut chart = builder
                .build_cartesian_2d((x_min..x_max).log_scale(), (y_min..y_max).log_scale())
                .map_err(plot_error)?;
            draw_measurements!(chart, points, style);
        }
    }

    root.present().map_err(plot_error)?;
    Ok(())
}
