//! Backend independent description of the figure: two contour layers, texts and extents.

use ndarray::Array2;
use tracing::{info, instrument};

use crate::axis::AxisRange;
use crate::contour::{self, Point};
use crate::error::PlotError;
use crate::grid::Grid;
use crate::label::{self, Frame, InlineLabel};

pub const X_LABEL: &str = "Diode resistor [Ohm]";
pub const Y_LABEL: &str = "Source voltage [V]";
pub const TITLE: &str = "Current [A] in diode circuit depending\n on diode resistor and source voltage";

/// 0, 0.25, ..., 3.0
pub const GENERAL_LEVELS: AxisRange = AxisRange::new(0.0, 3.1, 0.25);
pub const HIGHLIGHT_LEVEL: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub color: &'static str,
    pub line_width: f64,
    pub font_size: f64,
}

pub const GENERAL_STYLE: LayerStyle = LayerStyle {
    color: "black",
    line_width: 0.5,
    font_size: 8.0,
};

pub const HIGHLIGHT_STYLE: LayerStyle = LayerStyle {
    color: "red",
    line_width: 1.0,
    font_size: 8.0,
};

/// Everything that is fixed about the figure apart from the data.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSettings {
    pub layers: Vec<(Vec<f64>, LayerStyle)>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub grid: bool,
    /// Half width of the hole cut for an inline label, in axis-normalized units.
    pub label_gap: f64,
    pub aspect: f64,
}

impl Default for FigureSettings {
    fn default() -> Self {
        let general = (0..GENERAL_LEVELS.len()).map(|i| GENERAL_LEVELS.at(i)).collect();
        FigureSettings {
            layers: vec![
                (general, GENERAL_STYLE),
                (vec![HIGHLIGHT_LEVEL], HIGHLIGHT_STYLE),
            ],
            title: TITLE.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            grid: true,
            label_gap: 0.02,
            aspect: 4.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub levels: Vec<f64>,
    pub style: LayerStyle,
    // 已经在标签处断开
    pub pieces: Vec<Vec<Point>>,
    pub labels: Vec<InlineLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureModel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub grid: bool,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub layers: Vec<Layer>,
}

/// Trace and label every layer of `settings` over `field`.
#[instrument(skip_all, name = "figure")]
pub fn build(grid: &Grid, field: &Array2<f64>, settings: &FigureSettings) -> Result<FigureModel, PlotError> {
    let x_range = extent_of(&grid.resistors, "resistor")?;
    let y_range = extent_of(&grid.voltages, "voltage")?;
    let frame = Frame {
        x: x_range,
        y: y_range,
        aspect: settings.aspect,
    };

    let mut layers = Vec::with_capacity(settings.layers.len());
    for (levels, style) in &settings.layers {
        let traced = contour::trace_levels(&grid.resistors, &grid.voltages, field, levels)?;
        let decimals = label::decimals_for(levels);
        let mut pieces = Vec::new();
        let mut labels = Vec::new();
        for line in traced.iter().flatten() {
            let (cut, label) = label::place(line, &frame, settings.label_gap, decimals);
            pieces.extend(cut);
            labels.extend(label);
        }
        info!(
            color = style.color,
            levels = levels.len(),
            lines = traced.iter().map(Vec::len).sum::<usize>(),
            labels = labels.len(),
            "contour layer ready"
        );
        layers.push(Layer {
            levels: levels.clone(),
            style: *style,
            pieces,
            labels,
        });
    }

    Ok(FigureModel {
        title: settings.title.clone(),
        x_label: settings.x_label.clone(),
        y_label: settings.y_label.clone(),
        grid: settings.grid,
        x_range,
        y_range,
        layers,
    })
}

fn extent_of(axis: &ndarray::Array1<f64>, name: &str) -> Result<(f64, f64), PlotError> {
    match (axis.first(), axis.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => Ok((lo, hi)),
        _ => Err(PlotError::DegenerateAxis(name.to_string())),
    }
}
