//! Current through a resistor-diode branch over a (diode resistor, source voltage) grid,
//! drawn as labeled contour lines with the 0.7 A isoline highlighted.

pub mod axis;
pub mod contour;
pub mod error;
pub mod field;
pub mod grid;
pub mod label;
pub mod plot;
pub mod render;

pub use error::PlotError;

use tracing::info;

use crate::axis::{RESISTOR_RANGE, VOLTAGE_RANGE};
use crate::grid::Grid;
use crate::plot::{FigureModel, FigureSettings};

/// Build the figure for the fixed resistor and voltage ranges.
pub fn diode_figure() -> Result<FigureModel, PlotError> {
    let grid = Grid::from_ranges(&RESISTOR_RANGE, &VOLTAGE_RANGE)?;
    let (rows, cols) = grid.shape();
    info!(rows, cols, samples = grid.len(), "grid ready");

    let current = field::evaluate(&grid);
    if let Some((lo, hi)) = field::extent(&current) {
        info!(min = lo, max = hi, "current field [A]");
    }

    plot::build(&grid, &current, &FigureSettings::default())
}
