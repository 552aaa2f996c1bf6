//! Cartesian sample lattice over the resistor and voltage axes.

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::axis::AxisRange;
use crate::error::PlotError;

/// The mesh of a plot: one coordinate array per axis, both shaped (rows = voltages, cols = resistors).
#[derive(Debug, Clone)]
pub struct Grid {
    pub resistors: Array1<f64>,
    pub voltages: Array1<f64>,
    pub resistor: Array2<f64>,
    pub voltage: Array2<f64>,
}

impl Grid {
    /// Same as `numpy.meshgrid(x, y)`: x varies along columns, y along rows.
    pub fn meshgrid(resistors: Array1<f64>, voltages: Array1<f64>) -> Self {
        let shape = (voltages.len(), resistors.len());
        let resistor = Array2::from_shape_fn(shape, |(_, j)| resistors[j]);
        let voltage = Array2::from_shape_fn(shape, |(i, _)| voltages[i]);
        debug!(rows = shape.0, cols = shape.1, "built meshgrid");
        Grid {
            resistors,
            voltages,
            resistor,
            voltage,
        }
    }

    pub fn from_ranges(x: &AxisRange, y: &AxisRange) -> Result<Self, PlotError> {
        Ok(Self::meshgrid(x.values()?, y.values()?))
    }

    pub fn shape(&self) -> (usize, usize) {
        self.resistor.dim()
    }

    pub fn len(&self) -> usize {
        self.resistor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resistor.is_empty()
    }
}
