//! Half-open arithmetic sequences for the two plot axes.

use ndarray::Array1;

use crate::error::PlotError;

/// A sampled axis `[start, stop)` with a fixed step, like `numpy.arange`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

/// 二极管串联电阻 [Ohm]
pub const RESISTOR_RANGE: AxisRange = AxisRange::new(0.5, 5.0, 0.001);
/// 电源电压 [V]
pub const VOLTAGE_RANGE: AxisRange = AxisRange::new(2.7, 3.6, 0.001);

impl AxisRange {
    pub const fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Number of samples, `ceil((stop - start) / step)`; zero for an empty or reversed range.
    pub fn len(&self) -> usize {
        let n = ((self.stop - self.start) / self.step).ceil();
        if n.is_finite() && n > 0.0 {
            n as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn at(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }

    /// Materialize the samples. The stop value itself is never included.
    pub fn values(&self) -> Result<Array1<f64>, PlotError> {
        let n = self.len();
        if n == 0 {
            return Err(PlotError::EmptyAxis {
                start: self.start,
                stop: self.stop,
                step: self.step,
            });
        }
        Ok(Array1::from_shape_fn(n, |i| self.at(i)))
    }

    pub fn last(&self) -> Option<f64> {
        self.len().checked_sub(1).map(|i| self.at(i))
    }
}
