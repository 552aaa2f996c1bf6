//! Current through the diode branch, evaluated over the whole grid.

use ndarray::{Array2, Zip};
use tracing::{debug, instrument};

use crate::grid::Grid;

/// Forward voltage drop of the diode [V].
pub const DIODE_FORWARD_VOLTAGE: f64 = 1.6;
/// On-resistance of the switching transistor in series with the diode resistor [Ohm].
pub const TRANSISTOR_RESISTANCE: f64 = 0.024;

/// Branch current [A] for a diode resistor `r` [Ohm] and source voltage `v` [V].
///
/// The voltage left after the diode drop is divided by the resistor plus the
/// transistor's ~24 mOhm. Finite for every `r > -TRANSISTOR_RESISTANCE`.
#[inline]
pub fn diode_current(r: f64, v: f64) -> f64 {
    (v - DIODE_FORWARD_VOLTAGE) / (r + TRANSISTOR_RESISTANCE)
}

#[inline]
pub fn voltage_for_current(r: f64, current: f64) -> f64 {
    DIODE_FORWARD_VOLTAGE + current * (r + TRANSISTOR_RESISTANCE)
}

/// Evaluate [`diode_current`] at every grid point.
#[instrument(skip_all, name = "field")]
pub fn evaluate(grid: &Grid) -> Array2<f64> {
    let mut field = Array2::<f64>::zeros(grid.shape());
    Zip::from(&mut field)
        .and(&grid.resistor)
        .and(&grid.voltage)
        .par_for_each(|z, &r, &v| *z = diode_current(r, v));
    debug!(cells = field.len(), "field evaluated");
    field
}

pub fn extent(field: &Array2<f64>) -> Option<(f64, f64)> {
    field
        .iter()
        .filter(|z| z.is_finite())
        .fold(None, |acc, &z| match acc {
            None => Some((z, z)),
            Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{RESISTOR_RANGE, VOLTAGE_RANGE};
    use approx::assert_abs_diff_eq;

    #[test]
    fn boundary_samples() {
        assert_abs_diff_eq!(diode_current(0.5, 2.7), 1.1 / 0.524, epsilon = 1e-12);
        assert_abs_diff_eq!(diode_current(0.5, 2.7), 2.0992, epsilon = 1e-4);
        assert_abs_diff_eq!(diode_current(4.999, 3.599), 0.3980, epsilon = 1e-4);
    }

    #[test]
    fn highlighted_isoline_is_inside_the_voltage_range() {
        let v = voltage_for_current(2.0, 0.7);
        assert_abs_diff_eq!(v, 3.0168, epsilon = 1e-12);
        assert!(v > 2.7 && v < 3.6);
        assert_abs_diff_eq!(diode_current(2.0, v), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn monotone_in_both_inputs() {
        for &r in &[0.5, 1.0, 2.5, 4.999] {
            let mut prev = f64::NEG_INFINITY;
            for i in 0..VOLTAGE_RANGE.len() {
                let z = diode_current(r, VOLTAGE_RANGE.at(i));
                assert!(z > prev);
                prev = z;
            }
        }
        for &v in &[2.7, 3.0, 3.599] {
            let mut prev = f64::INFINITY;
            for j in 0..RESISTOR_RANGE.len() {
                let z = diode_current(RESISTOR_RANGE.at(j), v);
                assert!(z < prev);
                prev = z;
            }
        }
    }

    #[test]
    fn full_grid_is_finite_and_shaped_like_the_mesh() {
        let grid = Grid::from_ranges(&RESISTOR_RANGE, &VOLTAGE_RANGE).unwrap();
        let field = evaluate(&grid);
        assert_eq!(grid.shape(), (900, 4500));
        assert_eq!(field.dim(), grid.shape());
        assert_eq!(field.len(), 4_050_000);
        assert!(field.iter().all(|z| z.is_finite()));

        assert_abs_diff_eq!(field[[0, 0]], 2.0992, epsilon = 1e-4);
        assert_abs_diff_eq!(field[[899, 4499]], 0.3980, epsilon = 1e-4);

        let (lo, hi) = extent(&field).unwrap();
        assert_abs_diff_eq!(lo, 1.1 / 5.023, epsilon = 1e-6);
        assert_abs_diff_eq!(hi, 1.999 / 0.524, epsilon = 1e-6);
    }

    #[test]
    fn evaluation_is_bit_identical_across_runs() {
        let grid = Grid::from_ranges(&RESISTOR_RANGE, &VOLTAGE_RANGE).unwrap();
        let a = evaluate(&grid);
        let b = evaluate(&grid);
        assert!(a
            .iter()
            .zip(b.iter())
            .all(|(x, y)| x.to_bits() == y.to_bits()));
    }

    #[test]
    fn extent_of_empty_field() {
        assert!(extent(&Array2::zeros((0, 3))).is_none());
    }
}
