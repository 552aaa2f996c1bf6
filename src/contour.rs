//! Isolines of a gridded field using marching squares.
//!
//! Cell corners are classified against the level (`value >= level` is above),
//! every crossed edge gets a linearly interpolated point, and per-cell
//! segments are joined through the edges they share.

use std::collections::HashMap;

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::PlotError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContourLine {
    pub level: f64,
    pub points: Vec<Point>,
    // 首尾相同
    pub closed: bool,
}

/// A grid edge. `H` joins (row, col)-(row, col + 1), `V` joins (row, col)-(row + 1, col).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Edge {
    H(usize, usize),
    V(usize, usize),
}

type Segment = (Edge, Edge);

struct Tracer<'a> {
    x: &'a Array1<f64>,
    y: &'a Array1<f64>,
    z: &'a Array2<f64>,
    level: f64,
}

impl<'a> Tracer<'a> {
    fn segments(&self) -> Vec<Segment> {
        let (rows, cols) = self.z.dim();
        let mut out = Vec::new();
        for i in 0..rows.saturating_sub(1) {
            for j in 0..cols.saturating_sub(1) {
                self.march_cell(i, j, &mut out);
            }
        }
        out
    }

    fn march_cell(&self, i: usize, j: usize, out: &mut Vec<Segment>) {
        let z = self.z;
        let bl = z[[i, j]];
        let br = z[[i, j + 1]];
        let tr = z[[i + 1, j + 1]];
        let tl = z[[i + 1, j]];
        if !(bl.is_finite() && br.is_finite() && tr.is_finite() && tl.is_finite()) {
            return;
        }
        let mut case = 0u8;
        if bl >= self.level {
            case |= 1;
        }
        if br >= self.level {
            case |= 2;
        }
        if tr >= self.level {
            case |= 4;
        }
        if tl >= self.level {
            case |= 8;
        }

        let bottom = Edge::H(i, j);
        let top = Edge::H(i + 1, j);
        let left = Edge::V(i, j);
        let right = Edge::V(i, j + 1);
        let centre_above = (bl + br + tr + tl) / 4.0 >= self.level;

        match case {
            0 | 15 => {}
            1 | 14 => out.push((left, bottom)),
            2 | 13 => out.push((bottom, right)),
            3 | 12 => out.push((left, right)),
            4 | 11 => out.push((right, top)),
            6 | 9 => out.push((bottom, top)),
            7 | 8 => out.push((left, top)),
            // saddles: the centre value decides which diagonal stays connected
            5 if centre_above => {
                out.push((bottom, right));
                out.push((left, top));
            }
            5 => {
                out.push((left, bottom));
                out.push((right, top));
            }
            10 if centre_above => {
                out.push((left, bottom));
                out.push((right, top));
            }
            10 => {
                out.push((bottom, right));
                out.push((left, top));
            }
            _ => unreachable!("marching squares case out of range"),
        }
    }

    fn point(&self, edge: Edge) -> Point {
        let ((i0, j0), (i1, j1)) = match edge {
            Edge::H(i, j) => ((i, j), (i, j + 1)),
            Edge::V(i, j) => ((i, j), (i + 1, j)),
        };
        let a = self.z[[i0, j0]];
        let b = self.z[[i1, j1]];
        // one corner is above and one below, so a != b
        let t = ((self.level - a) / (b - a)).clamp(0.0, 1.0);
        Point::new(
            self.x[j0] + t * (self.x[j1] - self.x[j0]),
            self.y[i0] + t * (self.y[i1] - self.y[i0]),
        )
    }

    fn lines(&self) -> Vec<ContourLine> {
        stitch(&self.segments())
            .into_iter()
            .map(|(edges, closed)| ContourLine {
                level: self.level,
                points: edges.into_iter().map(|e| self.point(e)).collect(),
                closed,
            })
            .collect()
    }
}

/// Join segments sharing an edge into chains of edges. Returns each chain and whether it closes.
fn stitch(segments: &[Segment]) -> Vec<(Vec<Edge>, bool)> {
    let mut by_edge: HashMap<Edge, Vec<usize>> = HashMap::with_capacity(segments.len() * 2);
    for (k, &(a, b)) in segments.iter().enumerate() {
        by_edge.entry(a).or_default().push(k);
        by_edge.entry(b).or_default().push(k);
    }

    let mut used = vec![false; segments.len()];
    let mut chains = Vec::new();
    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (a, b) = segments[start];
        let mut chain = vec![a, b];
        let mut closed = extend(&mut chain, segments, &by_edge, &mut used);
        if !closed {
            chain.reverse();
            closed = extend(&mut chain, segments, &by_edge, &mut used);
        }
        chains.push((chain, closed));
    }
    chains
}

// 从链尾继续接线段, 闭合时返回 true
fn extend(
    chain: &mut Vec<Edge>,
    segments: &[Segment],
    by_edge: &HashMap<Edge, Vec<usize>>,
    used: &mut [bool],
) -> bool {
    loop {
        let Some(&tail) = chain.last() else {
            return false;
        };
        let next = by_edge
            .get(&tail)
            .and_then(|ids| ids.iter().copied().find(|&k| !used[k]));
        let Some(k) = next else {
            return false;
        };
        used[k] = true;
        let (p, q) = segments[k];
        let other = if p == tail { q } else { p };
        chain.push(other);
        if other == chain[0] {
            return true;
        }
    }
}

fn check_shape(x: &Array1<f64>, y: &Array1<f64>, z: &Array2<f64>) -> Result<(), PlotError> {
    if z.dim() != (y.len(), x.len()) {
        return Err(PlotError::ShapeMismatch {
            field: z.dim(),
            rows: y.len(),
            cols: x.len(),
        });
    }
    Ok(())
}

/// Contour lines of `z` at `level`. `z` is indexed `[row, col]` with rows along `y`, columns along `x`.
pub fn trace(
    x: &Array1<f64>,
    y: &Array1<f64>,
    z: &Array2<f64>,
    level: f64,
) -> Result<Vec<ContourLine>, PlotError> {
    check_shape(x, y, z)?;
    Ok(Tracer { x, y, z, level }.lines())
}

/// [`trace`] for every level, in parallel. The result keeps the order of `levels`.
#[instrument(skip_all, fields(levels = levels.len()))]
pub fn trace_levels(
    x: &Array1<f64>,
    y: &Array1<f64>,
    z: &Array2<f64>,
    levels: &[f64],
) -> Result<Vec<Vec<ContourLine>>, PlotError> {
    check_shape(x, y, z)?;
    let traced: Vec<Vec<ContourLine>> = levels
        .par_iter()
        .map(|&level| Tracer { x, y, z, level }.lines())
        .collect();
    for (level, lines) in levels.iter().zip(&traced) {
        debug!(level, lines = lines.len(), "traced");
    }
    Ok(traced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisRange;
    use crate::field::{self, voltage_for_current};
    use crate::grid::Grid;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2};

    fn unit_axes(n: usize) -> Array1<f64> {
        Array1::from_shape_fn(n, |i| i as f64)
    }

    #[test]
    fn single_cell_crossing_gives_one_segment() {
        let x = array![0.0, 1.0];
        let y = array![0.0, 1.0];
        let z = array![[0.0, 0.0], [1.0, 1.0]];
        let lines = trace(&x, &y, &z, 0.5).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points.len(), 2);
        assert!(!lines[0].closed);
        for p in &lines[0].points {
            assert_abs_diff_eq!(p.y, 0.5);
        }
    }

    #[test]
    fn saddle_cell_gives_two_segments() {
        let x = array![0.0, 1.0];
        let y = array![0.0, 1.0];
        let z = array![[1.0, 0.0], [0.0, 1.0]];
        let lines = trace(&x, &y, &z, 0.5).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.points.len() == 2));

        let z = array![[0.0, 1.0], [1.0, 0.0]];
        assert_eq!(trace(&x, &y, &z, 0.25).unwrap().len(), 2);
    }

    #[test]
    fn peak_gives_closed_loop() {
        let z = array![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        let lines = trace(&unit_axes(3), &unit_axes(3), &z, 0.5).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
        assert_eq!(lines[0].points.len(), 5);
        assert_eq!(lines[0].points.first(), lines[0].points.last());
    }

    #[test]
    fn flat_and_out_of_range_fields_have_no_lines() {
        let z = Array2::from_elem((4, 4), 2.0);
        assert!(trace(&unit_axes(4), &unit_axes(4), &z, 1.0).unwrap().is_empty());
        assert!(trace(&unit_axes(4), &unit_axes(4), &z, 3.0).unwrap().is_empty());
    }

    #[test]
    fn linear_field_is_traced_exactly() {
        let x = unit_axes(6);
        let y = unit_axes(5);
        let z = Array2::from_shape_fn((5, 6), |(i, j)| y[i] - 0.5 * x[j]);
        let lines = trace(&x, &y, &z, 1.2).unwrap();
        assert_eq!(lines.len(), 1);
        for p in &lines[0].points {
            assert_abs_diff_eq!(p.y - 0.5 * p.x, 1.2, epsilon = 1e-12);
        }
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let z = Array2::zeros((3, 4));
        let err = trace(&unit_axes(3), &unit_axes(3), &z, 0.0).unwrap_err();
        assert!(matches!(
            err,
            PlotError::ShapeMismatch {
                field: (3, 4),
                rows: 3,
                cols: 3
            }
        ));
    }

    #[test]
    fn highlighted_level_follows_the_analytic_isoline() {
        let grid = Grid::from_ranges(
            &AxisRange::new(0.5, 5.0, 0.01),
            &AxisRange::new(2.7, 3.6, 0.01),
        )
        .unwrap();
        let z = field::evaluate(&grid);
        let lines = trace(&grid.resistors, &grid.voltages, &z, 0.7).unwrap();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.points.len() > 100);
        for p in &line.points {
            assert_abs_diff_eq!(p.y, voltage_for_current(p.x, 0.7), epsilon = 1e-3);
        }
        assert!(line
            .points
            .iter()
            .any(|p| (p.x - 2.0).abs() < 0.01 && (p.y - 3.0168).abs() < 0.01));
    }

    #[test]
    fn levels_keep_their_order() {
        let x = unit_axes(4);
        let y = unit_axes(4);
        let z = Array2::from_shape_fn((4, 4), |(i, _)| i as f64);
        let levels = [2.5, 0.5, 10.0, 1.5];
        let traced = trace_levels(&x, &y, &z, &levels).unwrap();
        assert_eq!(traced.len(), 4);
        for (level, lines) in levels.iter().zip(&traced) {
            if *level > 3.0 {
                assert!(lines.is_empty());
            } else {
                assert_eq!(lines.len(), 1);
                assert!(lines[0].points.iter().all(|p| (p.y - level).abs() < 1e-12));
            }
        }
    }
}
