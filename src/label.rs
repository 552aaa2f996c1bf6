//! Inline contour labels: pick an anchor at mid arc length and cut a gap in the line around it.

use crate::contour::{ContourLine, Point};

/// Axis extents of the plot, used to measure distances in axis-normalized units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: (f64, f64),
    pub y: (f64, f64),
    // 宽/高
    pub aspect: f64,
}

impl Frame {
    fn normalize(&self, p: Point) -> (f64, f64) {
        (
            (p.x - self.x.0) / (self.x.1 - self.x.0),
            (p.y - self.y.0) / (self.y.1 - self.y.0),
        )
    }

    fn distance(&self, a: Point, b: Point) -> f64 {
        let (ax, ay) = self.normalize(a);
        let (bx, by) = self.normalize(b);
        (bx - ax).hypot(by - ay)
    }

    /// Screen angle in degrees of the direction `a -> b`, folded into (-90, 90].
    fn angle(&self, a: Point, b: Point) -> f64 {
        let (ax, ay) = self.normalize(a);
        let (bx, by) = self.normalize(b);
        let mut deg = (by - ay).atan2((bx - ax) * self.aspect).to_degrees();
        if deg > 90.0 {
            deg -= 180.0;
        } else if deg <= -90.0 {
            deg += 180.0;
        }
        deg
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineLabel {
    pub text: String,
    pub at: Point,
    pub angle: f64,
}

/// Fewest decimals that print every level of a layer exactly (0.25 step -> 2, a lone 0.7 -> 1).
pub fn decimals_for(levels: &[f64]) -> usize {
    (0..=MAX_DECIMALS)
        .find(|&d| {
            let scale = 10f64.powi(d as i32);
            levels
                .iter()
                .all(|l| ((l * scale).round() - l * scale).abs() < 1e-9)
        })
        .unwrap_or(MAX_DECIMALS)
}

const MAX_DECIMALS: usize = 6;

pub fn level_text(level: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, level)
}

/// Split `line` around a label placed at half its arc length, the text printed with `decimals`.
///
/// Points closer than `gap` (axis-normalized) to the anchor are dropped. Lines
/// shorter than two gaps are returned whole and unlabeled.
pub fn place(
    line: &ContourLine,
    frame: &Frame,
    gap: f64,
    decimals: usize,
) -> (Vec<Vec<Point>>, Option<InlineLabel>) {
    let pts = &line.points;
    if pts.len() < 2 {
        return (Vec::new(), None);
    }
    let mut arc = Vec::with_capacity(pts.len());
    arc.push(0.0);
    for w in pts.windows(2) {
        let s = arc[arc.len() - 1] + frame.distance(w[0], w[1]);
        arc.push(s);
    }
    let total = arc[arc.len() - 1];
    if !(total >= 2.0 * gap) {
        return (vec![pts.clone()], None);
    }

    let half = total / 2.0;
    let k = arc
        .windows(2)
        .position(|w| w[1] >= half)
        .unwrap_or(pts.len() - 2);
    let (a, b) = (pts[k], pts[k + 1]);
    let span = arc[k + 1] - arc[k];
    let t = if span > 0.0 { (half - arc[k]) / span } else { 0.0 };
    let at = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    let label = InlineLabel {
        text: level_text(line.level, decimals),
        at,
        angle: frame.angle(a, b),
    };

    let mut pieces: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for &p in pts {
        if frame.distance(p, at) < gap {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
        } else {
            current.push(p);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    // a closed line wraps around: the last piece runs on into the first
    if line.closed && pieces.len() > 1 {
        let head = pieces.remove(0);
        if let Some(tail) = pieces.last_mut() {
            tail.extend(head.into_iter().skip(1));
        }
    }
    pieces.retain(|piece| piece.len() >= 2);
    (pieces, Some(label))
}
