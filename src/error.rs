//! Error type shared by the evaluation, tracing and rendering stages.

use thiserror::Error;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum PlotError {
    /// The field does not match the lengths of the two coordinate axes.
    #[error("field shape {field:?} does not match axes (rows = {rows}, cols = {cols})")]
    ShapeMismatch {
        field: (usize, usize),
        rows: usize,
        cols: usize,
    },
    /// An axis range produced no samples.
    #[error("axis range [{start}, {stop}) with step {step} is empty")]
    EmptyAxis { start: f64, stop: f64, step: f64 },
    /// An axis needs at least two distinct samples to span a plot range.
    #[error("{0} axis does not span a range")]
    DegenerateAxis(String),
    /// gnuplot could not be started.
    #[error("failed to start gnuplot: {0}")]
    Gnuplot(#[from] gnuplot::GnuplotInitError),
    /// Waiting on the figure window failed, or gnuplot exited unsuccessfully.
    #[error("display error: {0}")]
    Display(#[from] std::io::Error),
}
