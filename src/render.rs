//! Draw a [`FigureModel`] with gnuplot and keep the window open until it is closed.

use gnuplot::{
    AlignCenter, Axis, AxesCommon, Color, Figure, Fix, Font, LineWidth, Rotate, TextAlign,
    TextColor,
};
use tracing::{debug, info};

use crate::error::PlotError;
use crate::plot::FigureModel;

/// Translate the model into gnuplot commands.
pub fn to_figure(model: &FigureModel) -> Figure {
    let mut fg = Figure::new();
    let axes = fg.axes2d();
    axes.set_title(&model.title, &[]);
    axes.set_x_label(&model.x_label, &[]);
    axes.set_y_label(&model.y_label, &[]);
    axes.set_x_range(Fix(model.x_range.0), Fix(model.x_range.1));
    axes.set_y_range(Fix(model.y_range.0), Fix(model.y_range.1));
    axes.set_x_grid(model.grid);
    axes.set_y_grid(model.grid);

    for layer in &model.layers {
        let style = &layer.style;
        for piece in &layer.pieces {
            axes.lines(
                piece.iter().map(|p| p.x),
                piece.iter().map(|p| p.y),
                &[Color(style.color), LineWidth(style.line_width)],
            );
        }
        for label in &layer.labels {
            axes.label(
                &label.text,
                Axis(label.at.x),
                Axis(label.at.y),
                &[
                    TextColor(style.color),
                    Font("", style.font_size),
                    Rotate(label.angle),
                    TextAlign(AlignCenter),
                ],
            );
        }
    }
    fg
}

/// Open the figure in gnuplot's interactive terminal and block until the window is closed.
pub fn show(model: &FigureModel) -> Result<(), PlotError> {
    let mut fg = to_figure(model);
    // show() 之后 gnuplot 会一直等到窗口关闭
    let status = fg.show()?.wait()?;
    debug!(?status, "gnuplot exited");
    if !status.success() {
        return Err(PlotError::Display(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("gnuplot exited with {status}"),
        )));
    }
    info!("figure window closed");
    Ok(())
}
