use diode_resistor_plot::{diode_figure, render};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 计算电流场并画等高线
    let figure = diode_figure()?;
    render::show(&figure)?;
    Ok(())
}
