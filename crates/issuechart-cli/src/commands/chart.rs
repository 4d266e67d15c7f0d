use anyhow::Result;
use issuechart_core::render::ChartRenderer;

use super::open_controller;
use crate::render::TextRenderer;

pub async fn show() -> Result<()> {
    let mut controller = open_controller()?;

    // Discovery decides whether a nested field is required before gating.
    controller.nested_field_options().await;

    if let Some(error) = controller.error() {
        println!("{error}");
        return Ok(());
    }

    match controller.chart().await {
        Some(chart) => print!("{}", TextRenderer::default().render_chart(&chart)),
        None => println!("Choose a field (and a nested field when offered) to render the chart."),
    }
    Ok(())
}
