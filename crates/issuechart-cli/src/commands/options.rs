//! Option lists for each selector, in the order the dashboard shows them.

use anyhow::Result;
use issuechart_core::render::{OptionListRenderer, SelectOption};
use issuechart_core::selection::SelectionController;

use super::open_controller;
use crate::render::TextRenderer;

fn print(label: &str, options: &[SelectOption]) {
    print!("{}", TextRenderer::default().render_options(label, options));
}

pub async fn projects() -> Result<()> {
    let controller = open_controller()?;
    print("Select Project", &controller.project_options().await);
    Ok(())
}

pub async fn issue_types() -> Result<()> {
    let controller = open_controller()?;
    print("Select Issue Type", &controller.issue_type_options().await);
    Ok(())
}

pub async fn fields() -> Result<()> {
    let controller = open_controller()?;
    print("Select Field", &controller.field_options().await);
    Ok(())
}

pub async fn nested_fields() -> Result<()> {
    let mut controller = open_controller()?;
    print("Select Nested Field", &controller.nested_field_options().await);
    Ok(())
}

pub async fn priorities() -> Result<()> {
    let controller = open_controller()?;
    print("Select Priority", &controller.priority_options().await);
    Ok(())
}

pub fn intervals() {
    print("Select Interval", &SelectionController::interval_options());
}
