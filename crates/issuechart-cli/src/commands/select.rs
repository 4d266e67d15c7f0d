use anyhow::Result;
use issuechart_core::interval::Interval;
use issuechart_core::selection::SelectionController;

use super::open_controller;
use crate::SelectTarget;

pub fn apply(target: SelectTarget) -> Result<()> {
    let mut controller = open_controller()?;

    match target {
        SelectTarget::Project { value } => controller.choose_project(value),
        SelectTarget::IssueType { value } => controller.choose_issue_type(value),
        SelectTarget::Field { value } => controller.choose_field(value),
        SelectTarget::NestedField { value } => controller.choose_nested_field(value),
        SelectTarget::Priority { value } => controller.choose_priority(value),
        SelectTarget::Interval { value } => {
            let interval = Interval::from(value.as_str());
            if !interval.is_recognized() {
                tracing::warn!("[Selection] Unrecognized interval '{}'", value);
            }
            controller.choose_interval(interval);
        }
        SelectTarget::Jql { value } => controller.edit_filter_expression(value),
    }

    print_status(&controller);
    Ok(())
}

pub fn reset() -> Result<()> {
    let mut controller = open_controller()?;
    controller.reset();
    print_status(&controller);
    Ok(())
}

fn print_status(controller: &SelectionController) {
    for (key, value) in controller.selection().entries() {
        println!("{key}: {value}");
    }
    if let Some(error) = controller.error() {
        println!("{error}");
    }
}
