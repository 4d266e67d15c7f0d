pub mod chart;
pub mod configure;
pub mod options;
pub mod select;

use std::sync::Arc;

use anyhow::{Context, Result};
use issuechart_core::query::QueryPipeline;
use issuechart_core::selection::SelectionController;
use issuechart_infrastructure::{ConfigService, FileKeyValueStore};
use issuechart_interaction::{JiraRequester, Resolver};

/// Restores the saved selection, wired to the configured Jira site.
///
/// Searches run with the user's credentials, `fetchProjects` with the
/// app credentials.
pub fn open_controller() -> Result<SelectionController> {
    let config = ConfigService::new()?
        .load()
        .context("Failed to load configuration")?;

    let user = JiraRequester::for_user(&config)
        .context("Jira site is not configured; set JIRA_BASE_URL, JIRA_EMAIL and JIRA_API_TOKEN")?;
    let app = JiraRequester::as_app(&config)?;

    let store = FileKeyValueStore::new().context("Failed to open selection storage")?;

    Ok(SelectionController::restore(
        Arc::new(store),
        QueryPipeline::new(Arc::new(user)),
        Arc::new(Resolver::with_defaults(Arc::new(app))),
    ))
}
