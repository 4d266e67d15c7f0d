use anyhow::{Context, Result};
use issuechart_infrastructure::ConfigService;

pub fn submit(username: &str) -> Result<()> {
    let service = ConfigService::new()?;
    service
        .submit_username(username)
        .context("Failed to save configuration")?;
    println!("Saved configuration to {}", service.path().display());
    Ok(())
}

pub fn show() -> Result<()> {
    let config = ConfigService::new()?.load()?;
    println!("Username: {}", config.username);
    if !config.site.base_url.is_empty() {
        println!("Site: {}", config.site.base_url);
    }
    Ok(())
}
