//! CLI Status Command
//!
//! Queries `/api/health` on a running gateway.

use anyhow::{bail, Result};
use tracing::debug;

pub async fn run(base_url: &str) -> Result<()> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    debug!(url = %url, "Checking gateway health");

    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => {
            bail!("Gateway at {base_url} answered {}", resp.status());
        }
        Err(e) => {
            debug!(error = %e, "Health request failed");
            bail!("Florascope is not running at {base_url}");
        }
    }
    Ok(())
}
