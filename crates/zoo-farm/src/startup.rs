/*
[INPUT]:  Runner configuration
[OUTPUT]: Loaded account/proxy inputs and the resolved game API base URL
[POS]:    Startup layer - fatal checks before the first cycle
[UPDATE]: When startup inputs or endpoint discovery change
*/

use anyhow::{Context, Result};
use tracing::info;
use zoo_adapter::ZooClient;

use crate::accounts::{ProxyAssignment, load_lines, load_optional_lines, validate_inputs};
use crate::config::{ApiConfig, RunnerConfig};

/// Account lines and the proxy binding derived from them
#[derive(Debug, Clone)]
pub struct Inputs {
    pub accounts: Vec<String>,
    pub proxies: ProxyAssignment,
}

/// Load and validate the account and proxy files
pub fn load_inputs(config: &RunnerConfig) -> Result<Inputs> {
    let accounts = load_lines(&config.inputs.accounts_file).context("load accounts file")?;
    let proxy_lines = if config.proxy.enabled {
        load_optional_lines(&config.inputs.proxies_file).context("load proxies file")?
    } else {
        Vec::new()
    };

    validate_inputs(&accounts, &proxy_lines, &config.proxy)?;
    info!(
        accounts = accounts.len(),
        proxies = proxy_lines.len(),
        "inputs loaded"
    );

    Ok(Inputs {
        accounts,
        proxies: ProxyAssignment::new(proxy_lines),
    })
}

/// Use the discovery service when configured, else the static base URL
pub async fn resolve_base_url(api: &ApiConfig) -> Result<String> {
    let Some(discovery_url) = api.discovery_url.as_deref() else {
        return Ok(api.base_url.trim_end_matches('/').to_string());
    };

    info!(discovery_url, "checking API endpoint");
    let (base_url, notice) = ZooClient::discover_endpoint(discovery_url, &api.client_config())
        .await
        .context("discover game API endpoint")?;
    if let Some(notice) = notice {
        info!(%notice, "endpoint notice");
    }
    info!(%base_url, "game API endpoint resolved");
    Ok(base_url)
}
