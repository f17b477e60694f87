/*
[INPUT]:  YAML configuration file (optional)
[OUTPUT]: Parsed and validated runner configuration
[POS]:    Configuration layer - scheduler, feature toggles, input paths
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use zoo_adapter::ClientConfig;
use zoo_adapter::http::{DEFAULT_BASE_URL, DEFAULT_IP_PROBE_URL};

/// Top-level configuration for the farm runner
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub api: ApiConfig,
    pub inputs: InputConfig,
    pub proxy: ProxyConfig,
    pub scheduler: SchedulerConfig,
    pub features: FeatureConfig,
    /// Raise the log level to debug
    pub debug: bool,
    pub logging: LoggingConfig,
    /// Replaces the built-in user-agent pool when non-empty
    pub user_agents: Vec<String>,
}

/// Game API endpoints and timeouts
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Lookup service publishing the current base URL
    pub discovery_url: Option<String>,
    pub request_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub ip_probe_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            discovery_url: None,
            request_timeout_secs: 30,
            probe_timeout_secs: 10,
            ip_probe_url: DEFAULT_IP_PROBE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.request_timeout_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            ip_probe_url: self.ip_probe_url.clone(),
            ..ClientConfig::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub accounts_file: PathBuf,
    pub proxies_file: PathBuf,
    pub user_agent_cache: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            accounts_file: PathBuf::from("data.txt"),
            proxies_file: PathBuf::from("proxy.txt"),
            user_agent_cache: PathBuf::from("session_user_agents.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub enabled: bool,
    /// Refuse to start when there are fewer proxies than accounts
    pub require_one_per_account: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            require_one_per_account: true,
        }
    }
}

/// Batch dispatch and pacing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub concurrency: usize,
    pub cycle_sleep_minutes: u64,
    /// Random per-account jitter range `[min, max]` in seconds
    pub start_delay_secs: [u64; 2],
    pub batch_delay_secs: u64,
    pub account_timeout_secs: u64,
    pub settle_delay_secs: u64,
    /// Wait until the first account's next feed time instead of the fixed cooldown
    pub cooldown_from_feed_time: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            cycle_sleep_minutes: 1440,
            start_delay_secs: [1, 15],
            batch_delay_secs: 3,
            account_timeout_secs: 24 * 60 * 60,
            settle_delay_secs: 2,
            cooldown_from_feed_time: true,
        }
    }
}

impl SchedulerConfig {
    pub fn cycle_sleep(&self) -> Duration {
        Duration::from_secs(self.cycle_sleep_minutes.saturating_mul(60))
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_secs(self.batch_delay_secs)
    }

    pub fn account_timeout(&self) -> Duration {
        Duration::from_secs(self.account_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

/// Pipeline feature toggles
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub auto_feed: bool,
    pub auto_task: bool,
    pub auto_buy_animal: bool,
    pub auto_upgrade_animal: bool,
    pub max_level_upgrade_animal: u32,
    /// Quest keys never attempted
    pub skip_tasks: Vec<String>,
    pub quest_delay_ms: u64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            auto_feed: true,
            auto_task: true,
            auto_buy_animal: true,
            auto_upgrade_animal: true,
            max_level_upgrade_animal: 10,
            skip_tasks: Vec::new(),
            quest_delay_ms: 1000,
        }
    }
}

impl FeatureConfig {
    pub fn quest_delay(&self) -> Duration {
        Duration::from_millis(self.quest_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for a daily-rolling log file; console only when unset
    pub file_dir: Option<PathBuf>,
}

impl RunnerConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scheduler.concurrency == 0 {
            bail!("scheduler.concurrency must be at least 1");
        }
        let [min, max] = self.scheduler.start_delay_secs;
        if min > max {
            bail!("scheduler.start_delay_secs range is inverted: [{min}, {max}]");
        }
        if self.scheduler.account_timeout_secs == 0 {
            bail!("scheduler.account_timeout_secs must be greater than zero");
        }
        if self.api.base_url.trim().is_empty() && self.api.discovery_url.is_none() {
            bail!("api.base_url is empty and no api.discovery_url is configured");
        }
        Ok(())
    }
}
