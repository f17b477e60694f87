/*
[INPUT]:  Account ids and the local user-agent cache file
[OUTPUT]: Stable per-account user-agent bindings
[POS]:    Auth layer - persistent browser fingerprint storage
[UPDATE]: When the cache format or the user-agent pool changes
*/

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::http::{Result, ZooError};
use crate::types::Platform;

/// Mobile WebView user agents handed out to new accounts
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148",
    "Mozilla/5.0 (iPad; CPU OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148",
    "Mozilla/5.0 (Linux; Android 14; SM-S918B Build/UP1A.231005.007; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/127.0.6533.103 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 13; Pixel 7 Build/TQ3A.230805.001; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/127.0.6533.64 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 12; M2101K6G Build/SKQ1.210908.001; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/126.0.6478.134 Mobile Safari/537.36",
];

/// A user agent and the platform tag derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentBinding {
    pub user_agent: String,
    pub platform: Platform,
}

impl UserAgentBinding {
    pub fn new(user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        let platform = Platform::detect(&user_agent);
        Self {
            user_agent,
            platform,
        }
    }
}

/// File-backed `{ "<account id>": "<user agent>" }` map shared by all sessions
///
/// Every update rewrites the whole file while holding the lock, so concurrent
/// sessions never lose each other's entries.
#[derive(Debug)]
pub struct UserAgentStore {
    path: PathBuf,
    pool: Vec<String>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl UserAgentStore {
    /// Load the cache; a missing file starts empty
    pub fn load(path: impl AsRef<Path>, pool: Vec<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let pool = if pool.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect()
        } else {
            pool
        };

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(ZooError::Storage(err)),
        };

        Ok(Self {
            path,
            pool,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, account_id: &str) -> Option<UserAgentBinding> {
        self.entries
            .lock()
            .await
            .get(account_id)
            .map(UserAgentBinding::new)
    }

    /// Return the stored binding, creating and persisting one on first use
    pub async fn get_or_create(&self, account_id: &str) -> Result<UserAgentBinding> {
        let mut entries = self.entries.lock().await;
        if let Some(user_agent) = entries.get(account_id) {
            return Ok(UserAgentBinding::new(user_agent));
        }

        let user_agent = {
            let mut rng = rand::thread_rng();
            self.pool
                .choose(&mut rng)
                .cloned()
                .ok_or_else(|| ZooError::Config("user agent pool is empty".to_string()))?
        };

        entries.insert(account_id.to_string(), user_agent.clone());
        if let Err(err) = self.persist(&entries).await {
            entries.remove(account_id);
            return Err(err);
        }

        tracing::debug!(account_id, user_agent = %user_agent, "user agent bound");
        Ok(UserAgentBinding::new(user_agent))
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}
