/*
[INPUT]:  One parsed credential, its proxy-bound client, the shared user-agent store
[OUTPUT]: An account session with a pinned fingerprint and cached game state
[POS]:    Execution layer - per-account identity and state
[UPDATE]: When session setup or snapshot caching changes
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use zoo_adapter::{
    AccountCredential, Credentials, GameStateSnapshot, UserAgentBinding, UserAgentStore, ZooClient,
};

/// One account's identity, client and last fetched snapshot
#[derive(Debug)]
pub struct AccountSession {
    index: usize,
    credential: AccountCredential,
    client: ZooClient,
    user_agents: Arc<UserAgentStore>,
    fingerprint: Option<UserAgentBinding>,
    proxy_ip: Option<String>,
    snapshot: Option<GameStateSnapshot>,
}

impl AccountSession {
    pub fn new(
        index: usize,
        credential: AccountCredential,
        client: ZooClient,
        user_agents: Arc<UserAgentStore>,
    ) -> Self {
        Self {
            index,
            credential,
            client,
            user_agents,
            fingerprint: None,
            proxy_ip: None,
            snapshot: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn credential(&self) -> &AccountCredential {
        &self.credential
    }

    pub fn client(&self) -> &ZooClient {
        &self.client
    }

    pub fn fingerprint(&self) -> Option<&UserAgentBinding> {
        self.fingerprint.as_ref()
    }

    pub fn proxy_ip(&self) -> Option<&str> {
        self.proxy_ip.as_deref()
    }

    pub fn snapshot(&self) -> Option<&GameStateSnapshot> {
        self.snapshot.as_ref()
    }

    /// Bind (or reuse) this account's user agent and pin the outbound headers
    pub async fn ensure_user_agent(&mut self) -> Result<&UserAgentBinding> {
        let binding = self
            .user_agents
            .get_or_create(self.credential.account_id())
            .await
            .context("bind user agent")?;

        self.client.set_credentials(Credentials {
            api_key: self.credential.api_key().to_string(),
            fingerprint: binding.clone(),
        });
        Ok(self.fingerprint.insert(binding))
    }

    /// Look up the egress IP of the bound proxy; failures only warn
    pub async fn resolve_proxy_ip(&mut self) -> Option<&str> {
        self.client.proxy()?;

        match self.client.probe_proxy_ip().await {
            Ok(ip) => {
                self.proxy_ip = Some(ip);
            }
            Err(err) => {
                warn!(error = %err, "proxy check failed");
            }
        }
        self.proxy_ip.as_deref()
    }

    /// Fetch the full game state and cache it on the session
    pub async fn fetch_user_data(&mut self) -> zoo_adapter::Result<&GameStateSnapshot> {
        let snapshot = self.client.get_user_data().await?;
        Ok(self.snapshot.insert(snapshot))
    }
}

/// Create a user-agent binding for every parseable account before any network activity
pub async fn prime_user_agents(store: &UserAgentStore, raw_accounts: &[String]) -> usize {
    let mut primed = 0;
    for (index, raw) in raw_accounts.iter().enumerate() {
        let credential = match AccountCredential::parse(raw) {
            Ok(credential) => credential,
            Err(err) => {
                warn!(account = index + 1, error = %err, "cannot bind user agent; refresh the auth string");
                continue;
            }
        };
        match store.get_or_create(credential.account_id()).await {
            Ok(_) => primed += 1,
            Err(err) => {
                warn!(account = index + 1, error = %err, "failed to persist user agent");
            }
        }
    }
    info!(primed, total = raw_accounts.len(), "user agents ready");
    primed
}
