/*
[INPUT]:  Account and proxy list files
[OUTPUT]: Ordered credential lines and index-based proxy assignment
[POS]:    Input layer - startup loading and validation
[UPDATE]: When input file formats or assignment rules change
*/

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::ProxyConfig;

/// Read a newline-separated list, dropping blank lines and `\r`
pub fn load_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(parse_lines(&content))
}

/// Like [`load_lines`], but a missing file yields an empty list
pub fn load_optional_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    load_lines(path)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .replace('\r', "")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Binds proxies to accounts by position, wrapping around when the list is shorter
#[derive(Debug, Clone, Default)]
pub struct ProxyAssignment {
    proxies: Vec<String>,
}

impl ProxyAssignment {
    pub fn new(proxies: Vec<String>) -> Self {
        Self { proxies }
    }

    /// No proxies at all; every account connects directly
    pub fn direct() -> Self {
        Self::default()
    }

    pub fn proxy_for(&self, index: usize) -> Option<&str> {
        if self.proxies.is_empty() {
            return None;
        }
        self.proxies
            .get(index % self.proxies.len())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

/// Reject input combinations the runner cannot start with
pub fn validate_inputs(accounts: &[String], proxies: &[String], proxy: &ProxyConfig) -> Result<()> {
    if accounts.is_empty() {
        bail!("no accounts loaded");
    }
    if proxy.enabled && proxy.require_one_per_account && accounts.len() > proxies.len() {
        bail!(
            "proxy count must match account count (accounts: {}, proxies: {})",
            accounts.len(),
            proxies.len()
        );
    }
    Ok(())
}
