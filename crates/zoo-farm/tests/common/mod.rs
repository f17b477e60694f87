/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared fixtures for pipeline and scheduler tests
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for zoo-farm tests

use std::path::PathBuf;
use std::sync::Arc;

use wiremock::MockServer;
use zoo_adapter::UserAgentStore;
use zoo_farm::{PipelineContext, RunnerConfig};

/// Build an auth string for a user id, first name and api key
#[allow(dead_code)]
pub fn auth_string(id: u64, first_name: &str, hash: &str) -> String {
    format!(
        "query_id=AAE{id}&user=%7B%22id%22%3A{id}%2C%22first_name%22%3A%22{first_name}%22%7D&auth_date=1700000000&hash={hash}"
    )
}

/// Configuration with every pacing delay set to zero
#[allow(dead_code)]
pub fn fast_config() -> RunnerConfig {
    let mut config = RunnerConfig::default();
    config.scheduler.start_delay_secs = [0, 0];
    config.scheduler.settle_delay_secs = 0;
    config.scheduler.batch_delay_secs = 0;
    config.features.quest_delay_ms = 0;
    config.proxy.enabled = false;
    config
}

#[allow(dead_code)]
pub fn temp_dir() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("zoo-farm-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&path).expect("create temp dir");
    path
}

/// Pipeline context pointed at the mock server with a fresh user-agent cache
#[allow(dead_code)]
pub fn context(server: &MockServer, config: RunnerConfig, dir: &PathBuf) -> Arc<PipelineContext> {
    let store = UserAgentStore::load(dir.join("session_user_agents.json"), Vec::new())
        .expect("load user agent store");
    Arc::new(PipelineContext {
        config: Arc::new(config),
        base_url: server.uri(),
        user_agents: Arc::new(store),
    })
}

/// Account state with nothing left to do this cycle
#[allow(dead_code)]
pub fn idle_user_data() -> serde_json::Value {
    serde_json::json!({
        "hero": {"coins": 0, "tokens": 12, "onboarding": ["1", "20"]},
        "animals": [],
        "feed": {"isNeedFeed": false, "nextFeedTime": "2099-01-01 00:00:00"},
        "dbData": {"dbQuests": [], "dbAnimals": []}
    })
}

#[allow(dead_code)]
pub fn success(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"success": true, "data": data})
}
