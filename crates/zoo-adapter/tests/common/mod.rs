/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for zoo-adapter tests

use std::path::PathBuf;

use wiremock::MockServer;
use zoo_adapter::{AccountCredential, ClientConfig, Credentials, UserAgentBinding, ZooClient};

/// Auth string for account 42 ("Ann Lee") with api key `deadbeef`
pub const TEST_AUTH: &str = "query_id=AAHx&user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ann%22%2C%22last_name%22%3A%22Lee%22%7D&auth_date=1700000000&start_param=ref_9&hash=deadbeef";

/// Setup a mock HTTP server for testing
#[allow(dead_code)]
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

#[allow(dead_code)]
pub fn test_credential() -> AccountCredential {
    AccountCredential::parse(TEST_AUTH).expect("fixture credential parses")
}

/// Client pointed at the mock server, signed for [`TEST_AUTH`]
#[allow(dead_code)]
pub fn signed_client(server: &MockServer) -> ZooClient {
    let config = ClientConfig {
        ip_probe_url: format!("{}/ip", server.uri()),
        ..ClientConfig::default()
    };
    let mut client = ZooClient::with_config_and_base_url(config, &server.uri(), None)
        .expect("client builds");
    client.set_credentials(Credentials {
        api_key: test_credential().api_key().to_string(),
        fingerprint: UserAgentBinding::new("Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X)"),
    });
    client
}

#[allow(dead_code)]
pub fn temp_path(file_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("zoo-adapter-test-{}", uuid::Uuid::new_v4()));
    path.push(file_name);
    path
}

/// Minimal `/user/data/all` payload
#[allow(dead_code)]
pub fn user_data_fixture() -> serde_json::Value {
    serde_json::json!({
        "hero": {"coins": 1200, "tokens": "4.5", "onboarding": ["1", "20"]},
        "animals": [{"key": "chicken", "level": 2, "position": 0}],
        "feed": {"isNeedFeed": false, "nextFeedTime": "2030-01-01 08:00:00"},
        "dbData": {
            "dbQuests": [
                {"key": "follow_x", "checkType": "username"},
                {"key": "rebus_1", "checkType": "checkCode", "checkData": "ZOO"}
            ],
            "dbAnimals": [
                {"key": "chicken", "title": "Chicken", "levels": [
                    {"level": 1, "price": 100},
                    {"level": 2, "price": 250},
                    {"level": 3, "price": 600}
                ]}
            ]
        }
    })
}
