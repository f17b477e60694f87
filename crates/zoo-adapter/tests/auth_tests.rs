/*
[INPUT]:  Auth strings and temporary cache files
[OUTPUT]: Test results for credential parsing and fingerprint storage
[POS]:    Integration tests - auth layer
[UPDATE]: When credential format or user-agent cache changes
*/

mod common;

use common::{TEST_AUTH, temp_path};
use rstest::rstest;
use std::sync::Arc;
use zoo_adapter::{AccountCredential, Platform, UserAgentStore, ZooError};

#[test]
fn test_fixture_credential() {
    let credential = AccountCredential::parse(TEST_AUTH).unwrap();
    assert_eq!(credential.account_id(), "42");
    assert_eq!(credential.display_name(), "Ann Lee");
    assert_eq!(credential.api_key(), "deadbeef");
    assert_eq!(credential.auth_request().start_param, "ref_9");
}

#[rstest]
#[case("")]
#[case("query_id=AAHx&auth_date=1")]
#[case("user=%7B%22id%22%3A1%7D")]
#[case("user=%7B%22id%22%3A1%7D&hash=")]
#[case("user=%7B%22first_name%22%3A%22x%22%7D&hash=abc")]
fn test_invalid_credentials(#[case] raw: &str) {
    let err = AccountCredential::parse(raw).unwrap_err();
    assert!(matches!(err, ZooError::InvalidCredential(_)));
}

#[tokio::test]
async fn test_user_agent_pool_override() {
    let path = temp_path("session_user_agents.json");
    let pool = vec!["Mozilla/5.0 (Linux; Android 11; Redmi Note 10)".to_string()];
    let store = UserAgentStore::load(&path, pool).unwrap();

    let binding = store.get_or_create("42").await.unwrap();
    assert_eq!(binding.platform, Platform::Android);
    assert_eq!(binding.user_agent, "Mozilla/5.0 (Linux; Android 11; Redmi Note 10)");

    let content = std::fs::read_to_string(&path).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(saved["42"], "Mozilla/5.0 (Linux; Android 11; Redmi Note 10)");

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[tokio::test]
async fn test_existing_cache_entries_are_reused() {
    let path = temp_path("session_user_agents.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{"42": "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X)"}"#,
    )
    .unwrap();

    let store = Arc::new(UserAgentStore::load(&path, Vec::new()).unwrap());
    let binding = store.get_or_create("42").await.unwrap();
    assert_eq!(binding.platform, Platform::Ios);
    assert_eq!(store.len().await, 1);

    let other = store.get_or_create("43").await.unwrap();
    assert!(!other.user_agent.is_empty());
    assert_eq!(store.len().await, 2);

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
