/*
[INPUT]:  Mock game server and several accounts
[OUTPUT]: End-to-end verification of batched cycles with failure isolation
[POS]:    Integration test layer - scheduler over real pipelines
[UPDATE]: When scheduler dispatch or cooldown rules change
*/

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio_test::assert_ok;
use common::{auth_string, context, fast_config, idle_user_data, success, temp_dir};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoo_farm::pipeline::run_account;
use zoo_farm::{BatchScheduler, OutcomeStatus, ProxyAssignment};

#[tokio::test]
async fn test_cycle_isolates_failed_account() {
    let server = MockServer::start().await;
    let dir = temp_dir();

    // The rejected account is mounted first so it wins over the catch-all
    Mock::given(method("POST"))
        .and(path("/telegram/auth"))
        .and(header("api-key", "revoked"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(serde_json::json!({"message": "banned"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/telegram/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(serde_json::json!({}))))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/data/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(idle_user_data())))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/data/after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(serde_json::json!({
            "dailyRewards": {}
        }))))
        .mount(&server)
        .await;

    let mut config = fast_config();
    config.scheduler.concurrency = 2;
    let ctx = context(&server, config, &dir);

    let accounts = vec![
        auth_string(1, "Ana", "h1"),
        auth_string(2, "Ben", "revoked"),
        auth_string(3, "Cai", "h3"),
    ];
    let scheduler = BatchScheduler::new(ctx.config.clone(), accounts, ProxyAssignment::direct());
    assert_eq!(scheduler.batches().len(), 2);

    let runner = {
        let ctx = Arc::clone(&ctx);
        move |job| run_account(ctx.clone(), job)
    };
    let cycle = scheduler.run_cycle(1, &runner).await;

    assert_eq!(cycle.outcomes.len(), 3);
    assert!(cycle.outcomes[0].is_success());
    assert!(matches!(
        &cycle.outcomes[1].status,
        OutcomeStatus::Failed(message) if message.contains("banned")
    ));
    assert!(cycle.outcomes[2].is_success());
    assert_eq!(cycle.metrics.succeeded, 2);
    assert_eq!(cycle.metrics.failed, 1);

    // First account reported a feed time far in the future
    let now = Utc.with_ymd_and_hms(2098, 12, 31, 23, 0, 0).unwrap();
    assert_eq!(
        scheduler.cooldown(&cycle.outcomes, now),
        Duration::from_secs(3600)
    );

    let user_agents: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.join("session_user_agents.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(user_agents.as_object().unwrap().len(), 3);

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_single_cycle_mode_returns() {
    let server = MockServer::start().await;
    let dir = temp_dir();

    Mock::given(method("POST"))
        .and(path("/telegram/auth"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, fast_config(), &dir);
    let scheduler = BatchScheduler::new(
        ctx.config.clone(),
        vec![auth_string(9, "Solo", "h9")],
        ProxyAssignment::direct(),
    );

    // A single cycle must not wait for the cooldown
    let cycles = assert_ok!(
        tokio::time::timeout(
            Duration::from_secs(10),
            scheduler.run(move |job| run_account(ctx.clone(), job), true),
        )
        .await
    );
    assert_eq!(cycles, 1);

    std::fs::remove_dir_all(dir).unwrap();
}
