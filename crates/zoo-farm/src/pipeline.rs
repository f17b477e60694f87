/*
[INPUT]:  One account job (index, auth string, proxy), shared runner context
[OUTPUT]: PipelineReport on success, error when a prerequisite step fails
[POS]:    Execution layer - per-account game action sequence
[UPDATE]: When steps are added, reordered, or their failure policy changes
*/

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};
use zoo_adapter::http::{ONBOARDING_FEED_STEP, ONBOARDING_INITIAL_STEP};
use zoo_adapter::{
    AccountCredential, CatalogAnimal, DailyRewardState, GameStateSnapshot, OwnedAnimal,
    PostActionState, QuestCheckType, QuestDefinition, UserAgentStore, ZooClient,
};

use crate::config::{FeatureConfig, RunnerConfig};
use crate::session::AccountSession;

/// Highest daily-reward slot scanned each cycle
pub const DAILY_REWARD_DAYS: u32 = 16;
/// First slot handed out when buying a new animal
pub const FIRST_ANIMAL_POSITION: u32 = 1;

/// Shared, read-only inputs for every pipeline in a run
#[derive(Debug)]
pub struct PipelineContext {
    pub config: Arc<RunnerConfig>,
    pub base_url: String,
    pub user_agents: Arc<UserAgentStore>,
}

/// One account scheduled for a cycle
#[derive(Debug, Clone)]
pub struct AccountJob {
    /// Zero-based position in the accounts file
    pub index: usize,
    pub raw_credential: String,
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Onboarding,
    Feed,
    Quests,
    Purchases,
    Upgrades,
    DailyReward,
    FinalRefresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Skipped,
    Failed(String),
}

/// Result of a pipeline that got past authentication and the first fetch
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub display_name: String,
    /// Set only when the first snapshot said feeding is not due yet
    pub next_feed_time: Option<DateTime<Utc>>,
    pub tokens: Decimal,
    pub coins: Decimal,
    pub steps: Vec<(PipelineStep, StepStatus)>,
}

impl PipelineReport {
    pub fn step(&self, step: PipelineStep) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|(recorded, _)| *recorded == step)
            .map(|(_, status)| status)
    }
}

/// How a quest from the catalog is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestAction {
    SkipListed,
    Manual,
    CheckThenClaim,
    Claim,
}

pub fn classify_quest(quest: &QuestDefinition, skip_tasks: &[String]) -> QuestAction {
    if skip_tasks.iter().any(|key| key == &quest.key) {
        QuestAction::SkipListed
    } else if quest.check_type.requires_manual_completion() {
        QuestAction::Manual
    } else if quest.check_type == QuestCheckType::CheckCode {
        QuestAction::CheckThenClaim
    } else {
        QuestAction::Claim
    }
}

/// Lowest claimable day in `1..=16`
pub fn select_daily_reward_day(state: &PostActionState) -> Option<u32> {
    (1..=DAILY_REWARD_DAYS).find(|day| state.reward_state(*day) == Some(DailyRewardState::CanTake))
}

/// Lowest position starting at 1 that no animal occupies
pub fn next_free_position(used: &BTreeSet<u32>) -> u32 {
    let mut position = FIRST_ANIMAL_POSITION;
    while used.contains(&position) {
        position += 1;
    }
    position
}

/// Next level and its price, if the animal may be upgraded at all
pub fn upgrade_target(
    animal: &OwnedAnimal,
    catalog: &CatalogAnimal,
    max_level: u32,
) -> Option<(u32, Decimal)> {
    if animal.level >= max_level {
        return None;
    }
    let next_level = animal.level + 1;
    catalog.level(next_level).map(|entry| (next_level, entry.price))
}

/// Run every step for one account
///
/// Errors are returned only for prerequisites: a malformed credential, client setup,
/// authentication, or the first state fetch. Everything after that is best-effort.
pub async fn run_account(ctx: Arc<PipelineContext>, job: AccountJob) -> Result<PipelineReport> {
    let credential =
        AccountCredential::parse(&job.raw_credential).context("parse account credential")?;

    let client = ZooClient::with_config_and_base_url(
        ctx.config.api.client_config(),
        &ctx.base_url,
        job.proxy.as_deref(),
    )
    .context("build game client")?;

    let mut session = AccountSession::new(job.index, credential, client, ctx.user_agents.clone());
    session.ensure_user_agent().await?;

    if let Some(ip) = session.resolve_proxy_ip().await {
        tracing::Span::current().record("proxy_ip", ip);
    }

    let display_name = session.credential().display_name();
    let start_delay = start_jitter(ctx.config.scheduler.start_delay_secs);
    info!(
        name = %display_name,
        proxy_ip = session.proxy_ip().unwrap_or("none"),
        delay_secs = start_delay.as_secs(),
        "account starting"
    );
    tokio::time::sleep(start_delay).await;

    info!("logging in");
    session
        .client()
        .authenticate(session.credential())
        .await
        .context("authenticate")?;
    info!("login succeeded");

    let initial = session
        .fetch_user_data()
        .await
        .context("fetch initial user data")?
        .clone();

    let next_feed_time = if initial.feed.is_need_feed {
        None
    } else {
        initial.feed.next_feed_at()
    };
    if let Some(at) = next_feed_time {
        info!(next_feed_time = %at, "feed not due yet");
    }

    let features = &ctx.config.features;
    let mut steps = Vec::new();

    steps.push((PipelineStep::Onboarding, finish_onboarding(&session, &initial).await));

    let feed = if features.auto_feed {
        auto_feed(&mut session).await
    } else {
        StepStatus::Skipped
    };
    steps.push((PipelineStep::Feed, feed));

    let quests = if features.auto_task {
        complete_quests(&mut session, features).await
    } else {
        StepStatus::Skipped
    };
    steps.push((PipelineStep::Quests, quests));

    let (purchases, upgrades) = if features.auto_buy_animal || features.auto_upgrade_animal {
        buy_or_upgrade_animals(&mut session, features).await
    } else {
        (StepStatus::Skipped, StepStatus::Skipped)
    };
    steps.push((PipelineStep::Purchases, purchases));
    steps.push((PipelineStep::Upgrades, upgrades));

    steps.push((PipelineStep::DailyReward, claim_daily_reward(&session).await));

    let final_refresh = match session.fetch_user_data().await {
        Ok(_) => StepStatus::Done,
        Err(err) => {
            warn!(error = %err, "final refresh failed");
            StepStatus::Failed(err.to_string())
        }
    };
    steps.push((PipelineStep::FinalRefresh, final_refresh));

    let hero = session
        .snapshot()
        .map(|snapshot| snapshot.hero.clone())
        .unwrap_or_default();
    info!(tokens = %hero.tokens, coins = %hero.coins, "account finished");

    tokio::time::sleep(ctx.config.scheduler.settle_delay()).await;

    Ok(PipelineReport {
        display_name,
        next_feed_time,
        tokens: hero.tokens,
        coins: hero.coins,
        steps,
    })
}

fn start_jitter([min, max]: [u64; 2]) -> Duration {
    if max <= min {
        return Duration::from_secs(min);
    }
    let secs = rand::thread_rng().gen_range(min..=max);
    Duration::from_secs(secs)
}

async fn finish_onboarding(session: &AccountSession, snapshot: &GameStateSnapshot) -> StepStatus {
    if !snapshot.hero.needs_onboarding() {
        return StepStatus::Skipped;
    }

    info!("finishing onboarding");
    match session.client().finish_onboarding(ONBOARDING_INITIAL_STEP).await {
        Ok(_) => {
            info!("onboarding finished");
            StepStatus::Done
        }
        Err(err) => {
            warn!(error = %err, "onboarding failed");
            StepStatus::Failed(err.to_string())
        }
    }
}

async fn auto_feed(session: &mut AccountSession) -> StepStatus {
    let snapshot = match session.fetch_user_data().await {
        Ok(snapshot) => snapshot.clone(),
        Err(err) => {
            error!(error = %err, "feed skipped: cannot load user data");
            return StepStatus::Failed(err.to_string());
        }
    };

    if !snapshot.feed.is_need_feed {
        debug!("feeding not due");
        return StepStatus::Skipped;
    }

    let feed_marker = ONBOARDING_FEED_STEP.to_string();
    if !snapshot.hero.has_onboarding_step(&feed_marker) {
        if let Err(err) = session.client().finish_onboarding(ONBOARDING_FEED_STEP).await {
            error!(error = %err, "failed to complete feed onboarding");
            return StepStatus::Failed(format!("onboarding step {ONBOARDING_FEED_STEP}: {err}"));
        }
    }

    match session.client().buy_auto_feed().await {
        Ok(_) => {
            info!("animals fed");
            StepStatus::Done
        }
        Err(err) => {
            error!(error = %err, "feeding failed");
            StepStatus::Failed(err.to_string())
        }
    }
}

async fn complete_quests(session: &mut AccountSession, features: &FeatureConfig) -> StepStatus {
    let quests = match session.fetch_user_data().await {
        Ok(snapshot) => snapshot.db_data.db_quests.clone(),
        Err(err) => {
            error!(error = %err, "cannot load quest list");
            return StepStatus::Failed(err.to_string());
        }
    };

    for quest in &quests {
        let action = classify_quest(quest, &features.skip_tasks);
        let check_data = quest.check_data.as_ref();

        let result = match action {
            QuestAction::SkipListed | QuestAction::Manual => {
                debug!(quest = %quest.key, check_type = quest.check_type.as_str(), "quest skipped");
                continue;
            }
            QuestAction::CheckThenClaim => {
                info!(quest = %quest.key, "answering daily question");
                match session.client().check_quest(&quest.key, check_data).await {
                    Ok(_) => session.client().claim_quest(&quest.key, check_data).await,
                    Err(err) => Err(err),
                }
            }
            QuestAction::Claim => session.client().claim_quest(&quest.key, None).await,
        };

        let title = quest.title.as_deref().unwrap_or("");
        match result {
            Ok(_) => info!(quest = %quest.key, title, "quest completed"),
            Err(err) if err.is_already_rewarded() => {
                info!(quest = %quest.key, title, "quest already completed")
            }
            Err(err) => warn!(
                quest = %quest.key,
                title,
                error = %err,
                "quest not completed; may need manual action"
            ),
        }

        tokio::time::sleep(features.quest_delay()).await;
    }

    StepStatus::Done
}

async fn buy_or_upgrade_animals(
    session: &mut AccountSession,
    features: &FeatureConfig,
) -> (StepStatus, StepStatus) {
    let snapshot = match session.fetch_user_data().await {
        Ok(snapshot) => snapshot.clone(),
        Err(err) => {
            error!(error = %err, "cannot load animals");
            let status = StepStatus::Failed(err.to_string());
            return (status.clone(), status);
        }
    };

    let mut coins = snapshot.hero.coins;

    let purchases = if features.auto_buy_animal {
        buy_missing_animals(session.client(), &snapshot, &mut coins).await;
        StepStatus::Done
    } else {
        StepStatus::Skipped
    };

    let upgrades = if features.auto_upgrade_animal {
        upgrade_owned_animals(
            session.client(),
            &snapshot,
            &mut coins,
            features.max_level_upgrade_animal,
        )
        .await;
        StepStatus::Done
    } else {
        StepStatus::Skipped
    };

    (purchases, upgrades)
}

async fn buy_missing_animals(client: &ZooClient, snapshot: &GameStateSnapshot, coins: &mut Decimal) {
    let mut owned: HashSet<&str> = snapshot.animals.iter().map(|a| a.key.as_str()).collect();
    let mut used: BTreeSet<u32> = snapshot.animals.iter().map(|a| a.position).collect();

    for catalog in &snapshot.db_data.db_animals {
        if owned.contains(catalog.key.as_str()) {
            continue;
        }
        let Some(price) = catalog.entry_price() else {
            continue;
        };
        if *coins < price {
            continue;
        }

        let position = next_free_position(&used);
        match client.buy_animal(position, &catalog.key).await {
            Ok(_) => {
                info!(animal = catalog.display_name(), position, "animal bought");
                used.insert(position);
                owned.insert(catalog.key.as_str());
                *coins -= price;
            }
            Err(err) => {
                warn!(animal = catalog.display_name(), position, error = %err, "purchase failed");
            }
        }
    }
}

async fn upgrade_owned_animals(
    client: &ZooClient,
    snapshot: &GameStateSnapshot,
    coins: &mut Decimal,
    max_level: u32,
) {
    for animal in &snapshot.animals {
        let Some(catalog) = snapshot.animal_catalog(&animal.key) else {
            continue;
        };
        let Some((next_level, price)) = upgrade_target(animal, catalog, max_level) else {
            continue;
        };
        if *coins < price {
            continue;
        }

        match client.buy_animal(animal.position, &animal.key).await {
            Ok(_) => {
                info!(animal = catalog.display_name(), level = next_level, "animal upgraded");
                *coins -= price;
            }
            Err(err) if err.is_server_error() => {
                error!(animal = catalog.display_name(), error = %err, "upgrade rejected by server");
            }
            Err(err) => {
                warn!(animal = catalog.display_name(), error = %err, "upgrade failed");
            }
        }
    }
}

async fn claim_daily_reward(session: &AccountSession) -> StepStatus {
    let state = match session.client().get_user_data_after().await {
        Ok(state) => state,
        Err(err) => {
            warn!(error = %err, "cannot load daily rewards");
            return StepStatus::Failed(err.to_string());
        }
    };

    let Some(day) = select_daily_reward_day(&state) else {
        debug!("no daily reward available");
        return StepStatus::Skipped;
    };

    info!(day, "claiming daily reward");
    match session.client().claim_daily_reward(day).await {
        Ok(_) => {
            info!(day, "daily reward claimed");
            StepStatus::Done
        }
        Err(err) if err.is_already_rewarded() => {
            info!(day, "daily reward already claimed");
            StepStatus::Done
        }
        Err(err) => {
            warn!(day, error = %err, "daily reward claim failed");
            StepStatus::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use zoo_adapter::AnimalLevel;

    fn quest(key: &str, check_type: &str) -> QuestDefinition {
        serde_json::from_value(serde_json::json!({"key": key, "checkType": check_type})).unwrap()
    }

    fn rewards(entries: &[(u32, DailyRewardState)]) -> PostActionState {
        PostActionState {
            daily_rewards: entries.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_classify_quest() {
        let skip = vec!["join_chat".to_string()];
        assert_eq!(classify_quest(&quest("join_chat", "telegramChannel"), &skip), QuestAction::SkipListed);
        for manual in ["donate_ton", "invite", "username", "ton_wallet_transaction"] {
            assert_eq!(classify_quest(&quest("q", manual), &skip), QuestAction::Manual);
        }
        assert_eq!(classify_quest(&quest("rebus", "checkCode"), &skip), QuestAction::CheckThenClaim);
        assert_eq!(classify_quest(&quest("follow", "telegramChannel"), &skip), QuestAction::Claim);
    }

    #[test]
    fn test_select_daily_reward_day_picks_lowest_claimable() {
        let mut entries: Vec<_> = (1..=16).map(|day| (day, DailyRewardState::CannotTake)).collect();
        entries[4].1 = DailyRewardState::CanTake;
        assert_eq!(select_daily_reward_day(&rewards(&entries)), Some(5));

        entries[2].1 = DailyRewardState::CanTake;
        assert_eq!(select_daily_reward_day(&rewards(&entries)), Some(3));

        let out_of_range = rewards(&[(0, DailyRewardState::CanTake), (17, DailyRewardState::CanTake)]);
        assert_eq!(select_daily_reward_day(&out_of_range), None);
    }

    #[test]
    fn test_next_free_position_fills_gaps() {
        assert_eq!(next_free_position(&BTreeSet::new()), 1);
        assert_eq!(next_free_position(&BTreeSet::from([0, 1, 2])), 3);
        assert_eq!(next_free_position(&BTreeSet::from([1, 3])), 2);
    }

    #[test]
    fn test_upgrade_target_respects_max_level() {
        let catalog = CatalogAnimal {
            key: "cow".to_string(),
            title: None,
            levels: vec![
                AnimalLevel { level: 1, price: Decimal::from(10) },
                AnimalLevel { level: 2, price: Decimal::from(40) },
            ],
        };
        let animal = OwnedAnimal { key: "cow".to_string(), level: 1, position: 1 };

        assert_eq!(upgrade_target(&animal, &catalog, 10), Some((2, Decimal::from(40))));
        assert_eq!(upgrade_target(&animal, &catalog, 1), None);

        let top = OwnedAnimal { level: 2, ..animal };
        assert_eq!(upgrade_target(&top, &catalog, 10), None);
    }

    #[test]
    fn test_start_jitter_bounds() {
        assert_eq!(start_jitter([0, 0]), Duration::ZERO);
        assert_eq!(start_jitter([5, 2]), Duration::from_secs(5));
        for _ in 0..20 {
            let delay = start_jitter([1, 3]).as_secs();
            assert!((1..=3).contains(&delay));
        }
    }
}
