/*
[INPUT]:  Account list, proxy assignment, runner config, per-account pipeline runner, CancellationToken
[OUTPUT]: Concurrency-bounded batches of isolated pipeline runs, per-account outcomes, cycle cooldown
[POS]:    Execution layer - multi-account cycle orchestration
[UPDATE]: When changing batching, isolation, cooldown or shutdown semantics
*/

use std::future::Future;
use std::sync::{Arc, Once};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span, warn};

use crate::accounts::ProxyAssignment;
use crate::config::RunnerConfig;
use crate::metrics::{CycleMetrics, CycleMetricsSnapshot};
use crate::pipeline::{AccountJob, PipelineReport};

static PANIC_HOOK_ONCE: Once = Once::new();

fn ensure_panic_hook_installed() {
    PANIC_HOOK_ONCE.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!("panic in account task: {info}");
            previous(info);
        }));
    });
}

#[derive(Debug, Clone)]
pub enum OutcomeStatus {
    Succeeded(PipelineReport),
    Failed(String),
    TimedOut,
}

/// What one account's pipeline produced this cycle
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub account_index: usize,
    pub status: OutcomeStatus,
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded(_))
    }

    pub fn report(&self) -> Option<&PipelineReport> {
        match &self.status {
            OutcomeStatus::Succeeded(report) => Some(report),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match &self.status {
            OutcomeStatus::Succeeded(_) => None,
            OutcomeStatus::Failed(message) => Some(message.clone()),
            OutcomeStatus::TimedOut => Some("Timeout".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub outcomes: Vec<PipelineOutcome>,
    pub metrics: CycleMetricsSnapshot,
    /// Shutdown was requested before every batch was dispatched
    pub cancelled: bool,
}

/// Runs every account once per cycle in batches of at most `concurrency`
pub struct BatchScheduler {
    config: Arc<RunnerConfig>,
    accounts: Vec<String>,
    proxies: ProxyAssignment,
    account_timeout: Duration,
    shutdown: CancellationToken,
}

impl BatchScheduler {
    pub fn new(config: Arc<RunnerConfig>, accounts: Vec<String>, proxies: ProxyAssignment) -> Self {
        let account_timeout = config.scheduler.account_timeout();
        Self {
            config,
            accounts,
            proxies,
            account_timeout,
            shutdown: CancellationToken::new(),
        }
    }

    /// Override the per-account deadline taken from the configuration
    pub fn with_account_timeout(mut self, timeout: Duration) -> Self {
        self.account_timeout = timeout;
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn jobs(&self) -> Vec<AccountJob> {
        self.accounts
            .iter()
            .enumerate()
            .map(|(index, raw)| AccountJob {
                index,
                raw_credential: raw.clone(),
                proxy: self.proxies.proxy_for(index).map(str::to_string),
            })
            .collect()
    }

    pub fn batches(&self) -> Vec<Vec<AccountJob>> {
        let concurrency = self.config.scheduler.concurrency.max(1);
        self.jobs()
            .chunks(concurrency)
            .map(<[AccountJob]>::to_vec)
            .collect()
    }

    /// Dispatch every batch once; a batch starts only after the previous one fully finished
    pub async fn run_cycle<F, Fut>(&self, cycle: u64, runner: &F) -> CycleReport
    where
        F: Fn(AccountJob) -> Fut,
        Fut: Future<Output = anyhow::Result<PipelineReport>> + Send + 'static,
    {
        ensure_panic_hook_installed();

        let batches = self.batches();
        let total = batches.len();
        let mut metrics = CycleMetrics::start(cycle);
        let mut outcomes = Vec::with_capacity(self.accounts.len());
        let mut cancelled = false;

        for (batch_no, batch) in batches.iter().enumerate() {
            if self.shutdown.is_cancelled() {
                let remaining: usize = batches[batch_no..].iter().map(Vec::len).sum();
                warn!(cycle, remaining, "shutdown requested; remaining accounts not dispatched");
                metrics.record_not_started(remaining);
                cancelled = true;
                break;
            }

            info!(
                cycle,
                batch = batch_no + 1,
                batches = total,
                accounts = batch.len(),
                "dispatching batch"
            );

            let (indices, handles): (Vec<_>, Vec<_>) = batch
                .iter()
                .cloned()
                .map(|job| {
                    let index = job.index;
                    let span = info_span!(
                        "account",
                        account = index + 1,
                        proxy_ip = tracing::field::Empty
                    );
                    let run = tokio::time::timeout(self.account_timeout, runner(job));
                    (index, tokio::spawn(run.instrument(span)))
                })
                .unzip();

            let results = join_all(handles).await;
            for (index, result) in indices.into_iter().zip(results) {
                let outcome = PipelineOutcome {
                    account_index: index,
                    status: classify_result(result),
                };
                log_outcome(&outcome);
                metrics.record(&outcome);
                outcomes.push(outcome);
            }

            if batch_no + 1 < total {
                tokio::select! {
                    _ = tokio::time::sleep(self.config.scheduler.batch_delay()) => {}
                    _ = self.shutdown.cancelled() => {}
                }
            }
        }

        metrics.log();
        CycleReport {
            outcomes,
            metrics: metrics.snapshot(),
            cancelled,
        }
    }

    /// Wait before the next cycle
    ///
    /// Uses the first account's next feed time when known, otherwise the fixed cooldown.
    pub fn cooldown(&self, outcomes: &[PipelineOutcome], now: DateTime<Utc>) -> Duration {
        let scheduler = &self.config.scheduler;
        if scheduler.cooldown_from_feed_time {
            let next_feed = outcomes
                .iter()
                .find(|outcome| outcome.account_index == 0)
                .and_then(PipelineOutcome::report)
                .and_then(|report| report.next_feed_time);
            if let Some(at) = next_feed {
                let secs = (at - now).num_seconds().max(0) as u64;
                return Duration::from_secs(secs);
            }
        }
        scheduler.cycle_sleep()
    }

    /// Repeat cycles until shutdown, or once when `once` is set; returns the cycle count
    pub async fn run<F, Fut>(&self, runner: F, once: bool) -> u64
    where
        F: Fn(AccountJob) -> Fut,
        Fut: Future<Output = anyhow::Result<PipelineReport>> + Send + 'static,
    {
        let mut cycle = 0;
        loop {
            cycle += 1;
            let report = self.run_cycle(cycle, &runner).await;
            if once || report.cancelled || self.shutdown.is_cancelled() {
                break;
            }

            let wait = self.cooldown(&report.outcomes, Utc::now());
            info!(
                cycle,
                wait_secs = wait.as_secs(),
                "all accounts processed; waiting for next cycle"
            );
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = self.shutdown.cancelled() => {
                    info!("shutdown during cooldown");
                    break;
                }
            }
        }
        cycle
    }
}

fn classify_result(
    result: Result<Result<anyhow::Result<PipelineReport>, tokio::time::error::Elapsed>, JoinError>,
) -> OutcomeStatus {
    match result {
        Ok(Ok(Ok(report))) => OutcomeStatus::Succeeded(report),
        Ok(Ok(Err(err))) => OutcomeStatus::Failed(format!("{err:#}")),
        Ok(Err(_elapsed)) => OutcomeStatus::TimedOut,
        Err(join_err) if join_err.is_panic() => {
            OutcomeStatus::Failed(format!("account task panicked: {join_err}"))
        }
        Err(join_err) => OutcomeStatus::Failed(format!("account task join error: {join_err}")),
    }
}

fn log_outcome(outcome: &PipelineOutcome) {
    let account = outcome.account_index + 1;
    match &outcome.status {
        OutcomeStatus::Succeeded(report) => info!(
            account,
            name = %report.display_name,
            tokens = %report.tokens,
            coins = %report.coins,
            "account processed"
        ),
        OutcomeStatus::Failed(message) => error!(account, error = %message, "account failed"),
        OutcomeStatus::TimedOut => error!(account, "account timed out"),
    }
}
