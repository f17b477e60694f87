/*
[INPUT]:  CLI arguments, YAML configuration file, account/proxy files, OS shutdown signals
[OUTPUT]: Repeating multi-account farming cycles with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use zoo_adapter::UserAgentStore;
use zoo_farm::logging::init_tracing;
use zoo_farm::pipeline::run_account;
use zoo_farm::session::prime_user_agents;
use zoo_farm::startup::{load_inputs, resolve_base_url};
use zoo_farm::{BatchScheduler, PipelineContext, RunnerConfig};

#[derive(Parser, Debug)]
#[command(name = "zoo-farm", version, about = "Multi-account Zoo game farming runner")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Overrides inputs.accounts_file
    #[arg(long = "accounts", value_name = "PATH")]
    accounts: Option<PathBuf>,
    /// Overrides inputs.proxies_file
    #[arg(long = "proxies", value_name = "PATH")]
    proxies: Option<PathBuf>,
    /// Run a single cycle and exit
    #[arg(long = "once")]
    once: bool,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let config = load_config(&args)?;
    let _log_guard = init_tracing(&args.log_level, config.debug, config.logging.file_dir.as_deref())?;

    info!(
        config_path = ?args.config_path,
        dry_run = args.dry_run,
        once = args.once,
        "starting zoo-farm"
    );

    let inputs = load_inputs(&config)?;

    if args.dry_run {
        info!("dry-run requested; configuration and inputs validated");
        return Ok(());
    }

    let base_url = resolve_base_url(&config.api).await?;

    let user_agents = Arc::new(
        UserAgentStore::load(&config.inputs.user_agent_cache, config.user_agents.clone())
            .context("load user agent cache")?,
    );
    prime_user_agents(&user_agents, &inputs.accounts).await;

    let config = Arc::new(config);
    let context = Arc::new(PipelineContext {
        config: config.clone(),
        base_url,
        user_agents,
    });

    let scheduler = BatchScheduler::new(config, inputs.accounts, inputs.proxies);
    let shutdown = scheduler.shutdown_token();
    setup_signal_handlers(shutdown.clone());

    let cycles = scheduler
        .run(move |job| run_account(context.clone(), job), args.once)
        .await;
    info!(cycles, "zoo-farm stopped");

    Ok(())
}

fn load_config(args: &Cli) -> Result<RunnerConfig> {
    let mut config = match &args.config_path {
        Some(path) => RunnerConfig::from_file(path).context("load config")?,
        None => RunnerConfig::default(),
    };
    if let Some(accounts) = &args.accounts {
        config.inputs.accounts_file = accounts.clone();
    }
    if let Some(proxies) = &args.proxies {
        config.inputs.proxies_file = proxies.clone();
    }
    config.validate().context("validate config")?;
    Ok(config)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
