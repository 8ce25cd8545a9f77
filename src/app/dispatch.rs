use crate::cli::{Cli, Commands, StoreCommands};
use crate::config::{Config, SiteConfig};
use crate::context::Context;
use crate::notify::NotifyExtras;
use crate::orchestrator::{Orchestrator, RunSummary, ScriptedWorkflow};
use crate::runtime::environment::ProxyBridge;
use crate::runtime::{HostEnvironment, create_host, detect};
use crate::store::StorageAddress;
use anyhow::{Result, bail};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Explicit `--config` file, or the default one (created on first run).
/// Environment overrides and the notification locale are applied here.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init()?,
    };
    config.apply_env_overrides();
    config.validate()?;
    config.apply_locale();
    Ok(config)
}

/// Run one command against a ready context.
pub async fn execute(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Run { site } => run_sites(ctx, site.as_deref()).await,
        Commands::Env => {
            println!("{}", ctx.environment);
            println!("store: {}", ctx.store.backend_name());
            Ok(())
        }
        Commands::Store { command } => store_command(ctx, command),
    }
}

async fn run_sites(ctx: &Context, only: Option<&str>) -> Result<()> {
    let sites: Vec<_> = match only {
        Some(name) => match ctx.config.site(name) {
            Some(site) => vec![site.clone()],
            None => bail!("No site named `{name}` in {}", ctx.config.config_path.display()),
        },
        None => ctx.config.sites.clone(),
    };

    if sites.is_empty() {
        warn!(
            "No [[sites]] configured in {}; nothing to run",
            ctx.config.config_path.display()
        );
        return Ok(());
    }

    let total = sites.len();
    let mut failed = Vec::new();
    for site in sites {
        let name = site.name.clone();
        match run_site(ctx, site).await {
            Ok(summary) => info!(
                "{name}: {}/{} accounts succeeded",
                summary.succeeded, summary.total
            ),
            Err(e) => {
                ctx.logger.error(format!("site `{name}` skipped: {e}"));
                failed.push(name);
            }
        }
    }

    if !failed.is_empty() {
        bail!(
            "{}/{total} sites could not run: {}",
            failed.len(),
            failed.join(", ")
        );
    }
    Ok(())
}

/// Errors here cover the whole site (bad address, unreadable account list);
/// per-account failures end up in the summary instead.
async fn run_site(ctx: &Context, site: SiteConfig) -> crate::error::Result<RunSummary> {
    let workflow = ScriptedWorkflow::new(site)?;
    Ok(Orchestrator::new(ctx).run(&workflow).await?)
}

fn store_command(ctx: &Context, command: StoreCommands) -> Result<()> {
    match command {
        StoreCommands::Get { address } => {
            let address: StorageAddress = address.parse()?;
            match ctx.store.get(&address) {
                Some(value) => println!("{value}"),
                None => warn!("{address} is not set"),
            }
        }
        StoreCommands::Set { address, value } => {
            let address: StorageAddress = address.parse()?;
            if !ctx.store.set(&address, &value) {
                bail!("Store backend rejected the write to {address}");
            }
            info!("{address} updated");
        }
    }
    Ok(())
}

/// Outermost boundary: returns the process exit code.
///
/// Any error escaping a command is logged once, reported with a failure
/// notification, and still runs the host completion sequence.
pub async fn dispatch(cli: Cli) -> i32 {
    dispatch_with(detect(), None, cli).await
}

/// [`dispatch`] for an embedder that already knows its host and bridge.
///
/// A config that fails to load is still reported through the host, which
/// is built from defaults for that purpose.
pub async fn dispatch_with(
    environment: HostEnvironment,
    bridge: Option<ProxyBridge>,
    cli: Cli,
) -> i32 {
    let (config, config_error) = match load_config(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let config = Arc::new(config);

    let bridge_done = bridge.as_ref().and_then(|b| b.done.clone());
    let host = match create_host(environment, &config, bridge) {
        Ok(host) => host,
        Err(e) => {
            if let Some(e) = &config_error {
                error!("{e:#}");
            }
            error!("Failed to initialise {environment} host: {e:#}");
            if let Some(done) = bridge_done {
                done();
            }
            return 1;
        }
    };
    let ctx = Context::new(config, host);
    ctx.logger.debug(format!("host: {environment}"));

    let outcome = match config_error {
        Some(e) => Err(e),
        None => execute(&ctx, cli.command).await,
    };

    let code = match outcome {
        Ok(()) => 0,
        Err(e) => {
            let message = format!("{e:#}");
            ctx.logger.error(&message);
            let locale = ctx.config.notify.language.locale();
            ctx.notifier
                .notify(
                    &t!("fatal.title", locale = locale),
                    &t!("fatal.subtitle", locale = locale, host = environment),
                    &message,
                    &NotifyExtras::default(),
                )
                .await;
            1
        }
    };

    ctx.host.done();
    code
}
