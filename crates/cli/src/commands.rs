//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use tracing::info;
use tripwire_core::Config;
use tripwire_notify::{Dispatcher, PushoverNotifier, TemplateRenderer, WebhookNotifier};
use tripwire_rules::{load_config, AlertEngine};
use tripwire_storage::{state_store_from_config, StateStore};
use tripwire_ynab::YnabClient;

use crate::cli::{RunArgs, StateCommand};
use crate::run::execute_plan;

/// Build a dispatcher over every configured channel.
fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let mut dispatcher = Dispatcher::empty();

    if let Some(pushover) =
        PushoverNotifier::from_config(&config.pushover).context("invalid Pushover configuration")?
    {
        dispatcher.add_channel(Box::new(pushover));
    }

    let renderer = Arc::new(TemplateRenderer::new());
    if let Some(webhook) = WebhookNotifier::from_config(&config.webhook, renderer)
        .context("invalid webhook configuration")?
    {
        dispatcher.add_channel(Box::new(webhook));
    }

    Ok(dispatcher)
}

pub async fn run(config: &Config, args: RunArgs) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);

    let rules = load_config(&args.config.config)
        .with_context(|| format!("failed to load rules from {}", args.config.config.display()))?;
    let engine = AlertEngine::new(rules);

    let dispatcher = build_dispatcher(config)?;
    if !args.dry_run && dispatcher.is_empty() {
        bail!("no notification channels configured (set PUSHOVER_* or ALERT_WEBHOOK_URL)");
    }

    let ynab = YnabClient::from_config(&config.ynab)?;
    let categories = ynab
        .fetch_categories(&engine.config().budget_id, now.date_naive())
        .await
        .context("failed to fetch budget categories")?;

    let store = state_store_from_config(config).context("failed to open state store")?;
    let prior = store
        .load()
        .await
        .with_context(|| format!("failed to load alert state from {}", store.location()))?;

    let plan = engine.plan(&categories, &prior, now);
    let execution = execute_plan(&plan, &dispatcher, args.dry_run).await;

    if args.dry_run {
        info!(pending = plan.pending.len(), "dry run, state not saved");
        return Ok(());
    }

    let next = plan.reconcile(&prior, &execution.delivered, now);
    if next != prior {
        store
            .save(&next)
            .await
            .with_context(|| format!("failed to save alert state to {}", store.location()))?;
    }

    if !execution.failed.is_empty() {
        bail!(
            "{} of {} alerts could not be delivered",
            execution.failed.len(),
            plan.pending.len()
        );
    }
    Ok(())
}

pub fn check(path: &Path) -> Result<()> {
    let rules = load_config(path)
        .with_context(|| format!("failed to load rules from {}", path.display()))?;
    println!(
        "{}: OK ({} explicit categories, auto alerts {}, {} triggers)",
        path.display(),
        rules.categories.len(),
        if rules.auto_alerts.enabled { "on" } else { "off" },
        rules.trigger_count()
    );
    Ok(())
}

pub async fn test_notify(config: &Config) -> Result<()> {
    let dispatcher = build_dispatcher(config)?;
    if dispatcher.is_empty() {
        bail!("no notification channels configured (set PUSHOVER_* or ALERT_WEBHOOK_URL)");
    }

    let delivery = dispatcher.test_notify().await;
    for result in &delivery.results {
        match &result.error {
            None => println!("{}: ok ({} ms)", result.channel, result.duration_ms),
            Some(e) => println!("{}: FAILED: {}", result.channel, e),
        }
    }
    if !delivery.delivered() {
        bail!("test notification failed on at least one channel");
    }
    Ok(())
}

pub async fn state(config: &Config, command: StateCommand) -> Result<()> {
    let store = state_store_from_config(config).context("failed to open state store")?;
    let mut state = store
        .load()
        .await
        .with_context(|| format!("failed to load alert state from {}", store.location()))?;

    match command {
        StateCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        StateCommand::Prune { older_than_days } => {
            let cutoff = Utc::now() - Duration::days(i64::from(older_than_days));
            let removed = state.prune_fired_before(cutoff);
            if removed > 0 {
                store.save(&state).await.with_context(|| {
                    format!("failed to save alert state to {}", store.location())
                })?;
            }
            println!("removed {removed} entries older than {older_than_days} days ({} remain)", state.len());
        }
    }
    Ok(())
}
