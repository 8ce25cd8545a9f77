//! Runs one site workflow over every stored account.

pub mod account;
pub mod scripted;
pub mod session;
pub mod summary;
pub mod workflow;

pub use account::{Account, load_accounts, save_accounts};
pub use scripted::ScriptedWorkflow;
pub use session::{AccountSession, AccountState};
pub use summary::RunSummary;
pub use workflow::SiteWorkflow;

use crate::context::Context;
use crate::error::StoreError;
use crate::notify::NotifyExtras;
use serde_json::{Map, Value};
use std::time::Duration;

pub struct Orchestrator<'a> {
    ctx: &'a Context,
    step_delay: Duration,
}

impl<'a> Orchestrator<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            step_delay: Duration::from_millis(ctx.config.orchestrator.step_delay_ms),
        }
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Run `workflow` for each stored account in order and send one summary.
    ///
    /// Per-account failures never escape; only an unreadable account list does.
    pub async fn run(&self, workflow: &dyn SiteWorkflow) -> Result<RunSummary, StoreError> {
        let ctx = self.ctx;
        let locale = ctx.config.notify.language.locale();
        let address = workflow.accounts_address();

        let accounts = load_accounts(&ctx.store, address)?;
        let mut records: Vec<Map<String, Value>> =
            accounts.iter().map(|a| a.record.clone()).collect();
        let mut summary = RunSummary::new(workflow.name());

        if accounts.is_empty() {
            ctx.logger
                .warn(format!("{}: no accounts stored under {address}", workflow.name()));
        }

        for (slot, account) in accounts.into_iter().enumerate() {
            let name = account.display_name();
            ctx.logger.info(format!("▶ {} {name}", workflow.name()));

            let session = self.run_account(workflow, AccountSession::new(account)).await;
            summary.record(&session, locale);

            if session.is_dirty() {
                records[slot] = session.into_account().record;
                match save_accounts(&ctx.store, address, &records) {
                    Ok(()) => ctx.logger.debug(format!("saved refreshed record for {name}")),
                    Err(e) => ctx.logger.warn(format!("could not save record for {name}: {e}")),
                }
            }
        }

        ctx.logger.info(format!(
            "{}: {}/{} succeeded",
            summary.site, summary.succeeded, summary.total
        ));

        if summary.all_succeeded() && !ctx.config.notify.force {
            ctx.logger.debug("all accounts succeeded; summary notification skipped");
        } else {
            ctx.notifier
                .notify(
                    &summary.title(locale),
                    "",
                    &summary.body(),
                    &NotifyExtras::default(),
                )
                .await;
        }

        Ok(summary)
    }

    async fn run_account(
        &self,
        workflow: &dyn SiteWorkflow,
        mut session: AccountSession,
    ) -> AccountSession {
        let ctx = self.ctx;
        let name = session.account().display_name();

        if session.account().credential().is_none() {
            ctx.logger.warn(format!("{name}: no credential stored"));
            let locale = ctx.config.notify.language.locale();
            session.auth_failed(t!("summary.missing_credential", locale = locale).to_string());
            session.finish();
            return session;
        }

        if let Err(e) = workflow.authenticate(ctx, &mut session).await {
            ctx.logger.error(format!("{name}: {e}"));
            session.auth_failed(e.to_string());
            session.finish();
            return session;
        }
        session.auth_ok();
        session.start_work();

        for (i, step) in workflow.steps().into_iter().enumerate() {
            if i > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            if let Err(e) = workflow.run_step(ctx, step, &mut session).await {
                ctx.logger.error(format!("{name} [{step}]: {e}"));
                session.fail(e.to_string());
                break;
            }
        }

        session.finish();
        session
    }
}
