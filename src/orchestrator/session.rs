use super::account::Account;
use serde_json::{Map, Value};

/// Lifecycle of one account within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AccountState {
    Pending,
    AuthOk,
    AuthFailed,
    Working,
    Done,
}

/// Mutable per-account state handed to the workflow.
#[derive(Debug)]
pub struct AccountSession {
    account: Account,
    state: AccountState,
    succeeded: bool,
    notes: Vec<String>,
    failure: Option<String>,
    dirty: bool,
}

impl AccountSession {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            state: AccountState::Pending,
            succeeded: false,
            notes: Vec::new(),
            failure: None,
            dirty: false,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn record(&self) -> &Map<String, Value> {
        &self.account.record
    }

    /// Mutable access to the stored record; the run writes it back afterwards.
    pub fn record_mut(&mut self) -> &mut Map<String, Value> {
        self.dirty = true;
        &mut self.account.record
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> AccountState {
        self.state
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Add a detail to this account's summary line.
    pub fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !message.trim().is_empty() {
            self.notes.push(message);
        }
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub(crate) fn auth_failed(&mut self, reason: impl Into<String>) {
        self.state = AccountState::AuthFailed;
        self.succeeded = false;
        self.failure = Some(reason.into());
    }

    pub(crate) fn auth_ok(&mut self) {
        self.state = AccountState::AuthOk;
    }

    pub(crate) fn start_work(&mut self) {
        self.state = AccountState::Working;
        self.succeeded = true;
    }

    /// Mark the account failed; the remaining steps are skipped.
    pub(crate) fn fail(&mut self, reason: impl Into<String>) {
        self.succeeded = false;
        self.failure = Some(reason.into());
    }

    pub(crate) fn finish(&mut self) {
        if self.state != AccountState::AuthFailed {
            self.state = AccountState::Done;
        }
    }

    pub fn into_account(self) -> Account {
        self.account
    }
}
