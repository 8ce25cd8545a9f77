use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `checkin`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; the binary and config plumbing continue
/// to use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum CheckinError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── HTTP façade ─────────────────────────────────────────────────────
    #[error("http: {0}")]
    Http(#[from] HttpError),

    // ── Key-value store ─────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Site workflow ───────────────────────────────────────────────────
    #[error("workflow: {0}")]
    Workflow(#[from] WorkflowError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── HTTP errors ─────────────────────────────────────────────────────────────

/// Failure values produced by the HTTP façade. None of these abort a run;
/// `HttpClient::request` logs them and yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("transport failed: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("host {host} has no HTTP transport")]
    Unsupported { host: String },
}

impl HttpError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// ─── Store errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage address: {0}")]
    InvalidAddress(String),

    #[error("malformed value under `{key}`: {message}")]
    Malformed { key: String, message: String },

    #[error("write to `{key}` was rejected by the backend")]
    WriteRejected { key: String },

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ─── Workflow errors ─────────────────────────────────────────────────────────

/// Errors raised inside one account's workflow. The orchestrator catches all
/// of them at the account boundary.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("{0}")]
    Business(String),

    #[error("request failed: {0}")]
    Http(#[from] HttpError),

    #[error("template `{name}` failed: {message}")]
    Template { name: String, message: String },
}

pub type Result<T, E = CheckinError> = std::result::Result<T, E>;
