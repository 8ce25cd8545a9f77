//! Leveled run logger with an in-memory transcript.
//!
//! Every line goes through `tracing` (so the host's stdout stream sees it via
//! the installed subscriber) and is also kept in a transcript that survives
//! for the whole run. Muting output never drops transcript lines.

use chrono::Local;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Default: every line reaches `tracing`, whose `EnvFilter` decides.
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug)]
pub struct Logger {
    name: String,
    level: LogLevel,
    muted: bool,
    transcript: Mutex<Vec<String>>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::default(),
            muted: false,
            transcript: Mutex::new(Vec::new()),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message.as_ref());
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.level {
            return;
        }

        let line = format!(
            "[{}] [{}] {message}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.as_str()
        );
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);

        if self.muted {
            return;
        }

        let name = self.name.as_str();
        match level {
            LogLevel::Debug => tracing::debug!(logger = name, "{message}"),
            LogLevel::Info => tracing::info!(logger = name, "{message}"),
            LogLevel::Warn => tracing::warn!(logger = name, "{message}"),
            LogLevel::Error => tracing::error!(logger = name, "{message}"),
        }
    }

    /// Snapshot of every line logged so far, oldest first.
    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
