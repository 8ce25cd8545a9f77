use super::HostEnvironment;
use crate::error::HttpError;
use crate::http::{NativeRequest, ResponseEnvelope};
use crate::store::StorageBackend;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Unit a host's native transport expects its timeout in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutUnit {
    Millis,
    Seconds,
}

impl TimeoutUnit {
    /// Convert for the native options. Seconds round up and never reach zero.
    #[must_use]
    pub fn convert(self, timeout: Duration) -> u64 {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        match self {
            Self::Millis => millis,
            Self::Seconds => millis.div_ceil(1000).max(1),
        }
    }
}

/// Capability table for one host: storage, transport, notification and
/// completion. One implementation per host family, selected once at startup.
pub trait HostCapabilities: Send + Sync {
    fn environment(&self) -> HostEnvironment;

    fn name(&self) -> &'static str {
        self.environment().as_str()
    }

    /// Raw key-value backend for this host.
    fn storage(&self) -> Arc<dyn StorageBackend>;

    fn timeout_unit(&self) -> TimeoutUnit {
        TimeoutUnit::Millis
    }

    /// Execute one request on the native transport. The façade owns the
    /// timeout race; implementations only pass the timeout along natively.
    fn send<'a>(
        &'a self,
        request: &'a NativeRequest,
    ) -> BoxFuture<'a, Result<ResponseEnvelope, HttpError>>;

    /// Fire-and-forget native notification. `payload` is already shaped for
    /// this host; `None` means no extra fields.
    fn post<'a>(
        &'a self,
        title: &'a str,
        subtitle: &'a str,
        body: &'a str,
        payload: Option<&'a Value>,
    ) -> BoxFuture<'a, ()>;

    /// Signal completion to the host. Standalone processes exit instead.
    fn done(&self) {}
}
