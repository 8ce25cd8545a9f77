use super::HostEnvironment;
use super::traits::{BoxFuture, HostCapabilities};
use crate::error::HttpError;
use crate::http::{NativeRequest, ResponseEnvelope};
use crate::store::{MemoryStore, StorageBackend};
use serde_json::Value;
use std::sync::Arc;

/// Safe no-op host for unknown runtimes: in-memory storage, no network,
/// notifications stay in the log.
pub struct MemoryHost {
    storage: Arc<MemoryStore>,
}

impl MemoryHost {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(MemoryStore::new(namespace)),
        }
    }
}

impl HostCapabilities for MemoryHost {
    fn environment(&self) -> HostEnvironment {
        HostEnvironment::Unknown
    }

    fn storage(&self) -> Arc<dyn StorageBackend> {
        self.storage.clone()
    }

    fn send<'a>(
        &'a self,
        _request: &'a NativeRequest,
    ) -> BoxFuture<'a, Result<ResponseEnvelope, HttpError>> {
        Box::pin(async move {
            Err(HttpError::Unsupported {
                host: self.name().to_string(),
            })
        })
    }

    fn post<'a>(
        &'a self,
        _title: &'a str,
        _subtitle: &'a str,
        _body: &'a str,
        _payload: Option<&'a Value>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }
}
