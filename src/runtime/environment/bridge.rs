//! Native call surface a proxy scripting host exposes to the shim.
//!
//! An embedding host wires its own primitives into these traits; the shim
//! never talks to a proxy runtime any other way.

use super::traits::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

/// Completion callback of a callback-style client:
/// `(error, response{status|statusCode, headers}, body)`.
pub type NativeCallback = Box<dyn FnOnce(Option<String>, Option<Value>, Option<String>) + Send>;

/// Callback-based GET/POST client (Surge, Loon, Stash, Shadowrocket).
pub trait CallbackHttp: Send + Sync {
    fn get(&self, options: Value, callback: NativeCallback);
    fn post(&self, options: Value, callback: NativeCallback);
}

/// Promise/fetch-style client (Quantumult X). Resolves with
/// `{statusCode, headers, body}` or rejects with `{error}`.
pub trait FetchHttp: Send + Sync {
    fn fetch(&self, options: Value) -> BoxFuture<'static, Result<Value, Value>>;
}

/// Persistent preference calls.
pub trait NativePreferences: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> bool;
}

pub trait NativeNotifier: Send + Sync {
    fn post(&self, title: &str, subtitle: &str, body: &str, payload: Option<&Value>);
}

#[derive(Clone)]
pub enum NativeTransport {
    Callback(Arc<dyn CallbackHttp>),
    Fetch(Arc<dyn FetchHttp>),
}

impl NativeTransport {
    pub fn family(&self) -> &'static str {
        match self {
            Self::Callback(_) => "callback",
            Self::Fetch(_) => "fetch",
        }
    }
}

/// Everything a proxy host hands over.
#[derive(Clone)]
pub struct ProxyBridge {
    pub transport: NativeTransport,
    pub preferences: Arc<dyn NativePreferences>,
    pub notifier: Arc<dyn NativeNotifier>,
    pub done: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl ProxyBridge {
    pub fn new(
        transport: NativeTransport,
        preferences: Arc<dyn NativePreferences>,
        notifier: Arc<dyn NativeNotifier>,
    ) -> Self {
        Self {
            transport,
            preferences,
            notifier,
            done: None,
        }
    }

    pub fn on_done(mut self, done: impl Fn() + Send + Sync + 'static) -> Self {
        self.done = Some(Arc::new(done));
        self
    }
}
