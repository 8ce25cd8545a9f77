use crate::config::Config;
use crate::http::HttpClient;
use crate::logger::Logger;
use crate::notify::Notifier;
use crate::runtime::{HostCapabilities, HostEnvironment};
use crate::store::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// Everything one run needs, built once and passed down explicitly.
#[derive(Clone)]
pub struct Context {
    pub environment: HostEnvironment,
    pub config: Arc<Config>,
    pub host: Arc<dyn HostCapabilities>,
    pub logger: Arc<Logger>,
    pub store: KeyValueStore,
    pub http: HttpClient,
    pub notifier: Notifier,
}

impl Context {
    pub fn new(config: Arc<Config>, host: Arc<dyn HostCapabilities>) -> Self {
        let logger = Arc::new(Logger::new("checkin").muted(config.notify.log_muted));
        let store = KeyValueStore::new(host.storage());
        let http = HttpClient::new(Arc::clone(&host), Arc::clone(&logger))
            .with_default_timeout(Duration::from_millis(config.http.timeout_ms))
            .with_user_agent(config.http.user_agent.clone());
        let notifier =
            Notifier::new(Arc::clone(&host), Arc::clone(&logger)).muted(config.notify.muted);

        Self {
            environment: host.environment(),
            config,
            host,
            logger,
            store,
            http,
            notifier,
        }
    }
}
