use super::traits::HostCapabilities;
use super::{HostEnvironment, MemoryHost, ProxyBridge, ProxyHost, ServerHost};
use crate::config::Config;
use std::sync::Arc;

/// Select the capability table for `environment`.
///
/// Proxy runtimes need a `bridge`; without one the shim degrades to the
/// unknown-host no-ops instead of failing.
pub fn create_host(
    environment: HostEnvironment,
    config: &Config,
    bridge: Option<ProxyBridge>,
) -> anyhow::Result<Arc<dyn HostCapabilities>> {
    let host: Arc<dyn HostCapabilities> = match (environment, bridge) {
        (HostEnvironment::Server, _) => Arc::new(ServerHost::from_config(config)?),
        (HostEnvironment::Unknown, _) => Arc::new(MemoryHost::new(config.store.namespace.clone())),
        (proxy, Some(bridge)) => Arc::new(ProxyHost::new(proxy, bridge)?),
        (proxy, None) => {
            tracing::warn!(
                "detected {proxy} but no native bridge is registered; falling back to no-op host"
            );
            Arc::new(MemoryHost::new(config.store.namespace.clone()))
        }
    };
    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.store.path = Some(tmp.path().join("store.json").display().to_string());
        config
    }

    #[test]
    fn server_environment_builds_server_host() {
        let tmp = TempDir::new().unwrap();
        let host = create_host(HostEnvironment::Server, &config(&tmp), None).unwrap();
        assert_eq!(host.environment(), HostEnvironment::Server);
        assert_eq!(host.storage().name(), "file");
    }

    #[test]
    fn unknown_environment_builds_memory_host() {
        let tmp = TempDir::new().unwrap();
        let host = create_host(HostEnvironment::Unknown, &config(&tmp), None).unwrap();
        assert_eq!(host.name(), "unknown");
        assert_eq!(host.storage().name(), "memory");
    }

    #[test]
    fn proxy_without_bridge_degrades_to_unknown() {
        let tmp = TempDir::new().unwrap();
        let host = create_host(HostEnvironment::Loon, &config(&tmp), None).unwrap();
        assert_eq!(host.environment(), HostEnvironment::Unknown);
    }
}
