use checkin::config::Config;
use checkin::runtime::environment::ServerHost;
use std::path::Path;
use std::sync::Arc;

#[allow(dead_code)]
pub fn install_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Config rooted in `dir`: quiet logs, no step delay, store file inside `dir`.
#[allow(dead_code)]
pub fn quiet_config(dir: &Path) -> Config {
    let mut config = Config {
        config_path: dir.join("config.toml"),
        state_dir: dir.to_path_buf(),
        ..Config::default()
    };
    config.notify.log_muted = true;
    config.orchestrator.step_delay_ms = 0;
    config
}

#[allow(dead_code)]
pub fn server_host(config: &Config) -> Arc<ServerHost> {
    install_crypto();
    Arc::new(ServerHost::from_config(config).unwrap())
}
