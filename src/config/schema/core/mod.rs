mod env_overrides;
mod loader;
mod locale;
mod types;

pub use types::{Config, HttpConfig, OrchestratorConfig, StoreConfig};
