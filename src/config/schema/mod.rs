mod core;
mod notify;
mod sites;

pub use core::{Config, HttpConfig, OrchestratorConfig, StoreConfig};
pub use notify::{
    BarkConfig, NotifyConfig, NotifyLanguage, ServerChanConfig, TelegramConfig, WeComConfig,
};
pub use sites::{SiteConfig, StepConfig};
