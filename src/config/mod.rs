pub mod schema;

pub use schema::{
    BarkConfig, Config, HttpConfig, NotifyConfig, NotifyLanguage, OrchestratorConfig,
    ServerChanConfig, SiteConfig, StepConfig, StoreConfig, TelegramConfig, WeComConfig,
};
