use super::Config;
use crate::config::schema::{
    BarkConfig, NotifyLanguage, ServerChanConfig, TelegramConfig, WeComConfig,
};

fn truthy(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source. Empty values are ignored.
    pub fn apply_env_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("BARK_PUSH_URL") {
            self.notify.bark = Some(BarkConfig { url });
        }

        if let Some(send_key) = var("SERVERCHAN_SEND_KEY") {
            let api_base = self
                .notify
                .serverchan
                .take()
                .map_or_else(ServerChanConfig::default_api_base, |sc| sc.api_base);
            self.notify.serverchan = Some(ServerChanConfig { send_key, api_base });
        }

        if let Some(webhook_url) = var("WECHAT_WEBHOOK_URL") {
            self.notify.wecom = Some(WeComConfig { webhook_url });
        }

        if let (Some(bot_token), Some(user_id)) = (var("TG_BOT_TOKEN"), var("TG_USER_ID")) {
            let api_base = self
                .notify
                .telegram
                .take()
                .map_or_else(TelegramConfig::default_api_base, |tg| tg.api_base);
            self.notify.telegram = Some(TelegramConfig {
                bot_token,
                user_id,
                api_base,
            });
        }

        if let Some(lang) = var("NOTIFY_LANG") {
            match lang.parse::<NotifyLanguage>() {
                Ok(language) => self.notify.language = language,
                Err(_) => tracing::warn!("ignoring unknown NOTIFY_LANG={lang}"),
            }
        }

        if let Some(force) = var("FORCE_NOTIFY").as_deref().and_then(truthy) {
            self.notify.force = force;
        }

        if let Some(muted) = var("CHECKIN_MUTE").as_deref().and_then(truthy) {
            self.notify.muted = muted;
        }
    }
}
