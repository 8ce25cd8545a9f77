use crate::transport::channels::{DEFAULT_SERVERCHAN_API, DEFAULT_TELEGRAM_API};
use serde::{Deserialize, Serialize};

// ── Notifications ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Skip native notification calls (transcript still records them)
    #[serde(default)]
    pub muted: bool,
    /// Keep the transcript but stop emitting log lines
    #[serde(default)]
    pub log_muted: bool,
    /// Send the run summary even when every account succeeded
    #[serde(default = "default_true")]
    pub force: bool,
    #[serde(default)]
    pub language: NotifyLanguage,

    pub bark: Option<BarkConfig>,
    pub serverchan: Option<ServerChanConfig>,
    pub wecom: Option<WeComConfig>,
    pub telegram: Option<TelegramConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            muted: false,
            log_muted: false,
            force: true,
            language: NotifyLanguage::default(),
            bark: None,
            serverchan: None,
            wecom: None,
            telegram: None,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum NotifyLanguage {
    #[default]
    EnUs,
    ZhCn,
}

impl NotifyLanguage {
    /// `rust_i18n` locale name.
    pub fn locale(self) -> &'static str {
        match self {
            Self::EnUs => "en",
            Self::ZhCn => "zh-CN",
        }
    }
}

// ── Push channels ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarkConfig {
    /// Device push URL, e.g. `https://api.day.app/<key>`
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerChanConfig {
    pub send_key: String,
    #[serde(default = "ServerChanConfig::default_api_base")]
    pub api_base: String,
}

impl ServerChanConfig {
    pub fn default_api_base() -> String {
        DEFAULT_SERVERCHAN_API.into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeComConfig {
    pub webhook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub user_id: String,
    #[serde(default = "TelegramConfig::default_api_base")]
    pub api_base: String,
}

impl TelegramConfig {
    pub fn default_api_base() -> String {
        DEFAULT_TELEGRAM_API.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_kebab_case() {
        assert_eq!("zh-cn".parse::<NotifyLanguage>().unwrap(), NotifyLanguage::ZhCn);
        assert_eq!("EN-US".parse::<NotifyLanguage>().unwrap(), NotifyLanguage::EnUs);
        assert_eq!(NotifyLanguage::ZhCn.to_string(), "zh-cn");
        assert_eq!(NotifyLanguage::ZhCn.locale(), "zh-CN");
    }

    #[test]
    fn channel_sections_parse_with_defaults() {
        let notify: NotifyConfig = toml::from_str(
            r#"
            language = "zh-cn"

            [serverchan]
            send_key = "SCT1"

            [telegram]
            bot_token = "1:a"
            user_id = "7"
            "#,
        )
        .unwrap();
        assert!(notify.force);
        assert_eq!(notify.language, NotifyLanguage::ZhCn);
        assert_eq!(notify.serverchan.unwrap().api_base, DEFAULT_SERVERCHAN_API);
        assert_eq!(notify.telegram.unwrap().api_base, DEFAULT_TELEGRAM_API);
        assert!(notify.bark.is_none());
    }
}
