use super::traits::{Channel, PushMessage};
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

/// Telegram channel: Bot API `sendMessage` to one chat
pub struct TelegramChannel {
    api_base: String,
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(
        api_base: String,
        bot_token: String,
        chat_id: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_base,
            bot_token,
            chat_id,
            client,
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send<'a>(
        &'a self,
        message: &'a PushMessage,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut text = format!("{}\n{}", message.title, message.content());
            if let Some(url) = &message.open_url {
                text.push('\n');
                text.push_str(url);
            }

            let body = serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            });

            let resp = self
                .client
                .post(self.api_url("sendMessage"))
                .json(&body)
                .send()
                .await?;

            if !resp.status().is_success() {
                let status = resp.status();
                let err = resp
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
                anyhow::bail!("Telegram sendMessage failed ({status}): {err}");
            }

            Ok(())
        })
    }
}
