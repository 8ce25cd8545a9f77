use super::traits::{Channel, PushMessage};
use std::future::Future;
use std::pin::Pin;

/// WeCom (企业微信) group robot webhook
pub struct WeComChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl WeComChannel {
    pub fn new(webhook_url: String, client: reqwest::Client) -> Self {
        Self {
            webhook_url,
            client,
        }
    }
}

impl Channel for WeComChannel {
    fn name(&self) -> &str {
        "wecom"
    }

    fn send<'a>(
        &'a self,
        message: &'a PushMessage,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let body = serde_json::json!({
                "msgtype": "text",
                "text": { "content": format!("{}\n{}", message.title, message.content()) }
            });

            let resp = self.client.post(&self.webhook_url).json(&body).send().await?;

            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));

            if !status.is_success() {
                anyhow::bail!("WeCom webhook failed ({status}): {text}");
            }

            // WeCom answers 200 with a non-zero errcode for app-level errors
            let parsed: serde_json::Value = serde_json::from_str(&text).unwrap_or_default();
            if let Some(code) = parsed.get("errcode").and_then(serde_json::Value::as_i64) {
                if code != 0 {
                    let err = parsed
                        .get("errmsg")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("unknown");
                    anyhow::bail!("WeCom webhook failed: {err} ({code})");
                }
            }
            Ok(())
        })
    }
}
