use super::traits::{Channel, PushMessage};
use crate::http::encoding::FORM_CONTENT_TYPE;
use std::future::Future;
use std::pin::Pin;
use url::form_urlencoded;

pub const DEFAULT_SERVERCHAN_API: &str = "https://sctapi.ftqq.com";

/// ServerChan (Server酱): form POST to `{api}/{key}.send`
pub struct ServerChanChannel {
    api_base: String,
    send_key: String,
    client: reqwest::Client,
}

impl ServerChanChannel {
    pub fn new(api_base: String, send_key: String, client: reqwest::Client) -> Self {
        Self {
            api_base,
            send_key,
            client,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/{}.send", self.api_base.trim_end_matches('/'), self.send_key)
    }
}

impl Channel for ServerChanChannel {
    fn name(&self) -> &str {
        "serverchan"
    }

    fn send<'a>(
        &'a self,
        message: &'a PushMessage,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let body = form_urlencoded::Serializer::new(String::new())
                .append_pair("title", &message.title)
                .append_pair("desp", &message.content())
                .finish();

            let resp = self
                .client
                .post(self.api_url())
                .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body)
                .send()
                .await?;

            if !resp.status().is_success() {
                let status = resp.status();
                let err = resp
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
                anyhow::bail!("ServerChan send failed ({status}): {err}");
            }
            Ok(())
        })
    }
}
