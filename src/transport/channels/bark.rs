use super::traits::{Channel, PushMessage};
use anyhow::{Context, anyhow};
use std::future::Future;
use std::pin::Pin;
use url::Url;

/// Bark push: `GET {base}/{title}/{content}` with optional
/// `url`, `copy` and `icon` query parameters.
pub struct BarkChannel {
    base_url: String,
    client: reqwest::Client,
}

impl BarkChannel {
    pub fn new(base_url: String, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    pub(crate) fn endpoint(&self, message: &PushMessage) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base_url).context("invalid Bark push URL")?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("Bark push URL cannot take path segments"))?
            .pop_if_empty()
            .push(&message.title)
            .push(&message.content());

        let extras: Vec<(&str, &str)> = [
            ("url", message.open_url.as_deref()),
            ("copy", message.copy.as_deref()),
            ("icon", message.icon.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();
        if !extras.is_empty() {
            url.query_pairs_mut().extend_pairs(extras);
        }
        Ok(url)
    }
}

impl Channel for BarkChannel {
    fn name(&self) -> &str {
        "bark"
    }

    fn send<'a>(
        &'a self,
        message: &'a PushMessage,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.endpoint(message)?;
            let resp = self.client.get(url).send().await?;

            if !resp.status().is_success() {
                let status = resp.status();
                let err = resp
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
                anyhow::bail!("Bark push failed ({status}): {err}");
            }
            Ok(())
        })
    }
}
