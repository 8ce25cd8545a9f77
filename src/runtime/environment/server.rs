use super::HostEnvironment;
use super::traits::{BoxFuture, HostCapabilities};
use crate::config::Config;
use crate::error::HttpError;
use crate::http::{Headers, Method, NativeRequest, ResponseEnvelope};
use crate::store::{FileStore, StorageBackend};
use crate::transport::channels::{Channel, PushMessage, build_channels};
use anyhow::Context as _;
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Standalone server-side host: reqwest transport with a shared cookie jar,
/// a JSON document file for storage, and push channels for notifications.
pub struct ServerHost {
    storage: Arc<FileStore>,
    client: reqwest::Client,
    redirecting_client: reqwest::Client,
    channels: Vec<Box<dyn Channel>>,
}

impl ServerHost {
    pub fn new(store_path: PathBuf, channels: Vec<Box<dyn Channel>>) -> anyhow::Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .redirect(Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        let redirecting_client = reqwest::Client::builder()
            .cookie_provider(jar)
            .build()
            .context("Failed to build redirecting HTTP client")?;

        Ok(Self {
            storage: Arc::new(FileStore::new(store_path)),
            client,
            redirecting_client,
            channels,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.store_path(), build_channels(&config.notify))
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }
}

/// Map the shaped payload (`url`, `copy`, `icon`) onto a push message.
fn push_message(title: &str, subtitle: &str, body: &str, payload: Option<&Value>) -> PushMessage {
    let field = |name: &str| {
        payload
            .and_then(|p| p.get(name))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    };
    PushMessage {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        body: body.to_string(),
        open_url: field("url"),
        copy: field("copy"),
        icon: field("icon"),
    }
}

impl HostCapabilities for ServerHost {
    fn environment(&self) -> HostEnvironment {
        HostEnvironment::Server
    }

    fn storage(&self) -> Arc<dyn StorageBackend> {
        self.storage.clone()
    }

    fn send<'a>(
        &'a self,
        request: &'a NativeRequest,
    ) -> BoxFuture<'a, Result<ResponseEnvelope, HttpError>> {
        Box::pin(async move {
            let client = if request.follow_redirects {
                &self.redirecting_client
            } else {
                &self.client
            };

            let mut builder = match request.method {
                Method::Get => client.get(request.url.as_str()),
                Method::Post => client.post(request.url.as_str()),
            };
            for (name, value) in request.headers.iter() {
                builder = builder.header(name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let resp = builder
                .send()
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?;

            let status = resp.status().as_u16();
            let mut headers = Headers::new();
            for (name, value) in resp.headers() {
                headers.append(
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                );
            }
            let body = resp
                .text()
                .await
                .map_err(|e| HttpError::Transport(format!("failed to read body: {e}")))?;

            Ok(ResponseEnvelope::new(status, headers, body))
        })
    }

    fn post<'a>(
        &'a self,
        title: &'a str,
        subtitle: &'a str,
        body: &'a str,
        payload: Option<&'a Value>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let message = push_message(title, subtitle, body, payload);
            for channel in &self.channels {
                match channel.send(&message).await {
                    Ok(()) => tracing::info!("📲 {} sent", channel.name()),
                    Err(e) => tracing::warn!("❌ {} failed: {e}", channel.name()),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_message_reads_shaped_fields() {
        let payload = json!({"url": "https://open", "copy": "c", "icon": "https://i.png"});
        let message = push_message("t", "s", "b", Some(&payload));
        assert_eq!(message.open_url.as_deref(), Some("https://open"));
        assert_eq!(message.copy.as_deref(), Some("c"));
        assert_eq!(message.icon.as_deref(), Some("https://i.png"));

        let bare = push_message("t", "s", "b", None);
        assert!(bare.open_url.is_none() && bare.copy.is_none() && bare.icon.is_none());
    }
}
