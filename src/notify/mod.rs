//! Notification dispatch: one logical message, shaped per host.

pub mod payload;

pub use payload::{Notification, build};

use crate::logger::Logger;
use crate::media::MediaRef;
use crate::runtime::HostCapabilities;
use std::sync::Arc;

/// Optional parts of a notification, as callers supply them.
#[derive(Debug, Clone, Default)]
pub struct NotifyExtras {
    pub open_url: Option<String>,
    pub clipboard: Option<String>,
    /// http(s) URL, `data:` URI or bare base64
    pub media: Option<String>,
}

impl NotifyExtras {
    pub fn open_url(mut self, url: impl Into<String>) -> Self {
        self.open_url = Some(url.into());
        self
    }

    pub fn clipboard(mut self, text: impl Into<String>) -> Self {
        self.clipboard = Some(text.into());
        self
    }

    pub fn media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }
}

#[derive(Clone)]
pub struct Notifier {
    host: Arc<dyn HostCapabilities>,
    logger: Arc<Logger>,
    muted: bool,
}

impl Notifier {
    pub fn new(host: Arc<dyn HostCapabilities>, logger: Arc<Logger>) -> Self {
        Self {
            host,
            logger,
            muted: false,
        }
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub async fn notify(&self, title: &str, subtitle: &str, body: &str, extras: &NotifyExtras) {
        let media = extras.media.as_deref().and_then(|raw| {
            let parsed = MediaRef::parse(raw);
            if parsed.is_none() {
                self.logger.warn("dropping unrecognized notification media");
            }
            parsed
        });

        let notification = Notification {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            body: body.to_string(),
            open_url: extras.open_url.clone(),
            clipboard: extras.clipboard.clone(),
            media,
        };

        self.logger.info(format!(
            "📣 {}\n{}\n{}",
            notification.title, notification.subtitle, notification.body
        ));

        if self.muted {
            return;
        }

        let payload = build(self.host.environment(), &notification);
        self.host
            .post(
                &notification.title,
                &notification.subtitle,
                &notification.body,
                payload.as_ref(),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use crate::http::{NativeRequest, ResponseEnvelope};
    use crate::runtime::environment::{BoxFuture, HostEnvironment};
    use crate::store::{MemoryStore, StorageBackend};
    use serde_json::{Value, json};
    use std::sync::Mutex;

    type Posted = (String, String, String, Option<Value>);

    struct Recorder {
        environment: HostEnvironment,
        posted: Mutex<Vec<Posted>>,
    }

    impl Recorder {
        fn new(environment: HostEnvironment) -> Arc<Self> {
            Arc::new(Self {
                environment,
                posted: Mutex::new(Vec::new()),
            })
        }
    }

    impl HostCapabilities for Recorder {
        fn environment(&self) -> HostEnvironment {
            self.environment
        }

        fn storage(&self) -> Arc<dyn StorageBackend> {
            Arc::new(MemoryStore::new("recorder"))
        }

        fn send<'a>(
            &'a self,
            _request: &'a NativeRequest,
        ) -> BoxFuture<'a, Result<ResponseEnvelope, HttpError>> {
            Box::pin(async {
                Err(HttpError::Unsupported {
                    host: "recorder".into(),
                })
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
                self.posted.lock().unwrap().push((
                    title.to_string(),
                    subtitle.to_string(),
                    body.to_string(),
                    payload.cloned(),
                ));
            })
        }
    }

    #[tokio::test]
    async fn posts_shaped_payload_to_host() {
        let host = Recorder::new(HostEnvironment::Loon);
        let logger = Arc::new(Logger::new("notify").muted(true));
        let notifier = Notifier::new(host.clone(), logger);

        notifier
            .notify(
                "Title",
                "Sub",
                "Body",
                &NotifyExtras::default()
                    .open_url("https://open.test")
                    .clipboard("dropped on loon"),
            )
            .await;

        let posted = host.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, "Title");
        assert_eq!(posted[0].3, Some(json!({"openUrl": "https://open.test"})));
    }

    #[tokio::test]
    async fn muted_notifier_skips_host_but_keeps_transcript() {
        let host = Recorder::new(HostEnvironment::Surge);
        let logger = Arc::new(Logger::new("notify").muted(true));
        let notifier = Notifier::new(host.clone(), Arc::clone(&logger)).muted(true);

        notifier
            .notify("Quiet", "", "nothing sent", &NotifyExtras::default())
            .await;

        assert!(host.posted.lock().unwrap().is_empty());
        assert!(logger.transcript().iter().any(|l| l.contains("Quiet")));
    }

    #[tokio::test]
    async fn inline_media_reaches_surge() {
        let host = Recorder::new(HostEnvironment::Surge);
        let notifier = Notifier::new(host.clone(), Arc::new(Logger::new("n").muted(true)));

        notifier
            .notify(
                "t",
                "s",
                "b",
                &NotifyExtras::default().media("data:image/png;base64,iVBORw0KGgoA"),
            )
            .await;

        let posted = host.posted.lock().unwrap();
        assert_eq!(
            posted[0].3,
            Some(json!({"media-base64": "iVBORw0KGgoA", "media-base64-mime": "image/png"}))
        );
    }

    #[tokio::test]
    async fn bad_media_is_dropped_with_warning() {
        let host = Recorder::new(HostEnvironment::Surge);
        let logger = Arc::new(Logger::new("n").muted(true));
        let notifier = Notifier::new(host.clone(), Arc::clone(&logger));

        notifier
            .notify("t", "s", "b", &NotifyExtras::default().media("%%%"))
            .await;

        assert_eq!(host.posted.lock().unwrap()[0].3, None);
        assert!(logger.transcript().iter().any(|l| l.contains("media")));
    }
}
