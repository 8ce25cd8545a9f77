use std::future::Future;
use std::pin::Pin;

/// One notification as a push channel sees it.
///
/// `open_url`, `copy` and `icon` are optional extras; channels that cannot
/// carry them ignore them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub open_url: Option<String>,
    pub copy: Option<String>,
    pub icon: Option<String>,
}

impl PushMessage {
    /// Subtitle and body as one text block.
    pub fn content(&self) -> String {
        if self.subtitle.is_empty() {
            self.body.clone()
        } else if self.body.is_empty() {
            self.subtitle.clone()
        } else {
            format!("{}\n{}", self.subtitle, self.body)
        }
    }
}

/// Core push channel trait: implement for any notification service
pub trait Channel: Send + Sync {
    /// Human-readable channel name
    fn name(&self) -> &str;

    /// Deliver one message
    fn send<'a>(
        &'a self,
        message: &'a PushMessage,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;
}
