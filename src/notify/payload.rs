use crate::media::MediaRef;
use crate::runtime::HostEnvironment;
use serde_json::{Map, Value, json};

/// One logical notification, before any host shaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub open_url: Option<String>,
    pub clipboard: Option<String>,
    pub media: Option<MediaRef>,
}

/// Native payload for `environment`, holding only the fields that host accepts.
/// `None` when nothing beyond title, subtitle and body survives.
pub fn build(environment: HostEnvironment, n: &Notification) -> Option<Value> {
    let mut out = Map::new();
    let media_url = n.media.as_ref().and_then(MediaRef::url);
    let inline = n.media.as_ref().and_then(MediaRef::inline);

    match environment {
        HostEnvironment::Surge | HostEnvironment::Shadowrocket => {
            if let Some(url) = &n.open_url {
                out.insert("action".into(), json!("open-url"));
                out.insert("url".into(), json!(url));
            } else if let Some(text) = &n.clipboard {
                out.insert("action".into(), json!("clipboard"));
                out.insert("text".into(), json!(text));
            }
            if let Some(url) = media_url {
                out.insert("media-url".into(), json!(url));
            }
            if let Some((mime, data)) = inline {
                out.insert("media-base64".into(), json!(data));
                out.insert("media-base64-mime".into(), json!(mime));
            }
        }
        HostEnvironment::Stash => {
            if let Some(url) = &n.open_url {
                out.insert("url".into(), json!(url));
            }
        }
        HostEnvironment::Loon => {
            if let Some(url) = &n.open_url {
                out.insert("openUrl".into(), json!(url));
            }
            if let Some(url) = media_url {
                out.insert("mediaUrl".into(), json!(url));
            }
        }
        HostEnvironment::QuantumultX => {
            if let Some(url) = &n.open_url {
                out.insert("open-url".into(), json!(url));
            }
            if let Some(text) = &n.clipboard {
                out.insert("update-pasteboard".into(), json!(text));
            }
            if let Some(url) = media_url {
                out.insert("media-url".into(), json!(url));
            }
        }
        HostEnvironment::Server => {
            if let Some(url) = &n.open_url {
                out.insert("url".into(), json!(url));
            }
            if let Some(text) = &n.clipboard {
                out.insert("copy".into(), json!(text));
            }
            if let Some(url) = media_url {
                out.insert("icon".into(), json!(url));
            }
        }
        HostEnvironment::Unknown => {}
    }

    (!out.is_empty()).then_some(Value::Object(out))
}
