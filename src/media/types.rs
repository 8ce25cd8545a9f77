use super::detection::{OCTET_STREAM, detect_mime, normalize_mime};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Media attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    /// Remote http(s) resource, passed to hosts by reference.
    Url(String),
    /// Bytes carried inline as base64 with their MIME type.
    Inline { mime: String, base64: String },
}

impl MediaRef {
    /// Classify a caller-supplied media string.
    ///
    /// Accepts an http(s) URL, a `data:` URI, or a bare base64 blob whose
    /// type is sniffed from its magic bytes. Anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let lower = input.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Some(Self::Url(input.to_string()));
        }
        if lower.starts_with("data:") {
            return Self::parse_data_uri(&input[5..]);
        }
        Self::parse_base64(input)
    }

    // `<mime>[;param]*[;base64],<payload>`
    fn parse_data_uri(rest: &str) -> Option<Self> {
        let (header, payload) = rest.split_once(',')?;
        let mut parts = header.split(';');
        let declared = parts.next().unwrap_or_default();
        let is_base64 = parts.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let base64 = if is_base64 {
            let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
            STANDARD.decode(&cleaned).ok()?;
            cleaned
        } else {
            STANDARD.encode(payload.as_bytes())
        };

        let mime = normalize_mime(declared)
            .or_else(|| {
                STANDARD
                    .decode(&base64)
                    .ok()
                    .and_then(|bytes| detect_mime(&bytes))
            })
            .unwrap_or_else(|| OCTET_STREAM.to_string());

        Some(Self::Inline { mime, base64 })
    }

    fn parse_base64(input: &str) -> Option<Self> {
        let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD.decode(&cleaned).ok()?;
        let mime = detect_mime(&bytes).unwrap_or_else(|| OCTET_STREAM.to_string());
        Some(Self::Inline {
            mime,
            base64: cleaned,
        })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Inline { .. } => None,
        }
    }

    /// `(mime, base64)` for inline media.
    pub fn inline(&self) -> Option<(&str, &str)> {
        match self {
            Self::Url(_) => None,
            Self::Inline { mime, base64 } => Some((mime, base64)),
        }
    }
}
