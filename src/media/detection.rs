/// Fallback when neither the caller nor the bytes name a type.
pub const OCTET_STREAM: &str = "application/octet-stream";

#[must_use]
pub fn detect_mime(data: &[u8]) -> Option<String> {
    infer::get(data).map(|info| info.mime_type().to_string())
}

/// Parse a declared MIME type down to its essence (`image/png; x=y` -> `image/png`).
#[must_use]
pub fn normalize_mime(raw: &str) -> Option<String> {
    raw.trim()
        .parse::<mime::Mime>()
        .ok()
        .map(|m| m.essence_str().to_ascii_lowercase())
}
