use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

// ── Method / encodings ──────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// How a non-string body is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    #[default]
    Form,
    Json,
}

/// What a successful request hands back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultShape {
    /// Parsed body (JSON when possible, raw text otherwise).
    #[default]
    Data,
    /// Status, headers and body.
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent verbatim regardless of `BodyEncoding`.
    Raw(String),
    /// Encoded per `BodyEncoding`.
    Value(Value),
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for RequestBody {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

// ── Headers ─────────────────────────────────────────────────────

/// Ordered header list. Names keep the casing they were written with and are
/// matched case-insensitively on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replace every header matching `name` (any casing) with one entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.0.push((name, value.into()));
    }

    /// Add an entry without touching existing ones (multi-valued headers).
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object form used by native bridges. Repeated names are joined
    /// with `, ` except `Set-Cookie`, which becomes an array.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.0 {
            match map.get_mut(name) {
                None => {
                    map.insert(name.clone(), Value::String(value.clone()));
                }
                Some(Value::Array(items)) => items.push(Value::String(value.clone())),
                Some(existing) => {
                    let previous = existing.as_str().unwrap_or_default().to_string();
                    *existing = if name.eq_ignore_ascii_case("set-cookie") {
                        Value::Array(vec![Value::String(previous), Value::String(value.clone())])
                    } else {
                        Value::String(format!("{previous}, {value}"))
                    };
                }
            }
        }
        Value::Object(map)
    }

    /// Read a native header object. Array values become repeated entries;
    /// non-string scalars are stringified.
    pub fn from_json(value: &Value) -> Self {
        let mut headers = Self::new();
        let Some(map) = value.as_object() else {
            return headers;
        };
        for (name, value) in map {
            match value {
                Value::String(text) => headers.append(name.clone(), text.clone()),
                Value::Array(items) => {
                    for item in items {
                        headers.append(name.clone(), scalar_text(item));
                    }
                }
                Value::Null => {}
                other => headers.append(name.clone(), scalar_text(other)),
            }
        }
        headers
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

// ── Request spec ────────────────────────────────────────────────

/// Caller-facing request description. Unset fields take the façade defaults:
/// method from body presence, form encoding, `data` result shape, the
/// configured timeout, and no redirect following.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSpec {
    pub url: String,
    pub method: Option<Method>,
    pub headers: Headers,
    pub body: Option<RequestBody>,
    pub query: Vec<(String, String)>,
    pub body_encoding: BodyEncoding,
    pub result_shape: ResultShape,
    pub timeout_ms: Option<u64>,
    pub follow_redirects: bool,
}

impl RequestSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::Get)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::Post)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(RequestBody::Value(value));
        self.body_encoding = BodyEncoding::Json;
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = encoding;
        self
    }

    pub fn full(mut self) -> Self {
        self.result_shape = ResultShape::Full;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn follow_redirects(mut self) -> Self {
        self.follow_redirects = true;
        self
    }
}

/// Fully resolved request handed to a host transport.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
    pub timeout: Duration,
    pub follow_redirects: bool,
}

// ── Response ────────────────────────────────────────────────────

/// Normalized response every host transport produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
    pub parsed_body: Option<Value>,
}

impl ResponseEnvelope {
    pub fn new(status: u16, headers: Headers, body: String) -> Self {
        let parsed_body = serde_json::from_str(&body).ok();
        Self {
            status,
            headers,
            body,
            parsed_body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// A suppressed redirect; only `full` callers get it back.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn into_data(self) -> ReplyData {
        match self.parsed_body {
            Some(value) => ReplyData::Json(value),
            None => ReplyData::Text(self.body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyData {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Data(ReplyData),
    Full(ResponseEnvelope),
}

impl Reply {
    /// Parsed JSON body, whichever shape was requested.
    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Data(ReplyData::Json(value)) => Some(value),
            Self::Data(ReplyData::Text(_)) => None,
            Self::Full(envelope) => envelope.parsed_body.as_ref(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Data(ReplyData::Text(text)) => Some(text),
            Self::Data(ReplyData::Json(_)) => None,
            Self::Full(envelope) => Some(&envelope.body),
        }
    }

    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            Self::Full(envelope) => Some(envelope),
            Self::Data(_) => None,
        }
    }
}
