//! HTTP façade: one `request` entry point over every host transport.
//!
//! The façade resolves method, URL, body and headers, then races the host's
//! native call against the timeout. Hosts never see a `RequestSpec`, only the
//! resolved `NativeRequest`.

pub mod encoding;
pub mod types;

pub use types::{
    BodyEncoding, Headers, Method, NativeRequest, Reply, ReplyData, RequestBody, RequestSpec,
    ResponseEnvelope, ResultShape,
};

use crate::error::HttpError;
use crate::logger::Logger;
use crate::runtime::HostCapabilities;
use encoding::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Status-error bodies are clipped to this many bytes in error values.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Clone)]
pub struct HttpClient {
    host: Arc<dyn HostCapabilities>,
    logger: Arc<Logger>,
    default_timeout: Duration,
    user_agent: Option<String>,
}

impl HttpClient {
    pub fn new(host: Arc<dyn HostCapabilities>, logger: Arc<Logger>) -> Self {
        Self {
            host,
            logger,
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: None,
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Resolve a spec into the request a host transport receives.
    ///
    /// Query parameters always land on the URL, POST included; existing site
    /// workflows depend on that.
    pub fn prepare(&self, spec: RequestSpec) -> Result<NativeRequest, HttpError> {
        let RequestSpec {
            url,
            method,
            mut headers,
            body,
            query,
            body_encoding,
            result_shape: _,
            timeout_ms,
            follow_redirects,
        } = spec;

        let url = url.trim();
        if url.is_empty() {
            return Err(HttpError::InvalidRequest("url must not be empty".into()));
        }

        let method = method.unwrap_or(if body.is_some() {
            Method::Post
        } else {
            Method::Get
        });
        let url = encoding::append_query(url, &query);

        let body = match body {
            None => None,
            Some(RequestBody::Raw(text)) => Some(text),
            Some(RequestBody::Value(value)) => Some(encode_body(&value, body_encoding, &mut headers)?),
        };

        if let Some(agent) = &self.user_agent {
            if !headers.contains("User-Agent") {
                headers.insert("User-Agent", agent.clone());
            }
        }

        Ok(NativeRequest {
            method,
            url,
            headers,
            body,
            timeout: timeout_ms.map_or(self.default_timeout, Duration::from_millis),
            follow_redirects,
        })
    }

    /// Run a request and return the typed outcome.
    pub async fn try_request(&self, spec: RequestSpec) -> Result<Reply, HttpError> {
        let shape = spec.result_shape;
        let request = self.prepare(spec)?;
        self.logger
            .debug(format!("{} {} via {}", request.method, request.url, self.host.name()));

        let envelope = match tokio::time::timeout(request.timeout, self.host.send(&request)).await
        {
            Ok(result) => result?,
            // Dropping the transport future is the cancellation.
            Err(_) => {
                return Err(HttpError::Timeout {
                    timeout_ms: u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
        };

        let accepted = envelope.is_success()
            || (shape == ResultShape::Full && envelope.is_redirect());
        if !accepted {
            return Err(HttpError::Status {
                status: envelope.status,
                body: clip(&envelope.body),
            });
        }

        Ok(match shape {
            ResultShape::Data => Reply::Data(envelope.into_data()),
            ResultShape::Full => Reply::Full(envelope),
        })
    }

    /// Run a request; failures are logged and come back as `None`.
    pub async fn request(&self, spec: RequestSpec) -> Option<Reply> {
        let target = format!("{} {}", spec.method.map_or("request", Method::as_str), spec.url);
        match self.try_request(spec).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                self.logger.error(format!("{target} failed: {e}"));
                None
            }
        }
    }

    /// GET `url` and return its JSON body, if any.
    pub async fn get_json(&self, url: &str) -> Option<Value> {
        self.request(RequestSpec::get(url))
            .await
            .and_then(|reply| reply.json().cloned())
    }
}

fn encode_body(
    value: &Value,
    body_encoding: BodyEncoding,
    headers: &mut Headers,
) -> Result<String, HttpError> {
    match body_encoding {
        BodyEncoding::Form => {
            if !headers.contains("Content-Type") {
                headers.insert("Content-Type", FORM_CONTENT_TYPE);
            }
            Ok(encoding::encode_form(value))
        }
        BodyEncoding::Json => {
            if !headers.contains("Content-Type") {
                headers.insert("Content-Type", JSON_CONTENT_TYPE);
            }
            serde_json::to_string(value)
                .map_err(|e| HttpError::InvalidRequest(format!("body is not serializable: {e}")))
        }
    }
}

fn clip(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
