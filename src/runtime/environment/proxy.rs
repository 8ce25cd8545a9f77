use super::bridge::{NativeCallback, NativePreferences, NativeTransport, ProxyBridge};
use super::traits::{BoxFuture, HostCapabilities, TimeoutUnit};
use super::HostEnvironment;
use crate::error::HttpError;
use crate::http::{Headers, Method, NativeRequest, ResponseEnvelope};
use crate::store::StorageBackend;
use anyhow::bail;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Host adapter for the proxy scripting runtimes.
pub struct ProxyHost {
    environment: HostEnvironment,
    bridge: ProxyBridge,
    storage: Arc<PreferencesStore>,
}

impl ProxyHost {
    /// Fails when `environment` is not a proxy runtime or the bridge offers
    /// the wrong transport family for it.
    pub fn new(environment: HostEnvironment, bridge: ProxyBridge) -> anyhow::Result<Self> {
        if !environment.is_proxy() {
            bail!("{environment} is not a proxy host");
        }

        let expected = expected_family(environment);
        if bridge.transport.family() != expected {
            bail!(
                "{environment} expects a {expected} transport, bridge provides {}",
                bridge.transport.family()
            );
        }

        let storage = Arc::new(PreferencesStore(Arc::clone(&bridge.preferences)));
        Ok(Self {
            environment,
            bridge,
            storage,
        })
    }

    /// Native option object for `request`, in this host's field names.
    pub fn native_options(&self, request: &NativeRequest) -> Value {
        let mut options = json!({
            "url": request.url,
            "headers": request.headers.to_json(),
            "timeout": self.timeout_unit().convert(request.timeout),
        });
        if let Some(body) = &request.body {
            options["body"] = Value::String(body.clone());
        }

        if self.environment == HostEnvironment::QuantumultX {
            options["method"] = Value::String(request.method.as_str().to_string());
            if !request.follow_redirects {
                options["opts"] = json!({ "redirection": false });
            }
        } else if !request.follow_redirects {
            options["auto-redirect"] = Value::Bool(false);
        }
        options
    }

    async fn send_callback(
        http: &dyn super::bridge::CallbackHttp,
        method: Method,
        options: Value,
    ) -> Result<ResponseEnvelope, HttpError> {
        let (tx, rx) = oneshot::channel();
        let callback: NativeCallback = Box::new(move |error, response, body| {
            // The receiver is gone when the timeout already won the race.
            let _ = tx.send((error, response, body));
        });

        match method {
            Method::Get => http.get(options, callback),
            Method::Post => http.post(options, callback),
        }

        let (error, response, body) = rx
            .await
            .map_err(|_| HttpError::Transport("native client dropped its callback".into()))?;

        if let Some(error) = error {
            return Err(HttpError::Transport(error));
        }
        let response = response.unwrap_or(Value::Null);
        Ok(normalize_response(&response, body))
    }
}

fn expected_family(environment: HostEnvironment) -> &'static str {
    match environment {
        HostEnvironment::QuantumultX => "fetch",
        _ => "callback",
    }
}

/// Build an envelope from a native response object. Hosts disagree on
/// `status` vs `statusCode`; a response without either is taken as 200.
fn normalize_response(response: &Value, body: Option<String>) -> ResponseEnvelope {
    let status = response
        .get("status")
        .or_else(|| response.get("statusCode"))
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(200);
    let headers = response
        .get("headers")
        .map(Headers::from_json)
        .unwrap_or_default();
    let body = body
        .or_else(|| response.get("body").and_then(Value::as_str).map(ToString::to_string))
        .unwrap_or_default();
    ResponseEnvelope::new(status, headers, body)
}

fn fetch_error_message(error: &Value) -> String {
    match error {
        Value::String(text) => text.clone(),
        other => other
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(|| other.to_string(), ToString::to_string),
    }
}

impl HostCapabilities for ProxyHost {
    fn environment(&self) -> HostEnvironment {
        self.environment
    }

    fn storage(&self) -> Arc<dyn StorageBackend> {
        self.storage.clone()
    }

    fn timeout_unit(&self) -> TimeoutUnit {
        if self.environment == HostEnvironment::Surge {
            TimeoutUnit::Seconds
        } else {
            TimeoutUnit::Millis
        }
    }

    fn send<'a>(
        &'a self,
        request: &'a NativeRequest,
    ) -> BoxFuture<'a, Result<ResponseEnvelope, HttpError>> {
        Box::pin(async move {
            let options = self.native_options(request);
            match &self.bridge.transport {
                NativeTransport::Callback(http) => {
                    Self::send_callback(http.as_ref(), request.method, options).await
                }
                NativeTransport::Fetch(http) => match http.fetch(options).await {
                    Ok(response) => Ok(normalize_response(&response, None)),
                    Err(error) => Err(HttpError::Transport(fetch_error_message(&error))),
                },
            }
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
            self.bridge.notifier.post(title, subtitle, body, payload);
        })
    }

    fn done(&self) {
        if let Some(done) = &self.bridge.done {
            done();
        }
    }
}

/// `StorageBackend` over the host's persistent preference calls.
struct PreferencesStore(Arc<dyn NativePreferences>);

impl StorageBackend for PreferencesStore {
    fn name(&self) -> &str {
        "preferences"
    }

    fn read(&self, key: &str) -> Option<String> {
        self.0.read(key)
    }

    fn write(&self, key: &str, value: &str) -> bool {
        self.0.write(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::environment::bridge::{CallbackHttp, FetchHttp, NativeNotifier};
    use std::sync::Mutex;
    use std::time::Duration;

    struct Prefs;

    impl NativePreferences for Prefs {
        fn read(&self, _key: &str) -> Option<String> {
            None
        }

        fn write(&self, _key: &str, _value: &str) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct Notes(Mutex<Vec<(String, Option<Value>)>>);

    impl NativeNotifier for Notes {
        fn post(&self, title: &str, _subtitle: &str, _body: &str, payload: Option<&Value>) {
            self.0
                .lock()
                .unwrap()
                .push((title.to_string(), payload.cloned()));
        }
    }

    struct Echo;

    impl CallbackHttp for Echo {
        fn get(&self, options: Value, callback: NativeCallback) {
            callback(
                None,
                Some(json!({"statusCode": 201, "headers": {"X-Seen": "get"}})),
                Some(options.to_string()),
            );
        }

        fn post(&self, _options: Value, callback: NativeCallback) {
            callback(Some("socket closed".into()), None, None);
        }
    }

    struct Fetcher;

    impl FetchHttp for Fetcher {
        fn fetch(&self, options: Value) -> BoxFuture<'static, Result<Value, Value>> {
            Box::pin(async move {
                if options["url"] == "https://fail" {
                    Err(json!({"error": "offline"}))
                } else {
                    Ok(json!({"statusCode": 200, "headers": {}, "body": "{\"ok\":1}"}))
                }
            })
        }
    }

    fn bridge(transport: NativeTransport) -> ProxyBridge {
        ProxyBridge::new(transport, Arc::new(Prefs), Arc::new(Notes::default()))
    }

    fn request(follow_redirects: bool) -> NativeRequest {
        NativeRequest {
            method: Method::Post,
            url: "https://x/y".into(),
            headers: [("Content-Type", "application/json")].into_iter().collect(),
            body: Some("{}".into()),
            timeout: Duration::from_millis(2500),
            follow_redirects,
        }
    }

    #[test]
    fn surge_options_use_seconds_and_auto_redirect() {
        let host = ProxyHost::new(
            HostEnvironment::Surge,
            bridge(NativeTransport::Callback(Arc::new(Echo))),
        )
        .unwrap();
        let options = host.native_options(&request(false));
        assert_eq!(options["timeout"], 3);
        assert_eq!(options["auto-redirect"], false);
        assert_eq!(options["body"], "{}");
        assert_eq!(options["headers"]["Content-Type"], "application/json");
        assert!(options.get("method").is_none());
    }

    #[test]
    fn loon_options_use_millis_and_omit_redirect_flag_when_following() {
        let host = ProxyHost::new(
            HostEnvironment::Loon,
            bridge(NativeTransport::Callback(Arc::new(Echo))),
        )
        .unwrap();
        let options = host.native_options(&request(true));
        assert_eq!(options["timeout"], 2500);
        assert!(options.get("auto-redirect").is_none());
    }

    #[test]
    fn quantumult_options_carry_method_and_redirection_opt() {
        let host = ProxyHost::new(
            HostEnvironment::QuantumultX,
            bridge(NativeTransport::Fetch(Arc::new(Fetcher))),
        )
        .unwrap();
        let options = host.native_options(&request(false));
        assert_eq!(options["method"], "POST");
        assert_eq!(options["opts"]["redirection"], false);
        assert_eq!(options["timeout"], 2500);
    }

    #[test]
    fn transport_family_mismatch_is_rejected() {
        let result = ProxyHost::new(
            HostEnvironment::QuantumultX,
            bridge(NativeTransport::Callback(Arc::new(Echo))),
        );
        assert!(result.is_err());
        assert!(
            ProxyHost::new(
                HostEnvironment::Server,
                bridge(NativeTransport::Callback(Arc::new(Echo)))
            )
            .is_err()
        );
    }

    #[tokio::test]
    async fn callback_responses_normalize_status_code_and_errors() {
        let host = ProxyHost::new(
            HostEnvironment::Stash,
            bridge(NativeTransport::Callback(Arc::new(Echo))),
        )
        .unwrap();

        let mut get = request(false);
        get.method = Method::Get;
        let envelope = host.send(&get).await.unwrap();
        assert_eq!(envelope.status, 201);
        assert_eq!(envelope.headers.get("x-seen"), Some("get"));
        assert_eq!(envelope.parsed_body.unwrap()["url"], "https://x/y");

        let err = host.send(&request(false)).await.unwrap_err();
        assert_eq!(err, HttpError::Transport("socket closed".into()));
    }

    #[tokio::test]
    async fn fetch_responses_and_rejections_normalize() {
        let host = ProxyHost::new(
            HostEnvironment::QuantumultX,
            bridge(NativeTransport::Fetch(Arc::new(Fetcher))),
        )
        .unwrap();

        let ok = host.send(&request(false)).await.unwrap();
        assert_eq!(ok.parsed_body, Some(json!({"ok": 1})));

        let mut failing = request(false);
        failing.url = "https://fail".into();
        let err = host.send(&failing).await.unwrap_err();
        assert_eq!(err, HttpError::Transport("offline".into()));
    }

    #[tokio::test]
    async fn post_and_done_reach_the_bridge() {
        let notes = Arc::new(Notes::default());
        let finished = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&finished);
        let bridge = ProxyBridge::new(
            NativeTransport::Callback(Arc::new(Echo)),
            Arc::new(Prefs),
            notes.clone(),
        )
        .on_done(move || *flag.lock().unwrap() = true);

        let host = ProxyHost::new(HostEnvironment::Loon, bridge).unwrap();
        let payload = json!({"openUrl": "https://x"});
        host.post("t", "s", "b", Some(&payload)).await;
        host.done();

        assert_eq!(notes.0.lock().unwrap()[0], ("t".to_string(), Some(payload)));
        assert!(*finished.lock().unwrap());
    }
}
