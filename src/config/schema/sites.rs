use crate::error::ConfigError;
use crate::http::{BodyEncoding, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

// ── Scripted sites ───────────────────────────────────────────────

/// One `[[sites]]` entry: where the accounts live and what to call for each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    /// Storage address of the JSON account array (`@container.path` or a flat key)
    pub accounts_key: String,
    /// Runs before `steps`; a failure marks the account as not authenticated
    #[serde(default)]
    pub login: Option<StepConfig>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation("site name must not be empty".into()));
        }
        if self.accounts_key.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "site {}: accounts_key must not be empty",
                self.name
            )));
        }
        if self.steps.is_empty() && self.login.is_none() {
            return Err(ConfigError::Validation(format!(
                "site {}: at least one step is required",
                self.name
            )));
        }
        let mut names = HashSet::new();
        for step in self.login.iter().chain(&self.steps) {
            if step.url.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site {}: step {} has an empty url",
                    self.name, step.name
                )));
            }
        }
        for step in &self.steps {
            if !names.insert(step.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "site {}: duplicate step name {}",
                    self.name, step.name
                )));
            }
        }
        Ok(())
    }
}

/// One templated HTTP call. String fields are rendered with the account
/// record (plus `site`) as template context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    pub name: String,
    pub url: String,
    /// `GET` or `POST`; inferred from `body` when unset
    #[serde(default)]
    pub method: Option<Method>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// String bodies are sent raw; tables are encoded per `encoding`
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub encoding: BodyEncoding,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub follow_redirects: bool,
    /// Response path that must equal `success_value` for the step to pass
    #[serde(default)]
    pub success_path: Option<String>,
    #[serde(default)]
    pub success_value: Option<Value>,
    /// Response path whose value is appended to the account's summary line
    #[serde(default)]
    pub message_path: Option<String>,
    /// Account field -> response path, written back into the account record
    #[serde(default)]
    pub capture: BTreeMap<String, String>,
}

impl StepConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method: None,
            headers: BTreeMap::new(),
            body: None,
            encoding: BodyEncoding::default(),
            query: BTreeMap::new(),
            timeout_ms: None,
            follow_redirects: false,
            success_path: None,
            success_value: None,
            message_path: None,
            capture: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn site_parses_from_toml() {
        let site: SiteConfig = toml::from_str(
            r#"
            name = "demo"
            accounts_key = "@demo.accounts"

            [login]
            name = "login"
            url = "https://demo.test/login"
            method = "POST"
            body = { token = "{{ token }}" }
            capture = { token = "data.token" }

            [[steps]]
            name = "sign"
            url = "https://demo.test/sign"
            encoding = "json"
            success_path = "code"
            success_value = 0
            message_path = "msg"
            headers = { Authorization = "Bearer {{ token }}" }
            "#,
        )
        .unwrap();

        assert!(site.validate().is_ok());
        let login = site.login.as_ref().unwrap();
        assert_eq!(login.method, Some(Method::Post));
        assert_eq!(login.body, Some(json!({"token": "{{ token }}"})));
        assert_eq!(login.capture.get("token").map(String::as_str), Some("data.token"));

        let sign = &site.steps[0];
        assert_eq!(sign.encoding, BodyEncoding::Json);
        assert_eq!(sign.success_value, Some(json!(0)));
        assert_eq!(sign.method, None);
    }

    #[test]
    fn empty_step_url_is_rejected() {
        let site = SiteConfig {
            name: "demo".into(),
            accounts_key: "accounts".into(),
            login: None,
            steps: vec![StepConfig::new("sign", " ")],
        };
        assert!(site.validate().is_err());
    }

    #[test]
    fn site_without_steps_is_rejected() {
        let site = SiteConfig {
            name: "demo".into(),
            accounts_key: "accounts".into(),
            login: None,
            steps: Vec::new(),
        };
        assert!(site.validate().is_err());
    }
}
