use super::session::AccountSession;
use super::workflow::SiteWorkflow;
use crate::config::{SiteConfig, StepConfig};
use crate::context::Context;
use crate::error::{StoreError, WorkflowError};
use crate::http::{RequestBody, RequestSpec};
use crate::runtime::BoxFuture;
use crate::store::{StorageAddress, path};
use serde_json::{Map, Value};
use tera::Tera;

/// Site workflow described entirely by a `[[sites]]` config entry.
///
/// Every string in a step (url, headers, query, body leaves) is a tera
/// template rendered against the account record, with `site` also in scope.
pub struct ScriptedWorkflow {
    site: SiteConfig,
    address: StorageAddress,
}

impl ScriptedWorkflow {
    pub fn new(site: SiteConfig) -> Result<Self, StoreError> {
        let address = StorageAddress::parse(&site.accounts_key)?;
        Ok(Self { site, address })
    }

    fn render(
        &self,
        name: &str,
        template: &str,
        record: &Map<String, Value>,
    ) -> Result<String, WorkflowError> {
        if !template.contains("{{") && !template.contains("{%") {
            return Ok(template.to_string());
        }
        let template_error = |e: tera::Error| WorkflowError::Template {
            name: name.to_string(),
            message: e.to_string(),
        };
        let mut vars = tera::Context::from_serialize(record).map_err(template_error)?;
        vars.insert("site", &self.site.name);
        Tera::one_off(template, &vars, false).map_err(template_error)
    }

    fn render_value(
        &self,
        name: &str,
        value: &Value,
        record: &Map<String, Value>,
    ) -> Result<Value, WorkflowError> {
        Ok(match value {
            Value::String(s) => Value::String(self.render(name, s, record)?),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|v| self.render_value(name, v, record))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), self.render_value(name, v, record)?)))
                    .collect::<Result<_, WorkflowError>>()?,
            ),
            other => other.clone(),
        })
    }

    fn build_request(
        &self,
        step: &StepConfig,
        record: &Map<String, Value>,
    ) -> Result<RequestSpec, WorkflowError> {
        let name = step.name.as_str();
        let mut spec =
            RequestSpec::new(self.render(name, &step.url, record)?).encoding(step.encoding);
        spec.method = step.method;
        spec.timeout_ms = step.timeout_ms;
        spec.follow_redirects = step.follow_redirects;

        for (header, value) in &step.headers {
            spec = spec.header(header.clone(), self.render(name, value, record)?);
        }
        for (key, value) in &step.query {
            spec = spec.query(key.clone(), self.render(name, value, record)?);
        }
        spec.body = match &step.body {
            None => None,
            Some(Value::String(raw)) => Some(RequestBody::Raw(self.render(name, raw, record)?)),
            Some(value) => Some(RequestBody::Value(self.render_value(name, value, record)?)),
        };
        Ok(spec)
    }

    async fn execute(
        &self,
        ctx: &Context,
        step: &StepConfig,
        session: &mut AccountSession,
    ) -> Result<(), WorkflowError> {
        let spec = self.build_request(step, session.record())?;
        let reply = ctx.http.try_request(spec).await?;
        let response = match (reply.json(), reply.text()) {
            (Some(json), _) => json.clone(),
            (None, Some(text)) => Value::String(text.to_string()),
            (None, None) => Value::Null,
        };

        let message = step
            .message_path
            .as_deref()
            .and_then(|p| path::resolve(&response, p))
            .map(leaf_text);

        if let Some(success_path) = &step.success_path {
            let actual = path::resolve(&response, success_path);
            let passed = match (&step.success_value, actual) {
                (Some(expected), Some(actual)) => loosely_equal(expected, actual),
                (None, Some(actual)) => is_truthy(actual),
                (_, None) => false,
            };
            if !passed {
                return Err(WorkflowError::Business(message.unwrap_or_else(|| {
                    format!("{}: unexpected response", step.name)
                })));
            }
        }

        for (field, source) in &step.capture {
            let Some(value) = path::resolve(&response, source) else {
                return Err(WorkflowError::Business(format!(
                    "{}: `{source}` missing from response",
                    step.name
                )));
            };
            session.record_mut().insert(field.clone(), value.clone());
        }

        if let Some(message) = message {
            session.note(message);
        }
        Ok(())
    }
}

fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Equal as JSON, or equal as text (`"0"` matches `0`).
fn loosely_equal(expected: &Value, actual: &Value) -> bool {
    expected == actual || leaf_text(expected) == leaf_text(actual)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl SiteWorkflow for ScriptedWorkflow {
    fn name(&self) -> &str {
        &self.site.name
    }

    fn accounts_address(&self) -> &StorageAddress {
        &self.address
    }

    fn authenticate<'a>(
        &'a self,
        ctx: &'a Context,
        session: &'a mut AccountSession,
    ) -> BoxFuture<'a, Result<(), WorkflowError>> {
        Box::pin(async move {
            let Some(login) = &self.site.login else {
                return Ok(());
            };
            self.execute(ctx, login, session).await.map_err(|e| match e {
                WorkflowError::Auth(_) => e,
                other => WorkflowError::Auth(other.to_string()),
            })
        })
    }

    fn steps(&self) -> Vec<&str> {
        self.site.steps.iter().map(|s| s.name.as_str()).collect()
    }

    fn run_step<'a>(
        &'a self,
        ctx: &'a Context,
        step: &'a str,
        session: &'a mut AccountSession,
    ) -> BoxFuture<'a, Result<(), WorkflowError>> {
        Box::pin(async move {
            let Some(config) = self.site.steps.iter().find(|s| s.name == step) else {
                return Err(WorkflowError::Business(format!("unknown step `{step}`")));
            };
            self.execute(ctx, config, session).await
        })
    }
}
