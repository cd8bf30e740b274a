//! W3C WebDriver session over HTTP

use reqwest::Method;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::actions::Actions;
use crate::capabilities::SessionPlan;
use crate::error::{DriverError, DriverResult};

/// Key under which the remote end reports element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Poll interval of [`Session::wait_until_clickable`]
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Longest slice of a non-JSON error body kept in the error
const ERROR_BODY_LEN: usize = 200;

/// Element lookup strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
    TagName(String),
    /// HTML id attribute
    Id(String),
    /// Appium accessibility id (content-desc / accessibilityIdentifier)
    AccessibilityId(String),
}

impl Locator {
    /// `(using, value)` pair of the find-element command
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Locator::Css(v) => ("css selector", v.clone()),
            Locator::XPath(v) => ("xpath", v.clone()),
            Locator::TagName(v) => ("tag name", v.clone()),
            Locator::Id(v) => ("css selector", format!("[id=\"{}\"]", v.replace('"', "\\\""))),
            Locator::AccessibilityId(v) => ("accessibility id", v.clone()),
        }
    }

    fn describe(&self) -> String {
        let (using, value) = self.strategy();
        format!("{using}={value}")
    }
}

/// Reference to a remote element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: String,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wire form, used as an action origin
    pub fn to_json(&self) -> Value {
        json!({ ELEMENT_KEY: self.id })
    }

    fn from_value(value: &Value) -> DriverResult<Self> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(Element::new)
            .ok_or_else(|| DriverError::Protocol(format!("no element reference in {value}")))
    }
}

/// A live session. Call [`Session::quit`] when done.
pub struct Session {
    client: reqwest::Client,
    endpoint: String,
    basic_auth: Option<(String, String)>,
    id: String,
    capabilities: Value,
    closed: bool,
}

impl Session {
    /// `POST /session` with the plan's capabilities
    pub async fn start(plan: SessionPlan, timeout: Duration) -> DriverResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let url = format!("{}/session", plan.endpoint);
        let body = plan.capabilities.to_new_session_body();

        let value = send(&client, plan.basic_auth.as_ref(), Method::POST, &url, Some(body)).await?;

        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| DriverError::Protocol(format!("no sessionId in {value}")))?
            .to_string();

        debug!("Session {} started at {}", id, plan.endpoint);

        Ok(Self {
            client,
            endpoint: plan.endpoint,
            basic_auth: plan.basic_auth,
            id,
            capabilities: value.get("capabilities").cloned().unwrap_or(Value::Null),
            closed: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Capabilities the remote end actually granted
    pub fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> DriverResult<Value> {
        let url = format!("{}/session/{}{}", self.endpoint, self.id, path);
        send(&self.client, self.basic_auth.as_ref(), method, &url, body).await
    }

    pub async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    pub async fn current_url(&self) -> DriverResult<String> {
        let value = self.command(Method::GET, "/url", None).await?;
        as_string(value)
    }

    pub async fn maximize(&self) -> DriverResult<()> {
        self.command(Method::POST, "/window/maximize", Some(json!({})))
            .await?;
        Ok(())
    }

    pub async fn find(&self, locator: &Locator) -> DriverResult<Element> {
        let (using, value) = locator.strategy();
        let found = self
            .command(
                Method::POST,
                "/element",
                Some(json!({ "using": using, "value": value })),
            )
            .await?;
        Element::from_value(&found)
    }

    pub async fn click(&self, element: &Element) -> DriverResult<()> {
        let path = format!("/element/{}/click", element.id);
        self.command(Method::POST, &path, Some(json!({}))).await?;
        Ok(())
    }

    /// Type into an element; see [`crate::keys`] for special keys
    pub async fn send_keys(&self, element: &Element, text: &str) -> DriverResult<()> {
        let path = format!("/element/{}/value", element.id);
        self.command(Method::POST, &path, Some(json!({ "text": text })))
            .await?;
        Ok(())
    }

    pub async fn text(&self, element: &Element) -> DriverResult<String> {
        let value = self
            .command(Method::GET, &format!("/element/{}/text", element.id), None)
            .await?;
        as_string(value)
    }

    pub async fn is_displayed(&self, element: &Element) -> DriverResult<bool> {
        let value = self
            .command(Method::GET, &format!("/element/{}/displayed", element.id), None)
            .await?;
        as_bool(value)
    }

    pub async fn is_enabled(&self, element: &Element) -> DriverResult<bool> {
        let value = self
            .command(Method::GET, &format!("/element/{}/enabled", element.id), None)
            .await?;
        as_bool(value)
    }

    /// Find an element that is displayed and enabled, polling until `timeout`
    pub async fn wait_until_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> DriverResult<Element> {
        let start = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match self.find_clickable(locator).await {
                Ok(Some(element)) => {
                    debug!("{} clickable after {} attempt(s)", locator.describe(), attempts);
                    return Ok(element);
                }
                Ok(None) => {}
                Err(e) if is_transient(&e) => {
                    debug!("{} attempt {}: {}", locator.describe(), attempts, e);
                }
                Err(e) => return Err(e),
            }

            if start.elapsed() >= timeout {
                return Err(DriverError::Timeout(format!(
                    "{} to be clickable ({} attempts in {:?})",
                    locator.describe(),
                    attempts,
                    timeout
                )));
            }
            sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// One lookup plus the displayed and enabled checks
    async fn find_clickable(&self, locator: &Locator) -> DriverResult<Option<Element>> {
        let element = self.find(locator).await?;
        if self.is_displayed(&element).await? && self.is_enabled(&element).await? {
            Ok(Some(element))
        } else {
            Ok(None)
        }
    }

    pub async fn perform(&self, actions: &Actions) -> DriverResult<()> {
        self.command(Method::POST, "/actions", Some(actions.to_body()))
            .await?;
        Ok(())
    }

    /// Release every key and button still held by earlier actions
    pub async fn release_actions(&self) -> DriverResult<()> {
        self.command(Method::DELETE, "/actions", None).await?;
        Ok(())
    }

    /// `DELETE /session/{id}`
    pub async fn quit(mut self) -> DriverResult<()> {
        self.command(Method::DELETE, "", None).await?;
        self.closed = true;
        debug!("Session {} closed", self.id);
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Session {} dropped without quit(); the remote end keeps it open", self.id);
        }
    }
}

/// Element errors worth retrying while waiting
fn is_transient(error: &DriverError) -> bool {
    matches!(
        error.webdriver_code(),
        Some("no such element") | Some("stale element reference")
    )
}

async fn send(
    client: &reqwest::Client,
    basic_auth: Option<&(String, String)>,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> DriverResult<Value> {
    debug!("{} {}", method, url);

    let mut request = client.request(method, url);
    if let Some((user, key)) = basic_auth {
        request = request.basic_auth(user, Some(key));
    }
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(error_from_body(status.as_u16(), &text));
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let parsed: Value = serde_json::from_str(&text)?;
    Ok(parsed.get("value").cloned().unwrap_or(Value::Null))
}

/// Map an error response; bodies that are not W3C JSON keep their text
fn error_from_body(status: u16, text: &str) -> DriverError {
    let value = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|parsed| parsed.get("value").cloned())
        .filter(|value| value.get("error").is_some());

    match value {
        Some(value) => {
            let field = |name: &str| {
                value
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            DriverError::WebDriver {
                status,
                error: field("error"),
                message: field("message"),
            }
        }
        None => DriverError::WebDriver {
            status,
            error: String::new(),
            message: text.trim().chars().take(ERROR_BODY_LEN).collect(),
        },
    }
}

fn as_bool(value: Value) -> DriverResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| DriverError::Protocol(format!("expected boolean, got {value}")))
}

fn as_string(value: Value) -> DriverResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(DriverError::Protocol(format!("expected string, got {other}"))),
    }
}
