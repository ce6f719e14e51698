//! Minimal W3C `WebDriver` client: one session per rendered page.
//!
//! Only the four commands the trackers need are implemented. Starting and
//! stopping the driver process (geckodriver, chromedriver, ...) is left to
//! the deployment.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use trackit_core::TrackerConfig;

use super::{RenderEngine, RenderedPage};
use crate::error::FetchError;

/// [`RenderEngine`] that drives a running `WebDriver` server over HTTP.
#[derive(Debug, Clone)]
pub struct WebDriverEngine {
    client: Client,
    base_url: String,
}

/// A browser session navigated to one tracking page.
#[derive(Debug)]
pub struct WebDriverPage {
    client: Client,
    session_url: String,
}

#[derive(Debug, Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct DriverFailure {
    error: String,
    #[serde(default)]
    message: String,
}

impl WebDriverEngine {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// See [`WebDriverEngine::new`].
    pub fn from_config(config: &TrackerConfig) -> Result<Self, FetchError> {
        Self::new(&config.webdriver_url, config.request_timeout_secs)
    }
}

impl RenderEngine for WebDriverEngine {
    type Page = WebDriverPage;

    async fn open(&self, url: &str) -> Result<WebDriverPage, FetchError> {
        let value = send_command(
            self.client
                .post(format!("{}/session", self.base_url))
                .json(&json!({ "capabilities": { "alwaysMatch": {} } })),
        )
        .await?;
        let session: NewSession =
            serde_json::from_value(value).map_err(|e| FetchError::WebDriver {
                reason: format!("malformed new-session response: {e}"),
            })?;

        let page = WebDriverPage {
            client: self.client.clone(),
            session_url: format!("{}/session/{}", self.base_url, session.session_id),
        };
        tracing::debug!(url, session = %session.session_id, "webdriver session opened");

        let navigated = send_command(
            page.client
                .post(format!("{}/url", page.session_url))
                .json(&json!({ "url": url })),
        )
        .await;

        match navigated {
            Ok(_) => Ok(page),
            Err(err) => {
                // The navigation error is the one worth reporting.
                let _ = page.close().await;
                Err(err)
            }
        }
    }
}

impl RenderedPage for WebDriverPage {
    async fn source(&mut self) -> Result<String, FetchError> {
        let value =
            send_command(self.client.get(format!("{}/source", self.session_url))).await?;
        match value {
            Value::String(source) => Ok(source),
            other => Err(FetchError::WebDriver {
                reason: format!("page source is not a string: {other}"),
            }),
        }
    }

    async fn close(self) -> Result<(), FetchError> {
        send_command(self.client.delete(&self.session_url)).await?;
        tracing::debug!(session_url = %self.session_url, "webdriver session closed");
        Ok(())
    }
}

/// Sends one `WebDriver` command and unwraps the `value` member of the reply.
async fn send_command(request: reqwest::RequestBuilder) -> Result<Value, FetchError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        let mut body: Value = response.json().await?;
        return Ok(body.get_mut("value").map(Value::take).unwrap_or(Value::Null));
    }

    // Error bodies from proxies or a wrong base URL are often not JSON.
    let text = response.text().await.unwrap_or_default();
    let failure = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|mut body| body.get_mut("value").map(Value::take))
        .and_then(|value| serde_json::from_value::<DriverFailure>(value).ok());

    let reason = match failure {
        Some(failure) if failure.message.is_empty() => failure.error,
        Some(failure) => format!("{}: {}", failure.error, failure.message),
        None => format!("HTTP {}", status.as_u16()),
    };
    Err(FetchError::WebDriver { reason })
}
