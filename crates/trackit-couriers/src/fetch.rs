//! Page fetcher collaborator: one HTTP request in, raw page text out.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method};
use trackit_core::TrackerConfig;

use crate::error::FetchError;

/// Everything a fetcher needs to reproduce a provider's tracking request.
///
/// Cookies, referers and form state come from configuration; the courier
/// strategy only decides which of them a provider needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl PageRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            form: Vec::new(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn form(mut self, name: &str, value: impl Into<String>) -> Self {
        self.form.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Adds the header only when a value is configured.
    #[must_use]
    pub fn optional_header(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.header(name, value),
            None => self,
        }
    }
}

/// Fetches raw page text for a [`PageRequest`].
pub trait PageFetcher {
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the provider cannot be reached or
    /// answers with a non-2xx status.
    fn fetch(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        accept_invalid_certs: bool,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// See [`HttpFetcher::new`].
    pub fn from_config(config: &TrackerConfig) -> Result<Self, FetchError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.accept_invalid_certs,
        )
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<String, FetchError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.5");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        tracing::debug!(method = %request.method, url = %request.url, "fetching tracking page");
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Parses a configured endpoint and appends query parameters.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if `base` is not an absolute URL.
pub(crate) fn endpoint_url(base: &str, params: &[(&str, &str)]) -> Result<String, FetchError> {
    let mut url = reqwest::Url::parse(base).map_err(|e| FetchError::InvalidUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url.to_string())
}
