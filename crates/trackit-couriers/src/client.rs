//! Entry point owning configuration and the two page collaborators.

use trackit_core::{Provider, TrackerConfig, TrackingNumber, TrackingReport};

use crate::error::{FetchError, TrackError};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::render::{RenderEngine, WebDriverEngine};
use crate::tracker::Tracker;

/// Hands out single-use [`Tracker`]s that share one fetcher and one render
/// engine.
///
/// The defaults are the production collaborators: `reqwest` for plain pages
/// and a `WebDriver` server for script-rendered ones.
#[derive(Debug)]
pub struct TrackingClient<F = HttpFetcher, R = WebDriverEngine> {
    config: TrackerConfig,
    fetcher: F,
    renderer: R,
}

impl TrackingClient {
    /// Builds the production collaborators from `config`.
    ///
    /// No connection is made here; the `WebDriver` server is first contacted
    /// when a rendered provider is tracked.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if either `reqwest::Client` cannot be
    /// constructed.
    pub fn from_config(config: TrackerConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::from_config(&config)?;
        let renderer = WebDriverEngine::from_config(&config)?;
        Ok(Self::new(config, fetcher, renderer))
    }
}

impl<F, R> TrackingClient<F, R>
where
    F: PageFetcher,
    R: RenderEngine,
{
    #[must_use]
    pub fn new(config: TrackerConfig, fetcher: F, renderer: R) -> Self {
        Self {
            config,
            fetcher,
            renderer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// A fresh tracker for `tracking_number` with `provider`.
    #[must_use]
    pub fn tracker(&self, provider: Provider, tracking_number: TrackingNumber) -> Tracker<'_, F, R> {
        Tracker::new(
            provider,
            tracking_number,
            &self.config,
            &self.fetcher,
            &self.renderer,
        )
    }

    /// Fetches and extracts one shipment's tracking report.
    ///
    /// # Errors
    ///
    /// See [`Tracker::track`].
    pub async fn track(
        &self,
        provider: Provider,
        tracking_number: TrackingNumber,
    ) -> Result<TrackingReport, TrackError> {
        tracing::debug!(%provider, %tracking_number, "tracking shipment");
        self.tracker(provider, tracking_number).track().await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
