//! Single-use tracker: binds one tracking number to one courier and drives
//! fetch-then-extract.

use trackit_core::{Provider, TrackerConfig, TrackingNumber, TrackingReport};

use crate::couriers::{courier_for, Courier, PageSource};
use crate::document::RawDocument;
use crate::error::TrackError;
use crate::fetch::PageFetcher;
use crate::render::{wait_for_markers, PollPolicy, RenderEngine, RenderedPage, WaitError};

/// Lifecycle of a [`Tracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No page has been fetched yet.
    Unfetched,
    /// A page is held and can be extracted.
    Fetched,
    /// Checkpoints have been extracted at least once.
    Extracted,
}

/// Tracks one shipment with one provider.
///
/// The fetched page belongs to the tracker and is dropped with it. A tracker
/// is never pointed at a second tracking number; build a new one instead.
pub struct Tracker<'a, F, R> {
    courier: &'static dyn Courier,
    tracking_number: TrackingNumber,
    config: &'a TrackerConfig,
    fetcher: &'a F,
    renderer: &'a R,
    document: Option<RawDocument>,
    state: TrackerState,
}

impl<'a, F, R> Tracker<'a, F, R>
where
    F: PageFetcher,
    R: RenderEngine,
{
    #[must_use]
    pub fn new(
        provider: Provider,
        tracking_number: TrackingNumber,
        config: &'a TrackerConfig,
        fetcher: &'a F,
        renderer: &'a R,
    ) -> Self {
        Self {
            courier: courier_for(provider),
            tracking_number,
            config,
            fetcher,
            renderer,
            document: None,
            state: TrackerState::Unfetched,
        }
    }

    #[must_use]
    pub fn provider(&self) -> Provider {
        self.courier.provider()
    }

    #[must_use]
    pub fn tracking_number(&self) -> &TrackingNumber {
        &self.tracking_number
    }

    #[must_use]
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// The fetched page, if any.
    #[must_use]
    pub fn document(&self) -> Option<&RawDocument> {
        self.document.as_ref()
    }

    /// Fetches the provider's tracking page and keeps it for extraction.
    ///
    /// A tracker fetches at most once. On failure it stays unfetched and the
    /// call may be retried.
    ///
    /// # Errors
    ///
    /// - [`TrackError::AlreadyFetched`] if a page is already held.
    /// - [`TrackError::Fetch`] on transport or render-engine failure.
    /// - [`TrackError::Timeout`] when a rendered page shows none of its
    ///   completion markers within the configured wait.
    pub async fn fetch_page(&mut self) -> Result<(), TrackError> {
        let provider = self.provider();
        if self.document.is_some() {
            return Err(TrackError::AlreadyFetched { provider });
        }

        let source = self
            .courier
            .source(&self.tracking_number, self.config)
            .map_err(|source| TrackError::Fetch { provider, source })?;

        let document = match source {
            PageSource::Http(request) => {
                let body = self
                    .fetcher
                    .fetch(&request)
                    .await
                    .map_err(|source| TrackError::Fetch { provider, source })?;
                RawDocument::http(body)
            }
            PageSource::Rendered { url, markers } => {
                tracing::debug!(%provider, %url, "rendering tracking page");
                RawDocument::rendered(self.render(&url, &markers).await?)
            }
        };

        self.document = Some(document);
        self.state = TrackerState::Fetched;
        Ok(())
    }

    /// Opens `url`, waits for a marker and always closes the page.
    ///
    /// A failed close does not discard a page that finished rendering; it is
    /// logged and the source is kept.
    async fn render(&self, url: &str, markers: &[String]) -> Result<String, TrackError> {
        let provider = self.provider();
        let mut page = self
            .renderer
            .open(url)
            .await
            .map_err(|source| TrackError::Fetch { provider, source })?;

        let waited = wait_for_markers(&mut page, markers, PollPolicy::from_config(self.config)).await;
        if let Err(err) = page.close().await {
            tracing::debug!(%provider, %url, error = %err, "failed to close rendered page");
        }

        match waited {
            Ok(source) => Ok(source),
            Err(WaitError::TimedOut { waited }) => Err(TrackError::Timeout { provider, waited }),
            Err(WaitError::Fetch(source)) => Err(TrackError::Fetch { provider, source }),
        }
    }

    /// Extracts the report from the fetched page.
    ///
    /// Repeated calls on the same page return equal reports.
    ///
    /// # Errors
    ///
    /// - [`TrackError::Precondition`] if no page has been fetched.
    /// - [`TrackError::InvalidTrackingNumber`] if the provider does not know
    ///   the number.
    /// - [`TrackError::Parse`] if the page does not have the expected shape.
    pub fn extract_checkpoints(&mut self) -> Result<TrackingReport, TrackError> {
        let provider = self.provider();
        let document = self
            .document
            .as_ref()
            .ok_or(TrackError::Precondition { provider })?;
        let report = self.courier.extract(document, &self.tracking_number)?;
        self.state = TrackerState::Extracted;
        Ok(report)
    }

    /// [`fetch_page`](Self::fetch_page) then
    /// [`extract_checkpoints`](Self::extract_checkpoints).
    ///
    /// # Errors
    ///
    /// Any error of either step, unchanged.
    pub async fn track(mut self) -> Result<TrackingReport, TrackError> {
        self.fetch_page().await?;
        self.extract_checkpoints()
    }
}

impl<F, R> std::fmt::Debug for Tracker<'_, F, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("provider", &self.courier.provider())
            .field("tracking_number", &self.tracking_number)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
