//! Headless render engine collaborator and the bounded wait for
//! script-populated tracking pages.

mod webdriver;

use std::future::Future;
use std::time::Duration;

use trackit_core::TrackerConfig;

use crate::error::FetchError;

pub use webdriver::{WebDriverEngine, WebDriverPage};

/// Opens pages in a browser-like engine that executes page scripts.
pub trait RenderEngine {
    type Page: RenderedPage + Send;

    /// Starts loading `url`; the returned page may still be rendering.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the engine cannot load the URL.
    fn open(&self, url: &str) -> impl Future<Output = Result<Self::Page, FetchError>> + Send;
}

/// A page held open by a [`RenderEngine`].
pub trait RenderedPage {
    /// Current page source, including script-inserted content.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the engine stops responding.
    fn source(&mut self) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Releases the page and any engine session behind it.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the engine rejects the shutdown.
    fn close(self) -> impl Future<Output = Result<(), FetchError>> + Send;
}

/// How often and for how long to wait for a completion marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl PollPolicy {
    #[must_use]
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }

    #[must_use]
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.render_poll_interval_ms),
            Duration::from_secs(config.render_max_wait_secs),
        )
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(10))
    }
}

#[derive(Debug)]
pub enum WaitError {
    Fetch(FetchError),
    TimedOut { waited: Duration },
}

/// Polls `page` until its source contains any of `markers`.
///
/// The source is checked immediately and then once per `policy.interval`
/// while the accumulated wait stays within `policy.max_wait`.
///
/// # Errors
///
/// Returns [`WaitError::TimedOut`] once the budget is spent without a marker,
/// or [`WaitError::Fetch`] if reading the source fails.
pub async fn wait_for_markers<P: RenderedPage>(
    page: &mut P,
    markers: &[String],
    policy: PollPolicy,
) -> Result<String, WaitError> {
    let mut waited = Duration::ZERO;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let source = page.source().await.map_err(WaitError::Fetch)?;
        if markers.iter().any(|marker| source.contains(marker.as_str())) {
            tracing::debug!(attempt, ?waited, "render completion marker found");
            return Ok(source);
        }

        if waited + policy.interval > policy.max_wait {
            return Err(WaitError::TimedOut {
                waited: policy.max_wait,
            });
        }
        tracing::debug!(attempt, ?waited, "page still rendering");
        tokio::time::sleep(policy.interval).await;
        waited += policy.interval;
    }
}

/// Render engine for deployments without a browser; refuses every URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRenderEngine;

/// Page type of [`NoRenderEngine`]; cannot be constructed.
#[derive(Debug)]
pub enum NoPage {}

impl RenderEngine for NoRenderEngine {
    type Page = NoPage;

    async fn open(&self, url: &str) -> Result<NoPage, FetchError> {
        Err(FetchError::RenderUnavailable {
            url: url.to_owned(),
        })
    }
}

impl RenderedPage for NoPage {
    async fn source(&mut self) -> Result<String, FetchError> {
        match *self {}
    }

    async fn close(self) -> Result<(), FetchError> {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Serves a scripted sequence of sources; the last one repeats.
    struct ScriptedPage {
        sources: VecDeque<String>,
        reads: usize,
    }

    impl ScriptedPage {
        fn new(sources: &[&str]) -> Self {
            Self {
                sources: sources.iter().map(|s| (*s).to_string()).collect(),
                reads: 0,
            }
        }
    }

    impl RenderedPage for ScriptedPage {
        async fn source(&mut self) -> Result<String, FetchError> {
            self.reads += 1;
            if self.sources.len() > 1 {
                Ok(self.sources.pop_front().unwrap())
            } else {
                Ok(self.sources.front().cloned().unwrap_or_default())
            }
        }

        async fn close(self) -> Result<(), FetchError> {
            Ok(())
        }
    }

    fn fast_policy(max_wait_ms: u64) -> PollPolicy {
        PollPolicy::new(Duration::from_millis(5), Duration::from_millis(max_wait_ms))
    }

    #[tokio::test]
    async fn returns_immediately_when_marker_already_present() {
        let mut page = ScriptedPage::new(&["<span>Current Status</span>"]);
        let markers = vec!["Current Status".to_string()];

        let source = wait_for_markers(&mut page, &markers, fast_policy(50))
            .await
            .unwrap();

        assert!(source.contains("Current Status"));
        assert_eq!(page.reads, 1);
    }

    #[tokio::test]
    async fn keeps_polling_until_marker_appears() {
        let mut page = ScriptedPage::new(&["loading", "loading", "<td>1234567890</td>"]);
        let markers = vec!["1234567890".to_string(), "Invalid Input".to_string()];

        let source = wait_for_markers(&mut page, &markers, fast_policy(50))
            .await
            .unwrap();

        assert_eq!(source, "<td>1234567890</td>");
        assert_eq!(page.reads, 3);
    }

    #[tokio::test]
    async fn any_marker_completes_the_wait() {
        let mut page = ScriptedPage::new(&["<p>Invalid Input</p>"]);
        let markers = vec!["1234567890".to_string(), "Invalid Input".to_string()];

        let result = wait_for_markers(&mut page, &markers, fast_policy(50)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn times_out_after_budget_is_spent() {
        let mut page = ScriptedPage::new(&["loading"]);
        let markers = vec!["Current Status".to_string()];

        let result = wait_for_markers(&mut page, &markers, fast_policy(20)).await;

        match result {
            Err(WaitError::TimedOut { waited }) => {
                assert_eq!(waited, Duration::from_millis(20));
            }
            other => panic!("expected TimedOut, got: {other:?}"),
        }
        // Checks at 0, 5, 10, 15 and 20ms.
        assert_eq!(page.reads, 5);
    }

    #[tokio::test]
    async fn zero_budget_checks_exactly_once() {
        let mut page = ScriptedPage::new(&["loading"]);
        let markers = vec!["done".to_string()];

        let result = wait_for_markers(&mut page, &markers, fast_policy(0)).await;

        assert!(matches!(result, Err(WaitError::TimedOut { .. })));
        assert_eq!(page.reads, 1);
    }

    #[tokio::test]
    async fn no_render_engine_refuses_urls() {
        let err = NoRenderEngine
            .open("https://www.aramex.com/track")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::RenderUnavailable { ref url } if url == "https://www.aramex.com/track"));
    }
}
