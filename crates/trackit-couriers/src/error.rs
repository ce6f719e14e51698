use std::time::Duration;

use thiserror::Error;
use trackit_core::{Provider, TrackingNumber};

/// Transport-level failures raised by the page fetcher and render engine.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("WebDriver error: {reason}")]
    WebDriver { reason: String },

    #[error("no render engine configured for {url}")]
    RenderUnavailable { url: String },
}

/// Everything that can end a `track` call.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to fetch {provider} tracking page: {source}")]
    Fetch {
        provider: Provider,
        #[source]
        source: FetchError,
    },

    #[error("{provider} tracking page did not finish rendering within {waited:?}")]
    Timeout { provider: Provider, waited: Duration },

    #[error("{provider} does not recognise tracking number {tracking_number}")]
    InvalidTrackingNumber {
        provider: Provider,
        tracking_number: TrackingNumber,
    },

    #[error("unexpected {provider} page shape: {reason}")]
    Parse { provider: Provider, reason: String },

    #[error("{provider} checkpoints requested before the page was fetched")]
    Precondition { provider: Provider },

    #[error("{provider} tracking page was already fetched by this tracker")]
    AlreadyFetched { provider: Provider },
}

impl TrackError {
    pub(crate) fn parse(provider: Provider, reason: impl Into<String>) -> Self {
        TrackError::Parse {
            provider,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(provider: Provider, tracking_number: &TrackingNumber) -> Self {
        TrackError::InvalidTrackingNumber {
            provider,
            tracking_number: tracking_number.clone(),
        }
    }

    /// The provider whose tracker raised this error.
    #[must_use]
    pub fn provider(&self) -> Provider {
        match self {
            TrackError::Fetch { provider, .. }
            | TrackError::Timeout { provider, .. }
            | TrackError::InvalidTrackingNumber { provider, .. }
            | TrackError::Parse { provider, .. }
            | TrackError::Precondition { provider }
            | TrackError::AlreadyFetched { provider } => *provider,
        }
    }
}
