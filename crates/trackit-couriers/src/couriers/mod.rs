//! Per-provider extraction strategies.
//!
//! Each courier turns one provider's tracking page into the shared
//! [`TrackingReport`] shape. Extraction always runs in the same order:
//! validity check, status classification, checkpoint rows. The report
//! constructor sorts the rows.

mod aramex;
mod bluedart;
mod dhl;
mod ecomm;
mod gati;
mod overnite;
mod skynet;

use trackit_core::{Provider, TrackerConfig, TrackingNumber, TrackingReport};

use crate::document::RawDocument;
use crate::error::{FetchError, TrackError};
use crate::fetch::PageRequest;

pub use aramex::{Aramex, ARAMEX_RULES};
pub use bluedart::{Bluedart, BLUEDART_RULES};
pub use dhl::{Dhl, DHL_RULES};
pub use ecomm::{Ecomm, ECOMM_RULES};
pub use gati::{Gati, GATI_RULES};
pub use overnite::{Overnite, OVERNITE_RULES};
pub use skynet::{Skynet, SKYNET_RULES};

/// Where a courier's tracking page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// A single HTTP request through the page fetcher.
    Http(PageRequest),
    /// A script-populated page, complete once any marker appears in its source.
    Rendered { url: String, markers: Vec<String> },
}

/// Extraction strategy for one provider.
pub trait Courier: Send + Sync {
    fn provider(&self) -> Provider;

    /// Describes the request for `tracking_number`'s tracking page.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the configured endpoint is not a URL.
    fn source(
        &self,
        tracking_number: &TrackingNumber,
        config: &TrackerConfig,
    ) -> Result<PageSource, FetchError>;

    /// Extracts the report from a fetched page. Pure: the same document
    /// always yields the same report.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InvalidTrackingNumber`] when the page carries the
    /// provider's not-found marker and [`TrackError::Parse`] when the page
    /// does not have the expected shape.
    fn extract(
        &self,
        document: &RawDocument,
        tracking_number: &TrackingNumber,
    ) -> Result<TrackingReport, TrackError>;
}

/// The strategy for `provider`.
#[must_use]
pub fn courier_for(provider: Provider) -> &'static dyn Courier {
    match provider {
        Provider::Bluedart => &Bluedart,
        Provider::Aramex => &Aramex,
        Provider::Dhl => &Dhl,
        Provider::Skynet => &Skynet,
        Provider::Overnite => &Overnite,
        Provider::Ecomm => &Ecomm,
        Provider::Gati => &Gati,
    }
}
