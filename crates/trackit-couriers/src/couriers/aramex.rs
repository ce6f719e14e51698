//! Aramex: script-rendered results page with `div`-based history rows.
//!
//! The rendered source mixes stray non-ASCII bytes into dates and labels,
//! so every field is stripped to printable ASCII before use.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use trackit_core::{Checkpoint, Provider, ShipmentStatus, TrackerConfig, TrackingNumber, TrackingReport};

use super::{Courier, PageSource};
use crate::classify::{classify, StatusRule};
use crate::document::RawDocument;
use crate::error::{FetchError, TrackError};
use crate::fetch::endpoint_url;
use crate::html::{find, find_in, selector};
use crate::normalize::{checkpoint, parse_timestamp, strip_non_printable};

const DATE_FORMAT: &str = "%d-%b-%Y %H:%M";
const NOT_FOUND_MARKER: &str = "Invalid number / data not currently available";
const RENDERED_MARKER: &str = "Current Status";

static ROWS: LazyLock<Selector> = LazyLock::new(|| {
    selector(
        "div.fullWidth.leftFloat.bottomGreyBorder.odd, \
         div.fullWidth.leftFloat.bottomGreyBorder.even",
    )
});
static CURRENT_STATUS: LazyLock<Selector> =
    LazyLock::new(|| selector("span#spnCurrentStatusValue"));
static LOCATION: LazyLock<Selector> = LazyLock::new(|| selector("div.leftFloat.thirdWidth"));
static DATE: LazyLock<Selector> =
    LazyLock::new(|| selector("div.leftFloat.shipmentSummaryLabel"));
static ACTIVITY: LazyLock<Selector> =
    LazyLock::new(|| selector("div.leftFloat.shipmentHistoryActivityLabel"));

/// Matched against the current-status label, not the whole page.
pub const ARAMEX_RULES: &[StatusRule] = &[
    StatusRule::equals(
        "Supporting Document Returned to Shipper",
        ShipmentStatus::ReturnedToOrigin,
    ),
    StatusRule::equals("Delivered", ShipmentStatus::Completed),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Aramex;

impl Courier for Aramex {
    fn provider(&self) -> Provider {
        Provider::Aramex
    }

    fn source(
        &self,
        tracking_number: &TrackingNumber,
        config: &TrackerConfig,
    ) -> Result<PageSource, FetchError> {
        let url = endpoint_url(
            &config.aramex_url,
            &[("ShipmentNumber", tracking_number.as_str())],
        )?;
        Ok(PageSource::Rendered {
            url,
            markers: vec![RENDERED_MARKER.to_string()],
        })
    }

    fn extract(
        &self,
        document: &RawDocument,
        tracking_number: &TrackingNumber,
    ) -> Result<TrackingReport, TrackError> {
        if document.contains(NOT_FOUND_MARKER) {
            return Err(TrackError::invalid(Provider::Aramex, tracking_number));
        }

        let html = Html::parse_document(document.body());

        let current_status = find(&html, &CURRENT_STATUS)
            .map(ascii_text)
            .ok_or_else(|| TrackError::parse(Provider::Aramex, "current status label missing"))?;
        let status = classify(ARAMEX_RULES, &current_status);

        let history = html
            .select(&ROWS)
            .map(row_to_checkpoint)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrackingReport::new(history, status))
    }
}

fn ascii_text(element: ElementRef<'_>) -> String {
    strip_non_printable(&element.text().collect::<String>())
}

fn row_to_checkpoint(row: ElementRef<'_>) -> Result<Checkpoint, TrackError> {
    let field = |target: &Selector, name: &str| {
        find_in(row, target)
            .map(ascii_text)
            .ok_or_else(|| TrackError::parse(Provider::Aramex, format!("history row without {name}")))
    };

    let location = find_in(row, &LOCATION)
        .map(ascii_text)
        .unwrap_or_default();
    let date = field(&DATE, "date")?;
    let status = field(&ACTIVITY, "activity")?;

    let timestamp = parse_timestamp(&date, DATE_FORMAT)
        .map_err(|e| TrackError::parse(Provider::Aramex, e.to_string()))?;
    Ok(checkpoint(&location, &status, timestamp))
}
