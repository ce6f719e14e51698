//! Ecom Express: GET results page, newest row first.
//!
//! The markup is frequently broken; html5ever's error recovery still yields
//! the `table.table` body.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use trackit_core::{Checkpoint, Provider, ShipmentStatus, TrackerConfig, TrackingNumber, TrackingReport};

use super::{Courier, PageSource};
use crate::classify::{classify, StatusRule};
use crate::document::RawDocument;
use crate::error::{FetchError, TrackError};
use crate::fetch::{endpoint_url, PageRequest};
use crate::html::{child_elements, find, find_in, selector, text_of, TD};
use crate::normalize::{checkpoint, parse_timestamp};

const DATE_FORMAT: &str = "%d-%m-%Y | %H:%M:%S";

/// First cell reads `<date> | <time> ,  <location>`.
static DATE_LOCATION_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+,\s+").expect("valid regex"));
static TRACKING_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table.table"));
static TBODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));

/// Matched against the newest row's status cell.
pub const ECOMM_RULES: &[StatusRule] = &[
    StatusRule::contains("Shipment Redirected under", ShipmentStatus::ReturnedToOrigin),
    StatusRule::equals("Delivered", ShipmentStatus::Completed),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Ecomm;

impl Courier for Ecomm {
    fn provider(&self) -> Provider {
        Provider::Ecomm
    }

    fn source(
        &self,
        tracking_number: &TrackingNumber,
        config: &TrackerConfig,
    ) -> Result<PageSource, FetchError> {
        let request = PageRequest::get(endpoint_url(&config.ecomm_url, &[])?)
            .query("awb", tracking_number.as_str())
            .query("order", "")
            .query("news_go", "track now");
        Ok(PageSource::Http(request))
    }

    fn extract(
        &self,
        document: &RawDocument,
        tracking_number: &TrackingNumber,
    ) -> Result<TrackingReport, TrackError> {
        if !document.contains(tracking_number.as_str()) {
            return Err(TrackError::invalid(Provider::Ecomm, tracking_number));
        }

        let html = Html::parse_document(document.body());
        // Later `.table` blocks (consignee, summary) are not checkpoints.
        let body = find(&html, &TRACKING_TABLE)
            .and_then(|table| find_in(table, &TBODY))
            .ok_or_else(|| TrackError::parse(Provider::Ecomm, "tracking table missing"))?;
        let rows: Vec<ElementRef<'_>> = child_elements(body)
            .filter(|row| row.value().name() == "tr")
            .collect();
        let Some(newest) = rows.first() else {
            return Err(TrackError::parse(Provider::Ecomm, "tracking table has no rows"));
        };

        let current = newest
            .select(&TD)
            .nth(1)
            .map(text_of)
            .ok_or_else(|| TrackError::parse(Provider::Ecomm, "newest row without a status cell"))?;
        let status = classify(ECOMM_RULES, &current);

        let history = rows
            .iter()
            .copied()
            .map(row_to_checkpoint)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrackingReport::new(history, status))
    }
}

fn row_to_checkpoint(row: ElementRef<'_>) -> Result<Checkpoint, TrackError> {
    let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
    let [when_where, status, ..] = cells.as_slice() else {
        return Err(TrackError::parse(
            Provider::Ecomm,
            format!("tracking row has {} cells, expected 2", cells.len()),
        ));
    };

    let raw = when_where.text().collect::<String>();
    let mut parts = DATE_LOCATION_SEPARATOR.splitn(raw.trim(), 2);
    let date = parts.next().unwrap_or_default();
    let location = parts.next().unwrap_or_default();

    let timestamp = parse_timestamp(date, DATE_FORMAT)
        .map_err(|e| TrackError::parse(Provider::Ecomm, e.to_string()))?;
    Ok(checkpoint(location, &text_of(*status), timestamp))
}
