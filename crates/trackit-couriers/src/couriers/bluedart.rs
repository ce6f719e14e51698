//! Blue Dart: form POST to the routing servlet, flat `td` cell stream.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use trackit_core::{Checkpoint, Provider, ShipmentStatus, TrackerConfig, TrackingNumber, TrackingReport};

use super::{Courier, PageSource};
use crate::classify::{classify, StatusRule};
use crate::document::RawDocument;
use crate::error::{FetchError, TrackError};
use crate::fetch::{endpoint_url, PageRequest};
use crate::html::{find_in, selector, text_of};
use crate::normalize::{checkpoint, join_date_time, parse_timestamp};

const DATE_FORMAT: &str = "%d-%b-%Y %H:%M";
const NOT_FOUND_MARKERS: [&str; 2] = ["Numbers Not Found -", "Invalid Query Numbers -"];
/// Cells containing any of these are table headings, not checkpoint data.
const HEADING_WORDS: [&str; 5] = ["Location", "Date", "Waybill", "Details", "No."];
/// Location, status, date, time.
const CELLS_PER_ROW: usize = 4;

static LEFT_CELLS: LazyLock<Selector> = LazyLock::new(|| selector(r#"td[align="LEFT"]"#));
static FONT: LazyLock<Selector> = LazyLock::new(|| selector("font"));

pub const BLUEDART_RULES: &[StatusRule] = &[
    StatusRule::contains("Returned To Origin", ShipmentStatus::ReturnedToOrigin),
    StatusRule::contains("SHIPMENT DELIVERED", ShipmentStatus::Completed),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Bluedart;

impl Courier for Bluedart {
    fn provider(&self) -> Provider {
        Provider::Bluedart
    }

    fn source(
        &self,
        tracking_number: &TrackingNumber,
        config: &TrackerConfig,
    ) -> Result<PageSource, FetchError> {
        let request = PageRequest::post(endpoint_url(&config.bluedart_url, &[])?)
            .form("handler", "tnt")
            .form("action", "awbquery")
            .form("awb", "awb")
            .form("numbers", tracking_number.as_str());
        Ok(PageSource::Http(request))
    }

    fn extract(
        &self,
        document: &RawDocument,
        tracking_number: &TrackingNumber,
    ) -> Result<TrackingReport, TrackError> {
        if NOT_FOUND_MARKERS.iter().any(|marker| document.contains(marker)) {
            return Err(TrackError::invalid(Provider::Bluedart, tracking_number));
        }

        let status = classify(BLUEDART_RULES, document.body());

        let cells = checkpoint_cells(&Html::parse_document(document.body()));
        if cells.is_empty() {
            return Err(TrackError::parse(
                Provider::Bluedart,
                "no checkpoint cells found",
            ));
        }
        let history = cells
            .chunks(CELLS_PER_ROW)
            .map(row_to_checkpoint)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrackingReport::new(history, status))
    }
}

/// Text of every small-font left-aligned cell, headings and blanks removed.
fn checkpoint_cells(document: &Html) -> Vec<String> {
    document
        .select(&LEFT_CELLS)
        .filter_map(|cell| {
            let font = find_in(cell, &FONT)?;
            if font.value().attr("size") != Some("1") {
                return None;
            }
            let text = text_of(font);
            let is_heading = HEADING_WORDS.iter().any(|word| text.contains(word));
            (!text.is_empty() && !is_heading).then_some(text)
        })
        .collect()
}

fn row_to_checkpoint(row: &[String]) -> Result<Checkpoint, TrackError> {
    let [location, status, date, time] = row else {
        return Err(TrackError::parse(
            Provider::Bluedart,
            format!(
                "checkpoint cells do not divide into rows of {CELLS_PER_ROW}: {} left over",
                row.len()
            ),
        ));
    };
    let timestamp = parse_timestamp(&join_date_time(date, time), DATE_FORMAT)
        .map_err(|e| TrackError::parse(Provider::Bluedart, e.to_string()))?;
    Ok(checkpoint(location, status, timestamp))
}
