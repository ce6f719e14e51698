//! DHL: script-rendered checkpoint table grouped by day.
//!
//! `table.result-checkpoints` alternates a `thead` carrying the day with one
//! `tbody` per checkpoint on that day.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use trackit_core::{Checkpoint, Provider, ShipmentStatus, TrackerConfig, TrackingNumber, TrackingReport};

use super::{Courier, PageSource};
use crate::classify::{classify, StatusRule};
use crate::document::RawDocument;
use crate::error::{FetchError, TrackError};
use crate::fetch::endpoint_url;
use crate::html::{child_elements, find, find_in, selector, text_of, TD};
use crate::normalize::{checkpoint, join_date_time, parse_timestamp};

const DATE_FORMAT: &str = "%A, %B %d, %Y %H:%M";
const INVALID_INPUT_MARKER: &str = "Invalid Input";

static THEAD: LazyLock<Selector> = LazyLock::new(|| selector("thead"));
static CHECKPOINT_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("table.result-checkpoints"));
static DAY_HEADING: LazyLock<Selector> = LazyLock::new(|| selector(r#"th[colspan="2"]"#));

pub const DHL_RULES: &[StatusRule] = &[
    StatusRule::contains("Returned", ShipmentStatus::ReturnedToOrigin),
    StatusRule::contains("Signed for by:", ShipmentStatus::Completed),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Dhl;

impl Courier for Dhl {
    fn provider(&self) -> Provider {
        Provider::Dhl
    }

    fn source(
        &self,
        tracking_number: &TrackingNumber,
        config: &TrackerConfig,
    ) -> Result<PageSource, FetchError> {
        let url = endpoint_url(
            &config.dhl_url,
            &[("AWB", tracking_number.as_str()), ("brand", "DHL")],
        )?;
        Ok(PageSource::Rendered {
            url,
            markers: vec![
                tracking_number.as_str().to_string(),
                INVALID_INPUT_MARKER.to_string(),
            ],
        })
    }

    fn extract(
        &self,
        document: &RawDocument,
        tracking_number: &TrackingNumber,
    ) -> Result<TrackingReport, TrackError> {
        let html = Html::parse_document(document.body());

        // Unknown numbers render the search form again, without any table head.
        if find(&html, &THEAD).is_none() {
            return Err(TrackError::invalid(Provider::Dhl, tracking_number));
        }

        let status = classify(DHL_RULES, document.body());

        let table = find(&html, &CHECKPOINT_TABLE)
            .ok_or_else(|| TrackError::parse(Provider::Dhl, "checkpoint table missing"))?;
        let history = grouped_checkpoints(table)?;

        Ok(TrackingReport::new(history, status))
    }
}

fn grouped_checkpoints(table: ElementRef<'_>) -> Result<Vec<Checkpoint>, TrackError> {
    let mut day: Option<String> = None;
    let mut history = Vec::new();

    for section in child_elements(table) {
        match section.value().name() {
            "thead" => {
                let heading = find_in(section, &DAY_HEADING).ok_or_else(|| {
                    TrackError::parse(Provider::Dhl, "day heading without a date cell")
                })?;
                day = Some(text_of(heading));
            }
            "tbody" => {
                let date = day.as_deref().ok_or_else(|| {
                    TrackError::parse(Provider::Dhl, "checkpoint row before any day heading")
                })?;
                history.push(row_to_checkpoint(section, date)?);
            }
            _ => {}
        }
    }

    Ok(history)
}

fn row_to_checkpoint(row: ElementRef<'_>, date: &str) -> Result<Checkpoint, TrackError> {
    let cells: Vec<String> = row.select(&TD).map(text_of).collect();
    let [_, status, location, time, ..] = cells.as_slice() else {
        return Err(TrackError::parse(
            Provider::Dhl,
            format!("checkpoint row has {} cells, expected at least 4", cells.len()),
        ));
    };
    let timestamp = parse_timestamp(&join_date_time(date, time), DATE_FORMAT)
        .map_err(|e| TrackError::parse(Provider::Dhl, e.to_string()))?;
    Ok(checkpoint(location, status, timestamp))
}
