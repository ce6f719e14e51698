//! Skynet: ASP.NET grid, one `tr` per checkpoint with alternating classes.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use trackit_core::{Checkpoint, Provider, ShipmentStatus, TrackerConfig, TrackingNumber, TrackingReport};

use super::{Courier, PageSource};
use crate::classify::{classify, StatusRule};
use crate::document::RawDocument;
use crate::error::{FetchError, TrackError};
use crate::fetch::{endpoint_url, PageRequest};
use crate::html::{cell_texts, find, selector};
use crate::normalize::{checkpoint, join_date_time, parse_timestamp};

const DATE_FORMAT: &str = "%d %b %Y %H:%M";

static ERROR_LABEL: LazyLock<Selector> =
    LazyLock::new(|| selector("span#ctl00_ContentPlaceHolder1_lblsMsg.ErrorMessage"));
static ROWS: LazyLock<Selector> = LazyLock::new(|| selector("tr.gridItem, tr.gridAltItem"));

pub const SKYNET_RULES: &[StatusRule] =
    &[StatusRule::contains("Delivered", ShipmentStatus::Completed)];

#[derive(Debug, Clone, Copy, Default)]
pub struct Skynet;

impl Courier for Skynet {
    fn provider(&self) -> Provider {
        Provider::Skynet
    }

    fn source(
        &self,
        tracking_number: &TrackingNumber,
        config: &TrackerConfig,
    ) -> Result<PageSource, FetchError> {
        let url = endpoint_url(
            &config.skynet_url,
            &[
                ("textfield", tracking_number.as_str()),
                ("radiobutton", "SB"),
            ],
        )?;
        let request = PageRequest::post(url)
            .optional_header("Cookie", config.skynet_session_cookie.as_deref());
        Ok(PageSource::Http(request))
    }

    fn extract(
        &self,
        document: &RawDocument,
        tracking_number: &TrackingNumber,
    ) -> Result<TrackingReport, TrackError> {
        let html = Html::parse_document(document.body());

        if find(&html, &ERROR_LABEL).is_some() {
            return Err(TrackError::invalid(Provider::Skynet, tracking_number));
        }

        let status = classify(SKYNET_RULES, document.body());

        let history = html
            .select(&ROWS)
            .map(row_to_checkpoint)
            .collect::<Result<Vec<_>, _>>()?;
        if history.is_empty() {
            return Err(TrackError::parse(Provider::Skynet, "no tracking grid rows found"));
        }

        Ok(TrackingReport::new(history, status))
    }
}

fn row_to_checkpoint(row: ElementRef<'_>) -> Result<Checkpoint, TrackError> {
    let cells = cell_texts(row);
    let [date, time, status, location, ..] = cells.as_slice() else {
        return Err(TrackError::parse(
            Provider::Skynet,
            format!("grid row has {} cells, expected 4", cells.len()),
        ));
    };
    let timestamp = parse_timestamp(&join_date_time(date, time), DATE_FORMAT)
        .map_err(|e| TrackError::parse(Provider::Skynet, e.to_string()))?;
    Ok(checkpoint(location, status, timestamp))
}
