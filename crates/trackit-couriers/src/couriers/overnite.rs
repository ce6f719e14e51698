//! Overnite Express: ASP.NET postback, day-granular history table.
//!
//! The results page lists one row per calendar day, including holidays with
//! an empty location. Those rows carry no checkpoint and are skipped.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use trackit_core::{Checkpoint, Provider, ShipmentStatus, TrackerConfig, TrackingNumber, TrackingReport};

use super::{Courier, PageSource};
use crate::classify::{classify, StatusRule};
use crate::document::RawDocument;
use crate::error::{FetchError, TrackError};
use crate::fetch::{endpoint_url, PageRequest};
use crate::html::{find_in, selector, text_of, TD, TR};
use crate::normalize::{checkpoint, parse_date};

const DATE_FORMAT: &str = "%A, %B %d, %Y";
const NOT_FOUND_MARKER: &str = "Delivery information not found";
/// The first matching table is the shipment summary.
const HISTORY_TABLE_INDEX: usize = 1;

static TABLES: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"table[cellpadding="1"][cellspacing="1"][border="1"][align="center"]"#)
});
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

pub const OVERNITE_RULES: &[StatusRule] =
    &[StatusRule::contains("Delivered on", ShipmentStatus::Completed)];

#[derive(Debug, Clone, Copy, Default)]
pub struct Overnite;

impl Courier for Overnite {
    fn provider(&self) -> Provider {
        Provider::Overnite
    }

    fn source(
        &self,
        tracking_number: &TrackingNumber,
        config: &TrackerConfig,
    ) -> Result<PageSource, FetchError> {
        let request = PageRequest::post(endpoint_url(&config.overnite_url, &[])?)
            .form("__EVENTTARGET", "")
            .form("__EVENTARGUMENT", "")
            .form("__VIEWSTATE", config.overnite_viewstate.as_str())
            .form("__EVENTVALIDATION", config.overnite_event_validation.as_str())
            .form("ctl00$Content$rb", "rdAwbNo")
            .form("ctl00$Content$txtAWB", tracking_number.as_str())
            .form("ctl00$Content$ValidatorCalloutExtender6_ClientState", "")
            .form("ctl00$Content$imgbtnTrack.x", "28")
            .form("ctl00$Content$imgbtnTrack.y", "8")
            .header("Referer", config.overnite_url.as_str())
            .optional_header("Cookie", config.overnite_session_cookie.as_deref());
        Ok(PageSource::Http(request))
    }

    fn extract(
        &self,
        document: &RawDocument,
        tracking_number: &TrackingNumber,
    ) -> Result<TrackingReport, TrackError> {
        if document.contains(NOT_FOUND_MARKER) {
            return Err(TrackError::invalid(Provider::Overnite, tracking_number));
        }

        let status = classify(OVERNITE_RULES, document.body());

        let html = Html::parse_document(document.body());
        let table = html
            .select(&TABLES)
            .nth(HISTORY_TABLE_INDEX)
            .ok_or_else(|| TrackError::parse(Provider::Overnite, "history table missing"))?;

        let mut history = Vec::new();
        for row in table.select(&TR).skip(1) {
            if let Some(checkpoint) = row_to_checkpoint(row)? {
                history.push(checkpoint);
            }
        }

        Ok(TrackingReport::new(history, status))
    }
}

/// `None` for holiday rows.
fn row_to_checkpoint(row: ElementRef<'_>) -> Result<Option<Checkpoint>, TrackError> {
    let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
    let [date, location, status, ..] = cells.as_slice() else {
        return Err(TrackError::parse(
            Provider::Overnite,
            format!("history row has {} cells, expected 3", cells.len()),
        ));
    };

    let location = find_in(*location, &LINK).map_or_else(|| text_of(*location), text_of);
    if location.is_empty() {
        return Ok(None);
    }

    let timestamp = parse_date(&text_of(*date), DATE_FORMAT)
        .map_err(|e| TrackError::parse(Provider::Overnite, e.to_string()))?;
    Ok(Some(checkpoint(&location, &text_of(*status), timestamp)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELIVERED: &str = include_str!("../../tests/fixtures/overnite_delivered.html");

    fn number() -> TrackingNumber {
        TrackingNumber::new("7301234567").unwrap()
    }

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>
            <table cellpadding="1" cellspacing="1" border="1" align="center"><tr><td>Summary</td></tr></table>
            <table cellpadding="1" cellspacing="1" border="1" align="center">
              <tr><th>Date</th><th>Location</th><th>Status</th></tr>
              {rows}
            </table>
            </body></html>"#
        )
    }

    #[test]
    fn holiday_rows_are_skipped() {
        let report = Overnite
            .extract(&RawDocument::http(DELIVERED), &number())
            .unwrap();

        assert_eq!(report.status(), ShipmentStatus::Completed);
        assert_eq!(report.history().len(), 2);

        let first = &report.history()[0];
        assert_eq!(first.location, "AHMEDABAD");
        assert_eq!(first.status, "Booked");
        assert_eq!(first.timestamp.to_string(), "2016-01-08 00:00:00");

        let last = report.latest().unwrap();
        assert_eq!(last.location, "PUNE");
        assert_eq!(last.status, "Delivered on 11/01/2016 to SELF");
    }

    #[test]
    fn holiday_row_with_unparseable_date_is_still_skipped() {
        let rows = r#"
            <tr><td>Sunday, January 10, 2016</td><td><a href="Branch.aspx">SURAT</a></td><td>In Transit</td></tr>
            <tr><td>&nbsp;</td><td><a href="Branch.aspx"> </a></td><td></td></tr>"#;
        let report = Overnite.extract(&RawDocument::http(page(rows)), &number()).unwrap();
        assert_eq!(report.history().len(), 1);
        assert_eq!(report.status(), ShipmentStatus::InTransit);
    }

    #[test]
    fn location_without_link_uses_cell_text() {
        let rows = "<tr><td>Saturday, January 9, 2016</td><td>VAPI</td><td>In Transit</td></tr>";
        let report = Overnite.extract(&RawDocument::http(page(rows)), &number()).unwrap();
        assert_eq!(report.history()[0].location, "VAPI");
        assert_eq!(report.history()[0].timestamp.to_string(), "2016-01-09 00:00:00");
    }

    #[test]
    fn not_found_marker_is_invalid_tracking_number() {
        let html = "<html><body><span>Delivery information not found</span></body></html>";
        let err = Overnite.extract(&RawDocument::http(html), &number()).unwrap_err();
        assert!(matches!(err, TrackError::InvalidTrackingNumber { .. }));
    }

    #[test]
    fn missing_history_table_is_a_parse_error() {
        let html = r#"<html><body><table cellpadding="1" cellspacing="1" border="1" align="center"></table></body></html>"#;
        let err = Overnite.extract(&RawDocument::http(html), &number()).unwrap_err();
        assert!(matches!(err, TrackError::Parse { .. }), "got: {err:?}");
    }

    #[test]
    fn source_posts_postback_form_with_referer() {
        let mut config = TrackerConfig::default();
        config.overnite_session_cookie = Some("ASP.NET_SessionId=xyz".to_string());

        let PageSource::Http(request) = Overnite.source(&number(), &config).unwrap() else {
            panic!("expected an HTTP source");
        };
        assert_eq!(request.method, reqwest::Method::POST);
        assert!(request
            .form
            .contains(&("ctl00$Content$txtAWB".to_string(), "7301234567".to_string())));
        assert!(request
            .form
            .contains(&("__VIEWSTATE".to_string(), config.overnite_viewstate.clone())));
        assert_eq!(
            request.headers,
            vec![
                ("Referer".to_string(), config.overnite_url.clone()),
                ("Cookie".to_string(), "ASP.NET_SessionId=xyz".to_string()),
            ]
        );
    }
}
