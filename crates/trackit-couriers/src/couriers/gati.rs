//! Gati: XML docket web service.
//!
//! ```xml
//! <Gatiresponse>
//!   <result>successful</result>
//!   <DOCKET_STATUS>Delivered</DOCKET_STATUS>
//!   <TRANSIT_DTLS>
//!     <ROW>
//!       <INTRANSIT_DATE>14-Jan-2016</INTRANSIT_DATE>
//!       <INTRANSIT_TIME>11:45</INTRANSIT_TIME>
//!       <INTRANSIT_LOCATION>BANGALORE</INTRANSIT_LOCATION>
//!       <INTRANSIT_STATUS>Delivered</INTRANSIT_STATUS>
//!     </ROW>
//!   </TRANSIT_DTLS>
//! </Gatiresponse>
//! ```

use quick_xml::events::Event;
use quick_xml::Reader;
use trackit_core::{Checkpoint, Provider, ShipmentStatus, TrackerConfig, TrackingNumber, TrackingReport};

use super::{Courier, PageSource};
use crate::classify::{classify, StatusRule};
use crate::document::RawDocument;
use crate::error::{FetchError, TrackError};
use crate::fetch::{endpoint_url, PageRequest};
use crate::normalize::{checkpoint, join_date_time, parse_timestamp};

const DATE_FORMAT: &str = "%d-%b-%Y %H:%M";
const FAILED_RESULT: &str = "failed";

/// Matched against the `DOCKET_STATUS` element.
pub const GATI_RULES: &[StatusRule] = &[
    StatusRule::equals("Rebooked", ShipmentStatus::ReturnedToOrigin),
    StatusRule::equals("Delivered", ShipmentStatus::Completed),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Gati;

impl Courier for Gati {
    fn provider(&self) -> Provider {
        Provider::Gati
    }

    fn source(
        &self,
        tracking_number: &TrackingNumber,
        config: &TrackerConfig,
    ) -> Result<PageSource, FetchError> {
        let url = endpoint_url(&config.gati_url, &[("dktno", tracking_number.as_str())])?;
        Ok(PageSource::Http(PageRequest::get(url)))
    }

    fn extract(
        &self,
        document: &RawDocument,
        tracking_number: &TrackingNumber,
    ) -> Result<TrackingReport, TrackError> {
        let docket = parse_docket(document.body())?;

        let result = docket
            .result
            .ok_or_else(|| TrackError::parse(Provider::Gati, "response without <result>"))?;
        if result.trim() == FAILED_RESULT {
            return Err(TrackError::invalid(Provider::Gati, tracking_number));
        }

        let docket_status = docket
            .docket_status
            .ok_or_else(|| TrackError::parse(Provider::Gati, "response without <DOCKET_STATUS>"))?;
        let status = classify(GATI_RULES, &docket_status);

        let history = docket
            .rows
            .iter()
            .map(TransitRow::to_checkpoint)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrackingReport::new(history, status))
    }
}

#[derive(Debug, Default)]
struct Docket {
    result: Option<String>,
    docket_status: Option<String>,
    rows: Vec<TransitRow>,
}

#[derive(Debug, Default)]
struct TransitRow {
    date: Option<String>,
    time: Option<String>,
    location: Option<String>,
    status: Option<String>,
}

impl TransitRow {
    fn field<'a>(value: Option<&'a String>, tag: &str) -> Result<&'a str, TrackError> {
        value
            .map(String::as_str)
            .ok_or_else(|| TrackError::parse(Provider::Gati, format!("<ROW> without <{tag}>")))
    }

    fn to_checkpoint(&self) -> Result<Checkpoint, TrackError> {
        let date = Self::field(self.date.as_ref(), "INTRANSIT_DATE")?;
        let time = Self::field(self.time.as_ref(), "INTRANSIT_TIME")?;
        let status = Self::field(self.status.as_ref(), "INTRANSIT_STATUS")?;
        let location = self.location.as_deref().unwrap_or_default();

        let timestamp = parse_timestamp(&join_date_time(date, time), DATE_FORMAT)
            .map_err(|e| TrackError::parse(Provider::Gati, e.to_string()))?;
        Ok(checkpoint(location, status, timestamp))
    }

    fn slot(&mut self, tag: &str) -> Option<&mut Option<String>> {
        match tag {
            "INTRANSIT_DATE" => Some(&mut self.date),
            "INTRANSIT_TIME" => Some(&mut self.time),
            "INTRANSIT_LOCATION" => Some(&mut self.location),
            "INTRANSIT_STATUS" => Some(&mut self.status),
            _ => None,
        }
    }
}

impl Docket {
    /// Field for `tag`, inside the open row if there is one.
    fn slot<'a>(
        &'a mut self,
        row: Option<&'a mut TransitRow>,
        tag: &str,
    ) -> Option<&'a mut Option<String>> {
        match row {
            Some(row) => row.slot(tag),
            None => match tag {
                "result" => Some(&mut self.result),
                "DOCKET_STATUS" => Some(&mut self.docket_status),
                _ => None,
            },
        }
    }
}

fn parse_docket(xml: &str) -> Result<Docket, TrackError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut docket = Docket::default();
    let mut row: Option<TransitRow> = None;
    let mut current_tag = String::new();
    // Only the first occurrence of a field is read.
    let mut capturing = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current_tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if current_tag == "ROW" {
                    row = Some(TransitRow::default());
                }
                capturing = docket
                    .slot(row.as_mut(), &current_tag)
                    .is_some_and(|slot| slot.is_none());
            }
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"ROW" {
                    docket.rows.push(TransitRow::default());
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"ROW" {
                    if let Some(finished) = row.take() {
                        docket.rows.push(finished);
                    }
                }
                capturing = false;
                current_tag.clear();
            }
            Ok(Event::Text(e)) if capturing => {
                let text = e
                    .unescape()
                    .map_err(|err| TrackError::parse(Provider::Gati, err.to_string()))?;
                if let Some(slot) = docket.slot(row.as_mut(), &current_tag) {
                    slot.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::CData(e)) if capturing => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                if let Some(slot) = docket.slot(row.as_mut(), &current_tag) {
                    slot.get_or_insert_with(String::new).push_str(text.trim());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TrackError::parse(
                    Provider::Gati,
                    format!("malformed XML at byte {}: {e}", reader.error_position()),
                ))
            }
            _ => {}
        }
    }

    Ok(docket)
}
