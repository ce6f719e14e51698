use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Provider-scoped shipment identifier (waybill, AWB or docket number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Wraps a tracking number, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyTrackingNumber`] if nothing is left after trimming.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyTrackingNumber);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TrackingNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Coarse overall state of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    InTransit,
    Completed,
    ReturnedToOrigin,
}

impl ShipmentStatus {
    /// One-letter code: `T`, `C` or `R`.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            ShipmentStatus::InTransit => 'T',
            ShipmentStatus::Completed => 'C',
            ShipmentStatus::ReturnedToOrigin => 'R',
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShipmentStatus::InTransit => write!(f, "in transit"),
            ShipmentStatus::Completed => write!(f, "completed"),
            ShipmentStatus::ReturnedToOrigin => write!(f, "returned to origin"),
        }
    }
}

/// One discrete tracking event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Facility or city name; empty when the provider omits it.
    pub location: String,
    /// Provider's free-text description of the event.
    pub status: String,
    /// Date and time merged; date-only providers resolve to midnight.
    pub timestamp: NaiveDateTime,
}

/// Result of tracking one shipment.
///
/// The history is always ordered by timestamp, oldest first. Checkpoints that
/// share a timestamp keep the order they were given in. Deserializing goes
/// through [`TrackingReport::new`], so the same ordering holds there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReportParts")]
pub struct TrackingReport {
    history: Vec<Checkpoint>,
    status: ShipmentStatus,
}

#[derive(Deserialize)]
struct ReportParts {
    history: Vec<Checkpoint>,
    status: ShipmentStatus,
}

impl From<ReportParts> for TrackingReport {
    fn from(parts: ReportParts) -> Self {
        Self::new(parts.history, parts.status)
    }
}

impl TrackingReport {
    #[must_use]
    pub fn new(mut history: Vec<Checkpoint>, status: ShipmentStatus) -> Self {
        // `sort_by_key` is stable, equal timestamps stay in source order.
        history.sort_by_key(|checkpoint| checkpoint.timestamp);
        Self { history, status }
    }

    #[must_use]
    pub fn history(&self) -> &[Checkpoint] {
        &self.history
    }

    #[must_use]
    pub fn status(&self) -> ShipmentStatus {
        self.status
    }

    /// The most recent checkpoint, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.history.last()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Checkpoint>, ShipmentStatus) {
        (self.history, self.status)
    }
}
