//! Ordered status rules shared by every courier.
//!
//! Rules are evaluated top to bottom and the first match wins. A returned
//! shipment's page usually still mentions delivery, so every table lists its
//! returned rule before its delivered rule.

use trackit_core::ShipmentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The subject contains the needle anywhere.
    Contains(&'static str),
    /// The trimmed subject equals the needle exactly.
    Equals(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub matcher: Matcher,
    pub status: ShipmentStatus,
}

impl StatusRule {
    #[must_use]
    pub const fn contains(needle: &'static str, status: ShipmentStatus) -> Self {
        Self {
            matcher: Matcher::Contains(needle),
            status,
        }
    }

    #[must_use]
    pub const fn equals(needle: &'static str, status: ShipmentStatus) -> Self {
        Self {
            matcher: Matcher::Equals(needle),
            status,
        }
    }

    #[must_use]
    pub fn matches(&self, subject: &str) -> bool {
        match self.matcher {
            Matcher::Contains(needle) => subject.contains(needle),
            Matcher::Equals(needle) => subject.trim() == needle,
        }
    }
}

/// Status of the first rule matching `subject`, or `InTransit`.
#[must_use]
pub fn classify(rules: &[StatusRule], subject: &str) -> ShipmentStatus {
    rules
        .iter()
        .find(|rule| rule.matches(subject))
        .map_or(ShipmentStatus::InTransit, |rule| rule.status)
}
