use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A courier whose tracking page can be scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Bluedart,
    Aramex,
    Dhl,
    Skynet,
    Overnite,
    Ecomm,
    Gati,
}

impl Provider {
    /// Every supported provider, in declaration order.
    pub const ALL: [Provider; 7] = [
        Provider::Bluedart,
        Provider::Aramex,
        Provider::Dhl,
        Provider::Skynet,
        Provider::Overnite,
        Provider::Ecomm,
        Provider::Gati,
    ];

    /// Lowercase identifier used in config keys and serialized output.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Provider::Bluedart => "bluedart",
            Provider::Aramex => "aramex",
            Provider::Dhl => "dhl",
            Provider::Skynet => "skynet",
            Provider::Overnite => "overnite",
            Provider::Ecomm => "ecomm",
            Provider::Gati => "gati",
        }
    }

    /// Whether the provider's tracking page only fills in after script
    /// execution and must go through a render engine.
    #[must_use]
    pub fn is_rendered(self) -> bool {
        matches!(self, Provider::Aramex | Provider::Dhl)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Provider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Provider::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownProvider(wanted.to_string()))
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
