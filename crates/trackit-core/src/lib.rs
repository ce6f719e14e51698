pub mod config;
pub mod provider;
pub mod tracker_config;
pub mod tracking;

pub use config::{build_tracker_config, load_tracker_config, load_tracker_config_from_env};
pub use provider::Provider;
pub use tracker_config::TrackerConfig;
pub use tracking::{Checkpoint, ShipmentStatus, TrackingNumber, TrackingReport};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("tracking number must not be empty")]
    EmptyTrackingNumber,

    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
