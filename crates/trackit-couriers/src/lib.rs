//! Shipment tracking across seven courier websites.
//!
//! Each provider's page is fetched through a [`PageFetcher`] or, when the
//! page is filled in by scripts, a [`RenderEngine`]. A [`Courier`] strategy
//! then turns it into a [`TrackingReport`](trackit_core::TrackingReport):
//! checkpoints oldest first plus an overall status.

pub mod classify;
pub mod client;
pub mod couriers;
pub mod document;
pub mod error;
pub mod fetch;
mod html;
pub mod normalize;
pub mod render;
pub mod tracker;

pub use classify::{classify, Matcher, StatusRule};
pub use client::TrackingClient;
pub use couriers::{courier_for, Courier, PageSource};
pub use document::{DocumentOrigin, RawDocument};
pub use error::{FetchError, TrackError};
pub use fetch::{HttpFetcher, PageFetcher, PageRequest};
pub use render::{
    wait_for_markers, NoRenderEngine, PollPolicy, RenderEngine, RenderedPage, WaitError,
    WebDriverEngine, WebDriverPage,
};
pub use tracker::{Tracker, TrackerState};
