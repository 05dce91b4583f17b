//! Visual Crossing outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `WeatherSource`
//! port against the Visual Crossing timeline API.

mod dto;
mod http_source;

pub use http_source::{
    DEFAULT_VISUAL_CROSSING_BASE_URL, VisualCrossingSettings, VisualCrossingSource,
};
