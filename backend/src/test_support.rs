//! Test utilities for the gateway crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for tests and when the
//! `test-support` feature is enabled.

pub mod clock;
pub mod weather;

pub use clock::MutableClock;
