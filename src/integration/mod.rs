//! Integration tests
//!
//! End-to-end checks of the track host: upload, resolve, release.

pub mod e2e;
pub mod validation;
