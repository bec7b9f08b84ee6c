//! HTTP server module
//!
//! This module is the host environment track handles resolve in:
//! - Axum router with track and health endpoints
//! - Track upload, resolution and release
//! - HTTP headers (Content-Type, Cache-Control)
//! - CORS middleware and upload size limit

pub mod handlers;
pub mod routes;
pub mod tracks;

pub use routes::create_router;
