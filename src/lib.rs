//! WebVTT converter
//!
//! Converts bracket-tag SubRip subtitles (`{i}`, `{\i1}`, comma-separated
//! timestamps) into WebVTT and exposes each result as a revocable track
//! handle, a URL usable as a `<track>` source.
//!
//! ```no_run
//! use std::sync::Arc;
//! use webvtt_converter::{Blob, MemoryConverter, MemoryRegistry};
//!
//! # async fn run() -> webvtt_converter::Result<()> {
//! let registry = Arc::new(MemoryRegistry::default());
//! let blob = Blob::new("00:00:01,000 {i}Hello{/i}", "application/x-subrip");
//! let converter = MemoryConverter::in_memory(blob, registry.clone());
//!
//! let handle = converter.get_handle().await?;
//! println!("track source: {}", handle);
//! converter.release().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod config_file;
pub mod converter;
pub mod decoder;
pub mod error;
pub mod http;
pub mod registry;
pub mod resource;
pub mod state;
pub mod subtitle;

#[cfg(test)]
mod integration;

pub use converter::{MemoryConverter, WebVttConverter};
pub use decoder::{BlobReader, HostCapabilities, MemoryReader, ReadPayload, TextDecode, Utf8Mode};
pub use error::{ConvertError, Result};
pub use registry::{MemoryRegistry, ResourceRegistry};
pub use resource::{Blob, Handle, Source};
