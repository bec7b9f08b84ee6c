//! Subtitle conversion module
//!
//! Rewrites bracket-tag SubRip text into WebVTT:
//! - `{i}` / `{\i1}` / `{/i}` / `{\i}` style markup to WebVTT tags
//! - Comma-separated millisecond timestamps to period-separated ones
//! - WebVTT header and trailing blank line
//! - Packaging of the document as a `text/vtt` blob

pub mod webvtt;

pub use webvtt::{
    build_document, create_handle, normalize_timestamps, package_as_resource, rewrite_tags,
    to_vtt_body, WEBVTT_HEADER,
};
