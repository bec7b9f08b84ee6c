//! Subtitle blob decoder
//!
//! Turns an opaque blob into a UTF-8 string in two tiers:
//! - Ask the host reader for a text read using its own encoding heuristic
//! - If that yields nothing usable, read the raw buffer and decode it as UTF-8
//!
//! The host side is abstracted behind [`BlobReader`] so tests can count and
//! fail individual reads. [`MemoryReader`] is the in-process host.

use async_trait::async_trait;
use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::resource::Blob;

/// How invalid byte sequences are handled when decoding raw buffers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Utf8Mode {
    /// Replace invalid sequences with U+FFFD
    #[default]
    Lenient,
    /// Fail on the first invalid sequence
    Strict,
}

/// Primitives the host environment provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Blob reads (text and raw buffer)
    pub blob_reader: bool,
    /// Byte-to-UTF-8 decoding
    pub utf8_decoder: bool,
}

impl HostCapabilities {
    pub fn full() -> Self {
        Self {
            blob_reader: true,
            utf8_decoder: true,
        }
    }
}

/// Result of a completed host read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadPayload {
    Text(String),
    Binary(Bytes),
    /// The read completed without producing anything
    Empty,
}

/// Host-side blob reading
#[async_trait]
pub trait BlobReader: Send + Sync {
    /// Which primitives this host offers
    fn capabilities(&self) -> HostCapabilities;

    /// Read the blob as text, letting the host pick the encoding
    async fn read_as_text(&self, blob: &Blob) -> Result<ReadPayload>;

    /// Read the blob as an uninterpreted byte buffer
    async fn read_as_array_buffer(&self, blob: &Blob) -> Result<ReadPayload>;
}

/// Outcome of the first decode tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextDecode {
    Decoded(String),
    NeedsFallback,
}

/// Try the host text read. Any failure or empty result asks for the fallback.
pub async fn decode_as_text<R>(reader: &R, blob: &Blob) -> TextDecode
where
    R: BlobReader + ?Sized,
{
    match reader.read_as_text(blob).await {
        Ok(ReadPayload::Text(text)) if !text.is_empty() => TextDecode::Decoded(text),
        Ok(payload) => {
            tracing::debug!(
                "Text read gave no usable result ({}), falling back to raw buffer",
                payload_kind(&payload)
            );
            TextDecode::NeedsFallback
        }
        Err(e) => {
            tracing::debug!("Text read failed: {}. Falling back to raw buffer", e);
            TextDecode::NeedsFallback
        }
    }
}

/// Read the blob as a raw byte buffer
pub async fn read_as_bytes<R>(reader: &R, blob: &Blob) -> Result<Bytes>
where
    R: BlobReader + ?Sized,
{
    match reader.read_as_array_buffer(blob).await? {
        ReadPayload::Binary(bytes) => Ok(bytes),
        ReadPayload::Text(_) | ReadPayload::Empty => Err(ConvertError::InvalidLoadResult),
    }
}

/// Decode a byte buffer as UTF-8. A leading byte order mark is dropped.
pub fn decode_bytes_as_utf8(bytes: &[u8], mode: Utf8Mode) -> Result<String> {
    match mode {
        Utf8Mode::Strict => {
            let bytes = match Encoding::for_bom(bytes) {
                Some((encoding, bom_len)) if encoding == UTF_8 => &bytes[bom_len..],
                _ => bytes,
            };
            std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| ConvertError::MalformedUtf8 {
                    valid_up_to: e.valid_up_to(),
                })
        }
        Utf8Mode::Lenient => {
            let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
            if had_errors {
                tracing::warn!(
                    "Subtitle bytes are not valid UTF-8, invalid sequences were replaced"
                );
            }
            Ok(text.into_owned())
        }
    }
}

/// Full two-tier decode of a blob
pub async fn decode<R>(reader: &R, blob: &Blob, mode: Utf8Mode) -> Result<String>
where
    R: BlobReader + ?Sized,
{
    match decode_as_text(reader, blob).await {
        TextDecode::Decoded(text) => Ok(text),
        TextDecode::NeedsFallback => {
            let bytes = read_as_bytes(reader, blob).await?;
            decode_bytes_as_utf8(&bytes, mode)
        }
    }
}

fn payload_kind(payload: &ReadPayload) -> &'static str {
    match payload {
        ReadPayload::Text(_) => "empty text",
        ReadPayload::Binary(_) => "binary payload",
        ReadPayload::Empty => "no payload",
    }
}

/// Byte order marks win over the declared charset; UTF-8 is the default.
fn sniff_encoding(blob: &Blob) -> (&'static Encoding, usize) {
    Encoding::for_bom(blob.data()).unwrap_or_else(|| {
        let declared = blob
            .charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()));
        (declared.unwrap_or(UTF_8), 0)
    })
}

/// In-process host reader over the blob's own bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryReader;

#[async_trait]
impl BlobReader for MemoryReader {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities::full()
    }

    async fn read_as_text(&self, blob: &Blob) -> Result<ReadPayload> {
        let data = blob.data();
        if data.is_empty() {
            return Ok(ReadPayload::Empty);
        }

        let (encoding, bom_len) = sniff_encoding(blob);
        let text = encoding
            .decode_without_bom_handling_and_without_replacement(&data[bom_len..])
            .ok_or_else(|| ConvertError::Read(format!("invalid {} text", encoding.name())))?;

        Ok(ReadPayload::Text(text.into_owned()))
    }

    async fn read_as_array_buffer(&self, blob: &Blob) -> Result<ReadPayload> {
        Ok(ReadPayload::Binary(blob.data().clone()))
    }
}
