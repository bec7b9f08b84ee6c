//! WebVTT converter
//!
//! Owns one source resource and at most one live output handle. A
//! conversion decodes the source, rewrites it into a WebVTT document,
//! registers the document and hands back the handle.
//!
//! Conversions on one instance are serialised by an async mutex, so
//! overlapping `get_handle()` calls run back to back and only the last
//! handle stays registered.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ConverterConfig;
use crate::decoder::{self, BlobReader, MemoryReader};
use crate::error::{ConvertError, Result};
use crate::registry::{MemoryRegistry, ResourceRegistry};
use crate::resource::{Blob, Handle, Source};
use crate::subtitle::{build_document, create_handle, package_as_resource};

/// Converter over the in-process reader and registry
pub type MemoryConverter = WebVttConverter<MemoryReader, MemoryRegistry>;

/// Per-instance conversion state
#[derive(Debug, Clone, Default)]
enum ConversionState {
    #[default]
    Unconverted,
    Converted { output: Blob, handle: Handle },
}

/// Converts one subtitle source into a registered WebVTT track
pub struct WebVttConverter<R, G>
where
    R: BlobReader,
    G: ResourceRegistry + ?Sized,
{
    source: Source,
    reader: R,
    registry: Arc<G>,
    config: ConverterConfig,
    state: Mutex<ConversionState>,
}

impl MemoryConverter {
    /// Converter reading the source from memory
    pub fn in_memory(source: impl Into<Source>, registry: Arc<MemoryRegistry>) -> Self {
        Self::new(source, MemoryReader, registry)
    }
}

impl<R, G> WebVttConverter<R, G>
where
    R: BlobReader,
    G: ResourceRegistry + ?Sized,
{
    /// Create a converter in the unconverted state
    pub fn new(source: impl Into<Source>, reader: R, registry: Arc<G>) -> Self {
        Self {
            source: source.into(),
            reader,
            registry,
            config: ConverterConfig::default(),
            state: Mutex::new(ConversionState::Unconverted),
        }
    }

    pub fn with_config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert the source and return a handle to the `text/vtt` document.
    ///
    /// Fails before any read when the source is not a blob or the host lacks
    /// a decoding primitive. A previously issued handle is revoked once the
    /// new one is registered.
    pub async fn get_handle(&self) -> Result<Handle> {
        let blob = match &self.source {
            Source::Blob(blob) => blob,
            Source::Unsupported { kind } => {
                return Err(ConvertError::InvalidSource(kind.clone()));
            }
        };

        let capabilities = self.reader.capabilities();
        if !capabilities.blob_reader {
            return Err(ConvertError::MissingCapability("blob reader"));
        }
        if !capabilities.utf8_decoder {
            return Err(ConvertError::MissingCapability("UTF-8 decoder"));
        }

        let mut state = self.state.lock().await;

        let text = decoder::decode(&self.reader, blob, self.config.utf8_mode).await?;
        let output = package_as_resource(build_document(&text));
        let handle = create_handle(self.registry.as_ref(), output.clone());

        let previous = std::mem::replace(
            &mut *state,
            ConversionState::Converted {
                output,
                handle: handle.clone(),
            },
        );
        if let ConversionState::Converted { handle: old, .. } = previous {
            self.registry.revoke(&old);
        }

        tracing::info!("Converted {} bytes into {}", blob.len(), handle);
        Ok(handle)
    }

    /// Revoke the live handle, if any, and forget the output
    pub async fn release(&self) {
        let mut state = self.state.lock().await;
        if let ConversionState::Converted { handle, .. } = std::mem::take(&mut *state) {
            self.registry.revoke(&handle);
            tracing::info!("Released {}", handle);
        }
    }

    /// Live handle, if converted
    pub async fn handle(&self) -> Option<Handle> {
        match &*self.state.lock().await {
            ConversionState::Converted { handle, .. } => Some(handle.clone()),
            ConversionState::Unconverted => None,
        }
    }

    /// Output document, if converted
    pub async fn output(&self) -> Option<Blob> {
        match &*self.state.lock().await {
            ConversionState::Converted { output, .. } => Some(output.clone()),
            ConversionState::Unconverted => None,
        }
    }

    pub async fn is_converted(&self) -> bool {
        matches!(&*self.state.lock().await, ConversionState::Converted { .. })
    }
}

impl<R, G> Drop for WebVttConverter<R, G>
where
    R: BlobReader,
    G: ResourceRegistry + ?Sized,
{
    fn drop(&mut self) {
        if let ConversionState::Converted { handle, .. } = self.state.get_mut() {
            self.registry.revoke(handle);
        }
    }
}
