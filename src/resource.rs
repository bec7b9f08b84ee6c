//! Blob resources and track handles
//!
//! A [`Blob`] is an immutable byte buffer tagged with a declared content
//! type. A [`Source`] is whatever the caller hands the converter, which is
//! not necessarily a blob. A [`Handle`] is the URL under which a registered
//! blob can be resolved.

use bytes::Bytes;
use std::fmt;
use uuid::Uuid;

/// MIME type of converted documents
pub const VTT_MIME: &str = "text/vtt";

/// Immutable binary object with a declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Bytes,
    content_type: String,
}

impl Blob {
    /// Create a new blob
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    /// Raw contents
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Declared content type (may be empty)
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value of the `charset` parameter of the content type, lowercased
    pub fn charset(&self) -> Option<String> {
        self.content_type
            .split(';')
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"').to_ascii_lowercase())
    }
}

/// Resource supplied to a converter
#[derive(Debug, Clone)]
pub enum Source {
    /// A readable blob
    Blob(Blob),
    /// Anything else; `kind` names what was found instead
    Unsupported { kind: String },
}

impl Source {
    /// Build an unsupported source for a resource of the given kind
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Source::Unsupported { kind: kind.into() }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Source::Blob(blob) => Some(blob),
            Source::Unsupported { .. } => None,
        }
    }
}

impl From<Blob> for Source {
    fn from(blob: Blob) -> Self {
        Source::Blob(blob)
    }
}

/// URL under which a registered blob resolves
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    /// Build a handle for `id` under `base`
    pub fn new(base: &str, id: Uuid) -> Self {
        Handle(format!("{}/{}", base.trim_end_matches('/'), id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry id carried in the last path segment
    pub fn id(&self) -> Option<Uuid> {
        self.0
            .rsplit('/')
            .next()
            .and_then(|segment| Uuid::parse_str(segment).ok())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}
