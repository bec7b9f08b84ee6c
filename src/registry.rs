//! Track handle registry
//!
//! Maps output blobs to revocable URL handles. The converter only sees the
//! [`ResourceRegistry`] trait; [`MemoryRegistry`] is the in-process store the
//! HTTP host resolves `GET /tracks/{id}` against.

use dashmap::DashMap;
use std::time::SystemTime;
use uuid::Uuid;

use crate::resource::{Blob, Handle};

/// Base used when no public URL is configured
pub const DEFAULT_BASE: &str = "blob:webvtt-converter";

/// Registry mapping blobs to revocable handles
pub trait ResourceRegistry: Send + Sync {
    /// Store a blob and return the handle it resolves under
    fn register(&self, resource: Blob) -> Handle;

    /// Make a handle permanently unresolvable. Returns whether it was live.
    fn revoke(&self, handle: &Handle) -> bool;

    /// Look up the blob behind a handle
    fn resolve(&self, handle: &Handle) -> Option<Blob>;

    /// Number of live handles
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registered blob with metadata
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub resource: Blob,
    pub created_at: SystemTime,
}

impl RegistryEntry {
    pub fn new(resource: Blob) -> Self {
        Self {
            resource,
            created_at: SystemTime::now(),
        }
    }

    pub fn age_secs(&self) -> u64 {
        self.created_at.elapsed().map(|d| d.as_secs()).unwrap_or(0)
    }
}

/// In-memory registry keyed by UUID
pub struct MemoryRegistry {
    /// Handle prefix, e.g. `http://localhost:3000/tracks`
    base: String,
    /// Live entries (id -> entry)
    entries: DashMap<Uuid, RegistryEntry>,
}

impl MemoryRegistry {
    /// Create a registry issuing handles under `base`
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            entries: DashMap::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Look up by the raw id (the last segment of a handle)
    pub fn get(&self, id: &Uuid) -> Option<Blob> {
        self.entries.get(id).map(|e| e.resource.clone())
    }

    /// Snapshot of live entries as (handle, entry) pairs
    pub fn entries(&self) -> Vec<(Handle, RegistryEntry)> {
        self.entries
            .iter()
            .map(|e| (Handle::new(&self.base, *e.key()), e.value().clone()))
            .collect()
    }

    /// Total bytes held by live entries
    pub fn memory_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.resource.len()).sum()
    }

    /// Only handles issued under this registry's base are ours
    fn id_of(&self, handle: &Handle) -> Option<Uuid> {
        let rest = handle.as_str().strip_prefix(self.base.as_str())?;
        let id = rest.strip_prefix('/')?;
        Uuid::parse_str(id).ok()
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}

impl ResourceRegistry for MemoryRegistry {
    fn register(&self, resource: Blob) -> Handle {
        let id = Uuid::new_v4();
        let size = resource.len();
        self.entries.insert(id, RegistryEntry::new(resource));

        let handle = Handle::new(&self.base, id);
        tracing::debug!("Registered {} ({} bytes)", handle, size);
        handle
    }

    fn revoke(&self, handle: &Handle) -> bool {
        let removed = self
            .id_of(handle)
            .and_then(|id| self.entries.remove(&id))
            .is_some();
        if removed {
            tracing::debug!("Revoked {}", handle);
        }
        removed
    }

    fn resolve(&self, handle: &Handle) -> Option<Blob> {
        self.id_of(handle).and_then(|id| self.get(&id))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
