//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - The shared track registry
//! - Live converters, keyed by the id of the handle they issued
//! - Track slots, reserved before a conversion starts
//! - Server configuration

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::converter::MemoryConverter;
use crate::registry::MemoryRegistry;

/// Application state shared across all handlers
pub struct AppState {
    /// Registry every track handle is issued from
    pub registry: Arc<MemoryRegistry>,

    /// Live converters (handle id -> converter)
    pub tracks: DashMap<Uuid, Arc<MemoryConverter>>,

    /// Slots held by live tracks and uploads still converting
    reserved_slots: AtomicUsize,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new AppState with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(MemoryRegistry::new(config.track_base_url())),
            tracks: DashMap::new(),
            reserved_slots: AtomicUsize::new(0),
            config,
        }
    }

    /// Create AppState with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }

    /// Try to reserve a slot for a new track. On success the caller either
    /// registers a track, which then owns the slot, or calls [`Self::release_slot`].
    pub fn try_reserve_slot(&self) -> bool {
        let max = self.config.limits.max_tracks;
        self.reserved_slots
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < max).then_some(n + 1)
            })
            .is_ok()
    }

    /// Give back a reserved slot
    pub fn release_slot(&self) {
        let _ = self
            .reserved_slots
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Number of reserved slots
    pub fn reserved_slots(&self) -> usize {
        self.reserved_slots.load(Ordering::SeqCst)
    }

    /// Keep a converter alive under the id of its handle
    pub fn register_track(&self, id: Uuid, converter: Arc<MemoryConverter>) {
        self.tracks.insert(id, converter);
    }

    /// Get a converter by handle id
    pub fn get_track(&self, id: &Uuid) -> Option<Arc<MemoryConverter>> {
        self.tracks.get(id).map(|r| r.clone())
    }

    /// Forget a converter and free its slot. The caller releases it.
    pub fn remove_track(&self, id: &Uuid) -> Option<Arc<MemoryConverter>> {
        let (_, converter) = self.tracks.remove(id)?;
        self.release_slot();
        Some(converter)
    }

    /// Number of live tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Whether another track may be created
    pub fn has_capacity(&self) -> bool {
        self.reserved_slots() < self.config.limits.max_tracks
    }
}
