//! The single-slot mailbox between the background location task and the hub.
//!
//! The background task runs on a platform-managed context that is not the UI
//! context. It never touches subscribers directly: it drops the newest sample
//! into a slot that holds at most one value, and the UI context drains that
//! slot with `LocationHub::pump()`. A post that lands before the previous one
//! was pumped replaces it, since only the latest position matters.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use vigia_contracts::{
    error::{VigiaError, VigiaResult},
    location::LocationSample,
};
use vigia_core::traits::LocationSink;

// ── Internal mutable state ────────────────────────────────────────────────────

/// The slot shared by every `LocationPublisher` clone and the owning hub.
#[derive(Debug)]
pub(crate) struct Slot {
    /// The sample waiting to be pumped, if any.
    pub(crate) pending: Option<LocationSample>,

    /// Cleared by `LocationHub::shutdown()`; posts fail afterwards.
    pub(crate) open: bool,

    /// Samples replaced before they were pumped.
    pub(crate) overwritten: u64,
}

impl Slot {
    pub(crate) fn new() -> Self {
        Self {
            pending: None,
            open: true,
            overwritten: 0,
        }
    }
}

pub(crate) type SharedSlot = Arc<Mutex<Slot>>;

pub(crate) fn poisoned(what: &str, e: impl std::fmt::Display) -> VigiaError {
    VigiaError::HubShutdown {
        reason: format!("{} lock poisoned: {}", what, e),
    }
}

// ── Public handle ─────────────────────────────────────────────────────────────

/// A cloneable, thread-safe handle the background task posts samples through.
///
/// Obtain one from `LocationHub::publisher()`. Posting never invokes a
/// subscriber; it only fills the slot.
#[derive(Debug, Clone)]
pub struct LocationPublisher {
    pub(crate) slot: SharedSlot,
}

impl LocationPublisher {
    /// True if a sample is waiting to be pumped.
    pub fn has_pending(&self) -> VigiaResult<bool> {
        let slot = self.slot.lock().map_err(|e| poisoned("mailbox", e))?;
        Ok(slot.pending.is_some())
    }
}

impl LocationSink for LocationPublisher {
    /// Store `sample` as the pending sample, replacing any unpumped one.
    ///
    /// Returns `Err(HubShutdown)` once the owning hub has been shut down.
    fn post(&self, sample: LocationSample) -> VigiaResult<()> {
        let mut slot = self.slot.lock().map_err(|e| poisoned("mailbox", e))?;

        if !slot.open {
            warn!(
                latitude = sample.latitude,
                longitude = sample.longitude,
                "location posted after hub shutdown"
            );
            return Err(VigiaError::HubShutdown {
                reason: "hub was shut down; sample dropped".to_string(),
            });
        }

        if slot.pending.replace(sample).is_some() {
            slot.overwritten += 1;
            debug!(
                overwritten = slot.overwritten,
                "pending sample replaced before pump"
            );
        }

        Ok(())
    }
}
