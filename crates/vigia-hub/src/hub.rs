//! The location broadcast hub.
//!
//! `LocationHub` keeps the latest `LocationSample` and an insertion-ordered
//! list of subscribers. `publish()` overwrites the sample and calls every
//! subscriber, in order, on the calling context.
//!
//! The hub is an explicitly created object. Clone it to hand the same hub to
//! the background task wrapper and to each screen; all clones share state.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use tracing::{debug, info, warn};

use vigia_contracts::{
    error::{VigiaError, VigiaResult},
    location::LocationSample,
};

use crate::mailbox::{poisoned, LocationPublisher, SharedSlot, Slot};

/// The callback signature subscribers implement.
pub type SubscriberFn = dyn Fn(&LocationSample) -> VigiaResult<()> + Send + Sync;

/// A registered observer.
///
/// Identity is by reference: two `Subscriber`s are the same subscriber only
/// if one was cloned from the other. Wrapping the same closure twice with
/// `Subscriber::new` yields two distinct subscribers.
#[derive(Clone)]
pub struct Subscriber(Arc<SubscriberFn>);

impl Subscriber {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&LocationSample) -> VigiaResult<()> + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// True if `self` and `other` refer to the same callback allocation.
    pub fn same_as(&self, other: &Subscriber) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn call(&self, sample: &LocationSample) -> VigiaResult<()> {
        (self.0)(sample)
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subscriber({:p})", Arc::as_ptr(&self.0))
    }
}

/// What one fan-out did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryReport {
    /// The sample that was broadcast.
    pub sample: LocationSample,
    /// Subscribers that accepted the sample.
    pub delivered: usize,
    /// Subscribers that returned an error. Delivery continued past them.
    pub failed: usize,
}

// ── Internal mutable state ────────────────────────────────────────────────────

struct HubState {
    current: LocationSample,
    subscribers: Vec<Subscriber>,
    open: bool,
    published: u64,
}

// ── Public hub ────────────────────────────────────────────────────────────────

/// Single-slot, fan-out bridge between the location task and map screens.
///
/// # Threading
///
/// `publish()` and `pump()` invoke subscribers on the calling thread and are
/// meant to be called from the UI context. The background task uses the
/// `LocationPublisher` from `publisher()` instead, which only fills the
/// mailbox slot.
#[derive(Clone)]
pub struct LocationHub {
    state: Arc<Mutex<HubState>>,
    slot: SharedSlot,
}

impl LocationHub {
    /// Create an open hub whose current sample is `(0, 0)` and which has no
    /// subscribers.
    pub fn create() -> Self {
        debug!("location hub created");
        Self {
            state: Arc::new(Mutex::new(HubState {
                current: LocationSample::default(),
                subscribers: Vec::new(),
                open: true,
                published: 0,
            })),
            slot: Arc::new(Mutex::new(Slot::new())),
        }
    }

    /// A handle the background task can post samples through.
    pub fn publisher(&self) -> LocationPublisher {
        LocationPublisher {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Append `subscriber`. It is not called with the current sample; it
    /// waits for the next publish. Registering the same subscriber twice
    /// means it is called twice per publish.
    pub fn subscribe(&self, subscriber: Subscriber) -> VigiaResult<()> {
        let mut state = self.state.lock().map_err(|e| poisoned("hub", e))?;
        if !state.open {
            return Err(VigiaError::HubShutdown {
                reason: "cannot subscribe to a shut-down hub".to_string(),
            });
        }
        state.subscribers.push(subscriber);
        debug!(subscribers = state.subscribers.len(), "subscriber added");
        Ok(())
    }

    /// Remove every registration of `subscriber` and return how many were
    /// removed. Unknown subscribers are ignored.
    pub fn unsubscribe(&self, subscriber: &Subscriber) -> VigiaResult<usize> {
        let mut state = self.state.lock().map_err(|e| poisoned("hub", e))?;
        let before = state.subscribers.len();
        state.subscribers.retain(|s| !s.same_as(subscriber));
        let removed = before - state.subscribers.len();
        debug!(removed, subscribers = state.subscribers.len(), "subscriber removed");
        Ok(removed)
    }

    /// Overwrite the current sample and call every subscriber with it, in
    /// registration order.
    ///
    /// A subscriber that returns an error is logged and skipped; the rest
    /// still receive the sample. Subscribers may subscribe or unsubscribe
    /// from inside their callback; such changes apply from the next publish.
    pub fn publish(&self, sample: LocationSample) -> VigiaResult<DeliveryReport> {
        let (subscribers, sequence) = {
            let mut state = self.state.lock().map_err(|e| poisoned("hub", e))?;
            if !state.open {
                return Err(VigiaError::HubShutdown {
                    reason: "cannot publish to a shut-down hub".to_string(),
                });
            }
            state.current = sample;
            state.published += 1;
            (state.subscribers.clone(), state.published)
        };

        let mut report = DeliveryReport {
            sample,
            delivered: 0,
            failed: 0,
        };

        for (index, subscriber) in subscribers.iter().enumerate() {
            match subscriber.call(&sample) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(sequence, index, error = %e, "subscriber failed; continuing delivery");
                }
            }
        }

        debug!(
            sequence,
            latitude = sample.latitude,
            longitude = sample.longitude,
            delivered = report.delivered,
            failed = report.failed,
            "location published"
        );

        Ok(report)
    }

    /// Drain the mailbox slot on the UI context.
    ///
    /// Returns `Ok(None)` when nothing was posted since the last pump,
    /// otherwise publishes the pending sample and returns its report.
    pub fn pump(&self) -> VigiaResult<Option<DeliveryReport>> {
        let pending = {
            let mut slot = self.slot.lock().map_err(|e| poisoned("mailbox", e))?;
            slot.pending.take()
        };

        match pending {
            Some(sample) => self.publish(sample).map(Some),
            None => Ok(None),
        }
    }

    /// The latest published sample.
    pub fn current(&self) -> VigiaResult<LocationSample> {
        let state = self.state.lock().map_err(|e| poisoned("hub", e))?;
        Ok(state.current)
    }

    pub fn subscriber_count(&self) -> VigiaResult<usize> {
        let state = self.state.lock().map_err(|e| poisoned("hub", e))?;
        Ok(state.subscribers.len())
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().map(|state| state.open).unwrap_or(false)
    }

    /// Close the hub: drop every subscriber and any pending sample, and make
    /// later posts, publishes and subscriptions fail with `HubShutdown`.
    ///
    /// Stopping the background task itself is the caller's job.
    pub fn shutdown(&self) -> VigiaResult<()> {
        let dropped_subscribers = {
            let mut state = self.state.lock().map_err(|e| poisoned("hub", e))?;
            state.open = false;
            std::mem::take(&mut state.subscribers).len()
        };
        let dropped_pending = {
            let mut slot = self.slot.lock().map_err(|e| poisoned("mailbox", e))?;
            slot.open = false;
            slot.pending.take().is_some()
        };

        info!(dropped_subscribers, dropped_pending, "location hub shut down");
        Ok(())
    }
}

impl fmt::Debug for LocationHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationHub").finish_non_exhaustive()
    }
}
