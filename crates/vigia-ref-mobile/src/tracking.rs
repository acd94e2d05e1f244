//! Background location tracking.
//!
//! Two halves live here:
//!
//! - `acquire_location` runs the foreground start-up sequence a map screen
//!   performs on mount: permission check, one-shot fix, start of background
//!   updates.
//! - `BackgroundLocationTask` is the handler the platform invokes with each
//!   batch of background locations. It forwards the first location of every
//!   batch to a `LocationSink` and swallows everything that goes wrong.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vigia_config::TrackingConfig;
use vigia_contracts::{
    error::{VigiaError, VigiaResult},
    location::{LocationSample, PermissionScope, PermissionStatus},
};
use vigia_core::traits::{LocationProvider, LocationSink};

/// How a screen obtains the permission state on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    /// Read the current state without prompting.
    Check,
    /// Prompt the user.
    Request,
}

/// Check permissions, take a first fix and start background updates.
///
/// Returns the first fix on success. Errors:
/// - `PermissionDenied` when the status is anything but granted
/// - `BackgroundPermissionDenied` when `config.require_background_scope` is
///   set and the platform reports a scope other than `always`
/// - `LocationUnavailable` when the fix or the update start fails
pub fn acquire_location(
    provider: &dyn LocationProvider,
    config: &TrackingConfig,
    mode: PermissionMode,
) -> VigiaResult<LocationSample> {
    let grant = match mode {
        PermissionMode::Check => provider.permissions()?,
        PermissionMode::Request => provider.request_permissions()?,
    };
    debug!(status = ?grant.status, scope = ?grant.scope, "location permission state");

    if grant.status != PermissionStatus::Granted {
        return Err(VigiaError::PermissionDenied {
            reason: format!("permission status is {:?}", grant.status),
        });
    }

    if config.require_background_scope {
        if let Some(scope) = grant.scope {
            if scope != PermissionScope::Always {
                return Err(VigiaError::BackgroundPermissionDenied {
                    scope: scope.to_string(),
                });
            }
        }
    }

    let fix = provider
        .current_position()
        .map_err(|e| as_unavailable("current position", e))?;
    provider
        .start_updates(&config.task_name, config.accuracy)
        .map_err(|e| as_unavailable("start updates", e))?;

    info!(
        task = %config.task_name,
        accuracy = ?config.accuracy,
        latitude = fix.latitude,
        longitude = fix.longitude,
        "background location updates started"
    );
    Ok(fix)
}

/// Wrap `e` as `LocationUnavailable`, naming the step that failed.
fn as_unavailable(step: &str, e: VigiaError) -> VigiaError {
    let cause = match e {
        VigiaError::LocationUnavailable { reason } => reason,
        other => other.to_string(),
    };
    VigiaError::LocationUnavailable {
        reason: format!("{} failed: {}", step, cause),
    }
}

/// One delivery from the platform to the background task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// A batch of locations, oldest first.
    Locations(Vec<LocationSample>),
    /// The platform reported a failure instead of data.
    Error(String),
}

/// The handler registered with the platform under the tracking task name.
#[derive(Clone)]
pub struct BackgroundLocationTask {
    name: String,
    sink: Arc<dyn LocationSink>,
}

impl BackgroundLocationTask {
    pub fn new(name: impl Into<String>, sink: Arc<dyn LocationSink>) -> Self {
        Self {
            name: name.into(),
            sink,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle one platform delivery and return the sample that was posted.
    ///
    /// Errors, empty batches and rejected posts are logged and dropped; none
    /// of them reach the caller.
    pub fn handle(&self, event: TaskEvent) -> Option<LocationSample> {
        let locations = match event {
            TaskEvent::Error(message) => {
                warn!(task = %self.name, error = %message, "background location task error");
                return None;
            }
            TaskEvent::Locations(locations) => locations,
        };

        let Some(first) = locations.first().copied() else {
            debug!(task = %self.name, "empty location batch");
            return None;
        };

        match self.sink.post(first) {
            Ok(()) => {
                debug!(
                    task = %self.name,
                    batch = locations.len(),
                    latitude = first.latitude,
                    longitude = first.longitude,
                    "background location posted"
                );
                Some(first)
            }
            Err(e) => {
                warn!(task = %self.name, error = %e, "background location dropped");
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
