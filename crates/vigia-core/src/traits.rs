//! Collaborator traits for the VIGIA core.
//!
//! These are the seams between the platform-independent logic and the
//! outside world:
//!
//! - `Classifier`: maps an answer record to a risk tier
//! - `LocationSink`: accepts samples from the background location task
//! - `LocationProvider`: the platform's permission and position services
//! - `Dialer`: opens `tel:` links
//! - `Navigator`: moves between screens
//!
//! Everything that touches a platform API sits behind one of these so the
//! screens can be driven entirely by mocks in tests.

use vigia_contracts::{
    answer::AnswerRecord,
    error::VigiaResult,
    location::{LocationAccuracy, LocationSample, PermissionGrant},
    outcome::ClassificationOutcome,
};

/// Assigns a risk tier to a completed questionnaire.
///
/// Implementations must be pure: the same record always yields the same
/// outcome and nothing is recorded anywhere.
pub trait Classifier: Send + Sync {
    fn classify(&self, record: &AnswerRecord) -> ClassificationOutcome;
}

/// The entry point the background location task writes to.
///
/// Implementations must be callable from any thread. `post` only hands the
/// sample over; delivery to observers happens on the UI context.
pub trait LocationSink: Send + Sync {
    fn post(&self, sample: LocationSample) -> VigiaResult<()>;
}

/// Platform location services.
pub trait LocationProvider: Send + Sync {
    /// Read the current permission state without prompting.
    fn permissions(&self) -> VigiaResult<PermissionGrant>;

    /// Prompt the user for permission and return the resulting state.
    fn request_permissions(&self) -> VigiaResult<PermissionGrant>;

    /// A one-shot position fix.
    fn current_position(&self) -> VigiaResult<LocationSample>;

    /// Begin delivering background updates to the task registered as `task_name`.
    fn start_updates(&self, task_name: &str, accuracy: LocationAccuracy) -> VigiaResult<()>;

    /// Stop the background updates started under `task_name`.
    fn stop_updates(&self, task_name: &str) -> VigiaResult<()>;
}

/// Telephony: opens a `tel:` URL.
pub trait Dialer: Send + Sync {
    fn open_url(&self, url: &str) -> VigiaResult<()>;
}

/// Navigation targets reachable from the core's screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The static prevention-advice screen.
    Prevention,
    /// The explanation screen behind the map's info button.
    MapInfo,
}

/// Screen navigation. Fire-and-forget: nothing is returned to the caller.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
