//! Error types shared by every VIGIA crate.
//!
//! The application never lets one of these cross a component boundary: the
//! screens convert them into fixed user-facing strings. They exist as distinct
//! kinds so each failure path can be asserted on in tests.

use thiserror::Error;

/// The unified error type for the VIGIA core.
#[derive(Debug, Error)]
pub enum VigiaError {
    /// The user refused location access outright.
    #[error("location permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// Location access was granted, but not for background use.
    #[error("background location permission denied: scope is '{scope}', expected 'always'")]
    BackgroundPermissionDenied { scope: String },

    /// The platform could not produce a position fix or start updates.
    #[error("location unavailable: {reason}")]
    LocationUnavailable { reason: String },

    /// The telephony collaborator failed to open a `tel:` link.
    #[error("could not dial '{number}': {reason}")]
    DialFailed { number: String, reason: String },

    /// A raw identifier fell outside one of the closed questionnaire sets.
    #[error("unknown {category} identifier '{id}'")]
    UnknownIdentifier { category: String, id: String },

    /// Submit was requested while the completeness predicate was false.
    #[error("submission unavailable: {reason}")]
    SubmitUnavailable { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The location hub was shut down or its state is unusable.
    #[error("location hub unavailable: {reason}")]
    HubShutdown { reason: String },

    /// A hub subscriber rejected a sample.
    #[error("subscriber failed: {reason}")]
    SubscriberFailed { reason: String },
}

/// Convenience alias used throughout the VIGIA crates.
pub type VigiaResult<T> = Result<T, VigiaError>;
