//! Screen view models.
//!
//! Each screen owns the state its UI would render and exposes the actions
//! its buttons would trigger. Rendering itself is left to the host (the TUI
//! and the demo CLI in this workspace).

pub mod advice;
pub mod alerts;
pub mod diagnostic;
pub mod location_view;
pub mod map;

use vigia_contracts::error::VigiaError;

use crate::telephony::DIAL_FAILED_ALERT;

/// The fixed text a screen shows for `error`.
pub fn user_message(error: &VigiaError) -> &'static str {
    match error {
        VigiaError::PermissionDenied { .. } => "Location permission was denied",
        VigiaError::BackgroundPermissionDenied { .. } => {
            "Permission to access location at all times was denied"
        }
        VigiaError::DialFailed { .. } => DIAL_FAILED_ALERT,
        VigiaError::SubmitUnavailable { .. } => "Answer every question to see your result",
        _ => "Oops, could not get your location",
    }
}
