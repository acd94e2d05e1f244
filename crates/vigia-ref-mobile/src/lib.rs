//! # vigia-ref-mobile
//!
//! Reference screens for VIGIA, written as view models over simulated
//! platform services:
//!
//! 1. **Self-diagnosis**: the questionnaire, its results card and the
//!    emergency numbers offered on a high-risk result.
//! 2. **Map tracking**: permission check, first fix, background updates
//!    routed through the location hub, and the alert zones around the user.
//! 3. **Location alerts**: the same tracking behind a plain status line.
//!
//! No device API is touched; `mock_platform` stands in for the phone.

pub mod mock_platform;
pub mod scenarios;
pub mod screens;
pub mod telephony;
pub mod tracking;
