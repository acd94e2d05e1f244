//! Runnable walk-throughs of the reference screens.
//!
//! Each scenario wires the screens to the simulated platform and prints what
//! a user would see at every step.

pub mod location_alerts;
pub mod map_tracking;
pub mod self_diagnosis;
