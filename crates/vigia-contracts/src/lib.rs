//! # vigia-contracts
//!
//! Shared types and error contracts for the VIGIA self-diagnosis core.
//!
//! Every crate in the workspace imports from here. No business logic lives in
//! this crate, only data definitions, boundary parsers and error types.

pub mod answer;
pub mod error;
pub mod location;
pub mod outcome;
