//! # vigia-core
//!
//! The questionnaire engine and the collaborator traits for VIGIA.
//!
//! This crate provides:
//! - The collaborator traits (`Classifier`, `LocationSink`, `LocationProvider`,
//!   `Dialer`, `Navigator`)
//! - `QuestionnaireSession`, which accumulates answers and tracks whether
//!   the questionnaire can be submitted
//! - `FixedOutcomeClassifier`, the classifier behind the submit button
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigia_core::{FixedOutcomeClassifier, QuestionnaireSession};
//!
//! let mut session = QuestionnaireSession::new();
//! session.toggle(Selection::Symptom(Symptom::Fever));
//! if session.submit_available() {
//!     let diagnosis = session.submit(&FixedOutcomeClassifier::default())?;
//! }
//! ```

pub mod classifier;
pub mod questionnaire;
pub mod traits;

pub use classifier::FixedOutcomeClassifier;
pub use questionnaire::{evaluate_completeness, QuestionnaireSession};
