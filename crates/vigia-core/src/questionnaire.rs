//! The questionnaire engine.
//!
//! A `QuestionnaireSession` owns one `AnswerRecord` and keeps the completeness
//! predicate in step with it: every mutation re-evaluates the predicate, so
//! `submit_available()` always reflects the record as it is right now.
//!
//!   toggle / set_answer → record mutated → evaluate_completeness → submit shown or hidden
//!
//! Submission hands the record to a `Classifier` and returns a `Diagnosis`.
//! Nothing about the session outlives it.

use chrono::Utc;
use tracing::{debug, info, warn};

use vigia_contracts::{
    answer::{AnswerRecord, AnswerUpdate, ContactQuestion, Selection},
    error::{VigiaError, VigiaResult},
    outcome::{Diagnosis, SessionId},
};

use crate::traits::Classifier;

/// True iff the record may be submitted.
///
/// All of the following must hold:
/// - at least one symptom is selected
/// - at least one illness is selected
/// - travel, confirmed contact and suspected contact are all answered
/// - the age text parses to a number greater than zero
pub fn evaluate_completeness(record: &AnswerRecord) -> bool {
    record.has_any_symptom()
        && record.has_any_illness()
        && record.contacts_answered()
        && record.numeric_age().is_some_and(|age| age > 0.0)
}

/// Human-readable list of the clauses `record` still fails. Empty when complete.
pub fn missing_requirements(record: &AnswerRecord) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !record.has_any_symptom() {
        missing.push("select at least one symptom");
    }
    if !record.has_any_illness() {
        missing.push("select at least one pre-existing condition");
    }
    for question in ContactQuestion::ALL {
        if record.contact(question).is_none() {
            missing.push(match question {
                ContactQuestion::Travel => "answer the travel question",
                ContactQuestion::ConfirmedContact => "answer the confirmed-contact question",
                ContactQuestion::SuspectedContact => "answer the suspected-contact question",
            });
        }
    }
    if !record.numeric_age().is_some_and(|age| age > 0.0) {
        missing.push("enter an age greater than zero");
    }
    missing
}

/// One questionnaire session: the record plus its derived submit availability.
#[derive(Debug, Clone)]
pub struct QuestionnaireSession {
    id: SessionId,
    record: AnswerRecord,
    submit_available: bool,
}

impl QuestionnaireSession {
    /// Start a fresh session with an empty record.
    pub fn new() -> Self {
        let id = SessionId::new();
        debug!(session_id = %id, "questionnaire session started");
        Self {
            id,
            record: AnswerRecord::default(),
            submit_available: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn record(&self) -> &AnswerRecord {
        &self.record
    }

    /// Whether the submit affordance should currently be shown.
    pub fn submit_available(&self) -> bool {
        self.submit_available
    }

    /// Flip the checkbox for `selection` and return its new value.
    ///
    /// The first toggle of a key inserts it as `true`; later toggles flip it.
    /// No other entry is touched.
    pub fn toggle(&mut self, selection: Selection) -> bool {
        let selected = match selection {
            Selection::Symptom(symptom) => {
                let entry = self.record.symptoms.entry(symptom).or_insert(false);
                *entry = !*entry;
                *entry
            }
            Selection::Illness(illness) => {
                let entry = self.record.illnesses.entry(illness).or_insert(false);
                *entry = !*entry;
                *entry
            }
        };
        debug!(session_id = %self.id, ?selection, selected, "selection toggled");
        self.refresh();
        selected
    }

    /// Overwrite one answer field. Age text is stored exactly as given.
    pub fn set_answer(&mut self, update: AnswerUpdate) {
        match update {
            AnswerUpdate::Contact(question, answer) => {
                debug!(session_id = %self.id, ?question, %answer, "contact answer set");
                match question {
                    ContactQuestion::Travel => self.record.travel = Some(answer),
                    ContactQuestion::ConfirmedContact => {
                        self.record.confirmed_contact = Some(answer)
                    }
                    ContactQuestion::SuspectedContact => {
                        self.record.suspected_contact = Some(answer)
                    }
                }
            }
            AnswerUpdate::Age(text) => {
                debug!(session_id = %self.id, age = %text, "age set");
                self.record.age = Some(text);
            }
        }
        self.refresh();
    }

    /// Classify the record and produce a `Diagnosis`.
    ///
    /// Returns `VigiaError::SubmitUnavailable` while the completeness
    /// predicate is false; the UI never offers submit in that state.
    pub fn submit(&self, classifier: &dyn Classifier) -> VigiaResult<Diagnosis> {
        if !self.submit_available {
            let missing = missing_requirements(&self.record);
            warn!(
                session_id = %self.id,
                missing = missing.len(),
                "submit requested on incomplete questionnaire"
            );
            return Err(VigiaError::SubmitUnavailable {
                reason: missing.join("; "),
            });
        }

        let outcome = classifier.classify(&self.record);
        info!(session_id = %self.id, %outcome, "questionnaire submitted");

        Ok(Diagnosis {
            session_id: self.id,
            outcome,
            assessed_at: Utc::now(),
        })
    }

    /// Discard the record and start over under a new session id.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn refresh(&mut self) {
        let available = evaluate_completeness(&self.record);
        if available != self.submit_available {
            debug!(session_id = %self.id, available, "submit availability changed");
        }
        self.submit_available = available;
    }
}

impl Default for QuestionnaireSession {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
