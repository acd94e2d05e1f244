//! The classifier used by the reachable submission path.

use tracing::debug;

use vigia_contracts::{answer::AnswerRecord, outcome::ClassificationOutcome};

use crate::traits::Classifier;

/// Maps every record to one configured outcome, ignoring its contents.
///
/// The default outcome is `Negative` (high risk). No scoring rule exists yet
/// for `Positive` or `Neutral`; they are only reachable by configuring them
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOutcomeClassifier {
    outcome: ClassificationOutcome,
}

impl FixedOutcomeClassifier {
    pub fn new(outcome: ClassificationOutcome) -> Self {
        Self { outcome }
    }

    pub fn outcome(&self) -> ClassificationOutcome {
        self.outcome
    }
}

impl Default for FixedOutcomeClassifier {
    fn default() -> Self {
        Self::new(ClassificationOutcome::Negative)
    }
}

impl Classifier for FixedOutcomeClassifier {
    fn classify(&self, record: &AnswerRecord) -> ClassificationOutcome {
        debug!(
            outcome = %self.outcome,
            symptoms = record.symptoms.len(),
            illnesses = record.illnesses.len(),
            "classifying with fixed outcome"
        );
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use vigia_contracts::answer::{Answer, AnswerRecord, Symptom};
    use vigia_contracts::outcome::ClassificationOutcome;

    use super::FixedOutcomeClassifier;
    use crate::traits::Classifier;

    #[test]
    fn default_classifier_always_returns_negative() {
        let classifier = FixedOutcomeClassifier::default();

        let empty = AnswerRecord::default();
        let mut full = AnswerRecord::default();
        full.symptoms.insert(Symptom::Fever, true);
        full.travel = Some(Answer::No);
        full.age = Some("80".to_string());

        assert_eq!(classifier.classify(&empty), ClassificationOutcome::Negative);
        assert_eq!(classifier.classify(&full), ClassificationOutcome::Negative);
    }

    #[test]
    fn configured_outcome_is_returned_verbatim() {
        let classifier = FixedOutcomeClassifier::new(ClassificationOutcome::Neutral);
        assert_eq!(classifier.outcome(), ClassificationOutcome::Neutral);
        assert_eq!(
            classifier.classify(&AnswerRecord::default()),
            ClassificationOutcome::Neutral
        );
    }
}
