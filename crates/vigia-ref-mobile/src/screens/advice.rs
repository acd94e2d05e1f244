//! The three result views, one per classification outcome.

use serde::Serialize;

use vigia_config::{AppConfig, EmergencyContact};
use vigia_contracts::outcome::ClassificationOutcome;

const PREVENTION_PITCH: &str = "Please review the list of prevention measures to avoid \
     infection, and share this information with others.";

const RETAKE_HINT: &str = "If your symptoms change, take the self-diagnosis again and \
     follow the recommendations given.";

/// What the results card shows for one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceView {
    pub outcome: ClassificationOutcome,
    pub title: &'static str,
    pub message: String,
    /// Numbers to call. Only the high-risk view lists any.
    pub contacts: Vec<EmergencyContact>,
    pub retake_hint: &'static str,
}

impl AdviceView {
    pub fn for_outcome(outcome: ClassificationOutcome, config: &AppConfig) -> Self {
        let (message, contacts) = match outcome {
            ClassificationOutcome::Positive => (
                format!(
                    "You have no symptoms that could be linked to coronavirus, and no \
                     likely exposure to infected people.\n\n{}",
                    PREVENTION_PITCH
                ),
                Vec::new(),
            ),
            ClassificationOutcome::Neutral => (
                format!(
                    "Some of your symptoms may be associated with coronavirus but are not \
                     conclusive enough to determine whether you are infected.\n\n{}",
                    PREVENTION_PITCH
                ),
                Vec::new(),
            ),
            ClassificationOutcome::Negative => (
                "It is very possible that you have been infected with coronavirus.\n\n\
                 You can call one of the following official numbers to learn how to \
                 proceed and receive medical and psychological assistance:"
                    .to_string(),
                config.emergency_contacts.clone(),
            ),
        };

        Self {
            outcome,
            title: outcome.risk_label(),
            message,
            contacts,
            retake_hint: RETAKE_HINT,
        }
    }
}

#[cfg(test)]
mod tests {
    use vigia_config::AppConfig;
    use vigia_contracts::outcome::ClassificationOutcome;

    use super::AdviceView;

    #[test]
    fn only_high_risk_view_lists_contacts() {
        let config = AppConfig::default();
        let positive = AdviceView::for_outcome(ClassificationOutcome::Positive, &config);
        let neutral = AdviceView::for_outcome(ClassificationOutcome::Neutral, &config);
        let negative = AdviceView::for_outcome(ClassificationOutcome::Negative, &config);

        assert!(positive.contacts.is_empty());
        assert!(neutral.contacts.is_empty());
        assert_eq!(negative.contacts, config.emergency_contacts);
    }

    #[test]
    fn titles_follow_risk_labels() {
        let config = AppConfig::default();
        for outcome in ClassificationOutcome::ALL {
            let view = AdviceView::for_outcome(outcome, &config);
            assert_eq!(view.title, outcome.risk_label());
            assert_eq!(view.outcome, outcome);
        }
    }

    #[test]
    fn low_and_moderate_views_pitch_prevention() {
        let config = AppConfig::default();
        let view = AdviceView::for_outcome(ClassificationOutcome::Neutral, &config);
        assert!(view.message.contains("prevention measures"));
        assert!(view.message.contains("not conclusive"));
    }
}
