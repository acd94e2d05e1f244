//! The self-diagnosis screen.
//!
//! Two views share the screen: the questionnaire, and the results card for a
//! submitted diagnosis. Submitting swaps to the results; retaking swaps back
//! with a fresh session.

use std::sync::Arc;

use tracing::{info, warn};

use vigia_config::{AppConfig, EmergencyContact};
use vigia_contracts::{
    answer::{AnswerRecord, AnswerUpdate, Selection},
    error::{VigiaError, VigiaResult},
    outcome::Diagnosis,
};
use vigia_core::{
    traits::{Classifier, Dialer, Navigator, Route},
    FixedOutcomeClassifier, QuestionnaireSession,
};

use crate::{
    screens::{advice::AdviceView, user_message},
    telephony,
};

/// Which half of the screen is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticView {
    Questionnaire,
    Results(Diagnosis),
}

pub struct DiagnosticScreen {
    view: DiagnosticView,
    session: QuestionnaireSession,
    classifier: Box<dyn Classifier>,
    navigator: Arc<dyn Navigator>,
    dialer: Arc<dyn Dialer>,
    config: AppConfig,
    alert: Option<&'static str>,
}

impl DiagnosticScreen {
    /// A screen classifying with the outcome fixed in `config`.
    pub fn new(config: AppConfig, navigator: Arc<dyn Navigator>, dialer: Arc<dyn Dialer>) -> Self {
        let classifier = FixedOutcomeClassifier::new(config.classification.outcome);
        Self::with_classifier(config, Box::new(classifier), navigator, dialer)
    }

    pub fn with_classifier(
        config: AppConfig,
        classifier: Box<dyn Classifier>,
        navigator: Arc<dyn Navigator>,
        dialer: Arc<dyn Dialer>,
    ) -> Self {
        Self {
            view: DiagnosticView::Questionnaire,
            session: QuestionnaireSession::new(),
            classifier,
            navigator,
            dialer,
            config,
            alert: None,
        }
    }

    pub fn view(&self) -> &DiagnosticView {
        &self.view
    }

    pub fn record(&self) -> &AnswerRecord {
        self.session.record()
    }

    pub fn session(&self) -> &QuestionnaireSession {
        &self.session
    }

    pub fn toggle(&mut self, selection: Selection) -> bool {
        self.session.toggle(selection)
    }

    pub fn set_answer(&mut self, update: AnswerUpdate) {
        self.session.set_answer(update);
    }

    /// Whether the submit button is on screen.
    pub fn submit_visible(&self) -> bool {
        self.view == DiagnosticView::Questionnaire && self.session.submit_available()
    }

    /// Classify the answers and switch to the results view.
    pub fn submit(&mut self) -> VigiaResult<Diagnosis> {
        if let DiagnosticView::Results(_) = self.view {
            return Err(VigiaError::SubmitUnavailable {
                reason: "results are already showing".to_string(),
            });
        }
        let diagnosis = self.session.submit(self.classifier.as_ref())?;
        self.view = DiagnosticView::Results(diagnosis.clone());
        Ok(diagnosis)
    }

    /// The results card. `None` while the questionnaire is showing.
    pub fn advice(&self) -> Option<AdviceView> {
        match &self.view {
            DiagnosticView::Results(diagnosis) => {
                Some(AdviceView::for_outcome(diagnosis.outcome, &self.config))
            }
            DiagnosticView::Questionnaire => None,
        }
    }

    /// Back to an empty questionnaire under a new session.
    pub fn retake(&mut self) {
        let previous = self.session.id();
        self.session.reset();
        self.view = DiagnosticView::Questionnaire;
        self.alert = None;
        info!(previous = %previous, session_id = %self.session.id(), "questionnaire retaken");
    }

    pub fn open_prevention(&self) {
        self.navigator.navigate(Route::Prevention);
    }

    /// Dial the `index`th contact on the results card.
    ///
    /// A failed call raises the screen's alert as well as returning the error.
    pub fn call(&mut self, index: usize) -> VigiaResult<()> {
        let contact = self.contact(index)?;
        telephony::dial(self.dialer.as_ref(), &contact).inspect_err(|e| {
            self.alert = Some(user_message(e));
        })
    }

    fn contact(&self, index: usize) -> VigiaResult<EmergencyContact> {
        self.advice()
            .and_then(|advice| advice.contacts.into_iter().nth(index))
            .ok_or_else(|| {
                warn!(index, "no contact at index");
                VigiaError::UnknownIdentifier {
                    category: "contact".to_string(),
                    id: index.to_string(),
                }
            })
    }

    pub fn alert(&self) -> Option<&'static str> {
        self.alert
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}
