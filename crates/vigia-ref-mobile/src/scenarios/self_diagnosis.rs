//! Scenario 1: Self-diagnosis
//!
//! Fills in the questionnaire one answer at a time, showing when the submit
//! button appears, then submits, prints the results card, dials the first
//! listed number and retakes.

use std::sync::Arc;

use vigia_config::AppConfig;
use vigia_contracts::{
    answer::{Answer, AnswerUpdate, ContactQuestion, Illness, Selection, Symptom},
    error::VigiaResult,
    outcome::Diagnosis,
};

use crate::{
    mock_platform::{MockDialer, RecordingNavigator},
    screens::{advice::AdviceView, diagnostic::DiagnosticScreen},
    telephony::tel_url,
};

/// A scripted set of answers, applied in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosisScript {
    pub selections: Vec<Selection>,
    pub answers: Vec<AnswerUpdate>,
}

impl DiagnosisScript {
    /// Fever and a cough, a respiratory condition, one suspected contact, age 42.
    pub fn sample() -> Self {
        Self {
            selections: vec![
                Selection::Symptom(Symptom::Fever),
                Selection::Symptom(Symptom::Cough),
                Selection::Illness(Illness::Respiratory),
            ],
            answers: vec![
                AnswerUpdate::Contact(ContactQuestion::Travel, Answer::No),
                AnswerUpdate::Contact(ContactQuestion::ConfirmedContact, Answer::No),
                AnswerUpdate::Contact(ContactQuestion::SuspectedContact, Answer::Yes),
                AnswerUpdate::Age("42".to_string()),
            ],
        }
    }
}

/// Apply `script` to a fresh screen and submit if the questionnaire ends up
/// complete. Returns the diagnosis, or `None` when submit never appeared.
pub fn run_script(config: &AppConfig, script: &DiagnosisScript) -> VigiaResult<Option<Diagnosis>> {
    let mut screen = DiagnosticScreen::new(
        config.clone(),
        Arc::new(RecordingNavigator::new()),
        Arc::new(MockDialer::new()),
    );
    walk(&mut screen, script)
}

fn walk(screen: &mut DiagnosticScreen, script: &DiagnosisScript) -> VigiaResult<Option<Diagnosis>> {
    for selection in &script.selections {
        let selected = screen.toggle(*selection);
        println!(
            "  [{}] {:<40} submit: {}",
            if selected { "x" } else { " " },
            selection_label(selection),
            visibility(screen.submit_visible())
        );
    }
    for update in &script.answers {
        screen.set_answer(update.clone());
        println!(
            "  {:<44} submit: {}",
            update_label(update),
            visibility(screen.submit_visible())
        );
    }
    println!();

    if !screen.submit_visible() {
        println!("  Questionnaire incomplete; submit is not offered.");
        return Ok(None);
    }

    let diagnosis = screen.submit()?;
    println!("  Session:    {}", diagnosis.session_id);
    println!("  Assessed:   {}", diagnosis.assessed_at.to_rfc3339());
    if let Some(advice) = screen.advice() {
        print_advice(&advice);
    }
    Ok(Some(diagnosis))
}

/// Run Scenario 1: Self-diagnosis.
pub fn run_scenario(config: &AppConfig) -> VigiaResult<()> {
    println!("=== Scenario 1: Self-diagnosis ===");
    println!();

    let navigator = Arc::new(RecordingNavigator::new());
    let dialer = Arc::new(MockDialer::new());
    let mut screen = DiagnosticScreen::new(config.clone(), navigator.clone(), dialer.clone());

    if walk(&mut screen, &DiagnosisScript::sample())?.is_none() {
        return Ok(());
    }

    screen.open_prevention();
    println!("  Prevention link opened:  {:?}", navigator.routes());

    if screen.advice().is_some_and(|advice| !advice.contacts.is_empty()) {
        screen.call(0)?;
        println!("  First number dialled:    {}", dialer.dialled().join(", "));
    }

    let previous = screen.session().id();
    screen.retake();
    println!(
        "  Retake:                  new session {} (was {})",
        screen.session().id(),
        previous
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}

/// Print a results card the way the screen lays it out.
pub fn print_advice(advice: &AdviceView) {
    println!();
    println!("  ── {} ──", advice.title);
    for line in advice.message.lines() {
        println!("  {}", line);
    }
    for contact in &advice.contacts {
        match &contact.note {
            Some(note) => println!(
                "    {} ({}, {})  {}",
                contact.number, note, contact.label, tel_url(&contact.number)
            ),
            None => println!(
                "    {} ({})  {}",
                contact.number, contact.label, tel_url(&contact.number)
            ),
        }
    }
    println!("  {}", advice.retake_hint);
    println!();
}

fn visibility(visible: bool) -> &'static str {
    if visible {
        "shown"
    } else {
        "hidden"
    }
}

fn selection_label(selection: &Selection) -> String {
    match selection {
        Selection::Symptom(symptom) => format!("symptom: {}", symptom.label()),
        Selection::Illness(illness) => format!("condition: {}", illness.label()),
    }
}

fn update_label(update: &AnswerUpdate) -> String {
    match update {
        AnswerUpdate::Contact(question, answer) => format!("{:?} = {}", question, answer),
        AnswerUpdate::Age(text) => format!("age = {:?}", text),
    }
}
