//! Classification outcomes and the diagnosis record produced at submission.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VigiaError;

/// Unique identifier for one questionnaire session.
///
/// A new id is minted every time the questionnaire is (re)started, so a
/// retake never shares an id with the attempt before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The risk tier assigned at submission.
///
/// The names read inversely to risk: `Positive` means no risk was detected
/// and `Negative` means high risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationOutcome {
    /// No risk detected.
    Positive,
    /// Moderate risk.
    Neutral,
    /// High risk.
    Negative,
}

impl ClassificationOutcome {
    pub const ALL: [ClassificationOutcome; 3] = [
        ClassificationOutcome::Positive,
        ClassificationOutcome::Neutral,
        ClassificationOutcome::Negative,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ClassificationOutcome::Positive => "positive",
            ClassificationOutcome::Neutral => "neutral",
            ClassificationOutcome::Negative => "negative",
        }
    }

    /// The risk tier in plain words.
    pub fn risk_label(self) -> &'static str {
        match self {
            ClassificationOutcome::Positive => "NO RISK",
            ClassificationOutcome::Neutral => "MODERATE RISK",
            ClassificationOutcome::Negative => "HIGH RISK",
        }
    }
}

impl FromStr for ClassificationOutcome {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassificationOutcome::ALL
            .into_iter()
            .find(|outcome| outcome.id() == s)
            .ok_or_else(|| VigiaError::UnknownIdentifier {
                category: "outcome".to_string(),
                id: s.to_string(),
            })
    }
}

impl fmt::Display for ClassificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What a submission produces. Never stored or transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub session_id: SessionId,
    pub outcome: ClassificationOutcome,
    pub assessed_at: DateTime<Utc>,
}
