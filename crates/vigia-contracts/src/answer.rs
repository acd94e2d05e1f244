//! Questionnaire answer types.
//!
//! An `AnswerRecord` is the accumulation of one questionnaire session. It is
//! always a valid value: every field starts out unanswered and is only ever
//! overwritten. Symptom and illness selections are lazy maps, so a key that
//! was never toggled is absent, which reads the same as `false`.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::VigiaError;

/// A symptom the user can tick on the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symptom {
    Fever,
    Cough,
    SoreThroat,
    BreathingDifficulty,
    Headache,
    Gastrointestinal,
    Fatigue,
}

impl Symptom {
    /// Every symptom, in the order the questionnaire presents them.
    pub const ALL: [Symptom; 7] = [
        Symptom::Fever,
        Symptom::Cough,
        Symptom::SoreThroat,
        Symptom::BreathingDifficulty,
        Symptom::Headache,
        Symptom::Gastrointestinal,
        Symptom::Fatigue,
    ];

    /// Stable identifier, matching the serde representation.
    pub fn id(self) -> &'static str {
        match self {
            Symptom::Fever => "fever",
            Symptom::Cough => "cough",
            Symptom::SoreThroat => "sore-throat",
            Symptom::BreathingDifficulty => "breathing-difficulty",
            Symptom::Headache => "headache",
            Symptom::Gastrointestinal => "gastrointestinal",
            Symptom::Fatigue => "fatigue",
        }
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Symptom::Fever => "Fever",
            Symptom::Cough => "Dry cough",
            Symptom::SoreThroat => "Sore throat",
            Symptom::BreathingDifficulty => "Difficulty breathing",
            Symptom::Headache => "Headache",
            Symptom::Gastrointestinal => "Upset stomach or diarrhea",
            Symptom::Fatigue => "General tiredness",
        }
    }
}

impl FromStr for Symptom {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symptom::ALL
            .into_iter()
            .find(|symptom| symptom.id() == s)
            .ok_or_else(|| VigiaError::UnknownIdentifier {
                category: "symptom".to_string(),
                id: s.to_string(),
            })
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A pre-existing condition the user can tick on the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Illness {
    Cancer,
    Cholesterol,
    Diabetes,
    Cardiovascular,
    Respiratory,
    MultipleSclerosis,
    Hypertension,
    ThyroidDisorder,
}

impl Illness {
    /// Every condition, in the order the questionnaire presents them.
    pub const ALL: [Illness; 8] = [
        Illness::Cancer,
        Illness::Cholesterol,
        Illness::Diabetes,
        Illness::Cardiovascular,
        Illness::Respiratory,
        Illness::MultipleSclerosis,
        Illness::Hypertension,
        Illness::ThyroidDisorder,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Illness::Cancer => "cancer",
            Illness::Cholesterol => "cholesterol",
            Illness::Diabetes => "diabetes",
            Illness::Cardiovascular => "cardiovascular",
            Illness::Respiratory => "respiratory",
            Illness::MultipleSclerosis => "multiple-sclerosis",
            Illness::Hypertension => "hypertension",
            Illness::ThyroidDisorder => "thyroid-disorder",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Illness::Cancer => "Cancer",
            Illness::Cholesterol => "Cholesterol",
            Illness::Diabetes => "Diabetes",
            Illness::Cardiovascular => "Cardiovascular disease",
            Illness::Respiratory => "Respiratory disease",
            Illness::MultipleSclerosis => "Multiple sclerosis",
            Illness::Hypertension => "High blood pressure",
            Illness::ThyroidDisorder => "Hypo- or hyperthyroidism",
        }
    }
}

impl FromStr for Illness {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Illness::ALL
            .into_iter()
            .find(|illness| illness.id() == s)
            .ok_or_else(|| VigiaError::UnknownIdentifier {
                category: "illness".to_string(),
                id: s.to_string(),
            })
    }
}

impl fmt::Display for Illness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One checkbox on the questionnaire: either a symptom or an illness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "id", rename_all = "kebab-case")]
pub enum Selection {
    Symptom(Symptom),
    Illness(Illness),
}

impl Selection {
    /// Parse a raw `(category, id)` pair coming from outside the engine.
    ///
    /// `category` must be `"symptom"` or `"illness"`; `id` must belong to the
    /// matching closed set.
    pub fn parse(category: &str, id: &str) -> Result<Self, VigiaError> {
        match category {
            "symptom" => Ok(Selection::Symptom(id.parse()?)),
            "illness" => Ok(Selection::Illness(id.parse()?)),
            other => Err(VigiaError::UnknownIdentifier {
                category: "category".to_string(),
                id: other.to_string(),
            }),
        }
    }
}

/// A yes/no answer. `Option<Answer>` is the tri-state with `None` = unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl FromStr for Answer {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "si" | "sí" => Ok(Answer::Yes),
            "no" | "n" => Ok(Answer::No),
            _ => Err(VigiaError::UnknownIdentifier {
                category: "answer".to_string(),
                id: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Yes => f.write_str("yes"),
            Answer::No => f.write_str("no"),
        }
    }
}

/// The three yes/no questions about travel and contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactQuestion {
    /// Returned from a country with confirmed cases.
    Travel,
    /// Contact with a confirmed case.
    ConfirmedContact,
    /// Contact with a suspected case.
    SuspectedContact,
}

impl ContactQuestion {
    pub const ALL: [ContactQuestion; 3] = [
        ContactQuestion::Travel,
        ContactQuestion::ConfirmedContact,
        ContactQuestion::SuspectedContact,
    ];

    pub fn prompt(self) -> &'static str {
        match self {
            ContactQuestion::Travel => {
                "Did you return from a country with confirmed coronavirus cases?"
            }
            ContactQuestion::ConfirmedContact => {
                "Were you in contact with someone confirmed as infected?"
            }
            ContactQuestion::SuspectedContact => {
                "Were you in contact with someone you suspect is infected?"
            }
        }
    }
}

/// A single overwrite of one answer field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerUpdate {
    Contact(ContactQuestion, Answer),
    /// Raw age text as typed. Not validated here.
    Age(String),
}

/// The mutable record of one questionnaire session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub symptoms: BTreeMap<Symptom, bool>,
    pub illnesses: BTreeMap<Illness, bool>,
    pub travel: Option<Answer>,
    pub confirmed_contact: Option<Answer>,
    pub suspected_contact: Option<Answer>,
    pub age: Option<String>,
}

impl AnswerRecord {
    /// True if `selection` is currently ticked. Absent keys read as `false`.
    pub fn is_selected(&self, selection: Selection) -> bool {
        match selection {
            Selection::Symptom(s) => self.symptoms.get(&s).copied().unwrap_or(false),
            Selection::Illness(i) => self.illnesses.get(&i).copied().unwrap_or(false),
        }
    }

    pub fn has_any_symptom(&self) -> bool {
        self.symptoms.values().any(|selected| *selected)
    }

    pub fn has_any_illness(&self) -> bool {
        self.illnesses.values().any(|selected| *selected)
    }

    /// The stored answer for one of the contact questions.
    pub fn contact(&self, question: ContactQuestion) -> Option<Answer> {
        match question {
            ContactQuestion::Travel => self.travel,
            ContactQuestion::ConfirmedContact => self.confirmed_contact,
            ContactQuestion::SuspectedContact => self.suspected_contact,
        }
    }

    pub fn contacts_answered(&self) -> bool {
        ContactQuestion::ALL
            .into_iter()
            .all(|question| self.contact(question).is_some())
    }

    /// The age text interpreted as a number, if it is one.
    ///
    /// Surrounding whitespace is ignored. Anything that does not parse as a
    /// finite number yields `None`.
    pub fn numeric_age(&self) -> Option<f64> {
        self.age
            .as_deref()
            .and_then(|text| text.trim().parse::<f64>().ok())
            .filter(|age| age.is_finite())
    }
}
