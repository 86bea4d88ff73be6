//! The four personality factors and the adjective lookup that feeds them.
//!
//! Answers are tallied additively: an "Expected" answer adds 1 to its factor,
//! a "Self-description" answer adds 2. Tallies are never normalised by answer
//! count, so they are only comparable against reference profile scores.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Factor {
    Dominance,
    Extraversion,
    Patience,
    Formality,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Dominance => "Dominance",
            Factor::Extraversion => "Extraversion",
            Factor::Patience => "Patience",
            Factor::Formality => "Formality",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Factor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dominance" => Ok(Factor::Dominance),
            "Extraversion" => Ok(Factor::Extraversion),
            "Patience" => Ok(Factor::Patience),
            "Formality" => Ok(Factor::Formality),
            other => Err(format!("unknown factor '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuestionType {
    /// How the user believes others expect them to behave.
    Expected,
    /// How the user describes themselves. Weighted double.
    #[serde(rename = "Self-description")]
    SelfDescription,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Expected => "Expected",
            QuestionType::SelfDescription => "Self-description",
        }
    }

    pub fn weight(&self) -> i64 {
        match self {
            QuestionType::Expected => 1,
            QuestionType::SelfDescription => 2,
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Expected" => Ok(QuestionType::Expected),
            "Self-description" => Ok(QuestionType::SelfDescription),
            other => Err(format!("unknown question type '{other}'")),
        }
    }
}

const ADJECTIVE_FACTORS: &[(&str, Factor)] = &[
    // Dominance
    ("assertive", Factor::Dominance),
    ("confident", Factor::Dominance),
    ("decisive", Factor::Dominance),
    ("ambitious", Factor::Dominance),
    ("bold", Factor::Dominance),
    ("commanding", Factor::Dominance),
    ("competitive", Factor::Dominance),
    ("determined", Factor::Dominance),
    ("independent", Factor::Dominance),
    ("fast-paced", Factor::Dominance),
    ("achievement", Factor::Dominance),
    // Extraversion
    ("sociable", Factor::Extraversion),
    ("outgoing", Factor::Extraversion),
    ("friendly", Factor::Extraversion),
    ("communicative", Factor::Extraversion),
    ("enthusiastic", Factor::Extraversion),
    ("persuasive", Factor::Extraversion),
    ("lively", Factor::Extraversion),
    ("talkative", Factor::Extraversion),
    ("engaging", Factor::Extraversion),
    ("energetic", Factor::Extraversion),
    ("teamwork", Factor::Extraversion),
    // Patience
    ("calm", Factor::Patience),
    ("steady", Factor::Patience),
    ("patient", Factor::Patience),
    ("consistent", Factor::Patience),
    ("reliable", Factor::Patience),
    ("composed", Factor::Patience),
    ("accommodating", Factor::Patience),
    ("predictable", Factor::Patience),
    ("supportive", Factor::Patience),
    ("stable", Factor::Patience),
    ("consistency", Factor::Patience),
    // Formality
    ("structured", Factor::Formality),
    ("precise", Factor::Formality),
    ("detail-oriented", Factor::Formality),
    ("methodical", Factor::Formality),
    ("organized", Factor::Formality),
    ("careful", Factor::Formality),
    ("disciplined", Factor::Formality),
    ("conscientious", Factor::Formality),
    ("rule-following", Factor::Formality),
    ("excellence", Factor::Formality),
    ("collaborative", Factor::Formality),
];

fn adjective_table() -> &'static HashMap<&'static str, Factor> {
    static TABLE: OnceLock<HashMap<&'static str, Factor>> = OnceLock::new();
    TABLE.get_or_init(|| ADJECTIVE_FACTORS.iter().copied().collect())
}

/// Maps a questionnaire adjective to its factor.
/// Unknown adjectives fall back to `Dominance` with a warning.
pub fn factor_for_adjective(adjective: &str) -> Factor {
    let key = adjective.trim().to_lowercase();
    match adjective_table().get(key.as_str()) {
        Some(factor) => *factor,
        None => {
            warn!("Unknown adjective encountered: {key}");
            Factor::Dominance
        }
    }
}

/// Accumulated per-factor score for one user.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FactorTally {
    pub dominance: i64,
    pub extraversion: i64,
    pub patience: i64,
    pub formality: i64,
}

impl FactorTally {
    pub fn from_answers<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = (Factor, QuestionType)>,
    {
        let mut tally = FactorTally::default();
        for (factor, question_type) in answers {
            tally.add(factor, question_type);
        }
        tally
    }

    pub fn add(&mut self, factor: Factor, question_type: QuestionType) {
        let slot = match factor {
            Factor::Dominance => &mut self.dominance,
            Factor::Extraversion => &mut self.extraversion,
            Factor::Patience => &mut self.patience,
            Factor::Formality => &mut self.formality,
        };
        *slot += question_type.weight();
    }

    /// Euclidean distance to a point given as [dominance, extraversion, patience, formality].
    pub fn distance_to(&self, scores: [f64; 4]) -> f64 {
        euclidean(self.as_point(), scores)
    }

    pub fn as_point(&self) -> [f64; 4] {
        [
            self.dominance as f64,
            self.extraversion as f64,
            self.patience as f64,
            self.formality as f64,
        ]
    }
}

pub fn euclidean(a: [f64; 4], b: [f64; 4]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_adjectives_map_to_their_factor() {
        assert_eq!(factor_for_adjective("assertive"), Factor::Dominance);
        assert_eq!(factor_for_adjective("talkative"), Factor::Extraversion);
        assert_eq!(factor_for_adjective("calm"), Factor::Patience);
        assert_eq!(factor_for_adjective("methodical"), Factor::Formality);
    }

    #[test]
    fn test_adjective_lookup_ignores_case_and_whitespace() {
        assert_eq!(factor_for_adjective("  Detail-Oriented "), Factor::Formality);
        assert_eq!(factor_for_adjective("SOCIABLE"), Factor::Extraversion);
    }

    #[test]
    fn test_unknown_adjective_defaults_to_dominance() {
        assert_eq!(factor_for_adjective("zany"), Factor::Dominance);
        assert_eq!(factor_for_adjective(""), Factor::Dominance);
    }

    #[test]
    fn test_table_has_eleven_adjectives_per_factor() {
        for factor in [
            Factor::Dominance,
            Factor::Extraversion,
            Factor::Patience,
            Factor::Formality,
        ] {
            let count = ADJECTIVE_FACTORS.iter().filter(|(_, f)| *f == factor).count();
            assert_eq!(count, 11, "{factor} has {count} adjectives");
        }
        assert_eq!(adjective_table().len(), ADJECTIVE_FACTORS.len());
    }

    #[test]
    fn test_tally_weights_self_description_double() {
        let tally = FactorTally::from_answers(vec![
            (Factor::Dominance, QuestionType::Expected),
            (Factor::Dominance, QuestionType::SelfDescription),
            (Factor::Extraversion, QuestionType::Expected),
        ]);
        assert_eq!(
            tally,
            FactorTally {
                dominance: 3,
                extraversion: 1,
                patience: 0,
                formality: 0
            }
        );
    }

    #[test]
    fn test_tally_of_nothing_is_zero() {
        let tally = FactorTally::from_answers(Vec::new());
        assert_eq!(tally, FactorTally::default());
    }

    #[test]
    fn test_distance_matches_hand_computation() {
        let tally = FactorTally {
            dominance: 3,
            extraversion: 1,
            patience: 0,
            formality: 0,
        };
        let d = tally.distance_to([5.0, 4.0, 7.0, 9.0]);
        assert!((d - 143f64.sqrt()).abs() < 1e-9, "distance was {d}");
    }

    #[test]
    fn test_question_type_serde_names() {
        let qt: QuestionType = serde_json::from_str("\"Self-description\"").unwrap();
        assert_eq!(qt, QuestionType::SelfDescription);
        assert_eq!(serde_json::to_string(&QuestionType::Expected).unwrap(), "\"Expected\"");
        assert!(serde_json::from_str::<QuestionType>("\"Other\"").is_err());
    }

    #[test]
    fn test_factor_str_round_trip() {
        for factor in [Factor::Dominance, Factor::Formality] {
            assert_eq!(factor.as_str().parse::<Factor>().unwrap(), factor);
        }
        assert!("Openness".parse::<Factor>().is_err());
    }
}
