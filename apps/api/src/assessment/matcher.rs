//! Profile matching: nearest reference profile to a user's factor tally.

use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::factors::{Factor, FactorTally, QuestionType};
use crate::models::profile::{BehavioralAssessmentRow, ReferenceProfileRow};

impl ReferenceProfileRow {
    pub fn scores(&self) -> [f64; 4] {
        [
            self.dominance as f64,
            self.extraversion as f64,
            self.patience as f64,
            self.formality as f64,
        ]
    }
}

/// Returns the profile closest to `tally`. Ties keep the first profile in slice order.
pub fn match_reference_profile<'a>(
    tally: &FactorTally,
    profiles: &'a [ReferenceProfileRow],
) -> Option<&'a ReferenceProfileRow> {
    let mut best: Option<&ReferenceProfileRow> = None;
    let mut lowest = f64::INFINITY;

    for profile in profiles {
        let distance = tally.distance_to(profile.scores());
        if distance < lowest {
            lowest = distance;
            best = Some(profile);
        }
    }

    best
}

/// Tallies stored answers. Rows whose factor or question type no longer parse are skipped.
pub fn tally_assessments(rows: &[BehavioralAssessmentRow]) -> FactorTally {
    FactorTally::from_answers(rows.iter().filter_map(|row| {
        let factor = row.factor.parse::<Factor>();
        let question_type = row.question_type.parse::<QuestionType>();
        match (factor, question_type) {
            (Ok(f), Ok(q)) => Some((f, q)),
            _ => {
                warn!("Skipping malformed assessment row {}", row.id);
                None
            }
        }
    }))
}

/// Picks the reference profile for a user's answers.
/// Returns `None` (with a warning) when there are no answers or no profiles.
pub fn calculate_reference_profile(
    user_id: Uuid,
    assessments: &[BehavioralAssessmentRow],
    profiles: &[ReferenceProfileRow],
) -> Option<i32> {
    if assessments.is_empty() {
        warn!("No assessments found for user {user_id}");
        return None;
    }
    if profiles.is_empty() {
        warn!("No reference profiles found in database");
        return None;
    }

    let tally = tally_assessments(assessments);
    match match_reference_profile(&tally, profiles) {
        Some(profile) => {
            info!("Found matching profile {} for user {user_id}", profile.name);
            Some(profile.id)
        }
        None => {
            warn!("No suitable profile found for user {user_id}");
            None
        }
    }
}
