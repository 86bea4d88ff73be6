//! Career scoring. Combines personality closeness with skill overlap.
//!
//! For every dataset row:
//!   personality = 1 - distance(profile, row) / MAX_DISTANCE, clamped to [0, 1]
//!   skills      = |user ∩ listed| / |listed|   (0 when nothing is listed)
//!   score       = 0.7 * personality + 0.3 * skills
//! The best row wins; ties keep the earlier row.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::assessment::factors::euclidean;
use crate::models::profile::ReferenceProfileRow;
use crate::recommendation::dataset::{CareerDataset, CareerRow};

pub const PERSONALITY_WEIGHT: f64 = 0.7;
pub const SKILLS_WEIGHT: f64 = 0.3;

/// Largest distance between two points when every factor lies in 0..=10.
pub const MAX_DISTANCE: f64 = 20.0; // sqrt(4 * 10^2)

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerMatch {
    pub career: String,
    /// Weighted score as a percentage, rounded to two decimals.
    pub rating: f64,
}

/// Fraction of `listed` skills the user has. Zero when `listed` is empty.
pub fn skill_overlap(user_skills: &[String], listed: &[String]) -> f64 {
    let listed: HashSet<&str> = listed.iter().map(|s| s.trim()).collect();
    if listed.is_empty() {
        return 0.0;
    }
    let user: HashSet<&str> = user_skills.iter().map(|s| s.trim()).collect();
    user.intersection(&listed).count() as f64 / listed.len() as f64
}

pub fn personality_score(profile: &ReferenceProfileRow, row: &CareerRow) -> f64 {
    let distance = euclidean(profile.scores(), row.scores());
    (1.0 - distance / MAX_DISTANCE).clamp(0.0, 1.0)
}

pub fn combine(personality: f64, skills: f64) -> f64 {
    PERSONALITY_WEIGHT * personality + SKILLS_WEIGHT * skills
}

pub fn score_career(profile: &ReferenceProfileRow, user_skills: &[String], row: &CareerRow) -> f64 {
    combine(
        personality_score(profile, row),
        skill_overlap(user_skills, &row.key_skills),
    )
}

/// Scans every row and returns the best-scoring career, or `None` for an empty dataset.
pub fn recommend_career(
    profile: &ReferenceProfileRow,
    user_skills: &[String],
    rows: &[CareerRow],
) -> Option<CareerMatch> {
    let mut best: Option<(&CareerRow, f64)> = None;

    for row in rows {
        if !row.scores().iter().all(|s| s.is_finite()) {
            warn!("Skipping career {:?} with a non-finite factor score", row.career);
            continue;
        }
        let score = score_career(profile, user_skills, row);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((row, score)),
        }
    }

    best.map(|(row, score)| CareerMatch {
        career: row.career.clone(),
        rating: to_percentage(score),
    })
}

fn to_percentage(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}

/// Loads the dataset and scores it. Every failure is logged and becomes `None`.
pub async fn career_recommendation(
    dataset: &dyn CareerDataset,
    profile: &ReferenceProfileRow,
    user_skills: &[String],
) -> Option<CareerMatch> {
    let rows = match dataset.load().await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Error in career recommendation: {e}");
            return None;
        }
    };

    match recommend_career(profile, user_skills, &rows) {
        Some(found) => {
            info!(
                "Career prediction for profile {}: {} ({}%)",
                profile.name, found.career, found.rating
            );
            Some(found)
        }
        None => {
            warn!("Career dataset is empty; no recommendation for profile {}", profile.name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::dataset::DatasetError;
    use async_trait::async_trait;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn profile(scores: [i32; 4]) -> ReferenceProfileRow {
        ReferenceProfileRow {
            id: 1,
            name: "Analyst".to_string(),
            description: None,
            dominance: scores[0],
            extraversion: scores[1],
            patience: scores[2],
            formality: scores[3],
        }
    }

    fn row(career: &str, scores: [f64; 4], key_skills: &[&str]) -> CareerRow {
        CareerRow {
            career: career.to_string(),
            dominance: scores[0],
            extraversion: scores[1],
            patience: scores[2],
            formality: scores[3],
            key_skills: skills(key_skills),
        }
    }

    #[test]
    fn test_skill_overlap_uses_listed_denominator() {
        let user = skills(&["Python", "SQL"]);
        let listed = skills(&["Python", "Excel", "SQL"]);
        let overlap = skill_overlap(&user, &listed);
        assert!((overlap - 2.0 / 3.0).abs() < 1e-9, "overlap was {overlap}");
    }

    #[test]
    fn test_skill_overlap_zero_when_listed_empty() {
        assert_eq!(skill_overlap(&skills(&["Python"]), &[]), 0.0);
        assert_eq!(skill_overlap(&[], &[]), 0.0);
    }

    #[test]
    fn test_skill_overlap_is_not_jaccard() {
        // Extra user skills do not dilute the score
        let user = skills(&["Python", "SQL", "Tax", "Welding"]);
        let listed = skills(&["Python", "SQL"]);
        assert_eq!(skill_overlap(&user, &listed), 1.0);
    }

    #[test]
    fn test_skill_overlap_trims_entries() {
        let user = skills(&["Python", "SQL"]);
        let listed = skills(&["Python", " SQL"]);
        assert_eq!(skill_overlap(&user, &listed), 1.0);
    }

    #[test]
    fn test_identical_scores_give_full_personality_match() {
        let p = profile([5, 4, 7, 9]);
        let r = row("Data Scientist", [5.0, 4.0, 7.0, 9.0], &[]);
        assert_eq!(personality_score(&p, &r), 1.0);
    }

    #[test]
    fn test_personality_score_clamped_outside_scale() {
        let p = profile([0, 0, 0, 0]);
        let r = row("Outlier", [30.0, 30.0, 30.0, 30.0], &[]);
        assert_eq!(personality_score(&p, &r), 0.0);
    }

    #[test]
    fn test_weighted_combination() {
        assert!((combine(1.0, 0.0) - 0.7).abs() < 1e-9);
        assert!((combine(0.0, 1.0) - 0.3).abs() < 1e-9);
        assert!((combine(0.5, 0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_monotonic_in_each_component() {
        let steps = [0.0, 0.25, 0.5, 0.75, 1.0];
        for fixed in steps {
            for pair in steps.windows(2) {
                assert!(combine(fixed, pair[0]) <= combine(fixed, pair[1]));
                assert!(combine(pair[0], fixed) <= combine(pair[1], fixed));
            }
        }
    }

    #[test]
    fn test_recommend_picks_highest_score() {
        let p = profile([5, 4, 7, 9]);
        let rows = vec![
            row("Public Defender", [8.0, 7.0, 4.0, 6.0], &["Negotiation"]),
            row("Data Scientist", [5.0, 4.0, 7.0, 9.0], &["Python", "SQL"]),
        ];
        let found = recommend_career(&p, &skills(&["Python", "SQL"]), &rows).unwrap();
        assert_eq!(found.career, "Data Scientist");
        assert_eq!(found.rating, 100.0);
    }

    #[test]
    fn test_recommend_ties_keep_first_row() {
        let p = profile([5, 5, 5, 5]);
        let rows = vec![
            row("First", [5.0, 5.0, 5.0, 5.0], &["Excel"]),
            row("Second", [5.0, 5.0, 5.0, 5.0], &["Excel"]),
        ];
        let found = recommend_career(&p, &[], &rows).unwrap();
        assert_eq!(found.career, "First");
    }

    #[test]
    fn test_non_finite_row_does_not_displace_best() {
        let p = profile([5, 5, 5, 5]);
        let rows = vec![
            row("Best", [5.0, 5.0, 5.0, 5.0], &[]),
            row("Broken", [f64::NAN, 5.0, 5.0, 5.0], &[]),
            row("Worse", [9.0, 9.0, 9.0, 9.0], &[]),
        ];
        let found = recommend_career(&p, &[], &rows).unwrap();
        assert_eq!(found.career, "Best");

        let only_broken = vec![row("Broken", [f64::INFINITY, 5.0, 5.0, 5.0], &[])];
        assert!(recommend_career(&p, &[], &only_broken).is_none());
    }

    #[test]
    fn test_skills_can_outweigh_small_personality_gap() {
        let p = profile([5, 5, 5, 5]);
        let rows = vec![
            row("Close", [5.0, 5.0, 5.0, 6.0], &["Welding"]),
            row("Skilled", [5.0, 5.0, 5.0, 7.0], &["Python"]),
        ];
        let found = recommend_career(&p, &skills(&["Python"]), &rows).unwrap();
        assert_eq!(found.career, "Skilled");
    }

    #[test]
    fn test_rating_rounded_to_two_decimals() {
        let p = profile([5, 4, 7, 9]);
        let rows = vec![row("Data Scientist", [5.0, 4.0, 7.0, 9.0], &["Python", "Excel", "SQL"])];
        let found = recommend_career(&p, &skills(&["Python", "SQL"]), &rows).unwrap();
        // 0.7 + 0.3 * 2/3 = 0.9
        assert_eq!(found.rating, 90.0);
    }

    #[test]
    fn test_empty_dataset_has_no_recommendation() {
        assert!(recommend_career(&profile([1, 2, 3, 4]), &[], &[]).is_none());
    }

    struct FailingDataset;

    #[async_trait]
    impl CareerDataset for FailingDataset {
        async fn load(&self) -> Result<Vec<CareerRow>, DatasetError> {
            Err(DatasetError::Io {
                path: "missing.csv".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        }
    }

    struct FixedDataset(Vec<CareerRow>);

    #[async_trait]
    impl CareerDataset for FixedDataset {
        async fn load(&self) -> Result<Vec<CareerRow>, DatasetError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_dataset_failure_is_soft() {
        let found = career_recommendation(&FailingDataset, &profile([1, 1, 1, 1]), &[]).await;
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_recommendation_through_dataset() {
        let dataset = FixedDataset(vec![row("Accountant", [6.0, 4.0, 7.0, 9.0], &["Excel"])]);
        let found = career_recommendation(&dataset, &profile([6, 4, 7, 9]), &skills(&["Excel"]))
            .await
            .unwrap();
        assert_eq!(found.career, "Accountant");
        assert_eq!(found.rating, 100.0);
    }
}
