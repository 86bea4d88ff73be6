use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::factors::{factor_for_adjective, QuestionType};
use crate::assessment::matcher::calculate_reference_profile;
use crate::auth::extractor::AuthUser;
use crate::catalog::queries::fetch_reference_profiles;
use crate::errors::{AppError, AppJson};
use crate::models::profile::{BehavioralAssessmentRow, ReferenceProfileRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssessmentAnswer {
    pub adjective: String,
    pub question_type: QuestionType,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssessmentRequest {
    #[serde(default)]
    pub responses: Vec<AssessmentAnswer>,
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAssessmentResponse {
    pub message: &'static str,
    pub profile: ProfileSummary,
}

/// POST /submit_assessment
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
    AppJson(req): AppJson<SubmitAssessmentRequest>,
) -> Result<Json<SubmitAssessmentResponse>, AppError> {
    if req.responses.is_empty() {
        return Err(AppError::Validation("Responses are required".to_string()));
    }

    let profile = replace_assessment(&state.db, user.id, &req.responses).await?;

    Ok(Json(SubmitAssessmentResponse {
        message: "Assessment submitted successfully",
        profile: ProfileSummary {
            id: profile.id,
            name: profile.name,
            description: profile.description,
        },
    }))
}

/// Replaces the user's answers and re-derives their reference profile in a
/// single transaction. Any failure, including "no profile could be matched",
/// rolls back and leaves the previous answers and profile link untouched.
pub async fn replace_assessment(
    pool: &PgPool,
    user_id: Uuid,
    answers: &[AssessmentAnswer],
) -> Result<ReferenceProfileRow, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM behavioral_assessments WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let mut stored: Vec<BehavioralAssessmentRow> = Vec::with_capacity(answers.len());
    for answer in answers {
        let adjective = answer.adjective.trim();
        let factor = factor_for_adjective(adjective);
        let row: BehavioralAssessmentRow = sqlx::query_as(
            r#"
            INSERT INTO behavioral_assessments (user_id, question_type, adjective, factor)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(answer.question_type.as_str())
        .bind(adjective)
        .bind(factor.as_str())
        .fetch_one(&mut *tx)
        .await?;
        stored.push(row);
    }

    let profiles = fetch_reference_profiles(&mut *tx).await?;
    let Some(profile_id) = calculate_reference_profile(user_id, &stored, &profiles) else {
        tx.rollback().await?;
        warn!("Assessment for user {user_id} rolled back: no profile matched");
        return Err(AppError::UnprocessableEntity(
            "No reference profile could be matched to these answers".to_string(),
        ));
    };

    sqlx::query("UPDATE users SET reference_profile_id = $2 WHERE id = $1")
        .bind(user_id)
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let profile = profiles
        .into_iter()
        .find(|p| p.id == profile_id)
        .ok_or_else(|| AppError::NotFound(format!("Reference profile {profile_id} not found")))?;

    info!(
        "Stored {} answers for user {user_id}; profile {}",
        stored.len(),
        profile.name
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_question_types() {
        let req: SubmitAssessmentRequest = serde_json::from_value(serde_json::json!({
            "responses": [
                {"adjective": "Calm", "question_type": "Self-description"},
                {"adjective": "bold", "question_type": "Expected"}
            ]
        }))
        .unwrap();
        assert_eq!(req.responses.len(), 2);
        assert_eq!(req.responses[0].question_type, QuestionType::SelfDescription);
    }

    #[test]
    fn test_missing_responses_default_to_empty() {
        let req: SubmitAssessmentRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.responses.is_empty());
    }

    #[test]
    fn test_unknown_question_type_rejected() {
        let parsed = serde_json::from_value::<SubmitAssessmentRequest>(serde_json::json!({
            "responses": [{"adjective": "calm", "question_type": "Sometimes"}]
        }));
        assert!(parsed.is_err());
    }

    fn answer(adjective: &str) -> AssessmentAnswer {
        AssessmentAnswer {
            adjective: adjective.to_string(),
            question_type: QuestionType::SelfDescription,
        }
    }

    async fn insert_user(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO users (first_name, last_name, email, age, password_hash, password_salt)
            VALUES ('Ada', 'Lovelace', 'ada@example.com', 36, 'hash', 'salt')
            RETURNING id
            "#,
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn stored_adjectives(pool: &PgPool, user_id: Uuid) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT adjective FROM behavioral_assessments WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .unwrap()
    }

    async fn linked_profile(pool: &PgPool, user_id: Uuid) -> Option<i32> {
        sqlx::query_scalar("SELECT reference_profile_id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resubmission_replaces_previous_answers(pool: PgPool) {
        sqlx::query(
            r#"
            INSERT INTO reference_profiles (name, dominance, extraversion, patience, formality)
            VALUES ('Driver', 9, 1, 1, 1), ('Steady', 1, 1, 9, 1)
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        let user_id = insert_user(&pool).await;

        let first = replace_assessment(&pool, user_id, &[answer("Bold"), answer("Direct")])
            .await
            .unwrap();
        assert_eq!(first.name, "Driver");

        let second = replace_assessment(&pool, user_id, &[answer("Calm")])
            .await
            .unwrap();
        assert_eq!(second.name, "Steady");
        assert_eq!(stored_adjectives(&pool, user_id).await, vec!["Calm"]);
        assert_eq!(linked_profile(&pool, user_id).await, Some(second.id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unmatched_submission_rolls_back(pool: PgPool) {
        let user_id = insert_user(&pool).await;
        sqlx::query(
            r#"
            INSERT INTO behavioral_assessments (user_id, question_type, adjective, factor)
            VALUES ($1, 'Self-description', 'Bold', 'Dominance')
            "#,
        )
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

        // No reference profiles are loaded, so nothing can match.
        let result = replace_assessment(&pool, user_id, &[answer("Calm")]).await;
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
        assert_eq!(stored_adjectives(&pool, user_id).await, vec!["Bold"]);
        assert_eq!(linked_profile(&pool, user_id).await, None);
    }
}
