use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::catalog::queries::fetch_reference_profile;
use crate::errors::{AppError, AppJson};
use crate::models::profile::ReferenceProfileRow;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::skills::{invalid_skills, AVAILABLE_SKILLS};

/// Public view of a user account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub skills: Vec<String>,
    pub career_interests: Option<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            age: user.age,
            skills: user.skills.clone(),
            career_interests: user.career_interests.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserWithProfile<P: Serialize> {
    #[serde(flatten)]
    pub user: UserView,
    pub profile: Option<P>,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope<P: Serialize> {
    pub user: UserWithProfile<P>,
}

/// GET /user/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
) -> Result<Json<UserEnvelope<ReferenceProfileRow>>, AppError> {
    let profile = match user.reference_profile_id {
        Some(id) => fetch_reference_profile(&state.db, id).await?,
        None => None,
    };

    Ok(Json(UserEnvelope {
        user: UserWithProfile {
            user: UserView::from(&user),
            profile,
        },
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub career_interests: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: &'static str,
    pub user: UserView,
}

/// PUT /user/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    for (field, value) in [("firstName", &req.first_name), ("lastName", &req.last_name)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(AppError::Validation(format!("{field} cannot be blank")));
        }
    }
    if req.age.is_some_and(|age| age <= 0) {
        return Err(AppError::Validation("age must be positive".to_string()));
    }

    let skills = req.skills.map(|list| normalize_skills(&list));
    let updated: User = sqlx::query_as(
        r#"
        UPDATE users SET
            first_name       = COALESCE($2, first_name),
            last_name        = COALESCE($3, last_name),
            age              = COALESCE($4, age),
            career_interests = COALESCE($5, career_interests),
            skills           = COALESCE($6, skills)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(req.first_name.as_deref().map(str::trim))
    .bind(req.last_name.as_deref().map(str::trim))
    .bind(req.age)
    .bind(req.career_interests)
    .bind(skills)
    .fetch_one(&state.db)
    .await?;

    info!("Updated profile for user {}", updated.id);
    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully",
        user: UserView::from(&updated),
    }))
}

/// GET /skills
pub async fn handle_list_skills(_auth: AuthUser) -> Json<&'static [&'static str]> {
    Json(AVAILABLE_SKILLS)
}

#[derive(Debug, Deserialize)]
pub struct SubmitSkillsRequest {
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitSkillsResponse {
    pub message: &'static str,
    pub skills: Vec<String>,
}

/// POST /submit_skills
pub async fn handle_submit_skills(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
    AppJson(req): AppJson<SubmitSkillsRequest>,
) -> Result<Json<SubmitSkillsResponse>, AppError> {
    let invalid = invalid_skills(&req.skills);
    if !invalid.is_empty() {
        return Err(AppError::Validation(format!(
            "Invalid skills: {}",
            invalid.join(", ")
        )));
    }

    let skills = normalize_skills(&req.skills);
    sqlx::query("UPDATE users SET skills = $2 WHERE id = $1")
        .bind(user.id)
        .bind(&skills)
        .execute(&state.db)
        .await?;

    info!("User {} now lists {} skills", user.id, skills.len());
    Ok(Json(SubmitSkillsResponse {
        message: "Skills updated successfully",
        skills,
    }))
}

/// Trims entries, drops blanks and repeats, keeps first-seen order.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !out.iter().any(|s| s == skill) {
            out.push(skill.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_normalize_skills_dedups_and_trims() {
        let raw = vec![
            " Python".to_string(),
            "SQL".to_string(),
            "Python ".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(normalize_skills(&raw), vec!["Python", "SQL"]);
    }

    #[test]
    fn test_user_view_is_camel_case_without_secrets() {
        let user = User {
            id: Uuid::nil(),
            first_name: "Thandi".to_string(),
            last_name: "Nkosi".to_string(),
            email: "thandi@example.com".to_string(),
            age: 19,
            skills: vec!["Excel".to_string()],
            career_interests: Some("Finance".to_string()),
            password_hash: "secret".to_string(),
            password_salt: "salt".to_string(),
            reference_profile_id: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(UserWithProfile::<ReferenceProfileRow> {
            user: UserView::from(&user),
            profile: None,
        })
        .unwrap();
        assert_eq!(json["firstName"], "Thandi");
        assert_eq!(json["careerInterests"], "Finance");
        assert!(json["profile"].is_null());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
