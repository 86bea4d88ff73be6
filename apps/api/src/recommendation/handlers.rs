use axum::{extract::State, Json};
use serde::Serialize;
use tracing::error;

use crate::assessment::handlers::ProfileSummary;
use crate::auth::extractor::AuthUser;
use crate::catalog::queries::{fetch_reference_profile, related_courses};
use crate::errors::AppError;
use crate::models::course::CourseWithSchool;
use crate::models::profile::ReferenceProfileRow;
use crate::models::user::User;
use crate::recommendation::progression::{career_progression, CareerStage};
use crate::recommendation::scorer::{career_recommendation, CareerMatch};
use crate::state::AppState;
use crate::users::handlers::{UserEnvelope, UserView, UserWithProfile};

const ASSESSMENT_FIRST: &str = "Please complete the assessment first";

async fn load_profile(state: &AppState, user: &User) -> Result<Option<ReferenceProfileRow>, AppError> {
    match user.reference_profile_id {
        Some(id) => Ok(fetch_reference_profile(&state.db, id).await?),
        None => Ok(None),
    }
}

async fn require_profile(state: &AppState, user: &User) -> Result<ReferenceProfileRow, AppError> {
    load_profile(state, user)
        .await?
        .ok_or_else(|| AppError::AssessmentRequired(ASSESSMENT_FIRST.to_string()))
}

#[derive(Debug, Serialize)]
pub struct CareerRecommendation {
    pub career_recommendation: String,
    pub recommendation_rating: f64,
    pub related_courses_and_schools: Vec<CourseWithSchool>,
}

async fn build_recommendation(
    state: &AppState,
    found: CareerMatch,
) -> Result<CareerRecommendation, AppError> {
    let courses = related_courses(&state.db, &found.career).await?;
    Ok(CareerRecommendation {
        career_recommendation: found.career,
        recommendation_rating: found.rating,
        related_courses_and_schools: courses,
    })
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub name: String,
    #[serde(flatten)]
    pub recommendation: CareerRecommendation,
}

/// GET /recommend
pub async fn handle_recommend(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
) -> Result<Json<RecommendResponse>, AppError> {
    let profile = require_profile(&state, &user).await?;

    let found = career_recommendation(state.career_dataset.as_ref(), &profile, &user.skills)
        .await
        .ok_or_else(|| AppError::Unavailable("Recommendation could not be generated".to_string()))?;

    Ok(Json(RecommendResponse {
        name: user.full_name(),
        recommendation: build_recommendation(&state, found).await?,
    }))
}

#[derive(Debug, Serialize)]
pub struct CareerPathResponse {
    pub current_career: String,
    pub match_rating: f64,
    pub progression: Vec<CareerStage>,
}

/// GET /career_path
pub async fn handle_career_path(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
) -> Result<Json<CareerPathResponse>, AppError> {
    let profile = require_profile(&state, &user).await?;

    let Some(found) =
        career_recommendation(state.career_dataset.as_ref(), &profile, &user.skills).await
    else {
        error!("Unable to generate career recommendation for user {}", user.id);
        return Err(AppError::AssessmentRequired(
            "Unable to generate career path".to_string(),
        ));
    };

    let progression = career_progression(&found.career);
    Ok(Json(CareerPathResponse {
        current_career: found.career,
        match_rating: found.rating,
        progression,
    }))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub user: UserEnvelope<ProfileSummary>,
    pub recommendation: Option<CareerRecommendation>,
}

/// GET /dashboard_data
///
/// Recommendation problems never fail the dashboard; they surface as `null`.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let profile = load_profile(&state, &user).await?;

    let recommendation = match &profile {
        Some(profile) => {
            match career_recommendation(state.career_dataset.as_ref(), profile, &user.skills).await {
                Some(found) => match build_recommendation(&state, found).await {
                    Ok(rec) => Some(rec),
                    Err(e) => {
                        error!("Error getting career recommendation: {e}");
                        None
                    }
                },
                None => None,
            }
        }
        None => None,
    };

    Ok(Json(DashboardResponse {
        user: UserEnvelope {
            user: UserWithProfile {
                user: UserView::from(&user),
                profile: profile.map(|p| ProfileSummary {
                    id: p.id,
                    name: p.name,
                    description: p.description,
                }),
            },
        },
        recommendation,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_response_shape() {
        let response = RecommendResponse {
            name: "Lerato Mokoena".to_string(),
            recommendation: CareerRecommendation {
                career_recommendation: "Accountant".to_string(),
                recommendation_rating: 87.5,
                related_courses_and_schools: vec![CourseWithSchool {
                    name: "BCom Accounting".to_string(),
                    school: Some("University of Pretoria".to_string()),
                    duration: 3,
                    key_skills: vec!["Tax".to_string()],
                }],
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["name"], "Lerato Mokoena");
        assert_eq!(json["career_recommendation"], "Accountant");
        assert_eq!(json["recommendation_rating"], 87.5);
        let course = &json["related_courses_and_schools"][0];
        assert_eq!(course["course"], "BCom Accounting");
        assert_eq!(course["school"], "University of Pretoria");
        assert_eq!(course["keySkills"][0], "Tax");
    }

    #[test]
    fn test_career_path_response_shape() {
        let response = CareerPathResponse {
            current_career: "Civil Engineer".to_string(),
            match_rating: 72.0,
            progression: career_progression("Civil Engineer"),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["progression"][3]["title"], "Project Director");
        assert_eq!(json["match_rating"], 72.0);
    }
}
