use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password::{match_password, secure_password, PasswordStore};
use crate::auth::session::{create_session, delete_session, purge_expired_sessions};
use crate::errors::{AppError, AppJson};
use crate::models::user::User;
use crate::state::AppState;
use crate::users::handlers::{normalize_skills, UserView};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub career_interests: String,
    pub password: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("careerInterests", &self.career_interests),
            ("password", &self.password),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| *k)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        if !self.email.contains('@') {
            return Err(AppError::Validation("email is not valid".to_string()));
        }
        if self.age <= 0 {
            return Err(AppError::Validation("age must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user: UserView,
    pub token: String,
}

/// POST /signup
pub async fn handle_signup(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    debug!("Received signup request for {}", req.email);
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&email)
        .fetch_one(&state.db)
        .await?;
    if exists {
        warn!("Signup rejected, user already exists: {email}");
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let PasswordStore { salt, hashed } = secure_password(&req.password);
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users
            (id, first_name, last_name, email, age, skills, career_interests,
             password_hash, password_salt)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.first_name.trim())
    .bind(req.last_name.trim())
    .bind(&email)
    .bind(req.age)
    .bind(normalize_skills(&req.skills))
    .bind(req.career_interests.trim())
    .bind(hashed)
    .bind(salt)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e {
        // Lost a race with a concurrent signup for the same email
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("User already exists".to_string())
        }
        other => AppError::Database(other),
    })?;

    let token = create_session(&state.db, user.id, state.config.session_ttl_hours).await?;
    info!("New user created: {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully",
            user: UserView::from(&user),
            token,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(req.email.trim().to_lowercase())
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(invalid)?;

    let store = PasswordStore {
        salt: user.password_salt.clone(),
        hashed: user.password_hash.clone(),
    };
    if !match_password(&req.password, &store) {
        warn!("Failed login for {}", user.email);
        return Err(invalid());
    }

    purge_expired_sessions(&state.db).await?;
    let token = create_session(&state.db, user.id, state.config.session_ttl_hours).await?;
    info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        token,
        user: UserView::from(&user),
    }))
}

/// POST /logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    delete_session(&state.db, &auth.token).await?;
    info!("User {} logged out", auth.user.id);
    Ok(StatusCode::NO_CONTENT)
}
