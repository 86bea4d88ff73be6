use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the seed CSVs (reference profiles, universities, courses).
    pub data_dir: PathBuf,
    /// Career dataset scanned on every recommendation.
    pub career_dataset_path: PathBuf,
    pub session_ttl_hours: i64,
    pub cors_origins: Vec<String>,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let data_dir = PathBuf::from(optional_env("DATA_DIR").unwrap_or_else(|| "data".into()));
        let career_dataset_path = optional_env("CAREER_DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("career_recommendation_with_courses.csv"));

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            data_dir,
            career_dataset_path,
            session_ttl_hours: optional_env("SESSION_TTL_HOURS")
                .unwrap_or_else(|| "24".to_string())
                .parse::<i64>()
                .context("SESSION_TTL_HOURS must be an integer")?,
            cors_origins: parse_origins(
                optional_env("CORS_ORIGINS")
                    .as_deref()
                    .unwrap_or("http://localhost:3000,http://127.0.0.1:3000"),
            ),
            log_dir: optional_env("LOG_DIR").map(PathBuf::from),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
impl Config {
    /// Config for tests that never touch the environment.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/pathway_test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            data_dir: PathBuf::from("data"),
            career_dataset_path: PathBuf::from("data/career_recommendation_with_courses.csv"),
            session_ttl_hours: 24,
            cors_origins: vec!["http://localhost:3000".to_string()],
            log_dir: None,
        }
    }
}
