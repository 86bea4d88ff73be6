use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named archetype in the four-factor personality space.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ReferenceProfileRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub dominance: i32,
    pub extraversion: i32,
    pub patience: i32,
    pub formality: i32,
}

/// One questionnaire answer. `factor` is derived from the adjective at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BehavioralAssessmentRow {
    pub id: i64,
    pub user_id: Uuid,
    pub question_type: String,
    pub adjective: String,
    pub factor: String,
}
