use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A course joined with the name of the university offering it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseWithSchool {
    #[serde(rename = "course")]
    pub name: String,
    pub school: Option<String>,
    pub duration: i32,
    #[serde(rename = "keySkills")]
    pub key_skills: Vec<String>,
}
