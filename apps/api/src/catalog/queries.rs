use sqlx::{PgExecutor, PgPool};

use crate::models::course::CourseWithSchool;
use crate::models::profile::ReferenceProfileRow;

/// All reference profiles in stored order. Ties in profile matching depend on this order.
pub async fn fetch_reference_profiles<'e, E>(executor: E) -> Result<Vec<ReferenceProfileRow>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as("SELECT * FROM reference_profiles ORDER BY id")
        .fetch_all(executor)
        .await
}

pub async fn fetch_reference_profile(
    pool: &PgPool,
    id: i32,
) -> Result<Option<ReferenceProfileRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reference_profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Courses leading to `career`, each with the name of its university.
pub async fn related_courses(pool: &PgPool, career: &str) -> Result<Vec<CourseWithSchool>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT c.name, u.name AS school, c.duration, c.key_skills
        FROM courses c
        LEFT JOIN universities u ON u.id = c.university_id
        WHERE c.recommended_career = $1
        ORDER BY c.id
        "#,
    )
    .bind(career)
    .fetch_all(pool)
    .await
}
