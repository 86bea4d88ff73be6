//! Startup seeding of the static catalog tables from CSV files in `DATA_DIR`.
//!
//! Each table is only seeded when empty, inside its own transaction. Seeding
//! problems are logged and never stop the server.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::recommendation::dataset::split_skills;

pub const REFERENCE_PROFILES_FILE: &str = "reference_profiles.csv";
pub const UNIVERSITIES_FILE: &str = "universities.csv";
pub const COURSES_FILE: &str = "courses.csv";

/// Factor scores per reference group, in dominance/extraversion/patience/formality order.
const GROUP_SCORES: &[(&str, [i32; 4])] = &[
    ("Analytical", [7, 4, 6, 9]),
    ("Social", [6, 8, 7, 5]),
    ("Persistent", [8, 5, 8, 7]),
    ("Stabilizing", [5, 6, 9, 8]),
];

pub fn group_scores(group: &str) -> [i32; 4] {
    GROUP_SCORES
        .iter()
        .find(|(name, _)| *name == group.trim())
        .map(|(_, scores)| *scores)
        .unwrap_or(GROUP_SCORES[0].1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedProfile {
    pub name: String,
    pub description: String,
    pub scores: [i32; 4],
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    #[serde(rename = "Profiles", default)]
    name: Option<String>,
    #[serde(rename = "Reference Groups", default)]
    group: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
}

/// Parses the `;`-delimited profiles sheet. Blank and repeated names are dropped.
pub fn parse_reference_profiles(bytes: &[u8]) -> Result<Vec<SeedProfile>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut seen = HashSet::new();
    let mut profiles = Vec::new();
    for record in reader.deserialize::<ProfileRecord>() {
        let record = record.context("malformed reference profile row")?;
        let Some(name) = record.name.filter(|n| !n.is_empty()) else {
            continue;
        };
        if !seen.insert(name.clone()) {
            continue;
        }
        let description = record
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("A {name} profile type"));
        profiles.push(SeedProfile {
            scores: group_scores(record.group.as_deref().unwrap_or_default()),
            name,
            description,
        });
    }
    Ok(profiles)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedUniversity {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tel Number", default)]
    pub tel_number: Option<String>,
    #[serde(rename = "Website", default)]
    pub website: Option<String>,
}

pub fn parse_universities(bytes: &[u8]) -> Result<Vec<SeedUniversity>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    reader
        .deserialize()
        .collect::<Result<Vec<SeedUniversity>, _>>()
        .context("malformed university row")
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedCourse {
    pub name: String,
    pub university_id: String,
    pub faculty: String,
    pub duration: i32,
    pub recommended_career: String,
    pub key_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CourseRecord {
    #[serde(rename = "Course", default)]
    name: Option<String>,
    #[serde(rename = "Universities_ID", default)]
    university_id: Option<String>,
    #[serde(rename = "Faculty/Department", default)]
    faculty: Option<String>,
    #[serde(rename = "Duration", default)]
    duration: Option<String>,
    #[serde(rename = "Recommended Career", default)]
    recommended_career: Option<String>,
    #[serde(rename = "Key Skills", default)]
    key_skills: Option<String>,
}

fn clean(field: Option<String>) -> String {
    field
        .map(|f| f.trim().trim_end_matches(',').trim().to_string())
        .unwrap_or_default()
}

/// Parses the `;`-delimited course sheet. Rows without a course name, university,
/// or career are skipped with a warning; an unreadable duration becomes 0.
pub fn parse_courses(bytes: &[u8]) -> Vec<SeedCourse> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(bytes);

    let mut courses = Vec::new();
    for (line, record) in reader.deserialize::<CourseRecord>().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping unreadable course row {}: {e}", line + 2);
                continue;
            }
        };

        let name = clean(record.name);
        let university_id = clean(record.university_id);
        let recommended_career = clean(record.recommended_career);
        if name.is_empty() || university_id.is_empty() || recommended_career.is_empty() {
            warn!("Skipping incomplete course row {}", line + 2);
            continue;
        }

        let duration = clean(record.duration)
            .parse::<f64>()
            .map(|d| d as i32)
            .unwrap_or(0);

        courses.push(SeedCourse {
            name,
            university_id,
            faculty: clean(record.faculty),
            duration,
            recommended_career,
            key_skills: split_skills(record.key_skills.as_deref().unwrap_or_default()),
        });
    }
    courses
}

async fn table_is_empty(pool: &PgPool, table: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

async fn read_seed_file(data_dir: &Path, file: &str) -> Result<Vec<u8>> {
    let path = data_dir.join(file);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("Missing required data file {}", path.display()))
}

async fn seed_reference_profiles(pool: &PgPool, data_dir: &Path) -> Result<usize> {
    let profiles = parse_reference_profiles(&read_seed_file(data_dir, REFERENCE_PROFILES_FILE).await?)?;

    let mut tx = pool.begin().await?;
    for p in &profiles {
        sqlx::query(
            r#"
            INSERT INTO reference_profiles (name, description, dominance, extraversion, patience, formality)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.scores[0])
        .bind(p.scores[1])
        .bind(p.scores[2])
        .bind(p.scores[3])
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(profiles.len())
}

async fn seed_universities(pool: &PgPool, data_dir: &Path) -> Result<usize> {
    let universities = parse_universities(&read_seed_file(data_dir, UNIVERSITIES_FILE).await?)?;

    let mut tx = pool.begin().await?;
    for u in &universities {
        sqlx::query(
            r#"
            INSERT INTO universities (id, name, tel_number, website)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&u.id)
        .bind(&u.name)
        .bind(&u.tel_number)
        .bind(u.website.as_deref().unwrap_or_default())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(universities.len())
}

async fn seed_courses(pool: &PgPool, data_dir: &Path) -> Result<usize> {
    let courses = parse_courses(&read_seed_file(data_dir, COURSES_FILE).await?);

    let mut tx = pool.begin().await?;
    for c in &courses {
        sqlx::query(
            r#"
            INSERT INTO courses (name, university_id, faculty, duration, recommended_career, key_skills)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&c.name)
        .bind(&c.university_id)
        .bind(&c.faculty)
        .bind(c.duration)
        .bind(&c.recommended_career)
        .bind(&c.key_skills)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(courses.len())
}

/// Seeds every empty catalog table. Errors are logged per table.
pub async fn seed_catalog(pool: &PgPool, data_dir: &Path) {
    for table in ["reference_profiles", "universities", "courses"] {
        match table_is_empty(pool, table).await {
            Ok(false) => {
                info!("Table {table} already populated; skipping seed");
                continue;
            }
            Ok(true) => {}
            Err(e) => {
                error!("Could not inspect table {table}: {e:#}");
                continue;
            }
        }

        let seeded = match table {
            "reference_profiles" => seed_reference_profiles(pool, data_dir).await,
            "universities" => seed_universities(pool, data_dir).await,
            _ => seed_courses(pool, data_dir).await,
        };
        match seeded {
            Ok(n) => info!("Seeded {n} rows into {table}"),
            Err(e) => error!("Error initializing {table}: {e:#}"),
        }
    }
}
