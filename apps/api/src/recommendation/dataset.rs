//! Career dataset: the static (career, factor scores, skills) table the scorer scans.
//!
//! `AppState` holds an `Arc<dyn CareerDataset>`. The default `CsvCareerDataset`
//! re-reads its file on every call so edits to the CSV are picked up without a
//! restart.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read career dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed career dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("career {career:?} has a non-finite factor score")]
    NonFiniteScore { career: String },
}

/// One row of the career dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerRow {
    pub career: String,
    pub dominance: f64,
    pub extraversion: f64,
    pub patience: f64,
    pub formality: f64,
    pub key_skills: Vec<String>,
}

impl CareerRow {
    pub fn scores(&self) -> [f64; 4] {
        [self.dominance, self.extraversion, self.patience, self.formality]
    }
}

/// Raw CSV record; column names follow the published dataset.
#[derive(Debug, Deserialize)]
struct CareerRecord {
    #[serde(rename = "Recommended Career")]
    career: String,
    #[serde(rename = "Dominance")]
    dominance: f64,
    #[serde(rename = "Extraversion")]
    extraversion: f64,
    #[serde(rename = "Patience")]
    patience: f64,
    #[serde(rename = "Formality")]
    formality: f64,
    #[serde(rename = "Key Skills", default)]
    key_skills: Option<String>,
}

impl From<CareerRecord> for CareerRow {
    fn from(record: CareerRecord) -> Self {
        CareerRow {
            career: record.career.trim().to_string(),
            dominance: record.dominance,
            extraversion: record.extraversion,
            patience: record.patience,
            formality: record.formality,
            key_skills: split_skills(record.key_skills.as_deref().unwrap_or_default()),
        }
    }
}

/// Splits a comma-separated skills cell, trimming entries and dropping blanks.
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
pub trait CareerDataset: Send + Sync {
    async fn load(&self) -> Result<Vec<CareerRow>, DatasetError>;
}

pub struct CsvCareerDataset {
    path: PathBuf,
}

impl CsvCareerDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CareerDataset for CsvCareerDataset {
    async fn load(&self) -> Result<Vec<CareerRow>, DatasetError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DatasetError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        parse_career_csv(&bytes)
    }
}

pub fn parse_career_csv(bytes: &[u8]) -> Result<Vec<CareerRow>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let records: Vec<CareerRecord> = reader.deserialize().collect::<Result<_, _>>()?;
    records
        .into_iter()
        .map(CareerRow::from)
        .map(|row| {
            // f64 parsing accepts NaN and inf, which would poison distance comparisons.
            if row.scores().iter().all(|s| s.is_finite()) {
                Ok(row)
            } else {
                Err(DatasetError::NonFiniteScore { career: row.career })
            }
        })
        .collect()
}
