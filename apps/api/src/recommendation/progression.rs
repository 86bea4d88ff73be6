use serde::Serialize;
use tracing::info;

/// One step on a career ladder.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CareerStage {
    pub title: String,
    pub years: u32,
    pub salary: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<&'static str>,
}

const CURRENCY: &str = "ZAR";

type Ladder = [(&'static str, u32, u32); 4];

const CAREER_PATHS: &[(&str, Ladder)] = &[
    (
        "Software Engineer",
        [
            ("Junior Software Engineer", 0, 45_000),
            ("Software Engineer", 2, 75_000),
            ("Senior Software Engineer", 5, 95_000),
            ("Lead Software Engineer", 8, 120_000),
        ],
    ),
    (
        "Data Scientist",
        [
            ("Junior Data Scientist", 0, 48_000),
            ("Data Scientist", 2, 78_000),
            ("Senior Data Scientist", 5, 98_000),
            ("Lead Data Scientist", 8, 125_000),
        ],
    ),
    (
        "Public Defender",
        [
            ("Junior Public Defender", 0, 42_000),
            ("Public Defender", 3, 65_000),
            ("Senior Public Defender", 6, 85_000),
            ("Chief Public Defender", 9, 110_000),
        ],
    ),
    (
        "Accountant",
        [
            ("Junior Accountant", 0, 40_000),
            ("Staff Accountant", 2, 60_000),
            ("Senior Accountant", 5, 80_000),
            ("Finance Manager", 8, 100_000),
        ],
    ),
    (
        "Operations Manager",
        [
            ("Operations Coordinator", 0, 45_000),
            ("Operations Manager", 3, 70_000),
            ("Senior Operations Manager", 6, 90_000),
            ("Director of Operations", 9, 115_000),
        ],
    ),
    (
        "General Practitioner",
        [
            ("Medical Resident", 0, 52_000),
            ("General Practitioner", 3, 120_000),
            ("Senior GP", 6, 150_000),
            ("Medical Director", 10, 180_000),
        ],
    ),
    (
        "Civil Engineer",
        [
            ("Junior Civil Engineer", 0, 48_000),
            ("Civil Engineer", 3, 75_000),
            ("Senior Civil Engineer", 6, 95_000),
            ("Project Director", 9, 120_000),
        ],
    ),
    (
        "IT Support Specialist",
        [
            ("IT Support Technician", 0, 35_000),
            ("IT Support Specialist", 2, 50_000),
            ("Senior IT Support Specialist", 4, 65_000),
            ("IT Support Manager", 7, 85_000),
        ],
    ),
];

/// Career ladder for `career`. Careers without a defined ladder get a generic
/// Junior / plain / Senior / Lead progression with no currency.
pub fn career_progression(career: &str) -> Vec<CareerStage> {
    if let Some((_, ladder)) = CAREER_PATHS.iter().find(|(name, _)| *name == career) {
        info!("Found defined career path for: {career}");
        return ladder
            .iter()
            .map(|(title, years, salary)| CareerStage {
                title: title.to_string(),
                years: *years,
                salary: *salary,
                currency: Some(CURRENCY),
            })
            .collect();
    }

    info!("Generating generic career path for: {career}");
    [
        (format!("Junior {career}"), 0, 40_000),
        (career.to_string(), 2, 60_000),
        (format!("Senior {career}"), 5, 80_000),
        (format!("Lead {career}"), 8, 100_000),
    ]
    .into_iter()
    .map(|(title, years, salary)| CareerStage {
        title,
        years,
        salary,
        currency: None,
    })
    .collect()
}
