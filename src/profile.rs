//! Career profile data model shared by the collector, prompt compiler and log.

use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound for the experience slider.
pub const MAX_EXPERIENCE_YEARS: u8 = 30;

/// Skills offered by the form's multiselect.
pub const SKILL_CATALOG: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "C++",
    "SQL",
    "Excel",
    "Data Analysis",
    "Machine Learning",
    "Cloud Computing",
    "Cybersecurity",
    "Networking",
    "Project Management",
    "UI/UX Design",
    "Digital Marketing",
    "Communication",
    "Leadership",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    FreshGraduate,
    EarlyCareer,
    MidCareer,
    SeniorLevel,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::FreshGraduate,
        ExperienceLevel::EarlyCareer,
        ExperienceLevel::MidCareer,
        ExperienceLevel::SeniorLevel,
    ];

    pub fn from_years(years: u8) -> Self {
        match years {
            0..=1 => ExperienceLevel::FreshGraduate,
            2..=5 => ExperienceLevel::EarlyCareer,
            6..=10 => ExperienceLevel::MidCareer,
            _ => ExperienceLevel::SeniorLevel,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::FreshGraduate => "Fresh Graduate",
            ExperienceLevel::EarlyCareer => "Early Career",
            ExperienceLevel::MidCareer => "Mid Career",
            ExperienceLevel::SeniorLevel => "Senior Level",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DegreeType {
    Highschool,
    Diploma,
    Bachelors,
    Masters,
    PhD,
}

impl DegreeType {
    pub const ALL: [DegreeType; 5] = [
        DegreeType::Highschool,
        DegreeType::Diploma,
        DegreeType::Bachelors,
        DegreeType::Masters,
        DegreeType::PhD,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DegreeType::Highschool => "High School",
            DegreeType::Diploma => "Diploma",
            DegreeType::Bachelors => "Bachelor's",
            DegreeType::Masters => "Master's",
            DegreeType::PhD => "PhD",
        }
    }
}

impl fmt::Display for DegreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DegreeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "highschool" => Ok(DegreeType::Highschool),
            "diploma" => Ok(DegreeType::Diploma),
            "bachelors" | "bachelor" => Ok(DegreeType::Bachelors),
            "masters" | "master" => Ok(DegreeType::Masters),
            "phd" | "doctorate" => Ok(DegreeType::PhD),
            _ => bail!("Unknown degree type: {}", s),
        }
    }
}

impl TryFrom<String> for DegreeType {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DegreeType> for String {
    fn from(value: DegreeType) -> Self {
        value.label().to_string()
    }
}

/// One degree slot. Major and university may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degree {
    pub degree_type: DegreeType,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub university: String,
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} from {}",
            self.degree_type, self.major, self.university
        )
    }
}

/// Render degrees on one line with the given separator.
pub fn join_degrees(degrees: &[Degree], separator: &str) -> String {
    degrees
        .iter()
        .map(Degree::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Richer variant: experience, degrees, skills, languages and situation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionalProfile {
    pub name: Option<String>,
    pub experience_years: u8,
    pub experience_level: ExperienceLevel,
    pub degrees: Vec<Degree>,
    pub skills: Vec<String>,
    pub spoken_languages: Vec<String>,
    pub brief: Option<String>,
    pub employment_status: Option<String>,
    pub career_shift: Option<String>,
    pub captured_at: DateTime<Local>,
}

/// Minimal variant: GPA, free-text skills and interests.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub gpa: String,
    pub skills: String,
    pub interests: String,
    pub career_goal: Option<String>,
    pub degrees: Vec<Degree>,
    pub captured_at: DateTime<Local>,
}

/// One submission's profile. The two variants carry disjoint field sets.
#[derive(Debug, Clone, PartialEq)]
pub enum CareerProfile {
    Professional(ProfessionalProfile),
    Student(StudentProfile),
}

impl CareerProfile {
    pub fn captured_at(&self) -> DateTime<Local> {
        match self {
            CareerProfile::Professional(p) => p.captured_at,
            CareerProfile::Student(s) => s.captured_at,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            CareerProfile::Professional(_) => "professional",
            CareerProfile::Student(_) => "student",
        }
    }
}
