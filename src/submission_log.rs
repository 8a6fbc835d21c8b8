//! Append-only CSV log of submissions.
//!
//! Each profile variant has its own flat record schema and its own file.
//! A missing file is created on first append with a header row.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::llm::prompts::{PROFESSIONAL_DEGREE_SEPARATOR, STUDENT_DEGREE_SEPARATOR};
use crate::profile::{join_degrees, CareerProfile};

pub const PROFESSIONAL_LOG_FILE: &str = "career_submissions.csv";
pub const STUDENT_LOG_FILE: &str = "student_submissions.csv";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfessionalRecord {
    pub timestamp: String,
    pub name: String,
    pub experience_years: u8,
    pub experience_level: String,
    pub degrees: String,
    pub skills: String,
    pub spoken_languages: String,
    pub brief: String,
    pub employment_status: String,
    pub career_shift: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub timestamp: String,
    pub gpa: String,
    pub skills: String,
    pub interests: String,
    pub career_goal: String,
    pub degrees: String,
}

/// Flattened, loggable projection of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRecord {
    Professional(ProfessionalRecord),
    Student(StudentRecord),
}

impl SubmissionRecord {
    pub fn file_name(&self) -> &'static str {
        match self {
            SubmissionRecord::Professional(_) => PROFESSIONAL_LOG_FILE,
            SubmissionRecord::Student(_) => STUDENT_LOG_FILE,
        }
    }
}

impl From<&CareerProfile> for SubmissionRecord {
    fn from(profile: &CareerProfile) -> Self {
        let timestamp = profile.captured_at().format(TIMESTAMP_FORMAT).to_string();
        match profile {
            CareerProfile::Professional(p) => SubmissionRecord::Professional(ProfessionalRecord {
                timestamp,
                name: p.name.clone().unwrap_or_default(),
                experience_years: p.experience_years,
                experience_level: p.experience_level.to_string(),
                degrees: join_degrees(&p.degrees, PROFESSIONAL_DEGREE_SEPARATOR),
                skills: p.skills.join(", "),
                spoken_languages: p.spoken_languages.join(", "),
                brief: p.brief.clone().unwrap_or_default(),
                employment_status: p.employment_status.clone().unwrap_or_default(),
                career_shift: p.career_shift.clone().unwrap_or_default(),
            }),
            CareerProfile::Student(s) => SubmissionRecord::Student(StudentRecord {
                timestamp,
                gpa: s.gpa.clone(),
                skills: s.skills.clone(),
                interests: s.interests.clone(),
                career_goal: s.career_goal.clone().unwrap_or_default(),
                degrees: join_degrees(&s.degrees, STUDENT_DEGREE_SEPARATOR),
            }),
        }
    }
}

/// Destination for submission records. Write-only.
pub trait SubmissionLog: Send + Sync {
    fn append(&self, record: &SubmissionRecord) -> Result<()>;
}

/// CSV files under one directory, one per variant.
pub struct CsvSubmissionLog {
    directory: PathBuf,
    // Serializes appends from concurrent workers in this process.
    write_lock: Mutex<()>,
}

impl CsvSubmissionLog {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path_for(&self, record: &SubmissionRecord) -> PathBuf {
        self.directory.join(record.file_name())
    }

    fn write_row<T: Serialize>(path: &Path, row: &T) -> Result<()> {
        let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open submission log {}", path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;
        Ok(())
    }
}

impl SubmissionLog for CsvSubmissionLog {
    fn append(&self, record: &SubmissionRecord) -> Result<()> {
        let path = self.path_for(record);
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("submission log lock poisoned"))?;

        match record {
            SubmissionRecord::Professional(row) => Self::write_row(&path, row)?,
            SubmissionRecord::Student(row) => Self::write_row(&path, row)?,
        }
        debug!("Appended submission to {}", path.display());
        Ok(())
    }
}
