use chrono::{DateTime, Local};
use serde::Deserialize;
use tracing::warn;

use crate::error::AdvisorError;
use crate::profile::{
    CareerProfile, Degree, ExperienceLevel, ProfessionalProfile, StudentProfile,
    MAX_EXPERIENCE_YEARS,
};
use crate::util::{dedup_ordered, non_blank, push_unique};

/// Raw input from the professional form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfessionalForm {
    pub name: Option<String>,
    pub experience_years: u32,
    pub degrees: Vec<Degree>,
    /// Selections from the skill catalog.
    pub skills: Vec<String>,
    /// Free-text skill not offered by the catalog.
    pub other_skill: Option<String>,
    pub spoken_languages: Vec<String>,
    pub brief: Option<String>,
    pub employment_status: Option<String>,
    pub career_shift: Option<String>,
}

/// Raw input from the student form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub gpa: String,
    /// Comma-separated, as typed.
    pub skills: String,
    pub interests: String,
    pub career_goal: Option<String>,
    pub degrees: Vec<Degree>,
}

/// A submitted form of either variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum SubmissionForm {
    Professional(ProfessionalForm),
    Student(StudentForm),
}

/// Turns raw forms into profiles. Holds only the per-variant slot limits.
#[derive(Debug, Clone)]
pub struct Collector {
    max_degrees: usize,
    student_max_degrees: usize,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(5, 3)
    }
}

impl Collector {
    pub fn new(max_degrees: usize, student_max_degrees: usize) -> Self {
        Self {
            max_degrees,
            student_max_degrees,
        }
    }

    pub fn collect(&self, form: SubmissionForm) -> Result<CareerProfile, AdvisorError> {
        self.collect_at(form, Local::now())
    }

    pub fn collect_at(
        &self,
        form: SubmissionForm,
        captured_at: DateTime<Local>,
    ) -> Result<CareerProfile, AdvisorError> {
        match form {
            SubmissionForm::Professional(f) => Ok(CareerProfile::Professional(
                self.collect_professional_at(f, captured_at),
            )),
            SubmissionForm::Student(f) => Ok(CareerProfile::Student(
                self.collect_student_at(f, captured_at)?,
            )),
        }
    }

    /// Never fails: the professional form has no required fields.
    pub fn collect_professional_at(
        &self,
        form: ProfessionalForm,
        captured_at: DateTime<Local>,
    ) -> ProfessionalProfile {
        let experience_years = form.experience_years.min(MAX_EXPERIENCE_YEARS as u32) as u8;

        let mut skills = dedup_ordered(form.skills);
        if let Some(other) = non_blank(form.other_skill) {
            push_unique(&mut skills, other);
        }

        ProfessionalProfile {
            name: non_blank(form.name),
            experience_years,
            experience_level: ExperienceLevel::from_years(experience_years),
            degrees: limit_degrees(form.degrees, self.max_degrees, "professional"),
            skills,
            spoken_languages: dedup_ordered(form.spoken_languages),
            brief: non_blank(form.brief),
            employment_status: non_blank(form.employment_status),
            career_shift: non_blank(form.career_shift),
            captured_at,
        }
    }

    /// GPA, skills and interests are required.
    pub fn collect_student_at(
        &self,
        form: StudentForm,
        captured_at: DateTime<Local>,
    ) -> Result<StudentProfile, AdvisorError> {
        if form.gpa.is_empty() || form.skills.is_empty() || form.interests.is_empty() {
            return Err(AdvisorError::missing_fields());
        }

        Ok(StudentProfile {
            gpa: form.gpa,
            skills: form.skills,
            interests: form.interests,
            career_goal: non_blank(form.career_goal),
            degrees: limit_degrees(form.degrees, self.student_max_degrees, "student"),
            captured_at,
        })
    }
}

fn limit_degrees(mut degrees: Vec<Degree>, max: usize, variant: &str) -> Vec<Degree> {
    if degrees.len() > max {
        warn!(
            "Dropping {} degree slot(s) beyond the {} limit of {}",
            degrees.len() - max,
            variant,
            max
        );
        degrees.truncate(max);
    }
    degrees
}
