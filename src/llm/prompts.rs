//! Prompt templates: one fixed template per profile variant.
//!
//! Every function here is pure. The same profile always yields the same
//! prompt, and missing optional fields render a placeholder instead of being
//! dropped so the model always receives the full list of fields.

use crate::profile::{join_degrees, CareerProfile, ProfessionalProfile, StudentProfile};

pub const NOT_PROVIDED: &str = "Not provided";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const NOT_SURE_YET: &str = "Not sure yet";

/// Separator between degrees in the professional template.
pub const PROFESSIONAL_DEGREE_SEPARATOR: &str = " | ";
/// Separator between degrees in the student template.
pub const STUDENT_DEGREE_SEPARATOR: &str = ", ";

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder,
    }
}

fn list_or_placeholder(items: &[String], separator: &str, placeholder: &str) -> String {
    if items.is_empty() {
        placeholder.to_string()
    } else {
        items.join(separator)
    }
}

/// Compile a profile into the prompt for its variant.
pub fn compile(profile: &CareerProfile) -> String {
    match profile {
        CareerProfile::Professional(p) => professional_roadmap(p),
        CareerProfile::Student(s) => student_roadmap(s),
    }
}

pub fn professional_roadmap(profile: &ProfessionalProfile) -> String {
    let degrees = if profile.degrees.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        join_degrees(&profile.degrees, PROFESSIONAL_DEGREE_SEPARATOR)
    };

    format!(
        r#"You are an experienced career advisor helping someone plan their next professional steps. Here is their profile:
- Name: {name}
- Experience Level: {level}
- Years of Experience: {years}
- Degrees: {degrees}
- Skills: {skills}
- Spoken Languages: {languages}
- About: {brief}
- Employment Status: {employment}
- Career Shift: {shift}

Based on this profile, suggest:
1. Realistic certifications that match their experience level and background
2. Programs, courses and learning platforms suited to their seniority
3. A 3-6 month learning path with concrete monthly milestones

Keep every recommendation appropriate for the stated experience level. Do not recommend advanced certifications to fresh graduates.

Format your response clearly with bullet points and sections.
"#,
        name = or_placeholder(profile.name.as_deref(), NOT_PROVIDED),
        level = profile.experience_level,
        years = profile.experience_years,
        degrees = degrees,
        skills = list_or_placeholder(&profile.skills, ", ", NOT_SPECIFIED),
        languages = list_or_placeholder(&profile.spoken_languages, ", ", NOT_SPECIFIED),
        brief = or_placeholder(profile.brief.as_deref(), NOT_PROVIDED),
        employment = or_placeholder(profile.employment_status.as_deref(), NOT_PROVIDED),
        shift = or_placeholder(profile.career_shift.as_deref(), NOT_SURE_YET),
    )
}

pub fn student_roadmap(profile: &StudentProfile) -> String {
    let education = if profile.degrees.is_empty() {
        String::new()
    } else {
        format!(
            "- Education: {}\n",
            join_degrees(&profile.degrees, STUDENT_DEGREE_SEPARATOR)
        )
    };

    format!(
        r#"I’m building a career roadmap for a computer science student. Here are their details:
- GPA: {gpa}
- Skills: {skills}
- Interests: {interests}
- Career goal: {goal}
{education}
Based on this, suggest:
1. Top 3 career options
2. A 6-month personalized learning roadmap with specific courses/resources
3. Project or internship ideas for each career
4. Recommended certifications or achievements

Format your response clearly with bullet points and sections.
"#,
        gpa = profile.gpa,
        skills = profile.skills,
        interests = profile.interests,
        goal = or_placeholder(profile.career_goal.as_deref(), NOT_SURE_YET),
        education = education,
    )
}
