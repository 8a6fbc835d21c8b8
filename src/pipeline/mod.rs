//! Submission pipeline: form → profile → prompt → model → response.

pub mod advisor;
pub mod collector;
