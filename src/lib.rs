//! pathfinder - AI career roadmap advisor
//!
//! Collects a career profile from a web form, compiles it into a fixed
//! natural-language prompt, asks a chat-completion model for a roadmap and
//! returns the answer verbatim. Every submission is appended to a CSV log.

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod profile;
pub mod server;
pub mod submission_log;
pub mod util;
