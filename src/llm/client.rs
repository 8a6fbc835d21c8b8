use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Build the request conversation: optional persona, then the prompt.
pub fn conversation(system_prompt: Option<&str>, prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

/// A chat-completion backend. Model and sampling parameters belong to the
/// implementation; callers only supply the conversation.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Return the text of the first completion.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Offline client used by `--dry-run`.
pub struct MockLlmClient;

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if prompt.contains("3-6 month learning path") {
            Ok(r#"## Recommended Certifications
- Google Data Analytics Professional Certificate (beginner friendly)
- Microsoft Certified: Azure Fundamentals (AZ-900)

## Programs & Platforms
- Coursera, edX and freeCodeCamp for structured tracks

## 3-6 Month Learning Path
1. Months 1-2: consolidate SQL and Python fundamentals
2. Months 3-4: build two portfolio projects with public datasets
3. Months 5-6: sit the first certification and start applying
"#
            .to_string())
        } else if prompt.contains("Top 3 career options") {
            Ok(r#"## Top 3 Career Options
1. Data Analyst
2. Backend Developer
3. Machine Learning Engineer

## 6-Month Roadmap
- Month 1-2: Data structures, SQL, Git
- Month 3-4: Web APIs and a capstone project
- Month 5-6: Internship applications and interview practice

## Project & Internship Ideas
- Build a dashboard from open government data

## Certifications
- AWS Certified Cloud Practitioner
"#
            .to_string())
        } else {
            Ok("Mock career advice".to_string())
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
