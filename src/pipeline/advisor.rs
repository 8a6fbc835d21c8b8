use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::collector::{Collector, SubmissionForm};
use crate::config::Config;
use crate::error::AdvisorError;
use crate::llm::client::{conversation, LlmClient};
use crate::llm::prompts;
use crate::profile::{CareerProfile, ExperienceLevel};
use crate::submission_log::{SubmissionLog, SubmissionRecord};

/// The model's answer, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoadmapResponse {
    pub roadmap: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
}

/// Handles one submission at a time: collect, log, ask, answer.
pub struct Advisor {
    client: Box<dyn LlmClient>,
    log: Arc<dyn SubmissionLog>,
    collector: Collector,
    system_prompt: Option<String>,
}

impl Advisor {
    pub fn new(client: Box<dyn LlmClient>, log: Box<dyn SubmissionLog>) -> Self {
        Self {
            client,
            log: Arc::from(log),
            collector: Collector::default(),
            system_prompt: Some(crate::config::DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }

    pub fn from_config(
        config: &Config,
        client: Box<dyn LlmClient>,
        log: Box<dyn SubmissionLog>,
    ) -> Self {
        Self::new(client, log)
            .with_collector(Collector::new(
                config.advisor.max_degrees,
                config.advisor.student_max_degrees,
            ))
            .with_system_prompt(config.advisor.system_prompt().map(str::to_string))
    }

    pub fn with_collector(mut self, collector: Collector) -> Self {
        self.collector = collector;
        self
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub async fn submit(&self, form: SubmissionForm) -> Result<RoadmapResponse, AdvisorError> {
        let profile = self.collector.collect(form)?;
        self.advise(&profile).await
    }

    /// The log row is written before the model is called and is kept even
    /// when the call fails.
    pub async fn advise(&self, profile: &CareerProfile) -> Result<RoadmapResponse, AdvisorError> {
        info!(
            "Handling {} submission with model {}",
            profile.variant_name(),
            self.client.model()
        );

        self.record(SubmissionRecord::from(profile)).await;

        let prompt = prompts::compile(profile);
        let messages = conversation(self.system_prompt.as_deref(), &prompt);

        let roadmap = self.client.complete(&messages).await.map_err(|e| {
            warn!("Chat completion failed: {:#}", e);
            AdvisorError::external(&e)
        })?;

        let experience_level = match profile {
            CareerProfile::Professional(p) => Some(p.experience_level),
            CareerProfile::Student(_) => None,
        };

        Ok(RoadmapResponse {
            roadmap,
            experience_level,
        })
    }

    /// File I/O runs on the blocking pool so a slow disk never stalls a
    /// request worker. Failures are logged and swallowed.
    async fn record(&self, record: SubmissionRecord) {
        let log = Arc::clone(&self.log);
        match tokio::task::spawn_blocking(move || log.append(&record)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to record submission: {:#}", e),
            Err(e) => warn!("Submission log task failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::{ChatMessage, MockLlmClient, Role};
    use crate::pipeline::collector::{ProfessionalForm, StudentForm};
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct RecordingClient {
        calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
        fail: bool,
    }

    #[async_trait]
    impl LlmClient for RecordingClient {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.calls.lock().unwrap().push(messages.to_vec());
            if self.fail {
                bail!("OpenAI API error 429 Too Many Requests: quota exceeded");
            }
            Ok("**Roadmap** as markdown".to_string())
        }

        fn model(&self) -> &str {
            "recording"
        }
    }

    #[derive(Default, Clone)]
    struct MemoryLog {
        rows: Arc<Mutex<Vec<SubmissionRecord>>>,
    }

    impl SubmissionLog for MemoryLog {
        fn append(&self, record: &SubmissionRecord) -> Result<()> {
            self.rows.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct ThreadLog {
        threads: Arc<Mutex<Vec<std::thread::ThreadId>>>,
    }

    impl SubmissionLog for ThreadLog {
        fn append(&self, _record: &SubmissionRecord) -> Result<()> {
            self.threads
                .lock()
                .unwrap()
                .push(std::thread::current().id());
            Ok(())
        }
    }

    struct BrokenLog;

    impl SubmissionLog for BrokenLog {
        fn append(&self, _record: &SubmissionRecord) -> Result<()> {
            bail!("disk full")
        }
    }

    fn student(gpa: &str) -> SubmissionForm {
        SubmissionForm::Student(StudentForm {
            gpa: gpa.to_string(),
            skills: "Python, SQL".to_string(),
            interests: "Data".to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_missing_fields_skip_call_and_log() {
        let client = RecordingClient::default();
        let log = MemoryLog::default();
        let advisor = Advisor::new(Box::new(client.clone()), Box::new(log.clone()));

        let err = advisor.submit(student("")).await.unwrap_err();
        assert_eq!(err, AdvisorError::missing_fields());
        assert!(client.calls.lock().unwrap().is_empty());
        assert!(log.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_returns_text_verbatim() {
        let client = RecordingClient::default();
        let log = MemoryLog::default();
        let advisor = Advisor::new(Box::new(client.clone()), Box::new(log.clone()));

        let response = advisor.submit(student("3.8")).await.unwrap();
        assert_eq!(response.roadmap, "**Roadmap** as markdown");
        assert_eq!(response.experience_level, None);
        assert_eq!(log.rows.lock().unwrap().len(), 1);

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, Role::System);
        assert_eq!(calls[0][1].role, Role::User);
        assert!(calls[0][1].content.contains("- GPA: 3.8"));
    }

    #[tokio::test]
    async fn test_external_failure_still_logs() {
        let client = RecordingClient {
            fail: true,
            ..Default::default()
        };
        let log = MemoryLog::default();
        let advisor = Advisor::new(Box::new(client), Box::new(log.clone()));

        let err = advisor
            .submit(SubmissionForm::Professional(ProfessionalForm::default()))
            .await
            .unwrap_err();
        assert!(!err.is_validation());
        assert!(err.user_message().starts_with("Error: "));
        assert!(err.user_message().contains("quota exceeded"));
        assert_eq!(log.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_log_failure_does_not_block_advice() {
        let advisor = Advisor::new(Box::new(MockLlmClient::new()), Box::new(BrokenLog));
        let response = advisor
            .submit(SubmissionForm::Professional(ProfessionalForm {
                experience_years: 3,
                ..Default::default()
            }))
            .await
            .unwrap();
        assert!(response.roadmap.contains("3-6 Month Learning Path"));
        assert_eq!(response.experience_level, Some(ExperienceLevel::EarlyCareer));
    }

    #[tokio::test]
    async fn test_log_append_runs_off_the_request_thread() {
        let log = ThreadLog::default();
        let advisor = Advisor::new(Box::new(MockLlmClient::new()), Box::new(log.clone()));
        advisor.submit(student("3.1")).await.unwrap();

        // The current-thread runtime drives this test on the test thread
        let threads = log.threads.lock().unwrap();
        assert_eq!(threads.len(), 1);
        assert_ne!(threads[0], std::thread::current().id());
    }

    #[tokio::test]
    async fn test_without_system_prompt_sends_single_message() {
        let client = RecordingClient::default();
        let advisor = Advisor::new(Box::new(client.clone()), Box::new(MemoryLog::default()))
            .with_system_prompt(None);
        advisor.submit(student("3.0")).await.unwrap();
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].role, Role::User);
    }
}
