use anyhow::Result;

use super::client::{LlmClient, MockLlmClient};
use super::client_impl::{AnthropicClient, OpenAIClient};
use crate::config::{Config, Provider};

/// Create an LLM client based on configuration
pub fn create_client(config: &Config, dry_run: bool) -> Result<Box<dyn LlmClient>> {
    if dry_run {
        return Ok(Box::new(MockLlmClient::new()));
    }

    let api_key = config.get_api_key()?;
    let llm = &config.llm;

    match llm.provider {
        Provider::OpenAi | Provider::OpenAiCompatible => Ok(Box::new(OpenAIClient::new(
            api_key,
            llm.model.clone(),
            llm.get_base_url(),
            llm.temperature,
            llm.get_max_tokens(),
            llm.timeout_secs,
        )?)),

        Provider::Anthropic => Ok(Box::new(AnthropicClient::new(
            api_key,
            llm.model.clone(),
            llm.get_base_url(),
            llm.temperature,
            llm.get_max_tokens().unwrap_or(4096),
            llm.timeout_secs,
        )?)),
    }
}
