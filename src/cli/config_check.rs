use anyhow::Result;
use std::fs;

use crate::config::{Config, Provider};

#[derive(Debug, Default)]
pub struct CheckResult {
    pub passed: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CheckResult {
    fn pass(&mut self, msg: impl Into<String>) {
        self.passed.push(msg.into());
    }

    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }
}

pub fn run(config_path: Option<String>) -> Result<()> {
    let mut results = CheckResult::default();

    let config = match Config::load_with_path(config_path.clone()) {
        Ok(config) => {
            let source = config_path.as_deref().unwrap_or("default search path");
            results.pass(format!("Config loaded from {}", source));
            config
        }
        Err(e) => {
            // Reported through print_results rather than propagated.
            results.error(format!("Failed to load config: {:#}", e));
            print_results(&results);
            return Ok(());
        }
    };

    check(&config, &mut results);
    print_results(&results);
    Ok(())
}

/// Inspect a loaded config without touching the network.
pub fn check(config: &Config, results: &mut CheckResult) {
    results.pass(format!(
        "LLM provider: {} (model: {}, temperature: {})",
        config.llm.provider, config.llm.model, config.llm.temperature
    ));

    if !(0.0..=2.0).contains(&config.llm.temperature) {
        results.warn(format!(
            "temperature {} is outside the usual 0.0-2.0 range",
            config.llm.temperature
        ));
    }

    match config.get_api_key() {
        Ok(key) if key.is_unset() => {
            if config.llm.provider == Provider::OpenAiCompatible {
                results.pass("No API key (allowed for openai-compatible)");
            } else {
                results.warn("API key disabled; requests will be unauthenticated");
            }
        }
        Ok(_) => {
            let source = config
                .llm
                .api_key_env
                .as_deref()
                .unwrap_or("<unnamed>");
            results.pass(format!("API key resolved ({})", source));
        }
        Err(e) => results.error(format!("{:#}", e)),
    }

    if config.llm.provider == Provider::OpenAiCompatible && config.llm.base_url.is_none() {
        results.warn(format!(
            "openai-compatible provider without base_url; using {}",
            config.llm.get_base_url()
        ));
    }

    match config.llm.timeout_secs {
        Some(secs) => results.pass(format!("Request timeout: {}s", secs)),
        None => results.pass("Request timeout: transport default"),
    }

    match config.advisor.system_prompt() {
        Some(_) => results.pass("System prompt configured"),
        None => results.warn("No system prompt; requests carry only the user message"),
    }

    if config.advisor.max_degrees == 0 || config.advisor.student_max_degrees == 0 {
        results.warn("A degree limit of 0 drops every submitted degree");
    }

    let dir = &config.submissions.directory;
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {
            results.pass(format!("Submission log directory: {}", dir.display()))
        }
        Ok(_) => results.error(format!(
            "Submission log path is not a directory: {}",
            dir.display()
        )),
        Err(_) => results.warn(format!(
            "Submission log directory {} does not exist yet; it will be created",
            dir.display()
        )),
    }

    results.pass(format!(
        "Server: {}:{}",
        config.server.host, config.server.port
    ));
}

fn print_results(results: &CheckResult) {
    println!();
    for msg in &results.passed {
        println!("  \u{2713} {}", msg);
    }
    for msg in &results.warnings {
        println!("  ! {}", msg);
    }
    for msg in &results.errors {
        println!("  \u{2717} {}", msg);
    }
    println!();
    println!(
        "{} passed, {} warnings, {} errors",
        results.passed.len(),
        results.warnings.len(),
        results.errors.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_check_reports_missing_key() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("PATHFINDER_CHECK_MISSING_KEY".to_string());
        config.llm.secrets_file = None;

        let mut results = CheckResult::default();
        check(&config, &mut results);
        assert_eq!(results.errors.len(), 1);
        assert!(results.errors[0].contains("API key not found"));
    }

    #[test]
    #[serial]
    fn test_check_passes_with_env_key() {
        env::set_var("PATHFINDER_CHECK_KEY", "sk-test");
        let mut config = Config::default();
        config.llm.api_key_env = Some("PATHFINDER_CHECK_KEY".to_string());
        config.llm.secrets_file = None;
        config.submissions.directory = env::temp_dir();

        let mut results = CheckResult::default();
        check(&config, &mut results);
        assert!(results.errors.is_empty());
        assert!(results
            .passed
            .iter()
            .any(|m| m.contains("API key resolved (PATHFINDER_CHECK_KEY)")));
        assert!(!results.passed.iter().any(|m| m.contains("sk-test")));
        env::remove_var("PATHFINDER_CHECK_KEY");
    }

    #[test]
    fn test_check_warns_on_compatible_without_base_url() {
        let mut config = Config::default();
        config.llm.provider = Provider::OpenAiCompatible;
        config.llm.api_key_env = Some("none".to_string());

        let mut results = CheckResult::default();
        check(&config, &mut results);
        assert!(results
            .warnings
            .iter()
            .any(|m| m.contains("http://localhost:11434/v1")));
    }

    #[test]
    fn test_check_flags_file_as_log_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.llm.api_key_env = None;
        config.submissions.directory = file.path().to_path_buf();

        let mut results = CheckResult::default();
        check(&config, &mut results);
        assert!(results
            .errors
            .iter()
            .any(|m| m.contains("not a directory")));
    }
}
