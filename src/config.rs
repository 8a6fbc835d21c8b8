use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::util::SecretString;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and professional AI career advisor.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub submissions: SubmissionsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "openai-compatible")]
    OpenAiCompatible,
    Anthropic,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAi => "openai",
            Provider::OpenAiCompatible => "openai-compatible",
            Provider::Anthropic => "anthropic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: Provider,
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the key, looked up in the secrets file first and then in the
    /// environment. "none" disables authentication.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    /// TOML file holding secrets as top-level string keys.
    #[serde(default = "default_secrets_file")]
    pub secrets_file: Option<PathBuf>,

    /// For openai-compatible gateways.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Sent only when set; anthropic falls back to 4096 since it requires one.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// No request timeout unless set; the transport default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    pub fn get_max_tokens(&self) -> Option<u32> {
        match (self.max_tokens, self.provider) {
            (Some(tokens), _) => Some(tokens),
            (None, Provider::Anthropic) => Some(4096),
            (None, _) => None,
        }
    }

    pub fn get_base_url(&self) -> String {
        match (&self.base_url, self.provider) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Provider::OpenAi) => "https://api.openai.com/v1".to_string(),
            (None, Provider::OpenAiCompatible) => "http://localhost:11434/v1".to_string(),
            (None, Provider::Anthropic) => "https://api.anthropic.com/v1".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            secrets_file: default_secrets_file(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: None,
        }
    }
}

fn default_provider() -> Provider {
    Provider::OpenAi
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_secrets_file() -> Option<PathBuf> {
    Some(PathBuf::from("secrets.toml"))
}

fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Persona sent as the system message. Empty string sends none.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Degree slots accepted from the professional form.
    #[serde(default = "default_max_degrees")]
    pub max_degrees: usize,

    /// Degree slots accepted from the student form.
    #[serde(default = "default_student_max_degrees")]
    pub student_max_degrees: usize,
}

impl AdvisorConfig {
    pub fn system_prompt(&self) -> Option<&str> {
        let prompt = self.system_prompt.trim();
        (!prompt.is_empty()).then_some(prompt)
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_degrees: default_max_degrees(),
            student_max_degrees: default_student_max_degrees(),
        }
    }
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_max_degrees() -> usize {
    5
}

fn default_student_max_degrees() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionsConfig {
    /// Directory holding the per-variant CSV logs.
    #[serde(default = "default_submissions_dir")]
    pub directory: PathBuf,
}

impl Default for SubmissionsConfig {
    fn default() -> Self {
        Self {
            directory: default_submissions_dir(),
        }
    }
}

fn default_submissions_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Load config from the working directory or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        if let Ok(config) = Self::load_from_path("pathfinder.toml") {
            debug!("Loaded config from ./pathfinder.toml");
            return Ok(config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("pathfinder").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the API key: secrets file first, environment variable second.
    pub fn get_api_key(&self) -> Result<SecretString> {
        let Some(key_name) = &self.llm.api_key_env else {
            return Ok(SecretString::default());
        };

        if key_name.eq_ignore_ascii_case("none") {
            return Ok(SecretString::default());
        }

        if let Some(secrets_file) = &self.llm.secrets_file {
            if let Some(key) = read_secret(secrets_file, key_name)? {
                debug!("Resolved {} from {}", key_name, secrets_file.display());
                return Ok(key);
            }
        }

        match env::var(key_name) {
            Ok(value) => Ok(value.into()),
            // Local gateways often run without a key
            Err(_) if self.llm.provider == Provider::OpenAiCompatible => {
                Ok(SecretString::default())
            }
            Err(_) => Err(anyhow::anyhow!(
                "API key not found in secrets file or environment variable: {}",
                key_name
            )),
        }
    }
}

/// Look up `key` in a TOML secrets file. A missing file is not an error.
fn read_secret(path: &Path, key: &str) -> Result<Option<SecretString>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read secrets file {}", path.display()))?;
    let table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse secrets file {}", path.display()))?;
    Ok(table
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(|v| SecretString::new(v.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, Provider::OpenAi);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.api_key_env, Some("OPENAI_API_KEY".to_string()));
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.llm.timeout_secs, None);
        assert_eq!(config.advisor.max_degrees, 5);
        assert_eq!(config.advisor.student_max_degrees, 3);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("provider = \"openai\""));
        assert!(toml_str.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[llm]
provider = "openai-compatible"
base_url = "http://gateway:4000/v1/"

[server]
port = 9000
"#,
        )
        .unwrap();
        assert_eq!(config.llm.provider, Provider::OpenAiCompatible);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.get_base_url(), "http://gateway:4000/v1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.advisor.system_prompt(), Some(DEFAULT_SYSTEM_PROMPT));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result: Result<Config, _> = toml::from_str("[llm]\nprovider = \"gemini\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_system_prompt_disables_persona() {
        let advisor = AdvisorConfig {
            system_prompt: "   ".to_string(),
            ..AdvisorConfig::default()
        };
        assert_eq!(advisor.system_prompt(), None);
    }

    #[test]
    fn test_max_tokens_defaults() {
        let mut llm = LlmConfig::default();
        assert_eq!(llm.get_max_tokens(), None);

        llm.provider = Provider::Anthropic;
        assert_eq!(llm.get_max_tokens(), Some(4096));

        llm.max_tokens = Some(1500);
        assert_eq!(llm.get_max_tokens(), Some(1500));
    }

    #[test]
    fn test_base_url_defaults() {
        let mut llm = LlmConfig::default();
        assert_eq!(llm.get_base_url(), "https://api.openai.com/v1");
        llm.provider = Provider::OpenAiCompatible;
        assert_eq!(llm.get_base_url(), "http://localhost:11434/v1");
        llm.provider = Provider::Anthropic;
        assert_eq!(llm.get_base_url(), "https://api.anthropic.com/v1");
    }

    #[test]
    fn test_load_with_explicit_missing_path_fails() {
        let result = Config::load_with_path(Some("/nonexistent/pathfinder.toml".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_with_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\nmodel = \"gpt-4o-mini\"\ntemperature = 0.2").unwrap();
        let config =
            Config::load_with_path(Some(file.path().to_string_lossy().to_string())).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    #[serial]
    fn test_api_key_from_secrets_file_wins() {
        let mut secrets = tempfile::NamedTempFile::new().unwrap();
        writeln!(secrets, "PATHFINDER_TEST_KEY_A = \"from-secrets\"").unwrap();
        env::set_var("PATHFINDER_TEST_KEY_A", "from-env");

        let mut config = Config::default();
        config.llm.api_key_env = Some("PATHFINDER_TEST_KEY_A".to_string());
        config.llm.secrets_file = Some(secrets.path().to_path_buf());

        let key = config.get_api_key().unwrap();
        assert_eq!(key.expose(), "from-secrets");
        env::remove_var("PATHFINDER_TEST_KEY_A");
    }

    #[test]
    #[serial]
    fn test_api_key_falls_back_to_env() {
        env::set_var("PATHFINDER_TEST_KEY_B", "from-env");
        let mut config = Config::default();
        config.llm.api_key_env = Some("PATHFINDER_TEST_KEY_B".to_string());
        config.llm.secrets_file = Some(PathBuf::from("/nonexistent/secrets.toml"));

        let key = config.get_api_key().unwrap();
        assert_eq!(key.expose(), "from-env");
        env::remove_var("PATHFINDER_TEST_KEY_B");
    }

    #[test]
    #[serial]
    fn test_api_key_missing_fails() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("PATHFINDER_NONEXISTENT_KEY_XYZ".to_string());
        config.llm.secrets_file = None;

        let err = config.get_api_key().unwrap_err();
        assert!(err.to_string().contains("API key not found"));
    }

    #[test]
    fn test_api_key_none_disables_auth() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("none".to_string());
        assert!(config.get_api_key().unwrap().is_unset());
    }

    #[test]
    #[serial]
    fn test_api_key_openai_compatible_missing_ok() {
        let mut config = Config::default();
        config.llm.provider = Provider::OpenAiCompatible;
        config.llm.api_key_env = Some("PATHFINDER_NONEXISTENT_KEY_OAI_999".to_string());
        config.llm.secrets_file = None;
        assert!(config.get_api_key().unwrap().is_unset());
    }

    #[test]
    fn test_malformed_secrets_file_is_an_error() {
        let mut secrets = tempfile::NamedTempFile::new().unwrap();
        writeln!(secrets, "this is = = not toml").unwrap();
        let mut config = Config::default();
        config.llm.secrets_file = Some(secrets.path().to_path_buf());
        let err = config.get_api_key().unwrap_err();
        assert!(err.to_string().contains("Failed to parse secrets file"));
    }
}
