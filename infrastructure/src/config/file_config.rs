//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain/application
//! types at wiring time.

use colloquy_application::{DriverConfig, TickCommit};
use colloquy_domain::{DEFAULT_CAPACITY, DomainError, TopicSeeds};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("log.capacity must be at least 1")]
    InvalidCapacity,

    #[error("driver.agents must name exactly two agents (got {0})")]
    WrongAgentCount(usize),

    #[error("agent name cannot be empty")]
    EmptyAgentName,

    #[error("agent names must differ (both are {0:?})")]
    DuplicateAgentName(String),

    #[error("topics.seeds must contain at least one non-empty topic")]
    EmptyTopicSeeds,

    #[error("generator.model cannot be empty")]
    EmptyModelName,

    #[error("generator.max_tokens cannot be 0")]
    InvalidMaxTokens,
}

/// Raw log configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Maximum number of retained entries
    pub capacity: usize,
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Raw driver configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDriverConfig {
    /// The two agent names, asker first
    pub agents: Vec<String>,
    /// Pause between ticks in seconds (0 = back-to-back)
    pub tick_interval_secs: u64,
    /// Per-call generation limit in seconds (0 = no limit)
    pub generation_timeout_secs: u64,
    /// Items each agent remembers (0 = unbounded)
    pub memory_limit: usize,
    /// Commit each tick's four entries as one batch
    pub atomic_ticks: bool,
}

impl Default for FileDriverConfig {
    fn default() -> Self {
        Self {
            agents: vec!["Bot 1".to_string(), "Bot 2".to_string()],
            tick_interval_secs: 10,
            generation_timeout_secs: 120,
            memory_limit: 0,
            atomic_ticks: false,
        }
    }
}

impl FileDriverConfig {
    /// Convert into the application's driver parameters
    pub fn to_driver_config(&self) -> DriverConfig {
        DriverConfig::default()
            .with_tick_interval(Duration::from_secs(self.tick_interval_secs))
            .with_generation_timeout_secs(self.generation_timeout_secs)
            .with_memory_limit(self.memory_limit)
            .with_tick_commit(TickCommit::from_atomic_flag(self.atomic_ticks))
    }

    /// The configured pair of agent names
    pub fn agent_pair(&self) -> Option<(String, String)> {
        match self.agents.as_slice() {
            [first, second] => Some((first.clone(), second.clone())),
            _ => None,
        }
    }
}

/// Raw topic configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTopicsConfig {
    /// General topics for opening questions
    pub seeds: Vec<String>,
}

impl Default for FileTopicsConfig {
    fn default() -> Self {
        Self {
            seeds: TopicSeeds::default().topics().to_vec(),
        }
    }
}

impl FileTopicsConfig {
    pub fn to_seeds(&self) -> Result<TopicSeeds, DomainError> {
        TopicSeeds::new(self.seeds.iter().cloned())
    }
}

/// Which text generator backs the conversation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorProvider {
    /// Offline sentence builder; needs no model server
    #[default]
    Babble,
    /// Any server speaking the OpenAI completions API
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

impl std::fmt::Display for GeneratorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorProvider::Babble => write!(f, "babble"),
            GeneratorProvider::OpenAi => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for GeneratorProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "babble" => Ok(GeneratorProvider::Babble),
            "openai" | "openai-compatible" => Ok(GeneratorProvider::OpenAi),
            other => Err(format!("unknown generator provider: {}", other)),
        }
    }
}

/// Raw generator configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeneratorConfig {
    pub provider: GeneratorProvider,
    /// Base URL of the completions API, e.g. `http://localhost:8080/v1`
    pub base_url: String,
    pub model: String,
    /// Completion length limit
    pub max_tokens: u32,
    /// Environment variable holding the API key (optional for local servers)
    pub api_key_env: Option<String>,
    /// Summarize prior context before picking a follow-up keyword
    pub summarize_subtopics: bool,
    /// Seed for the offline generator; random when unset
    pub seed: Option<u64>,
}

impl Default for FileGeneratorConfig {
    fn default() -> Self {
        Self {
            provider: GeneratorProvider::default(),
            base_url: "http://localhost:8080/v1".to_string(),
            model: "distilgpt2".to_string(),
            max_tokens: 250,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            summarize_subtopics: true,
            seed: None,
        }
    }
}

/// Raw transcript configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranscriptConfig {
    /// JSONL transcript path; unset or empty disables the transcript
    pub path: Option<String>,
}

impl FileTranscriptConfig {
    pub fn enabled_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub log: FileLogConfig,
    pub driver: FileDriverConfig,
    pub topics: FileTopicsConfig,
    pub generator: FileGeneratorConfig,
    pub transcript: FileTranscriptConfig,
}

impl FileConfig {
    /// Validate the configuration; reports the first problem found
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.log.capacity == 0 {
            return Err(ConfigValidationError::InvalidCapacity);
        }

        if self.driver.agents.len() != 2 {
            return Err(ConfigValidationError::WrongAgentCount(
                self.driver.agents.len(),
            ));
        }
        let mut names = HashSet::new();
        for name in &self.driver.agents {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigValidationError::EmptyAgentName);
            }
            if !names.insert(name) {
                return Err(ConfigValidationError::DuplicateAgentName(name.to_string()));
            }
        }

        if self.topics.seeds.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyTopicSeeds);
        }

        if self.generator.provider == GeneratorProvider::OpenAi {
            if self.generator.model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName);
            }
            if self.generator.max_tokens == 0 {
                return Err(ConfigValidationError::InvalidMaxTokens);
            }
        }

        Ok(())
    }
}
