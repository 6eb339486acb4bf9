//! Shared types used across all Maya crates.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One entry of the conversation history. History is append-only; nothing in
/// this workspace rewrites a turn once the client has sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Global application configuration (gateway + model settings). Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity shown by the status endpoint.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// LLM mode ("mock" or "live").
    pub llm_mode: String,
    /// Model name sent to the completion endpoint.
    pub model: String,
    /// Base URL of the OpenAI-compatible API (without the `/chat/completions` suffix).
    pub api_base_url: String,
    /// Modes whose replies are delivered as paced, delimited chunks.
    #[serde(default = "default_chunked_modes")]
    pub chunked_modes: Vec<String>,
    /// Lower bound between two chunk emissions, in milliseconds.
    #[serde(default = "default_min_chunk_gap_ms")]
    pub min_chunk_gap_ms: u64,
    /// Preferred spacing between chunk emissions, in milliseconds.
    #[serde(default = "default_target_chunk_gap_ms")]
    pub target_chunk_gap_ms: u64,
}

fn default_chunked_modes() -> Vec<String> {
    vec!["bff".to_string(), "girlfriend".to_string()]
}

fn default_min_chunk_gap_ms() -> u64 {
    150
}

fn default_target_chunk_gap_ms() -> u64 {
    300
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "Maya Gateway".to_string(),
            port: 8001,
            llm_mode: "mock".to_string(),
            model: "gpt-4-turbo-preview".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            chunked_modes: default_chunked_modes(),
            min_chunk_gap_ms: default_min_chunk_gap_ms(),
            target_chunk_gap_ms: default_target_chunk_gap_ms(),
        }
    }
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `MAYA__*` > file
    /// (`MAYA_CONFIG` path, else `config/gateway.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("MAYA_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("llm_mode", defaults.llm_mode)?
            .set_default("model", defaults.model)?
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("chunked_modes", defaults.chunked_modes)?
            .set_default("min_chunk_gap_ms", defaults.min_chunk_gap_ms)?
            .set_default("target_chunk_gap_ms", defaults.target_chunk_gap_ms)?;

        let path = Path::new(&config_path);
        let with_ext = path.with_extension("toml");
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else if with_ext.exists() {
            builder.add_source(config::File::from(with_ext.as_path()))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("MAYA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("chunked_modes")
                    .try_parsing(true),
            )
            .build()?;

        built.try_deserialize()
    }

    /// True when the live model endpoint should be used instead of the mock router.
    pub fn is_live(&self) -> bool {
        self.llm_mode.eq_ignore_ascii_case("live")
    }

    pub fn min_chunk_gap(&self) -> Duration {
        Duration::from_millis(self.min_chunk_gap_ms)
    }

    pub fn target_chunk_gap(&self) -> Duration {
        Duration::from_millis(self.target_chunk_gap_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_roles_serialize_lowercase() {
        let json = serde_json::to_value(Turn::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        let turn: Turn = serde_json::from_str(r#"{"role":"user","content":"yo"}"#).unwrap();
        assert_eq!(turn, Turn::user("yo"));
    }

    #[test]
    fn default_config_chunks_bff_and_girlfriend() {
        let config = CoreConfig::default();
        assert_eq!(config.chunked_modes, vec!["bff", "girlfriend"]);
        assert_eq!(config.min_chunk_gap(), Duration::from_millis(150));
        assert_eq!(config.target_chunk_gap(), Duration::from_millis(300));
        assert!(!config.is_live());
    }
}
