//! Mode registry: maps a persona mode to its system prompt, personality and
//! presentation style. Built once at startup and only read afterwards.

use crate::error::{ChatError, ChatResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Persona mode selected by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Bff,
    Shopper,
    Coach,
    Manager,
    Girlfriend,
    Regular,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Bff,
        Mode::Shopper,
        Mode::Coach,
        Mode::Manager,
        Mode::Girlfriend,
        Mode::Regular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Bff => "bff",
            Mode::Shopper => "shopper",
            Mode::Coach => "coach",
            Mode::Manager => "manager",
            Mode::Girlfriend => "girlfriend",
            Mode::Regular => "regular",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bff" => Ok(Mode::Bff),
            "shopper" => Ok(Mode::Shopper),
            "coach" => Ok(Mode::Coach),
            "manager" => Ok(Mode::Manager),
            "girlfriend" => Ok(Mode::Girlfriend),
            "regular" | "default" => Ok(Mode::Regular),
            other => Err(ChatError::InvalidMode(other.to_string())),
        }
    }
}

/// How the model's reply is delivered to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Paced chunks, each trimmed and followed by [`crate::CHUNK_DELIMITER`].
    Chunked,
    /// Deltas passed straight through.
    Raw,
}

/// Static configuration of one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeConfig {
    pub mode: Mode,
    pub system_prompt: &'static str,
    pub personality: &'static str,
}

static MODE_TABLE: [ModeConfig; 6] = [
    ModeConfig {
        mode: Mode::Bff,
        system_prompt: "You are Maya, the user's best friend. Chat casually, react to what they share, ask about their day and keep things light and fun.",
        personality: "friendly, playful, supportive, uses casual language and slang, genuinely curious",
    },
    ModeConfig {
        mode: Mode::Shopper,
        system_prompt: "You are Maya, a knowledgeable personal shopping assistant. Help the user find, compare and choose products that match their needs and budget.",
        personality: "helpful, detail-oriented, honest about trade-offs, trend-aware",
    },
    ModeConfig {
        mode: Mode::Coach,
        system_prompt: "You are Maya, a motivational life and fitness coach. Help the user set goals, stay accountable and build healthy habits.",
        personality: "encouraging, energetic, direct, celebrates progress",
    },
    ModeConfig {
        mode: Mode::Manager,
        system_prompt: "You are Maya, an efficient task and project manager. Help the user plan their day, prioritise work and break projects into actionable steps.",
        personality: "organized, concise, pragmatic, focused on outcomes",
    },
    ModeConfig {
        mode: Mode::Girlfriend,
        system_prompt: "You are Maya, a caring and affectionate companion. Be warm, attentive and emotionally supportive in conversation.",
        personality: "caring, sweet, attentive, emotionally expressive",
    },
    ModeConfig {
        mode: Mode::Regular,
        system_prompt: "You are Maya, a helpful AI assistant.",
        personality: "clear, friendly, helpful",
    },
];

/// Read-only mode registry. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    chunked: HashSet<Mode>,
}

impl ModeRegistry {
    /// Registry with the given chunked-mode names. Unknown names are an error so a
    /// typo in config fails at startup rather than silently changing presentation.
    pub fn new<S: AsRef<str>>(chunked_modes: &[S]) -> ChatResult<Self> {
        let chunked = chunked_modes
            .iter()
            .map(|name| name.as_ref().parse::<Mode>())
            .collect::<ChatResult<HashSet<_>>>()?;
        Ok(Self { chunked })
    }

    /// Looks up a mode by its wire name.
    pub fn resolve(&self, name: &str) -> ChatResult<&'static ModeConfig> {
        let mode: Mode = name.parse()?;
        Ok(self.get(mode))
    }

    pub fn get(&self, mode: Mode) -> &'static ModeConfig {
        MODE_TABLE
            .iter()
            .find(|c| c.mode == mode)
            .unwrap_or(&MODE_TABLE[MODE_TABLE.len() - 1])
    }

    pub fn presentation(&self, mode: Mode) -> Presentation {
        if self.chunked.contains(&mode) {
            Presentation::Chunked
        } else {
            Presentation::Raw
        }
    }

    /// Wire names of every registered mode.
    pub fn mode_names(&self) -> Vec<&'static str> {
        Mode::ALL.iter().map(Mode::as_str).collect()
    }

    /// Wire names of the chunked modes, in registry order.
    pub fn chunked_mode_names(&self) -> Vec<&'static str> {
        Mode::ALL
            .iter()
            .filter(|m| self.chunked.contains(*m))
            .map(Mode::as_str)
            .collect()
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self {
            chunked: [Mode::Bff, Mode::Girlfriend].into_iter().collect(),
        }
    }
}
