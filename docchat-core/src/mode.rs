//! Response verbosity mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocChatError;

/// How verbose answers should be.
///
/// The mode changes prompt phrasing and the generation system instruction.
/// It never changes which chunks are retrieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Brief, direct answers.
    #[default]
    Concise,
    /// Comprehensive answers with examples.
    Detailed,
}

impl Mode {
    /// Lowercase name used in configuration and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Concise => "concise",
            Mode::Detailed => "detailed",
        }
    }

    /// System instruction handed to the generation model alongside the prompt.
    pub fn system_instruction(&self) -> &'static str {
        match self {
            Mode::Concise => {
                "You are a helpful assistant. Provide very concise answers. \
                 Keep responses brief and under 50 words."
            }
            Mode::Detailed => {
                "You are a helpful assistant. Provide detailed answers with examples \
                 and explanations. Aim for 150-200 words."
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = DocChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concise" => Ok(Mode::Concise),
            "detailed" => Ok(Mode::Detailed),
            other => Err(DocChatError::Input(format!(
                "unknown mode '{other}' (expected 'concise' or 'detailed')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Concise".parse::<Mode>().unwrap(), Mode::Concise);
        assert_eq!(" DETAILED ".parse::<Mode>().unwrap(), Mode::Detailed);
        assert!("verbose".parse::<Mode>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Mode::Detailed).unwrap(), "\"detailed\"");
        let mode: Mode = serde_json::from_str("\"concise\"").unwrap();
        assert_eq!(mode, Mode::Concise);
    }

    #[test]
    fn default_is_concise() {
        assert_eq!(Mode::default(), Mode::Concise);
        assert_eq!(Mode::default().to_string(), "concise");
    }
}
