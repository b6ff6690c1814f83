//! Command-line arguments and the validated application configuration.
//!
//! Every credential can come from a flag or from the environment (which
//! `main` pre-populates from a `.env` file if one exists).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use docchat_core::{DocChatError, Mode, Result};
use docchat_telemetry::LogFormat;

/// Chat with a plain-text document.
#[derive(Parser, Debug, Clone)]
#[command(name = "docchat", version, about, long_about = None)]
pub struct Cli {
    /// Generation provider
    #[arg(
        long,
        value_enum,
        default_value_t = Provider::Gemini,
        env = "DOCCHAT_PROVIDER",
        global = true
    )]
    pub provider: Provider,

    /// Generation model (defaults to the provider's default)
    #[arg(long, env = "DOCCHAT_MODEL", global = true)]
    pub model: Option<String>,

    /// Embedding model (defaults to the provider's default)
    #[arg(long, env = "DOCCHAT_EMBEDDING_MODEL", global = true)]
    pub embedding_model: Option<String>,

    /// Number of chunks retrieved per question
    #[arg(long, default_value_t = 3, global = true)]
    pub top_k: usize,

    /// Seconds to wait for a generated answer before giving up
    #[arg(long, default_value_t = 60, global = true)]
    pub generation_timeout_secs: u64,

    /// Initial response mode: concise or detailed
    #[arg(long, default_value = "concise", global = true)]
    pub mode: Mode,

    /// Log output: pretty or json
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Augment prompts with SerpAPI web search results
    #[arg(long, global = true)]
    pub web_search: bool,

    /// Skip the embedding API and use random vectors
    #[arg(long, global = true)]
    pub offline_embeddings: bool,

    /// Chunk by blank-line separated paragraphs instead of lines
    #[arg(long, global = true)]
    pub paragraphs: bool,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,

    /// Embedding credential (defaults to the generation key)
    #[arg(long, env = "DOCCHAT_EMBEDDING_API_KEY", hide_env_values = true, global = true)]
    pub embedding_api_key: Option<String>,

    #[arg(long, env = "SERPAPI_KEY", hide_env_values = true, global = true)]
    pub serpapi_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat (the default)
    Chat {
        /// Document to load before the first prompt
        #[arg(long)]
        doc: Option<PathBuf>,
    },
    /// Answer a single question about a document and exit
    Ask {
        /// The document to ask about
        #[arg(long)]
        doc: PathBuf,
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Chat { doc: None }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    #[value(name = "openai")]
    OpenAi,
}

impl Provider {
    /// Environment variable holding this provider's key.
    pub fn key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-1.5-flash",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }
}

/// Validated settings used to assemble the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub provider: Provider,
    pub model: String,
    pub generation_api_key: String,
    /// `None` puts embeddings in degraded (random-vector) mode.
    pub embedding_api_key: Option<String>,
    pub embedding_model: Option<String>,
    /// `Some` when web search is enabled; the inner key may be absent.
    pub web_search: Option<Option<String>>,
    pub top_k: usize,
    pub generation_timeout: Duration,
    pub mode: Mode,
    pub paragraphs: bool,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl AppConfig {
    /// Validate parsed arguments.
    ///
    /// # Errors
    ///
    /// [`DocChatError::Config`] when the generation key for the chosen
    /// provider is missing, or `top_k` or the generation timeout is zero.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let generation_key = match cli.provider {
            Provider::Gemini => non_blank(&cli.gemini_api_key),
            Provider::OpenAi => non_blank(&cli.openai_api_key),
        };
        let generation_api_key = generation_key.ok_or_else(|| {
            DocChatError::Config(format!(
                "{} not found. Please set it in your environment or .env file",
                cli.provider.key_var()
            ))
        })?;

        if cli.top_k == 0 {
            return Err(DocChatError::Config("--top-k must be at least 1".into()));
        }
        if cli.generation_timeout_secs == 0 {
            return Err(DocChatError::Config("--generation-timeout-secs must be at least 1".into()));
        }

        let embedding_api_key = if cli.offline_embeddings {
            None
        } else {
            non_blank(&cli.embedding_api_key).or_else(|| Some(generation_api_key.clone()))
        };

        Ok(Self {
            provider: cli.provider,
            model: non_blank(&cli.model)
                .unwrap_or_else(|| cli.provider.default_model().to_string()),
            generation_api_key,
            embedding_api_key,
            embedding_model: non_blank(&cli.embedding_model),
            web_search: cli.web_search.then(|| non_blank(&cli.serpapi_key)),
            top_k: cli.top_k,
            generation_timeout: Duration::from_secs(cli.generation_timeout_secs),
            mode: cli.mode,
            paragraphs: cli.paragraphs,
        })
    }
}
