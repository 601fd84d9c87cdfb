//! Configuration management for the snooze bridge
//!
//! Values resolve as env > TOML file > default.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::speech::{self, RuntimeLocator};
use crate::{Error, Result};

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5001;

/// Default language model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default per-request language model timeout
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);

/// Default Gemini API base URL
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default speech runtime program
pub const DEFAULT_RUNTIME: &str = "node";

/// Install locations tried for the default runtime when it is not on `PATH`
pub const DEFAULT_RUNTIME_FALLBACKS: [&str; 3] =
    ["/usr/local/bin/node", "/usr/bin/node", "/opt/homebrew/bin/node"];

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Language model configuration
    pub llm: LlmConfig,

    /// Speech synthesis process configuration
    pub speech: SpeechConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

/// Language model configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// API base URL, without trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

/// Speech synthesis process configuration
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Path to the synthesis script
    pub script: PathBuf,

    /// Runtime resolution settings
    pub runtime: RuntimeLocator,

    /// Upper bound on process run time
    pub timeout: Duration,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Google Generative Language API key
    pub google: Option<SecretString>,

    /// `ElevenLabs` API key, forwarded to the synthesis process
    pub elevenlabs: Option<SecretString>,
}

impl ApiKeys {
    /// Google API key, required for any language model call
    ///
    /// # Errors
    ///
    /// Returns error if no key is configured
    pub fn require_google(&self) -> Result<SecretString> {
        self.google.clone().ok_or_else(|| {
            Error::Config("GOOGLE_API_KEY (or GEMINI_API_KEY) must be set".to_string())
        })
    }
}

impl Config {
    /// Load configuration from the process environment and the config file
    #[must_use]
    pub fn load() -> Self {
        let fc = file::load_config_file();
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed config file and an env lookup
    pub fn from_sources<F>(fc: file::BridgeConfigFile, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server = ServerConfig {
            host: env("SNOOZE_HOST")
                .or(fc.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env("SNOOZE_PORT")
                .or_else(|| env("PORT"))
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(DEFAULT_PORT),
        };

        let llm = LlmConfig {
            model: env("SNOOZE_LLM_MODEL")
                .or(fc.llm.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: env("SNOOZE_LLM_BASE_URL")
                .or(fc.llm.base_url)
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: env("SNOOZE_LLM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .or(fc.llm.timeout_secs)
                .map_or(DEFAULT_LLM_TIMEOUT, Duration::from_secs),
        };

        let program = env("SNOOZE_TTS_RUNTIME")
            .or(fc.speech.runtime)
            .unwrap_or_else(|| DEFAULT_RUNTIME.to_string());

        // Node install locations only make sense for the node runtime
        let fallbacks = fc.speech.fallbacks.unwrap_or_else(|| {
            if program == DEFAULT_RUNTIME {
                DEFAULT_RUNTIME_FALLBACKS.iter().map(ToString::to_string).collect()
            } else {
                Vec::new()
            }
        });

        let speech = SpeechConfig {
            script: env("SNOOZE_TTS_SCRIPT")
                .or(fc.speech.script)
                .map_or_else(|| PathBuf::from("src").join("tts.js"), PathBuf::from),
            runtime: RuntimeLocator::new(program, fallbacks.into_iter().map(PathBuf::from).collect()),
            timeout: env("SNOOZE_TTS_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .or(fc.speech.timeout_secs)
                .map_or(speech::DEFAULT_TIMEOUT, Duration::from_secs),
        };

        let api_keys = ApiKeys {
            google: env("GOOGLE_API_KEY")
                .or_else(|| env("GEMINI_API_KEY"))
                .or(fc.api_keys.google)
                .map(SecretString::from),
            elevenlabs: env("ELEVENLABS_API_KEY")
                .or(fc.api_keys.elevenlabs)
                .map(SecretString::from),
        };

        Self {
            server,
            llm,
            speech,
            api_keys,
        }
    }
}
