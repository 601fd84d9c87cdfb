//! Snooze Bridge - turns short intents into spoken wake-up replies
//!
//! A client posts an intent such as "pep talk"; the bridge asks a language
//! model for a two-sentence spoken reply, runs an external synthesis script to
//! vocalize it, and remembers the last interaction.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  POST /gemini   ┌────────────────────────────┐
//! │    Client    │ ───────────────▶│          Bridge            │
//! └──────────────┘                 │  prompt │ cache │ launcher │
//!                                  └────┬───────────────┬───────┘
//!                                       │               │
//!                         ┌─────────────▼──┐   ┌────────▼────────┐
//!                         │  Gemini API    │   │ runtime script  │
//!                         │ (ReplyGenerator)│   │  (speech/TTS)   │
//!                         └────────────────┘   └─────────────────┘
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod speech;

pub use api::{ApiServer, ApiServerBuilder, ApiState};
pub use cache::{InteractionCache, InteractionRecord};
pub use config::Config;
pub use error::{Error, Result};
pub use llm::{GeminiClient, ReplyGenerator};
pub use speech::{RuntimeLocator, SpeechLauncher, SpeechRun};
