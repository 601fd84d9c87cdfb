//! Speech synthesis process launching
//!
//! Resolves a runtime executable and runs the external synthesis script with
//! the reply text.

mod launcher;
mod runtime;

pub use launcher::{DEFAULT_TIMEOUT, SpeechLauncher, SpeechRun};
pub use runtime::RuntimeLocator;
