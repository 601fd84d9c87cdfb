//! Runtime executable resolution

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Locates the executable that runs the synthesis script
///
/// A bare program name is searched on `PATH` first, then in each fallback
/// location in order. A program given as a path is used as-is if it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLocator {
    program: String,
    fallbacks: Vec<PathBuf>,
}

impl RuntimeLocator {
    /// Create a locator for `program` with explicit fallback locations
    #[must_use]
    pub fn new(program: impl Into<String>, fallbacks: Vec<PathBuf>) -> Self {
        Self {
            program: program.into(),
            fallbacks,
        }
    }

    /// Program name or path being resolved
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Fallback locations, in search order
    #[must_use]
    pub fn fallbacks(&self) -> &[PathBuf] {
        &self.fallbacks
    }

    /// Resolve the runtime to an executable path
    ///
    /// # Errors
    ///
    /// Returns `Error::RuntimeNotFound` naming the program if no candidate exists
    pub fn resolve(&self) -> Result<PathBuf> {
        let candidate = Path::new(&self.program);

        if candidate.components().count() > 1 {
            if candidate.is_file() {
                return Ok(candidate.canonicalize()?);
            }
        } else if let Ok(path) = which::which(&self.program) {
            return Ok(path);
        }

        let resolved = self.fallbacks.iter().find(|p| p.is_file()).cloned();

        match resolved {
            Some(path) => {
                tracing::debug!(
                    program = %self.program,
                    path = %path.display(),
                    "runtime not on PATH, using fallback"
                );
                Ok(path)
            }
            None => Err(Error::RuntimeNotFound(self.program.clone())),
        }
    }
}
