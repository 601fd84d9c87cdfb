//! Speech synthesis via an external script
//!
//! The script is opaque: it receives the reply text as its only argument and
//! is expected to produce and play audio on its own. Audio artifacts land in
//! the script's directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::RuntimeLocator;
use crate::config::{ApiKeys, SpeechConfig};
use crate::{Error, Result};

/// Default upper bound on a synthesis run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Captured output of a finished synthesis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRun {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Launches the synthesis script with a resolved runtime
#[derive(Debug, Clone)]
pub struct SpeechLauncher {
    script: PathBuf,
    runtime: RuntimeLocator,
    timeout: Duration,
    env: Vec<(String, SecretString)>,
}

impl SpeechLauncher {
    /// Create a launcher for `script` run by `runtime`
    #[must_use]
    pub fn new(script: impl Into<PathBuf>, runtime: RuntimeLocator) -> Self {
        Self {
            script: script.into(),
            runtime,
            timeout: DEFAULT_TIMEOUT,
            env: Vec::new(),
        }
    }

    /// Build a launcher from configuration, forwarding provider keys
    #[must_use]
    pub fn from_config(config: &SpeechConfig, keys: &ApiKeys) -> Self {
        let mut launcher =
            Self::new(config.script.clone(), config.runtime.clone()).timeout(config.timeout);

        if let Some(key) = &keys.elevenlabs {
            launcher = launcher.env("ELEVENLABS_API_KEY", key.clone());
        }

        launcher
    }

    /// Set the process timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add an environment variable for the child process
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: SecretString) -> Self {
        self.env.push((key.into(), value));
        self
    }

    /// Script path as configured
    #[must_use]
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Vocalize `text` and wait for the script to finish
    ///
    /// # Errors
    ///
    /// Returns error if the script or runtime is missing, the process cannot
    /// be spawned, runs past the timeout, or exits non-zero
    pub async fn speak(&self, text: &str) -> Result<SpeechRun> {
        // Absolute, since the child runs from the script's directory
        let script = match tokio::fs::canonicalize(&self.script).await {
            Ok(path) if path.is_file() => path,
            _ => return Err(Error::ScriptNotFound(self.script.clone())),
        };

        let runtime = self.runtime.resolve()?;

        tracing::debug!(
            runtime = %runtime.display(),
            script = %script.display(),
            "launching speech synthesis"
        );

        let mut cmd = Command::new(&runtime);
        cmd.arg(&script)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = script.parent() {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env {
            cmd.env(key, value.expose_secret());
        }

        let mut child = cmd.spawn()?;

        // Drained concurrently so output written before a timeout survives
        let stdout = PipeCapture::spawn(child.stdout.take());
        let stderr = PipeCapture::spawn(child.stderr.take());

        let status = match timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                if let Err(e) = child.start_kill() {
                    tracing::debug!(error = %e, "failed to kill timed out speech process");
                }
                stdout.abort();
                let stderr = stderr.take_now();
                return Err(Error::SpeechTimeout {
                    after: self.timeout,
                    stderr: stderr.trim().to_string(),
                });
            }
        };

        let stdout = stdout.finish().await;
        let stderr = stderr.finish().await;
        let exit_code = status.code().unwrap_or(-1);

        tracing::debug!(exit_code, stdout = %stdout, stderr = %stderr, "speech synthesis finished");

        if !status.success() {
            return Err(Error::SpeechFailed {
                code: exit_code,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(SpeechRun {
            stdout,
            stderr,
            exit_code,
        })
    }
}

/// Collects a child pipe on a background task
struct PipeCapture {
    chunks: mpsc::UnboundedReceiver<Vec<u8>>,
    task: JoinHandle<()>,
}

impl PipeCapture {
    fn spawn<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, chunks) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let Some(mut pipe) = pipe else { return };
            let mut buf = [0u8; 4096];
            loop {
                match pipe.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { chunks, task }
    }

    /// Wait for end of stream and return everything read
    async fn finish(mut self) -> String {
        let mut bytes = Vec::new();
        while let Some(chunk) = self.chunks.recv().await {
            bytes.extend_from_slice(&chunk);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Stop reading and return what has arrived so far
    fn take_now(mut self) -> String {
        self.task.abort();
        let mut bytes = Vec::new();
        while let Ok(chunk) = self.chunks.try_recv() {
            bytes.extend_from_slice(&chunk);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn abort(self) {
        self.task.abort();
    }
}
