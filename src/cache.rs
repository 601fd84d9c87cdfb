//! Single-slot store for the most recent interaction

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A processed intent and the reply it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub input: String,
    pub response: String,
}

/// Holds the last successful interaction; each write replaces the previous one
#[derive(Debug, Default)]
pub struct InteractionCache {
    slot: RwLock<Option<InteractionRecord>>,
}

impl InteractionCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored interaction
    pub async fn record(&self, record: InteractionRecord) {
        *self.slot.write().await = Some(record);
    }

    /// Current interaction, if any
    pub async fn latest(&self) -> Option<InteractionRecord> {
        self.slot.read().await.clone()
    }
}
