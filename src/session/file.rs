//! JSON session files for the command-line runner.

use super::settlement::SettlementSession;
use crate::config::EngineConfig;
use crate::domain::{PinnedTransfer, PlayerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Session inputs as a persistence layer would hand them over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    #[serde(default)]
    pub session_id: Option<String>,
    pub players: Vec<PlayerResult>,
    #[serde(default)]
    pub pinned: Vec<PinnedTransfer>,
    /// Previously persisted paid flags keyed by transfer id.
    #[serde(default)]
    pub paid: BTreeMap<String, bool>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read session file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid session file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

impl SessionFile {
    /// Build a session owner from these inputs. The id defaults to "session".
    pub fn into_session(
        self,
        config: EngineConfig,
    ) -> (SettlementSession, BTreeMap<String, bool>) {
        let id = self.session_id.unwrap_or_else(|| "session".to_string());
        let session = SettlementSession::new(id, config)
            .with_players(self.players)
            .with_pinned(self.pinned);
        (session, self.paid)
    }
}

pub async fn load_session_file(path: impl AsRef<Path>) -> Result<SessionFile, LoadError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: shown.clone(),
            source,
        })?;
    let file: SessionFile =
        serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: shown.clone(),
            source,
        })?;

    tracing::debug!(
        "Loaded {} player(s) and {} pinned transfer(s) from {}",
        file.players.len(),
        file.pinned.len(),
        shown
    );
    Ok(file)
}
