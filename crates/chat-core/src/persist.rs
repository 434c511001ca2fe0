//! Snapshot persistence with versioned schema migration.
//!
//! The whole store serializes as one opaque JSON blob under a fixed key.
//! On load, snapshots written by older schema versions are migrated in
//! order before the store is rebuilt; a corrupt or unknown blob recovers
//! best-effort to a fresh store rather than failing the process.

use serde::{Deserialize, Serialize};

use chat_types::config::ChatConfig;
use chat_types::session::ChatSession;
use chat_types::Result;

use crate::ports::StoragePort;
use crate::store::ChatStore;

pub const STORE_KEY: &str = "chat-store";

/// Current snapshot schema version.
///
/// v1: sessions carried a user-editable `context` with broken contents.
/// v2: `send_memory` became per-session and defaults on.
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub sessions: Vec<ChatSession>,
    pub current_session_index: usize,
    pub config: ChatConfig,
}

/// Apply migrations cumulatively, oldest first. Versions with no defined
/// step fall through unchanged.
fn migrate(snapshot: &mut StoreSnapshot) {
    if snapshot.version == SCHEMA_VERSION {
        return;
    }
    log::info!(
        "migrating store snapshot from schema v{} to v{}",
        snapshot.version,
        SCHEMA_VERSION
    );

    if snapshot.version == 1 {
        for session in &mut snapshot.sessions {
            session.context.clear();
        }
    }

    if snapshot.version < 2 {
        for session in &mut snapshot.sessions {
            session.send_memory = true;
        }
    }

    snapshot.version = SCHEMA_VERSION;
}

/// Serialize the whole store under the fixed key.
pub async fn save(store: &ChatStore, storage: &dyn StoragePort) -> Result<()> {
    let (sessions, current_session_index, config) = store.snapshot_parts();
    let snapshot = StoreSnapshot {
        version: SCHEMA_VERSION,
        sessions,
        current_session_index,
        config,
    };
    let blob = serde_json::to_vec(&snapshot)?;
    storage.set(STORE_KEY, &blob).await?;
    log::debug!("store saved ({} bytes, {})", blob.len(), storage.backend_name());
    Ok(())
}

/// Restore the store from storage, migrating old snapshots. Returns `None`
/// when nothing was persisted or the blob cannot be decoded.
pub async fn load(storage: &dyn StoragePort) -> Result<Option<ChatStore>> {
    let Some(blob) = storage.get(STORE_KEY).await? else {
        return Ok(None);
    };
    let mut snapshot: StoreSnapshot = match serde_json::from_slice(&blob) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("discarding undecodable store snapshot: {}", e);
            return Ok(None);
        }
    };
    migrate(&mut snapshot);
    log::info!(
        "store restored: {} session(s) from {}",
        snapshot.sessions.len(),
        storage.backend_name()
    );
    Ok(Some(ChatStore::from_parts(
        snapshot.sessions,
        snapshot.current_session_index,
        snapshot.config,
    )))
}

#[cfg(test)]
pub(crate) fn migrate_for_test(snapshot: &mut StoreSnapshot) {
    migrate(snapshot)
}
