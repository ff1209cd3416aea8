//! Persistence for lightweight UI state.
//!
//! Only the page and list filters are stored. The session never touches disk.

use crate::nav::Page;
use assetdesk_core::{AssetFilter, TransferFilter, UserFilter};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub active_page: Page,
    #[serde(default)]
    pub asset_filter: AssetFilter,
    #[serde(default)]
    pub transfer_filter: TransferFilter,
    #[serde(default)]
    pub user_filter: UserFilter,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub fn load(path: &Path) -> Result<Option<PersistedState>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let state = serde_json::from_str::<PersistedState>(&contents)?;
    Ok(Some(state))
}

pub fn save(path: &Path, state: &PersistedState) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(state)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetdesk_core::{AssetStatus, StatusFilter};

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("ui.json")).unwrap().is_none());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/ui.json");
        let state = PersistedState {
            active_page: Page::Transfers,
            asset_filter: AssetFilter {
                search: "desk".to_string(),
                status: StatusFilter::Only(AssetStatus::Disposed),
                ..AssetFilter::default()
            },
            transfer_filter: TransferFilter::Pending,
            user_filter: UserFilter::default(),
        };
        save(&path, &state).unwrap();
        assert_eq!(load(&path).unwrap(), Some(state));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path), Err(PersistenceError::Serde(_))));
    }
}
