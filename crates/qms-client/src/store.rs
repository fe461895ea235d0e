//! Local persistence for the in-progress draft.
//!
//! One JSON file under a fixed name holds `{ mintDraft, step }`. Loads
//! deep-merge each section over the compiled-in defaults so drafts saved
//! by an older build pick up newly added fields.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::{json, Value};

use crate::draft::MintDraft;
use crate::error::QmsClientError;

pub const DRAFT_STORAGE_KEY: &str = "qms_mint_draft";

#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// A store rooted at `dir`; the file name is fixed.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{DRAFT_STORAGE_KEY}.json")),
        }
    }

    pub fn save(&self, draft: &MintDraft, step: u8) -> Result<(), QmsClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let blob = json!({ "mintDraft": draft, "step": step });
        fs::write(&self.path, serde_json::to_vec(&blob)?)?;
        Ok(())
    }

    /// Load the persisted draft, falling back to defaults. A corrupt
    /// entry is deleted so the next load starts clean.
    pub fn load(&self) -> (MintDraft, u8) {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return (MintDraft::default(), 1),
        };
        match parse_stored(&raw) {
            Some(loaded) => loaded,
            None => {
                let _ = fs::remove_file(&self.path);
                (MintDraft::default(), 1)
            }
        }
    }

    pub fn clear(&self) -> Result<(), QmsClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn parse_stored(raw: &str) -> Option<(MintDraft, u8)> {
    let value: Value = serde_json::from_str(raw).ok()?;
    // Accept both the wrapped blob and a bare draft.
    let (draft_value, step) = match value.get("mintDraft") {
        Some(draft) => (
            draft.clone(),
            value.get("step").and_then(Value::as_u64).unwrap_or(1) as u8,
        ),
        None => (value, 1),
    };
    Some((merge_defaults(&draft_value)?, step))
}

/// Deep-merge a stored draft over the default shape, section by section.
pub fn merge_defaults(saved: &Value) -> Option<MintDraft> {
    let mut base = serde_json::to_value(MintDraft::default()).ok()?;
    for section in ["token", "authority", "metadata", "confirmations"] {
        let Some(saved_section) = saved.get(section).and_then(Value::as_object) else {
            continue;
        };
        if let Some(base_section) = base.get_mut(section).and_then(Value::as_object_mut) {
            for (key, value) in saved_section {
                base_section.insert(key.clone(), value.clone());
            }
        }
    }
    serde_json::from_value(base).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{MetadataMode, SupplyType};

    fn store() -> (tempfile::TempDir, DraftStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DraftStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn round_trip_preserves_the_draft() {
        let (_dir, store) = store();
        let mut draft = MintDraft::default();
        draft.token.name = "Coin".to_string();
        draft.token.supply = "1000".to_string();
        draft.set_supply_type(SupplyType::Mintable);
        draft.set_metadata_mode(MetadataMode::Onchain);

        store.save(&draft, 3).unwrap();
        let (loaded, step) = store.load();
        assert_eq!(loaded, draft);
        assert_eq!(step, 3);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_dir, store) = store();
        let (loaded, step) = store.load();
        assert_eq!(loaded, MintDraft::default());
        assert_eq!(step, 1);
    }

    #[test]
    fn old_drafts_gain_newly_added_fields() {
        let (_dir, store) = store();
        let partial = json!({
            "mintDraft": {
                "token": { "name": "Legacy", "supplyType": "mintable" },
                "authority": { "revokeFreeze": false }
            },
            "step": 2
        });
        std::fs::write(
            store.path.clone(),
            serde_json::to_vec(&partial).unwrap(),
        )
        .unwrap();

        let (loaded, step) = store.load();
        assert_eq!(loaded.token.name, "Legacy");
        assert_eq!(loaded.token.supply_type, SupplyType::Mintable);
        assert_eq!(loaded.token.decimals, 9);
        assert!(!loaded.authority.revoke_freeze);
        assert!(loaded.authority.revoke_mint);
        assert_eq!(step, 2);
    }

    #[test]
    fn bare_draft_blob_is_accepted() {
        let (_dir, store) = store();
        let bare = json!({ "token": { "name": "Bare" } });
        std::fs::write(store.path.clone(), serde_json::to_vec(&bare).unwrap()).unwrap();
        let (loaded, step) = store.load();
        assert_eq!(loaded.token.name, "Bare");
        assert_eq!(step, 1);
    }

    #[test]
    fn corrupt_entry_is_cleared() {
        let (_dir, store) = store();
        std::fs::write(store.path.clone(), b"{not json").unwrap();
        let (loaded, _) = store.load();
        assert_eq!(loaded, MintDraft::default());
        assert!(!store.path.exists());
    }

    #[test]
    fn clear_removes_the_file_and_is_idempotent() {
        let (_dir, store) = store();
        store.save(&MintDraft::default(), 1).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.path.exists());
    }

    #[test]
    fn merge_defaults_matches_load_after_save() {
        let mut draft = MintDraft::default();
        draft.token.symbol = "CN".to_string();
        let merged = merge_defaults(&serde_json::to_value(&draft).unwrap()).unwrap();
        assert_eq!(merged, draft);
    }
}
