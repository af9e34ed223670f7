//! Record store - parties and their strengths/weaknesses / 记录存储
//!
//! - Two keyed collections held in memory, each mirrored to a JSON snapshot
//! - Every mutation re-persists the affected snapshot(s) before returning
//! - A strength/weakness always references an existing party; deleting a
//!   party cascades to its children / 删除政党时级联删除其优劣势
//!
//! Absence is a normal outcome (`Option` / `bool`); only persistence can fail.
//! If a save fails the in-memory mutation is rolled back so memory matches disk.

pub mod snapshot;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::models::{Kind, Party, StrengthWeakness};
use crate::utils::{normalize_logo_url, sanitize_opt, sanitize_text};

pub use snapshot::SnapshotFile;

/// Persistence failure / 持久化失败
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Fields accepted when recording a strength/weakness / 新增优劣势的字段
#[derive(Debug, Clone)]
pub struct NewStrengthWeakness {
    pub party_id: String,
    pub kind: Kind,
    pub content: String,
    pub date: NaiveDate,
    pub source: Option<String>,
    pub author: Option<String>,
}

/// Party / strength-weakness store / 政党与优劣势存储
pub struct Store {
    parties: HashMap<String, Party>,
    strengths_weaknesses: HashMap<String, StrengthWeakness>,
    parties_file: SnapshotFile<Party>,
    sw_file: SnapshotFile<StrengthWeakness>,
}

impl Store {
    /// Load both snapshots from the configured directory / 从配置目录加载
    pub fn load(config: &StorageConfig) -> Self {
        Self::open(config.parties_path(), config.strengths_weaknesses_path())
    }

    /// Load both snapshots, never fails / 加载快照，永不失败
    ///
    /// Missing or corrupt files start empty. Records whose parent party did
    /// not load are dropped from memory and disappear from disk on the next
    /// save of that collection.
    pub fn open(parties_path: PathBuf, sw_path: PathBuf) -> Self {
        let parties_file = SnapshotFile::<Party>::new(parties_path);
        let sw_file = SnapshotFile::<StrengthWeakness>::new(sw_path);

        // Re-key by the record id so a hand-edited key cannot drift
        let parties: HashMap<String, Party> = parties_file
            .load()
            .into_values()
            .map(|p| (p.id.clone(), p))
            .collect();

        let mut orphans = 0usize;
        let strengths_weaknesses: HashMap<String, StrengthWeakness> = sw_file
            .load()
            .into_values()
            .filter(|sw| {
                let known = parties.contains_key(&sw.party_id);
                if !known {
                    orphans += 1;
                }
                known
            })
            .map(|sw| (sw.id.clone(), sw))
            .collect();

        if orphans > 0 {
            tracing::warn!(
                "Dropped {} strength/weakness records referencing unknown parties",
                orphans
            );
        }

        tracing::info!(
            "Store loaded: {} parties, {} strengths/weaknesses",
            parties.len(),
            strengths_weaknesses.len()
        );

        Self {
            parties,
            strengths_weaknesses,
            parties_file,
            sw_file,
        }
    }

    // ---- Parties / 政党 ----

    /// Create a party / 创建政党
    pub fn create_party(
        &mut self,
        name: &str,
        description: &str,
        logo_url: Option<String>,
    ) -> Result<Party, StoreError> {
        let party = Party {
            id: Uuid::new_v4().to_string(),
            name: sanitize_text(name),
            description: sanitize_text(description),
            logo_url: normalize_logo_url(logo_url),
        };

        self.parties.insert(party.id.clone(), party.clone());
        if let Err(e) = self.parties_file.save(&self.parties) {
            self.parties.remove(&party.id);
            tracing::error!("Failed to persist new party: {}", e);
            return Err(e);
        }

        tracing::info!("Created party {} ({})", party.id, party.name);
        Ok(party)
    }

    pub fn get_party(&self, id: &str) -> Option<Party> {
        self.parties.get(id).cloned()
    }

    /// All parties ordered by name / 按名称排序的全部政党
    pub fn list_parties(&self) -> Vec<Party> {
        let mut parties: Vec<Party> = self.parties.values().cloned().collect();
        parties.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        parties
    }

    pub fn party_count(&self) -> usize {
        self.parties.len()
    }

    /// Partial update, only supplied fields change / 部分更新
    ///
    /// A supplied logo URL that is not http(s) clears the stored logo.
    pub fn update_party(
        &mut self,
        id: &str,
        name: Option<String>,
        description: Option<String>,
        logo_url: Option<String>,
    ) -> Result<Option<Party>, StoreError> {
        let Some(party) = self.parties.get_mut(id) else {
            return Ok(None);
        };
        let previous = party.clone();

        if let Some(name) = name {
            party.name = sanitize_text(&name);
        }
        if let Some(description) = description {
            party.description = sanitize_text(&description);
        }
        if logo_url.is_some() {
            party.logo_url = normalize_logo_url(logo_url);
        }
        let updated = party.clone();

        if let Err(e) = self.parties_file.save(&self.parties) {
            self.parties.insert(previous.id.clone(), previous);
            tracing::error!("Failed to persist update of party {}: {}", id, e);
            return Err(e);
        }

        tracing::info!("Updated party {}", id);
        Ok(Some(updated))
    }

    /// Delete a party and all its strengths/weaknesses / 删除政党并级联删除
    ///
    /// The children snapshot is written first: if the party snapshot then
    /// fails to save, the disk holds a childless party, never an orphan.
    pub fn delete_party(&mut self, id: &str) -> Result<bool, StoreError> {
        if !self.parties.contains_key(id) {
            return Ok(false);
        }

        let child_ids: Vec<String> = self
            .strengths_weaknesses
            .values()
            .filter(|sw| sw.party_id == id)
            .map(|sw| sw.id.clone())
            .collect();

        if !child_ids.is_empty() {
            let removed: Vec<StrengthWeakness> = child_ids
                .iter()
                .filter_map(|sw_id| self.strengths_weaknesses.remove(sw_id))
                .collect();

            if let Err(e) = self.sw_file.save(&self.strengths_weaknesses) {
                for sw in removed {
                    self.strengths_weaknesses.insert(sw.id.clone(), sw);
                }
                tracing::error!("Failed to persist cascade for party {}: {}", id, e);
                return Err(e);
            }
        }

        let Some(party) = self.parties.remove(id) else {
            return Ok(false);
        };
        if let Err(e) = self.parties_file.save(&self.parties) {
            self.parties.insert(party.id.clone(), party);
            tracing::error!("Failed to persist deletion of party {}: {}", id, e);
            return Err(e);
        }

        tracing::info!(
            "Deleted party {} and {} strengths/weaknesses",
            id,
            child_ids.len()
        );
        Ok(true)
    }

    // ---- Strengths / weaknesses / 优劣势 ----

    /// Record a strength/weakness; None if the party does not exist / 新增优劣势
    pub fn add_strength_weakness(
        &mut self,
        new: NewStrengthWeakness,
    ) -> Result<Option<StrengthWeakness>, StoreError> {
        if !self.parties.contains_key(&new.party_id) {
            tracing::debug!("Rejected strength/weakness for unknown party {}", new.party_id);
            return Ok(None);
        }

        let item = StrengthWeakness {
            id: Uuid::new_v4().to_string(),
            party_id: new.party_id,
            kind: new.kind,
            content: sanitize_text(&new.content),
            date: new.date,
            source: sanitize_opt(new.source),
            author: sanitize_opt(new.author),
        };

        self.strengths_weaknesses.insert(item.id.clone(), item.clone());
        if let Err(e) = self.sw_file.save(&self.strengths_weaknesses) {
            self.strengths_weaknesses.remove(&item.id);
            tracing::error!("Failed to persist new strength/weakness: {}", e);
            return Err(e);
        }

        tracing::info!("Added {} {} to party {}", item.kind, item.id, item.party_id);
        Ok(Some(item))
    }

    pub fn get_strength_weakness(&self, id: &str) -> Option<StrengthWeakness> {
        self.strengths_weaknesses.get(id).cloned()
    }

    /// Strengths/weaknesses of one party, oldest first / 某政党的优劣势
    pub fn list_strengths_weaknesses(&self, party_id: &str) -> Vec<StrengthWeakness> {
        let mut items: Vec<StrengthWeakness> = self
            .strengths_weaknesses
            .values()
            .filter(|sw| sw.party_id == party_id)
            .cloned()
            .collect();
        sort_by_date(&mut items);
        items
    }

    /// Every strength/weakness across all parties / 全部优劣势
    pub fn list_all_strengths_weaknesses(&self) -> Vec<StrengthWeakness> {
        let mut items: Vec<StrengthWeakness> =
            self.strengths_weaknesses.values().cloned().collect();
        sort_by_date(&mut items);
        items
    }

    pub fn delete_strength_weakness(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(item) = self.strengths_weaknesses.remove(id) else {
            return Ok(false);
        };

        if let Err(e) = self.sw_file.save(&self.strengths_weaknesses) {
            self.strengths_weaknesses.insert(item.id.clone(), item);
            tracing::error!("Failed to persist deletion of strength/weakness {}: {}", id, e);
            return Err(e);
        }

        tracing::info!("Deleted strength/weakness {}", id);
        Ok(true)
    }
}

fn sort_by_date(items: &mut [StrengthWeakness]) {
    items.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
}
