//! Playlist listing lookups
//!
//! The playlists page embeds its listing as JSON. It is read once and turned
//! into two lookups: name -> track count (for overwrite confirmation) and
//! id -> size (for estimating how long a clean will take).

use crate::types::{FIELD_CLEAN_ID, FIELD_CLEAN_NAME, FormDescriptor, count_of};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Total used for the simulated ramp when the playlist size is unknown
pub const DEFAULT_TOTAL_ESTIMATE: u64 = 100;

/// One entry of the embedded listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Playlist id
    pub id: String,
    /// Display name
    pub name: String,
    /// Number of tracks (0 when not reported)
    pub tracks: u64,
}

impl PlaylistEntry {
    /// Read an entry leniently; `None` when it has no usable name
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = obj.get("name").and_then(Value::as_str)?.to_string();
        if name.trim().is_empty() {
            return None;
        }
        let id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let tracks = count_of(obj.get("tracks"))
            .filter(|n| *n > 0)
            .or_else(|| count_of(obj.get("track_count")))
            .unwrap_or(0);
        Some(Self { id, name, tracks })
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lookups built from the embedded listing
#[derive(Debug, Clone, Default)]
pub struct PlaylistIndex {
    entries: Vec<PlaylistEntry>,
    counts: HashMap<String, u64>,
}

impl PlaylistIndex {
    /// Build the index from entries; later duplicates of a name win
    pub fn from_entries(entries: Vec<PlaylistEntry>) -> Self {
        let counts = entries
            .iter()
            .map(|e| (normalize(&e.name), e.tracks))
            .collect();
        Self { entries, counts }
    }

    /// Parse the embedded JSON array
    ///
    /// Never fails: anything that is not an array yields an empty index, and
    /// entries without a name are skipped.
    pub fn from_json(raw: &str) -> Self {
        let parsed: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("ignoring unparsable playlist listing: {e}");
                return Self::default();
            }
        };
        let Some(items) = parsed.as_array() else {
            warn!("playlist listing is not an array; ignoring it");
            return Self::default();
        };
        let entries: Vec<PlaylistEntry> = items.iter().filter_map(PlaylistEntry::from_value).collect();
        debug!(
            "indexed {} of {} listing entries",
            entries.len(),
            items.len()
        );
        Self::from_entries(entries)
    }

    /// Whether the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of indexed playlists
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Track count of an existing playlist with this name, 0 if none
    pub fn existing_count(&self, name: &str) -> u64 {
        if name.trim().is_empty() {
            return 0;
        }
        self.counts.get(&normalize(name)).copied().unwrap_or(0)
    }

    /// Entry with this id
    pub fn by_id(&self, id: &str) -> Option<&PlaylistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// First entry whose name contains the fragment (case-insensitive)
    pub fn by_name_fragment(&self, fragment: &str) -> Option<&PlaylistEntry> {
        let needle = normalize(fragment);
        if needle.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase().contains(&needle))
    }

    /// Estimated work size of a clean form's selection
    ///
    /// Uses the selected id when present, otherwise the typed name as a
    /// substring match, otherwise [`DEFAULT_TOTAL_ESTIMATE`].
    pub fn estimate_total(&self, form: &FormDescriptor) -> u64 {
        let entry = match form.value(FIELD_CLEAN_ID) {
            Some(id) => self.by_id(id),
            None => form
                .value(FIELD_CLEAN_NAME)
                .and_then(|typed| self.by_name_fragment(typed)),
        };
        entry
            .map(|e| e.tracks)
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_TOTAL_ESTIMATE)
    }
}
