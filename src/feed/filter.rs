use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};

/// Artwork type codes exposed as toggles in the config modal.
pub const PAINTING: u32 = 1;
pub const PHOTOGRAPH: u32 = 2;

/// User-facing filter toggles. Loaded from `[filters]` in config.toml and
/// edited at runtime from the config modal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_artwork_types")]
    pub artwork_type_ids: BTreeSet<u32>,
    #[serde(default)]
    pub show_obscure: bool,
    #[serde(default = "default_true")]
    pub require_short_description: bool,
    #[serde(default)]
    pub min_year: Option<i32>,
    #[serde(default)]
    pub max_year: Option<i32>,
}

fn default_artwork_types() -> BTreeSet<u32> {
    BTreeSet::from([PAINTING])
}

fn default_true() -> bool {
    true
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            artwork_type_ids: default_artwork_types(),
            show_obscure: false,
            require_short_description: true,
            min_year: None,
            max_year: None,
        }
    }
}

impl FilterSettings {
    pub fn includes_type(&self, type_id: u32) -> bool {
        self.artwork_type_ids.contains(&type_id)
    }

    /// Flip one artwork type. Refuses to remove the last enabled type and
    /// returns whether the set changed.
    pub fn toggle_type(&mut self, type_id: u32) -> bool {
        if self.artwork_type_ids.contains(&type_id) {
            if self.artwork_type_ids.len() == 1 {
                return false;
            }
            self.artwork_type_ids.remove(&type_id);
        } else {
            self.artwork_type_ids.insert(type_id);
        }
        true
    }
}

/// Insertion-ordered id list with no duplicates.
#[derive(Debug, Clone, Default)]
pub struct SeenIds {
    order: Vec<u64>,
    index: HashSet<u64>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless already present. Returns true when it was new.
    pub fn record(&mut self, id: u64) -> bool {
        if self.index.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.index.contains(&id)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }
}

/// Session state for repeated queries: the active filters plus every id the
/// API has returned since the filters last changed.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub settings: FilterSettings,
    seen_ids: SeenIds,
}

impl FilterConfig {
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            settings,
            seen_ids: SeenIds::new(),
        }
    }

    pub fn seen_ids(&self) -> &SeenIds {
        &self.seen_ids
    }

    /// Mark ids as seen. Returns how many were not already recorded.
    pub fn mark_seen<I: IntoIterator<Item = u64>>(&mut self, ids: I) -> usize {
        ids.into_iter().filter(|&id| self.seen_ids.record(id)).count()
    }

    /// Swap in new settings. The seen list is cleared only when they differ.
    pub fn replace_settings(&mut self, settings: FilterSettings) -> bool {
        if self.settings == settings {
            return false;
        }
        self.settings = settings;
        self.seen_ids.clear();
        true
    }
}
