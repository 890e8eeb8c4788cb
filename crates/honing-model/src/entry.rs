//! Lexicon entries.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::change::{ChangeKey, ChangeRecord};

/// A single word of the language.
///
/// Identity is the `(spelled, gloss, part_of_speech)` triple; `phonetic`
/// and `spelled` are kept consistent by the change engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// IPA pronunciation.
    pub phonetic: String,
    /// Orthographic form.
    pub spelled: String,
    /// Meaning in the reference language.
    #[serde(rename = "english")]
    pub gloss: String,
    pub part_of_speech: String,
    #[serde(default)]
    pub declensions: Vec<String>,
    #[serde(default)]
    pub derived_word: bool,
    #[serde(default)]
    pub declined_word: bool,
    /// Snapshots of this entry taken before each committed change.
    #[serde(
        default,
        rename = "phonetic_change_history",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub history: BTreeMap<ChangeKey, ChangeRecord>,
    /// Opaque metadata carried through load/save unchanged.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl LexiconEntry {
    pub fn new(
        spelled: impl Into<String>,
        phonetic: impl Into<String>,
        gloss: impl Into<String>,
        part_of_speech: impl Into<String>,
    ) -> Self {
        Self {
            phonetic: phonetic.into(),
            spelled: spelled.into(),
            gloss: gloss.into(),
            part_of_speech: part_of_speech.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_declensions<I, S>(mut self, declensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declensions = declensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.spelled, &self.gloss, &self.part_of_speech)
    }

    /// True if both entries describe the same word.
    pub fn same_word(&self, other: &LexiconEntry) -> bool {
        self.identity() == other.identity()
    }

    /// Canonical lexicon ordering: spelling, then gloss, then part of speech.
    pub fn canonical_cmp(&self, other: &LexiconEntry) -> Ordering {
        self.identity().cmp(&other.identity())
    }

    /// Attach a change record under `key`, keeping any record already there.
    ///
    /// Returns `false` when the key was already present.
    pub fn record_change(&mut self, key: ChangeKey, record: ChangeRecord) -> bool {
        if self.history.contains_key(&key) {
            return false;
        }
        self.history.insert(key, record);
        true
    }

    pub fn latest_change_key(&self) -> Option<&ChangeKey> {
        self.history.keys().next_back()
    }

    /// Largest key sequence in this entry, including keys nested in snapshots.
    pub fn max_change_sequence(&self) -> u64 {
        self.history
            .iter()
            .map(|(key, record)| {
                key.sequence()
                    .max(record.old_version.max_change_sequence())
            })
            .max()
            .unwrap_or(0)
    }

    /// Number of records in this entry's history, nested snapshots included.
    pub fn history_depth(&self) -> usize {
        self.history
            .values()
            .map(|record| 1 + record.old_version.history_depth())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn record_change_keeps_first_record_for_key() {
        let mut entry = LexiconEntry::new("pat", "pat", "strike", "verb");
        let key = ChangeKey::new(1, Utc::now());
        let first = ChangeRecord::new("p", "b", entry.clone());
        let second = ChangeRecord::new("a", "e", entry.clone());
        assert!(entry.record_change(key.clone(), first));
        assert!(!entry.record_change(key.clone(), second));
        assert_eq!(entry.history[&key].old_phoneme, "p");
    }

    #[test]
    fn max_sequence_looks_into_snapshots() {
        let mut inner = LexiconEntry::new("pat", "pat", "strike", "verb");
        inner.record_change(
            ChangeKey::new(7, Utc::now()),
            ChangeRecord::rederivation(LexiconEntry::default()),
        );
        let mut outer = inner.clone();
        outer.history.clear();
        outer.record_change(
            ChangeKey::new(3, Utc::now()),
            ChangeRecord::new("p", "b", inner),
        );
        assert_eq!(outer.max_change_sequence(), 7);
        assert_eq!(outer.history_depth(), 2);
    }
}
