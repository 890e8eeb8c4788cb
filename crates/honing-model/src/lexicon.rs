//! The lexicon collection.

use serde::{Deserialize, Serialize};

use crate::change::ChangeKey;
use crate::entry::LexiconEntry;
use crate::error::ModelError;

/// All words of a language, unique by `(spelled, gloss, part_of_speech)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, replacing any entry with the same identity.
    ///
    /// Returns the replaced entry, if there was one.
    pub fn insert(&mut self, entry: LexiconEntry) -> Option<LexiconEntry> {
        match self.entries.iter_mut().find(|e| e.same_word(&entry)) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LexiconEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LexiconEntry> {
        self.entries.iter_mut()
    }

    /// First entry spelled `spelled`, ignoring ASCII case.
    pub fn find_by_spelling(&self, spelled: &str) -> Option<&LexiconEntry> {
        self.entries
            .iter()
            .find(|e| e.spelled.eq_ignore_ascii_case(spelled))
    }

    pub fn sort_canonical(&mut self) {
        self.entries.sort_by(LexiconEntry::canonical_cmp);
    }

    /// Newest change key recorded on any entry.
    pub fn latest_change_key(&self) -> Option<&ChangeKey> {
        self.entries
            .iter()
            .filter_map(LexiconEntry::latest_change_key)
            .max()
    }

    /// Largest key sequence in use anywhere, nested snapshots included.
    pub fn max_change_sequence(&self) -> u64 {
        self.entries
            .iter()
            .map(LexiconEntry::max_change_sequence)
            .max()
            .unwrap_or(0)
    }

    /// Key for the next change to this lexicon.
    pub fn next_change_key(&self) -> Result<ChangeKey, ModelError> {
        ChangeKey::next(self.max_change_sequence())
    }
}

impl FromIterator<LexiconEntry> for Lexicon {
    fn from_iter<I: IntoIterator<Item = LexiconEntry>>(iter: I) -> Self {
        let mut lexicon = Lexicon::new();
        for entry in iter {
            lexicon.insert(entry);
        }
        lexicon
    }
}

impl IntoIterator for Lexicon {
    type Item = LexiconEntry;
    type IntoIter = std::vec::IntoIter<LexiconEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Lexicon {
    type Item = &'a LexiconEntry;
    type IntoIter = std::slice::Iter<'a, LexiconEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a mut Lexicon {
    type Item = &'a mut LexiconEntry;
    type IntoIter = std::slice::IterMut<'a, LexiconEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeRecord;
    use chrono::Utc;

    #[test]
    fn insert_replaces_same_word() {
        let mut lexicon = Lexicon::new();
        lexicon.insert(LexiconEntry::new("pat", "pat", "strike", "verb"));
        let replaced = lexicon.insert(LexiconEntry::new("pat", "pæt", "strike", "verb"));
        assert_eq!(lexicon.len(), 1);
        assert_eq!(replaced.unwrap().phonetic, "pat");
        lexicon.insert(LexiconEntry::new("pat", "pat", "strike", "noun"));
        assert_eq!(lexicon.len(), 2);
    }

    #[test]
    fn canonical_sort_orders_by_spelling_then_gloss() {
        let mut lexicon: Lexicon = [
            LexiconEntry::new("tak", "tak", "roof", "noun"),
            LexiconEntry::new("pat", "pat", "strike", "verb"),
            LexiconEntry::new("pat", "pat", "foot", "noun"),
        ]
        .into_iter()
        .collect();
        lexicon.sort_canonical();
        let glosses: Vec<_> = lexicon.iter().map(|e| e.gloss.as_str()).collect();
        assert_eq!(glosses, ["foot", "strike", "roof"]);
    }

    #[test]
    fn latest_key_is_global() {
        let mut first = LexiconEntry::new("pat", "pat", "strike", "verb");
        let mut second = LexiconEntry::new("tak", "tak", "roof", "noun");
        first.record_change(
            ChangeKey::new(2, Utc::now()),
            ChangeRecord::rederivation(first.clone()),
        );
        second.record_change(
            ChangeKey::new(5, Utc::now()),
            ChangeRecord::rederivation(second.clone()),
        );
        let lexicon: Lexicon = [first, second].into_iter().collect();
        assert_eq!(lexicon.latest_change_key().unwrap().sequence(), 5);
        assert_eq!(lexicon.max_change_sequence(), 5);
    }

    #[test]
    fn next_key_after_exhausted_sequence_is_an_error() {
        let mut entry = LexiconEntry::new("pat", "pat", "strike", "verb");
        entry.record_change(
            ChangeKey::new(u64::MAX, Utc::now()),
            ChangeRecord::rederivation(entry.clone()),
        );
        let lexicon: Lexicon = [entry].into_iter().collect();
        assert!(matches!(
            lexicon.next_change_key(),
            Err(ModelError::InvalidChangeKey { .. })
        ));
    }
}
