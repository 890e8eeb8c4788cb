//! Change history across the lexicon: finding, reverting and pruning.
//!
//! A logical change writes one [`ChangeKey`] onto every entry it touched.
//! "Most recent" is decided across the whole lexicon by key order, never
//! per entry.

use honing_model::{ChangeKey, Lexicon, LexiconEntry};

use crate::sample_text::SpellingRenames;

/// Newest change key recorded anywhere in the lexicon.
pub fn most_recent_change_key(lexicon: &Lexicon) -> Option<ChangeKey> {
    lexicon.latest_change_key().cloned()
}

/// Result of undoing one change on a copy of the lexicon.
#[derive(Debug, Clone)]
pub struct Reversion {
    pub lexicon: Lexicon,
    /// Current spelling to restored spelling, for sample text.
    pub renames: SpellingRenames,
    pub entries_reverted: usize,
}

/// Restore every entry carrying `key` to the snapshot stored under it.
///
/// Entries without the key are left alone. The returned lexicon is in
/// canonical order.
pub fn revert_change(lexicon: &Lexicon, key: &ChangeKey) -> Reversion {
    let mut reverted = lexicon.clone();
    let mut renames = SpellingRenames::new();
    let mut entries_reverted = 0;

    for entry in reverted.iter_mut() {
        let Some(record) = entry.history.get(key) else {
            continue;
        };
        let snapshot = record.old_version.clone();
        tracing::debug!(
            %key,
            from = %entry.spelled,
            to = %snapshot.spelled,
            "Reverting entry"
        );
        renames.insert(&entry.spelled, &snapshot.spelled);
        *entry = snapshot;
        entries_reverted += 1;
    }

    reverted.sort_canonical();
    Reversion {
        lexicon: reverted,
        renames,
        entries_reverted,
    }
}

/// How far history pruning reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruneMode {
    /// Keep only the newest record of each entry.
    #[default]
    KeepLatest,
    /// Keep the newest record and clear the history nested in its snapshot.
    Deep,
}

/// Prune one entry's history. Returns the number of records removed,
/// nested ones included.
pub fn prune_entry_history(entry: &mut LexiconEntry, mode: PruneMode) -> usize {
    let Some(latest) = entry.latest_change_key().cloned() else {
        return 0;
    };

    let before = entry.history_depth();
    entry.history.retain(|key, _| *key == latest);
    if mode == PruneMode::Deep
        && let Some(record) = entry.history.get_mut(&latest)
    {
        record.old_version.history.clear();
    }
    before - entry.history_depth()
}

/// Prune every entry in the lexicon.
pub fn prune_lexicon_history(lexicon: &mut Lexicon, mode: PruneMode) -> usize {
    let removed: usize = lexicon
        .iter_mut()
        .map(|entry| prune_entry_history(entry, mode))
        .sum();
    tracing::info!(?mode, removed, "Pruned change history");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use honing_model::ChangeRecord;

    fn key(sequence: u64) -> ChangeKey {
        ChangeKey::new(sequence, Utc::now())
    }

    /// Entry edited three times: p->b, a->e, t->d, each snapshot nesting the
    /// previous history.
    fn thrice_edited() -> LexiconEntry {
        let mut entry = LexiconEntry::new("pat", "pat", "strike", "verb");
        for (seq, (old, new)) in [("p", "b"), ("a", "e"), ("t", "d")].into_iter().enumerate() {
            let snapshot = entry.clone();
            entry.phonetic = entry.phonetic.replace(old, new);
            entry.spelled = entry.phonetic.clone();
            entry.record_change(key(seq as u64 + 1), ChangeRecord::new(old, new, snapshot));
        }
        entry
    }

    #[test]
    fn keep_latest_drops_older_keys() {
        let mut entry = thrice_edited();
        assert_eq!(entry.history.len(), 3);
        let removed = prune_entry_history(&mut entry, PruneMode::KeepLatest);
        assert_eq!(entry.history.len(), 1);
        assert_eq!(entry.latest_change_key().unwrap().sequence(), 3);
        assert!(removed >= 2);
        // The kept snapshot still carries its own history.
        assert!(!entry.history.values().next().unwrap().old_version.history.is_empty());
    }

    #[test]
    fn deep_prune_clears_nested_history() {
        let mut entry = thrice_edited();
        prune_entry_history(&mut entry, PruneMode::Deep);
        assert_eq!(entry.history_depth(), 1);
    }

    #[test]
    fn prune_without_history_is_noop() {
        let mut entry = LexiconEntry::new("pat", "pat", "strike", "verb");
        assert_eq!(prune_entry_history(&mut entry, PruneMode::Deep), 0);
    }

    #[test]
    fn revert_restores_only_keyed_entries() {
        let untouched = LexiconEntry::new("ka", "ka", "house", "noun");
        let edited = thrice_edited();
        let lexicon: Lexicon = [edited, untouched.clone()].into_iter().collect();

        let newest = most_recent_change_key(&lexicon).unwrap();
        let reversion = revert_change(&lexicon, &newest);

        assert_eq!(reversion.entries_reverted, 1);
        assert_eq!(reversion.renames.get("bed"), Some("bet"));
        let restored = reversion.lexicon.find_by_spelling("bet").unwrap();
        assert_eq!(restored.history.len(), 2);
        assert_eq!(reversion.lexicon.find_by_spelling("ka"), Some(&untouched));
    }
}
