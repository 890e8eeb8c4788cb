//! The phonological change engine.
//!
//! [`PhoneticChanger`] owns a [`Language`] and the operator's sample text.
//! Every operation works on a copy of the language and commits it only
//! after all fallible steps (rule compilation) have succeeded, so a failed
//! call leaves both untouched.
//!
//! Substitutions, single or batched, go through one [`SubstitutionTable`]
//! pass per entry: sources are replaced simultaneously and declared
//! diphthongs are protected. Each touched entry gets a snapshot under one
//! [`ChangeKey`] shared by the whole call.

use std::time::Instant;

use tracing::{debug, info, info_span};

use honing_model::{ChangeKey, ChangeRecord, Language, PhoneticInventory, SoundMap};

use crate::affix;
use crate::error::{HoningError, Result};
use crate::inventory::{rebuild_inventory, rename_phonemes};
use crate::ipa;
use crate::ledger::{self, PruneMode};
use crate::sample_text::SpellingRenames;
use crate::substitution::SubstitutionTable;
use crate::transducer::Transducer;

/// Largest batch accepted by default.
pub const DEFAULT_BATCH_LIMIT: usize = 10;

/// An `(old phoneme, new phoneme)` substitution.
pub type PhonemePair = (String, String);

/// Hook letting the caller adjust the rule set before a substitution.
///
/// Receives the current rules and the requested pairs. Returning
/// `Some(rules)` replaces the rule set for this change (and keeps it);
/// `None` leaves it as it is.
pub trait RuleEditor {
    fn edit_rules(&mut self, rules: &[SoundMap], pairs: &[PhonemePair]) -> Option<Vec<SoundMap>>;
}

impl<F> RuleEditor for F
where
    F: FnMut(&[SoundMap], &[PhonemePair]) -> Option<Vec<SoundMap>>,
{
    fn edit_rules(&mut self, rules: &[SoundMap], pairs: &[PhonemePair]) -> Option<Vec<SoundMap>> {
        self(rules, pairs)
    }
}

/// Rule editor that never changes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepRules;

impl RuleEditor for KeepRules {
    fn edit_rules(&mut self, _rules: &[SoundMap], _pairs: &[PhonemePair]) -> Option<Vec<SoundMap>> {
        None
    }
}

/// Engine options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeOptions {
    /// Maximum pairs per batch; `None` for no limit.
    pub batch_limit: Option<usize>,
}

impl Default for ChangeOptions {
    fn default() -> Self {
        Self {
            batch_limit: Some(DEFAULT_BATCH_LIMIT),
        }
    }
}

impl ChangeOptions {
    #[must_use]
    pub fn with_batch_limit(mut self, limit: Option<usize>) -> Self {
        self.batch_limit = limit;
        self
    }
}

/// What a single engine call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Key the change was recorded under, if any entry changed.
    pub key: Option<ChangeKey>,
    pub entries_changed: usize,
    pub affixes_changed: usize,
    /// Anything in the language differs, including the inventory, rules
    /// and affixes.
    pub language_changed: bool,
    pub sample_text_changed: bool,
}

impl ChangeSummary {
    pub fn is_noop(&self) -> bool {
        !self.language_changed && !self.sample_text_changed
    }
}

/// Applies phoneme changes to a language and its sample text.
#[derive(Debug, Clone)]
pub struct PhoneticChanger {
    language: Language,
    sample_text: String,
    options: ChangeOptions,
}

impl PhoneticChanger {
    pub fn new(language: Language, sample_text: impl Into<String>) -> Self {
        Self {
            language,
            sample_text: sample_text.into(),
            options: ChangeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ChangeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ChangeOptions {
        self.options
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn language_mut(&mut self) -> &mut Language {
        &mut self.language
    }

    pub fn sample_text(&self) -> &str {
        &self.sample_text
    }

    pub fn set_sample_text(&mut self, text: impl Into<String>) {
        self.sample_text = text.into();
    }

    /// Give back the language and sample text.
    pub fn into_parts(self) -> (Language, String) {
        (self.language, self.sample_text)
    }

    /// Replace `old` with `new` everywhere in the lexicon.
    pub fn apply_change(&mut self, old: &str, new: &str) -> Result<ChangeSummary> {
        self.apply_change_with(old, new, &mut KeepRules)
    }

    /// [`apply_change`](Self::apply_change) with a rule-editing hook.
    pub fn apply_change_with<E>(&mut self, old: &str, new: &str, editor: &mut E) -> Result<ChangeSummary>
    where
        E: RuleEditor + ?Sized,
    {
        let span = info_span!("apply_change", old, new);
        let _guard = span.enter();
        self.substitute(&[(old.to_string(), new.to_string())], editor)
    }

    /// Apply several substitutions simultaneously.
    ///
    /// No pair's output is seen by another pair, so `p→b, b→k, k→p` rotates
    /// the three phonemes. Rejected without effect when larger than the
    /// configured batch limit.
    pub fn apply_changes(&mut self, pairs: &[PhonemePair]) -> Result<ChangeSummary> {
        self.apply_changes_with(pairs, &mut KeepRules)
    }

    /// [`apply_changes`](Self::apply_changes) with a rule-editing hook.
    pub fn apply_changes_with<E>(&mut self, pairs: &[PhonemePair], editor: &mut E) -> Result<ChangeSummary>
    where
        E: RuleEditor + ?Sized,
    {
        let span = info_span!("apply_changes", pairs = pairs.len());
        let _guard = span.enter();

        if let Some(limit) = self.options.batch_limit
            && pairs.len() > limit
        {
            return Err(HoningError::BatchTooLarge {
                size: pairs.len(),
                limit,
            });
        }
        self.substitute(pairs, editor)
    }

    fn substitute<E>(&mut self, pairs: &[PhonemePair], editor: &mut E) -> Result<ChangeSummary>
    where
        E: RuleEditor + ?Sized,
    {
        let start = Instant::now();
        if pairs.is_empty() {
            return Ok(ChangeSummary::default());
        }

        let table = SubstitutionTable::new(
            pairs.iter().map(|(old, new)| (old.as_str(), new.as_str())),
            self.language.phonetic_inventory.diphthongs(),
        )?;
        let rules = editor
            .edit_rules(&self.language.sound_map_list, pairs)
            .unwrap_or_else(|| self.language.sound_map_list.clone());
        let speller = Transducer::speller(&rules)?;

        let mut next = self.language.clone();
        next.sound_map_list = rules;
        let key = next.lexicon.next_change_key()?;
        let (old_label, new_label) = record_labels(pairs);

        let mut renames = SpellingRenames::new();
        let mut entries_changed = 0;
        for entry in next.lexicon.iter_mut() {
            let phonetic = table.apply(&entry.phonetic);
            if phonetic == entry.phonetic {
                continue;
            }
            let snapshot = entry.clone();
            entry.phonetic = phonetic;
            entry.spelled = speller.transduce(&entry.phonetic);
            debug!(
                from = %snapshot.phonetic,
                to = %entry.phonetic,
                spelled = %entry.spelled,
                "Rewrote entry"
            );
            renames.insert(&snapshot.spelled, &entry.spelled);
            entry.record_change(
                key.clone(),
                ChangeRecord::new(old_label.as_str(), new_label.as_str(), snapshot),
            );
            entries_changed += 1;
        }

        rename_phonemes(&mut next.phoneme_inventory, &table);
        let affixes_changed = affix::rewrite_affixes(&mut next.extras, &table, &speller);
        next.phonetic_inventory.set(
            PhoneticInventory::V_DIPHTHONGS,
            declared_after(self.language.phonetic_inventory.diphthongs(), pairs),
        );
        rebuild_inventory(&mut next);
        note_declared_diphthongs(&self.language, &mut next, &key);

        let summary = ChangeSummary {
            affixes_changed,
            ..self.commit(next, &renames, entries_changed, key)
        };
        info!(
            key = ?summary.key.as_ref().map(ToString::to_string),
            entries_changed,
            affixes_changed,
            sample_text_changed = summary.sample_text_changed,
            duration_ms = start.elapsed().as_millis(),
            "Phoneme substitution complete"
        );
        Ok(summary)
    }

    /// Re-derive every spelling from its pronunciation.
    ///
    /// Used after the rules change. Entries whose spelling changes get a
    /// history record marked `n/a`, and sample text follows the new
    /// spellings.
    pub fn resync_spelling_from_phonetics(&mut self) -> Result<ChangeSummary> {
        let span = info_span!("resync_spelling");
        let _guard = span.enter();

        let speller = Transducer::speller(&self.language.sound_map_list)?;
        let mut next = self.language.clone();
        let key = next.lexicon.next_change_key()?;
        let mut renames = SpellingRenames::new();
        let mut entries_changed = 0;

        for entry in next.lexicon.iter_mut() {
            let spelled = speller.transduce(&entry.phonetic);
            if spelled == entry.spelled {
                continue;
            }
            let snapshot = entry.clone();
            entry.spelled = spelled;
            renames.insert(&snapshot.spelled, &entry.spelled);
            entry.record_change(key.clone(), ChangeRecord::rederivation(snapshot));
            entries_changed += 1;
        }

        let summary = self.commit(next, &renames, entries_changed, key);
        info!(entries_changed, "Spelling re-derived from pronunciation");
        Ok(summary)
    }

    /// Re-derive every pronunciation from its spelling.
    ///
    /// Spellings do not change, so sample text is left alone.
    pub fn resync_phonetics_from_spelling(&mut self) -> Result<ChangeSummary> {
        let span = info_span!("resync_phonetics");
        let _guard = span.enter();

        let pronouncer = Transducer::pronouncer(&self.language.sound_map_list)?;
        let mut next = self.language.clone();
        let key = next.lexicon.next_change_key()?;
        let mut entries_changed = 0;

        for entry in next.lexicon.iter_mut() {
            let phonetic = pronouncer.transduce(&entry.spelled);
            if phonetic == entry.phonetic {
                continue;
            }
            let snapshot = entry.clone();
            entry.phonetic = phonetic;
            entry.record_change(key.clone(), ChangeRecord::rederivation(snapshot));
            entries_changed += 1;
        }
        rebuild_inventory(&mut next);
        note_declared_diphthongs(&self.language, &mut next, &key);

        let summary = self.commit(next, &SpellingRenames::new(), entries_changed, key);
        info!(entries_changed, "Pronunciation re-derived from spelling");
        Ok(summary)
    }

    /// Newest change key anywhere in the lexicon.
    pub fn most_recent_change_key(&self) -> Option<ChangeKey> {
        ledger::most_recent_change_key(&self.language.lexicon)
    }

    /// Undo the most recent change. No-op when there is no history.
    pub fn revert_most_recent(&mut self) -> ChangeSummary {
        let span = info_span!("revert_most_recent");
        let _guard = span.enter();

        let Some(key) = self.most_recent_change_key() else {
            info!("No change history to revert");
            return ChangeSummary::default();
        };

        let reversion = ledger::revert_change(&self.language.lexicon, &key);
        let declared = self
            .language
            .lexicon
            .iter()
            .filter_map(|entry| entry.history.get(&key))
            .find_map(|record| record.declared_diphthongs.clone());
        let mut next = self.language.clone();
        next.lexicon = reversion.lexicon;
        if let Some(declared) = declared {
            debug!(?declared, "Restoring declared diphthongs");
            next.phonetic_inventory.set(PhoneticInventory::V_DIPHTHONGS, declared);
        }
        rebuild_inventory(&mut next);

        let sample = reversion.renames.apply(&self.sample_text).into_owned();
        let sample_text_changed = sample != self.sample_text;
        let language_changed = next != self.language;
        self.language = next;
        self.sample_text = sample;

        info!(
            %key,
            entries_reverted = reversion.entries_reverted,
            sample_text_changed,
            "Reverted change"
        );
        ChangeSummary {
            key: Some(key),
            entries_changed: reversion.entries_reverted,
            affixes_changed: 0,
            language_changed,
            sample_text_changed,
        }
    }

    /// Trim change history on every entry.
    pub fn prune_history(&mut self, mode: PruneMode) -> usize {
        ledger::prune_lexicon_history(&mut self.language.lexicon, mode)
    }

    fn commit(
        &mut self,
        next: Language,
        renames: &SpellingRenames,
        entries_changed: usize,
        key: ChangeKey,
    ) -> ChangeSummary {
        let sample = renames.apply(&self.sample_text).into_owned();
        let sample_text_changed = sample != self.sample_text;
        let language_changed = next != self.language;
        self.language = next;
        self.sample_text = sample;
        ChangeSummary {
            key: (entries_changed > 0).then_some(key),
            entries_changed,
            affixes_changed: 0,
            language_changed,
            sample_text_changed,
        }
    }
}

/// Declared diphthongs once `pairs` apply: a declared diphthong hands its
/// declaration on to a target that is also a diphthong.
fn declared_after(declared: &[String], pairs: &[PhonemePair]) -> Vec<String> {
    let mut next = declared.to_vec();
    for (old, new) in pairs {
        if declared.contains(old) && ipa::is_possible_diphthong(new) && !next.contains(new) {
            next.push(new.clone());
        }
    }
    next
}

/// Store `before`'s declared diphthongs on the records under `key` when
/// `next` declares a different set, so a revert can restore them.
fn note_declared_diphthongs(before: &Language, next: &mut Language, key: &ChangeKey) {
    let old = before.phonetic_inventory.diphthongs();
    let new = next.phonetic_inventory.diphthongs();
    if old.len() == new.len() && old.iter().all(|d| new.contains(d)) {
        return;
    }
    let old = old.to_vec();
    for record in next
        .lexicon
        .iter_mut()
        .filter_map(|entry| entry.history.get_mut(key))
    {
        record.declared_diphthongs = Some(old.clone());
    }
}

/// Phoneme labels stored on history records for a set of pairs.
fn record_labels(pairs: &[PhonemePair]) -> (String, String) {
    let olds: Vec<&str> = pairs.iter().map(|(old, _)| old.as_str()).collect();
    let news: Vec<&str> = pairs.iter().map(|(_, new)| new.as_str()).collect();
    (olds.join(", "), news.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_join_batch_pairs() {
        let pairs = vec![("p".to_string(), "b".to_string()), ("t".to_string(), "d".to_string())];
        assert_eq!(record_labels(&pairs), ("p, t".to_string(), "b, d".to_string()));
    }

    #[test]
    fn diphthong_declaration_follows_its_change() {
        let declared = vec!["ai".to_string()];
        let pairs = vec![
            ("ai".to_string(), "ei".to_string()),
            ("a".to_string(), "ou".to_string()),
        ];
        assert_eq!(declared_after(&declared, &pairs), ["ai", "ei"]);

        let to_monophthong = vec![("ai".to_string(), "e".to_string())];
        assert_eq!(declared_after(&declared, &to_monophthong), ["ai"]);
    }

    #[test]
    fn default_options_cap_batches_at_ten() {
        assert_eq!(ChangeOptions::default().batch_limit, Some(10));
    }

    #[test]
    fn closures_are_rule_editors() {
        let mut calls = 0;
        let mut editor = |_: &[SoundMap], pairs: &[PhonemePair]| {
            calls += pairs.len();
            None::<Vec<SoundMap>>
        };
        assert!(editor.edit_rules(&[], &[("p".into(), "b".into())]).is_none());
        assert_eq!(calls, 1);
    }
}
