//! Rebuilding the categorised phoneme inventory from the lexicon.

use std::collections::BTreeSet;

use honing_model::{Language, PhoneticInventory};

use crate::ipa;
use crate::substitution::SubstitutionTable;

/// Phonemes found in a set of IPA strings, by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryScan {
    pub pulmonic_consonants: BTreeSet<String>,
    pub non_pulmonic_consonants: BTreeSet<String>,
    pub vowels: BTreeSet<String>,
    pub diphthongs: BTreeSet<String>,
}

impl InventoryScan {
    /// Segment `phonetic` and record what it contains.
    ///
    /// `diphthongs` are the declared diphthongs; a vowel cluster is read
    /// as a diphthong only when it matches one of them.
    pub fn scan(&mut self, phonetic: &str, diphthongs: &[String]) {
        let chars: Vec<char> = phonetic.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if ipa::is_consonant(c) {
                let end = consonant_end(&chars, i);
                let token: String = chars[i..end].iter().collect();
                if ipa::is_pulmonic_consonant(c) {
                    self.pulmonic_consonants.insert(token);
                } else {
                    self.non_pulmonic_consonants.insert(token);
                }
                i = end;
            } else if ipa::is_vowel(c) {
                if let Some(diphthong) = diphthong_at(&chars[i..], diphthongs) {
                    i += diphthong.chars().count();
                    self.diphthongs.insert(diphthong.clone());
                } else {
                    let end = with_diacritics(&chars, i + 1);
                    self.vowels.insert(chars[i..end].iter().collect());
                    i = end;
                }
            } else {
                i += 1;
            }
        }
    }

    fn write_into(self, inventory: &mut PhoneticInventory) {
        inventory.set(
            PhoneticInventory::P_CONSONANTS,
            self.pulmonic_consonants.into_iter().collect(),
        );
        inventory.set(
            PhoneticInventory::NP_CONSONANTS,
            self.non_pulmonic_consonants.into_iter().collect(),
        );
        inventory.set(PhoneticInventory::VOWELS, self.vowels.into_iter().collect());
        inventory.set(
            PhoneticInventory::V_DIPHTHONGS,
            self.diphthongs.into_iter().collect(),
        );
    }
}

/// End of the diacritics (if any) starting at `from`.
fn with_diacritics(chars: &[char], from: usize) -> usize {
    let mut end = from;
    while end < chars.len() && ipa::is_diacritic(chars[end]) {
        end += 1;
    }
    end
}

/// End of a consonant at `start`, including diacritics and a tied second
/// consonant (`t͡s`).
fn consonant_end(chars: &[char], start: usize) -> usize {
    let end = with_diacritics(chars, start + 1);
    if end + 1 < chars.len() && ipa::is_tie_bar(chars[end]) && ipa::is_consonant(chars[end + 1]) {
        with_diacritics(chars, end + 2)
    } else {
        end
    }
}

fn diphthong_at<'a>(chars: &[char], diphthongs: &'a [String]) -> Option<&'a String> {
    diphthongs
        .iter()
        .filter(|d| {
            let len = d.chars().count();
            len <= chars.len() && d.chars().eq(chars[..len].iter().copied())
        })
        .max_by_key(|d| d.chars().count())
}

/// Diphthongs that should stay declared.
///
/// Declared ones survive while the lexicon or the phoneme list still uses
/// them; possible diphthongs in the phoneme list are always added.
fn retained_diphthongs(language: &Language) -> Vec<String> {
    let mut kept: BTreeSet<String> = language
        .phonetic_inventory
        .diphthongs()
        .iter()
        .filter(|d| {
            language.phoneme_inventory.contains(*d)
                || language.lexicon.iter().any(|e| e.phonetic.contains(d.as_str()))
        })
        .cloned()
        .collect();
    kept.extend(
        language
            .phoneme_inventory
            .iter()
            .filter(|p| ipa::is_possible_diphthong(p))
            .cloned(),
    );
    kept.into_iter().collect()
}

/// Recompute consonant, vowel and diphthong categories from the lexicon.
///
/// Other categories are left as they are.
pub fn rebuild_inventory(language: &mut Language) {
    let mut diphthongs = retained_diphthongs(language);
    // Longest first, so "aːi" is preferred over "aː".
    diphthongs.sort_by_key(|d| std::cmp::Reverse(d.chars().count()));

    let mut scan = InventoryScan::default();
    for entry in language.lexicon.iter() {
        scan.scan(&entry.phonetic, &diphthongs);
    }
    scan.diphthongs.extend(diphthongs);

    tracing::debug!(
        consonants = scan.pulmonic_consonants.len() + scan.non_pulmonic_consonants.len(),
        vowels = scan.vowels.len(),
        diphthongs = scan.diphthongs.len(),
        "Rebuilt phonetic inventory"
    );
    scan.write_into(&mut language.phonetic_inventory);
}

/// Rewrite phoneme list entries that equal a changed source phoneme.
pub fn rename_phonemes(phonemes: &mut [String], table: &SubstitutionTable) {
    for phoneme in phonemes.iter_mut() {
        if let Some((_, target)) = table.sources().find(|(source, _)| *source == phoneme.as_str()) {
            *phoneme = target.to_string();
        }
    }
}
