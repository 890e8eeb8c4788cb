//! The language aggregate root.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lexicon::Lexicon;
use crate::sound_map::SoundMap;

/// Application name written into the save history.
pub const APPLICATION_NAME: &str = "conlang-honing";

/// Categorised phoneme inventory (category name to phonemes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneticInventory(BTreeMap<String, Vec<String>>);

impl PhoneticInventory {
    pub const P_CONSONANTS: &'static str = "p_consonants";
    pub const NP_CONSONANTS: &'static str = "np_consonants";
    pub const VOWELS: &'static str = "vowels";
    pub const V_DIPHTHONGS: &'static str = "v_diphthongs";

    pub fn get(&self, category: &str) -> &[String] {
        self.0.get(category).map_or(&[], Vec::as_slice)
    }

    pub fn set(&mut self, category: impl Into<String>, phonemes: Vec<String>) {
        self.0.insert(category.into(), phonemes);
    }

    /// Declared diphthongs.
    pub fn diphthongs(&self) -> &[String] {
        self.get(Self::V_DIPHTHONGS)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, phonemes)| (name.as_str(), phonemes.as_slice()))
    }

    pub fn categories_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<String>)> {
        self.0.iter_mut().map(|(name, phonemes)| (name.as_str(), phonemes))
    }
}

/// Save log and version counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageMetadata {
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub version: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A constructed language as stored in its JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// Flat phoneme list maintained by the language author.
    #[serde(default)]
    pub phoneme_inventory: Vec<String>,
    #[serde(default)]
    pub phonetic_inventory: PhoneticInventory,
    /// Ordered spelling/pronunciation rules.
    #[serde(default, alias = "spelling_pronunciation_rules")]
    pub sound_map_list: Vec<SoundMap>,
    #[serde(default)]
    pub lexicon: Lexicon,
    #[serde(default)]
    pub derived: bool,
    #[serde(default)]
    pub declined: bool,
    #[serde(default)]
    pub metadata: LanguageMetadata,
    /// Top-level fields not modelled here (names, affix maps, ...).
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Language {
    /// Append the save line and bump the version.
    pub fn record_save(&mut self, at: DateTime<Utc>) {
        self.metadata.history.push(format!(
            "Edited in {APPLICATION_NAME}, saved at {}",
            at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        self.metadata.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_save_appends_and_bumps_version() {
        let mut language = Language::default();
        language.metadata.version = 3;
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 15, 30).unwrap();
        language.record_save(at);
        assert_eq!(language.metadata.version, 4);
        assert_eq!(
            language.metadata.history,
            ["Edited in conlang-honing, saved at 2024-03-05T14:15:30Z"]
        );
    }

    #[test]
    fn missing_category_reads_as_empty() {
        let inventory = PhoneticInventory::default();
        assert!(inventory.diphthongs().is_empty());
    }
}
