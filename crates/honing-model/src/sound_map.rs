//! Spelling/pronunciation rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One bidirectional rule between spelling and IPA.
///
/// `pronunciation_regex` matches spelled text and produces `phoneme`;
/// `spelling_regex` matches IPA text and produces `romanization`.
/// Either side may be empty when the rule only works one way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundMap {
    #[serde(default)]
    pub phoneme: String,
    #[serde(default)]
    pub romanization: String,
    #[serde(default)]
    pub spelling_regex: String,
    #[serde(default, alias = "pronounciation_regex")]
    pub pronunciation_regex: String,
}

impl SoundMap {
    pub fn new(
        phoneme: impl Into<String>,
        romanization: impl Into<String>,
        spelling_regex: impl Into<String>,
        pronunciation_regex: impl Into<String>,
    ) -> Self {
        Self {
            phoneme: phoneme.into(),
            romanization: romanization.into(),
            spelling_regex: spelling_regex.into(),
            pronunciation_regex: pronunciation_regex.into(),
        }
    }

    /// Rule whose patterns are the literal tokens themselves.
    pub fn literal(phoneme: &str, romanization: &str) -> Self {
        Self::new(
            phoneme,
            romanization,
            regex::escape(phoneme),
            regex::escape(romanization),
        )
    }
}

impl fmt::Display for SoundMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}; {} -> {}",
            self.pronunciation_regex, self.phoneme, self.spelling_regex, self.romanization
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_rule_escapes_metacharacters() {
        let rule = SoundMap::literal("a.", "a?");
        assert_eq!(rule.spelling_regex, r"a\.");
        assert_eq!(rule.pronunciation_regex, r"a\?");
    }

    #[test]
    fn reads_misspelled_pronunciation_field() {
        let rule: SoundMap = serde_json::from_str(
            r#"{"phoneme":"p","romanization":"p","spelling_regex":"p","pronounciation_regex":"p"}"#,
        )
        .unwrap();
        assert_eq!(rule.pronunciation_regex, "p");
    }

    #[test]
    fn display_shows_both_directions() {
        let rule = SoundMap::new("ʃ", "sh", "ʃ", "sh");
        assert_eq!(rule.to_string(), "sh -> ʃ; ʃ -> sh");
    }
}
