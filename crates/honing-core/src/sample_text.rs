//! Keeping free-form sample text in step with lexicon spellings.
//!
//! Sample text is split into whitespace-separated tokens. A token is renamed
//! when it equals an old spelling, optionally followed by one of `.,?!`.
//! Partial-word matches are never touched, and all renames collected for one
//! operation are applied in the same pass.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+").expect("token regex is valid"));

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '?', '!'];

/// Old-to-new spellings collected during one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellingRenames {
    renames: BTreeMap<String, String>,
}

impl SpellingRenames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `old → new`.
    ///
    /// No-op renames are ignored. When `old` is already being renamed to
    /// something else, the first rename is kept.
    pub fn insert(&mut self, old: &str, new: &str) {
        if old == new || old.is_empty() {
            return;
        }
        match self.renames.get(old) {
            Some(existing) if existing != new => {
                tracing::warn!(
                    old,
                    kept = %existing,
                    ignored = new,
                    "Conflicting sample text renames"
                );
            }
            Some(_) => {}
            None => {
                self.renames.insert(old.to_string(), new.to_string());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.renames.get(old).map(String::as_str)
    }

    /// Rewrite every whole-word occurrence of an old spelling.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.is_empty() || text.is_empty() {
            return Cow::Borrowed(text);
        }
        TOKEN.replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[0];
            if let Some(new) = self.get(token) {
                return new.to_string();
            }
            let mut chars = token.chars();
            if let Some(last) = chars.next_back().filter(|c| TRAILING_PUNCTUATION.contains(c))
                && let Some(new) = self.get(chars.as_str())
            {
                return format!("{new}{last}");
            }
            token.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renames(pairs: &[(&str, &str)]) -> SpellingRenames {
        let mut renames = SpellingRenames::new();
        for (old, new) in pairs {
            renames.insert(old, new);
        }
        renames
    }

    #[test]
    fn renames_whole_words_with_punctuation() {
        let r = renames(&[("pat", "bat")]);
        assert_eq!(r.apply("pat pat."), "bat bat.");
        assert_eq!(r.apply("pat, pat? pat!"), "bat, bat? bat!");
    }

    #[test]
    fn leaves_partial_words_alone() {
        let r = renames(&[("pat", "bat")]);
        assert_eq!(r.apply("spat pats pat"), "spat pats bat");
    }

    #[test]
    fn preserves_whitespace() {
        let r = renames(&[("pat", "bat")]);
        assert_eq!(r.apply("  pat\n\tpat  "), "  bat\n\tbat  ");
    }

    #[test]
    fn renames_are_simultaneous() {
        let r = renames(&[("pa", "ba"), ("ba", "ka")]);
        assert_eq!(r.apply("pa ba"), "ba ka");
    }

    #[test]
    fn first_rename_wins_on_conflict() {
        let r = renames(&[("pat", "bat"), ("pat", "kat")]);
        assert_eq!(r.apply("pat"), "bat");
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn only_one_trailing_mark_is_peeled() {
        let r = renames(&[("pat", "bat")]);
        assert_eq!(r.apply("pat?!"), "pat?!");
    }
}
