//! Simultaneous phoneme substitution.
//!
//! A [`SubstitutionTable`] rewrites IPA text in two steps:
//!
//! 1. every *protected* token (a declared diphthong) is marked, scanning
//!    left to right with the longest token winning; marked text is copied
//!    verbatim and no source may match any part of it;
//! 2. the remaining text is scanned once, left to right, and at each
//!    position the longest *source* phoneme is replaced by its target,
//!    unless the next character is a diacritic (the text holds a more
//!    specific variant of the phoneme).
//!
//! Since every position is rewritten at most once, no target can feed
//! another source. `p→b, b→k, k→p` turns `pbk` into `bkp`.

use crate::error::{HoningError, Result};
use crate::ipa;

/// Compiled set of literal substitutions plus protected tokens.
#[derive(Debug, Clone)]
pub struct SubstitutionTable {
    /// `(source, target)`, longest source first.
    sources: Vec<(String, String)>,
    /// Longest first.
    protected: Vec<String>,
}

impl SubstitutionTable {
    /// Build a table from `(source, target)` pairs and protected tokens.
    ///
    /// Protected tokens equal to a source are dropped, so a diphthong can
    /// itself be the target of a change. Repeated sources keep their first
    /// target.
    pub fn new<P, S, D>(pairs: P, protected: D) -> Result<Self>
    where
        P: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let mut sources: Vec<(String, String)> = Vec::new();
        for (source, target) in pairs {
            let source = source.as_ref();
            if source.is_empty() {
                return Err(HoningError::EmptyPhoneme);
            }
            if sources.iter().any(|(s, _)| s == source) {
                tracing::warn!(source, "Duplicate substitution source ignored");
                continue;
            }
            sources.push((source.to_string(), target.as_ref().to_string()));
        }

        let mut kept: Vec<String> = Vec::new();
        for token in protected {
            let token = token.as_ref();
            if token.is_empty()
                || sources.iter().any(|(s, _)| s == token)
                || kept.iter().any(|k| k == token)
            {
                continue;
            }
            kept.push(token.to_string());
        }

        sources.sort_by_key(|(source, _)| std::cmp::Reverse(source.chars().count()));
        kept.sort_by_key(|token| std::cmp::Reverse(token.chars().count()));
        Ok(Self {
            sources,
            protected: kept,
        })
    }

    /// Table for a single `old → new` change.
    pub fn single<D>(old: &str, new: &str, protected: D) -> Result<Self>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self::new([(old, new)], protected)
    }

    pub fn sources(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn apply(&self, text: &str) -> String {
        let shielded = self.shielded_bytes(text);
        let mut output = String::with_capacity(text.len());
        let mut pos = 0;
        'scan: while pos < text.len() {
            let rest = &text[pos..];
            if !shielded[pos] {
                for (source, target) in &self.sources {
                    let Some(after) = rest.strip_prefix(source.as_str()) else {
                        continue;
                    };
                    let end = pos + source.len();
                    if shielded[pos..end].contains(&true)
                        || after.chars().next().is_some_and(ipa::is_diacritic)
                    {
                        continue;
                    }
                    output.push_str(target);
                    pos = end;
                    continue 'scan;
                }
            }
            let Some(c) = rest.chars().next() else {
                break;
            };
            output.push(c);
            pos += c.len_utf8();
        }
        output
    }

    /// Byte mask of the text covered by protected tokens.
    fn shielded_bytes(&self, text: &str) -> Vec<bool> {
        let mut shielded = vec![false; text.len()];
        if self.protected.is_empty() {
            return shielded;
        }
        let mut pos = 0;
        while pos < text.len() {
            let rest = &text[pos..];
            if let Some(token) = self.protected.iter().find(|t| rest.starts_with(t.as_str())) {
                shielded[pos..pos + token.len()].fill(true);
                pos += token.len();
            } else {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        shielded
    }
}
