//! Change-history keys and records.
//!
//! Every committed lexicon change is stored on the affected entries under a
//! [`ChangeKey`]. Keys are ordered by a sequence number first, so ordering
//! stays monotonic across sessions even when the wall clock does not.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::LexiconEntry;
use crate::error::ModelError;

/// Phoneme marker used for records produced by bulk re-derivation.
pub const NOT_APPLICABLE: &str = "n/a";

/// Identifies one logical change across the whole lexicon.
///
/// Serialized as `"<sequence>@<rfc3339>"` so it can key a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChangeKey {
    sequence: u64,
    recorded_at: DateTime<Utc>,
}

impl ChangeKey {
    pub fn new(sequence: u64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            sequence,
            recorded_at: recorded_at.trunc_subsecs(6),
        }
    }

    /// Key for a new change, given the largest sequence already in use.
    pub fn next(max_sequence: u64) -> Result<Self, ModelError> {
        let sequence = max_sequence
            .checked_add(1)
            .ok_or_else(|| ModelError::InvalidChangeKey {
                key: max_sequence.to_string(),
                reason: "change sequence exhausted".to_string(),
            })?;
        Ok(Self::new(sequence, Utc::now()))
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}",
            self.sequence,
            self.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true)
        )
    }
}

impl FromStr for ChangeKey {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ModelError::InvalidChangeKey {
            key: value.to_string(),
            reason,
        };
        let (sequence, timestamp) = value
            .split_once('@')
            .ok_or_else(|| invalid("expected <sequence>@<timestamp>".to_string()))?;
        let sequence = sequence
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(format!("bad sequence: {e}")))?;
        let recorded_at = DateTime::parse_from_rfc3339(timestamp.trim())
            .map_err(|e| invalid(format!("bad timestamp: {e}")))?
            .with_timezone(&Utc);
        Ok(Self::new(sequence, recorded_at))
    }
}

impl From<ChangeKey> for String {
    fn from(key: ChangeKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ChangeKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Pre-image of an entry plus the substitution that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub old_phoneme: String,
    pub new_phoneme: String,
    pub old_version: LexiconEntry,
    /// Declared diphthongs before the change, present only when the change
    /// altered them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_diphthongs: Option<Vec<String>>,
}

impl ChangeRecord {
    pub fn new(
        old_phoneme: impl Into<String>,
        new_phoneme: impl Into<String>,
        old_version: LexiconEntry,
    ) -> Self {
        Self {
            old_phoneme: old_phoneme.into(),
            new_phoneme: new_phoneme.into(),
            old_version,
            declared_diphthongs: None,
        }
    }

    #[must_use]
    pub fn with_declared_diphthongs(mut self, diphthongs: Option<Vec<String>>) -> Self {
        self.declared_diphthongs = diphthongs;
        self
    }

    /// Record for a re-derivation that did not target a phoneme.
    pub fn rederivation(old_version: LexiconEntry) -> Self {
        Self::new(NOT_APPLICABLE, NOT_APPLICABLE, old_version)
    }

    pub fn is_rederivation(&self) -> bool {
        self.old_phoneme == NOT_APPLICABLE && self.new_phoneme == NOT_APPLICABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn key_orders_by_sequence_before_time() {
        let later_clock = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let earlier_clock = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let first = ChangeKey::new(1, later_clock);
        let second = ChangeKey::new(2, earlier_clock);
        assert!(second > first);
    }

    #[test]
    fn key_parses_its_display_form() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 15, 30).unwrap();
        let key = ChangeKey::new(42, at);
        let text = key.to_string();
        assert_eq!(text, "42@2024-03-05T14:15:30.000000Z");
        assert_eq!(text.parse::<ChangeKey>().unwrap(), key);
    }

    #[test]
    fn key_rejects_legacy_float_stamps() {
        let err = "20240305021530.1234".parse::<ChangeKey>().unwrap_err();
        assert!(matches!(err, ModelError::InvalidChangeKey { .. }));
    }

    #[test]
    fn next_key_increments_sequence() {
        let first = ChangeKey::next(0).unwrap();
        assert_eq!(first.sequence(), 1);
        let second = ChangeKey::next(first.sequence()).unwrap();
        assert_eq!(second.sequence(), 2);
        assert!(second > first);
    }

    #[test]
    fn next_key_fails_when_sequence_is_exhausted() {
        let err = ChangeKey::next(u64::MAX).unwrap_err();
        assert!(matches!(err, ModelError::InvalidChangeKey { .. }));
    }

    #[test]
    fn record_omits_unchanged_diphthongs() {
        let entry = LexiconEntry::new("pai", "pai", "bread", "noun");
        let plain = serde_json::to_value(ChangeRecord::new("a", "o", entry.clone())).unwrap();
        assert!(plain.get("declared_diphthongs").is_none());

        let record = ChangeRecord::new("ai", "ei", entry)
            .with_declared_diphthongs(Some(vec!["ai".to_string()]));
        let text = serde_json::to_string(&record).unwrap();
        let back: ChangeRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back.declared_diphthongs, Some(vec!["ai".to_string()]));
    }
}
