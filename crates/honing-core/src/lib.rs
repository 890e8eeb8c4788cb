//! Phonological change engine for constructed languages.
//!
//! Applies phoneme substitutions across a whole lexicon while keeping
//! spelling and pronunciation in step through the language's ordered rule
//! set, and records every change so it can be reverted.
//!
//! - [`changer`] - [`PhoneticChanger`], the entry point for all edits
//! - [`transducer`] - ordered regex rules turning spelling into IPA and back
//! - [`substitution`] - simultaneous, diphthong-aware phoneme replacement
//! - [`ledger`] - revert and prune of per-entry change history
//! - [`speech`] - sample text transcription for text-to-speech backends
//! - [`suggest`] - replacement candidates and rule checks
//! - [`notation`] - Kirshenbaum and X-SAMPA conversion

pub mod affix;
pub mod changer;
pub mod error;
pub mod inventory;
pub mod ipa;
pub mod ledger;
pub mod notation;
pub mod sample_text;
pub mod speech;
pub mod substitution;
pub mod suggest;
pub mod transducer;

pub use changer::{
    ChangeOptions, ChangeSummary, DEFAULT_BATCH_LIMIT, KeepRules, PhonemePair, PhoneticChanger,
    RuleEditor,
};
pub use error::{HoningError, Result};
pub use inventory::rebuild_inventory;
pub use ledger::PruneMode;
pub use sample_text::SpellingRenames;
pub use speech::{SpeechEngine, SpeechSpeed, SpokenWord, Transcription, VoiceData};
pub use substitution::SubstitutionTable;
pub use suggest::{Candidate, Reach, fix_latin_lookalikes, r_adding_rules, replacement_candidates};
pub use transducer::{Direction, Transducer, pronounce, spell};
