//! Data model for conlang phonology honing.
//!
//! This crate holds the language file types and their JSON persistence:
//!
//! - [`Language`] - aggregate root (lexicon, rules, inventories, metadata)
//! - [`LexiconEntry`] / [`Lexicon`] - words and the collection that keeps them unique
//! - [`SoundMap`] - one bidirectional spelling/pronunciation rule
//! - [`ChangeKey`] / [`ChangeRecord`] - per-entry change history
//!
//! Fields this crate does not model are kept in flattened maps so a
//! load/save cycle never drops them.
//!
//! # Example
//!
//! ```ignore
//! use honing_model::{load_language, save_language};
//!
//! let mut language = load_language(Path::new("kalo.json"))?;
//! save_language(&mut language, Path::new("kalo.json"))?;
//! ```

pub mod change;
pub mod entry;
pub mod error;
pub mod io;
pub mod language;
pub mod lexicon;
pub mod sound_map;

pub use change::{ChangeKey, ChangeRecord, NOT_APPLICABLE};
pub use entry::LexiconEntry;
pub use error::{ModelError, Result};
pub use io::{language_to_json, load_language, parse_language, save_language};
pub use language::{APPLICATION_NAME, Language, LanguageMetadata, PhoneticInventory};
pub use lexicon::Lexicon;
pub use sound_map::SoundMap;
