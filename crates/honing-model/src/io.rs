//! Loading and saving language files.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::Utc;

use crate::error::{ModelError, Result};
use crate::language::Language;

/// Load a language from a JSON file.
///
/// Nothing is returned unless the whole file parses.
pub fn load_language(path: &Path) -> Result<Language> {
    let text = fs::read_to_string(path).map_err(|e| ModelError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    let language = parse_language_at(&text, path)?;
    tracing::info!(
        path = %path.display(),
        entries = language.lexicon.len(),
        rules = language.sound_map_list.len(),
        "Loaded language"
    );
    Ok(language)
}

/// Parse a language from JSON text.
pub fn parse_language(text: &str) -> Result<Language> {
    parse_language_at(text, Path::new("<memory>"))
}

fn parse_language_at(text: &str, path: &Path) -> Result<Language> {
    serde_json::from_str(text).map_err(|e| ModelError::Deserialization {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Serialize a language to pretty-printed JSON.
pub fn language_to_json(language: &Language) -> Result<String> {
    serde_json::to_string_pretty(language).map_err(|e| ModelError::Serialization { source: e })
}

/// Save a language to a JSON file.
///
/// Appends a line to the save history and bumps the version before
/// writing. Uses atomic write (temp file + rename).
pub fn save_language(language: &mut Language, path: &Path) -> Result<()> {
    language.record_save(Utc::now());

    let json = language_to_json(language)?;

    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ModelError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| ModelError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(json.as_bytes())
        .and_then(|()| file.write_all(b"\n"))
        .map_err(|e| ModelError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;

    file.sync_all().map_err(|e| ModelError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| ModelError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        version = language.metadata.version,
        "Saved language"
    );
    Ok(())
}
