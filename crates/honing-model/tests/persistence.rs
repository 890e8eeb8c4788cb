//! Integration tests for language file loading and saving.

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use honing_model::{
    ChangeKey, ChangeRecord, LexiconEntry, ModelError, load_language, parse_language,
    save_language,
};

const SAMPLE: &str = r#"{
  "english_name": "Kalo",
  "phoneme_inventory": ["p", "a", "t", "ai"],
  "phonetic_inventory": {
    "v_diphthongs": ["ai"],
    "vowels": ["a"],
    "custom": ["x"]
  },
  "spelling_pronunciation_rules": [
    {"phoneme": "p", "romanization": "p", "spelling_regex": "p", "pronunciation_regex": "p"}
  ],
  "lexicon": [
    {
      "phonetic": "pat",
      "spelled": "pat",
      "english": "strike",
      "part_of_speech": "verb",
      "declensions": ["root"],
      "derived_word": false,
      "declined_word": false,
      "metadata": {"source": "field notes"}
    }
  ],
  "metadata": {
    "history": ["created"],
    "version": 2,
    "author": "someone"
  }
}"#;

#[test]
fn test_parse_reads_every_section() {
    let language = parse_language(SAMPLE).unwrap();
    assert_eq!(language.phoneme_inventory.len(), 4);
    assert_eq!(language.phonetic_inventory.diphthongs(), ["ai"]);
    assert_eq!(language.sound_map_list.len(), 1);
    let entry = language.lexicon.find_by_spelling("pat").unwrap();
    assert_eq!(entry.gloss, "strike");
    assert_eq!(entry.declensions, ["root"]);
    assert_eq!(language.metadata.version, 2);
    assert_eq!(language.extras["english_name"], "Kalo");
    assert_eq!(language.metadata.extra["author"], "someone");
}

#[test]
fn test_save_preserves_unknown_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kalo.json");

    let mut language = parse_language(SAMPLE).unwrap();
    save_language(&mut language, &path).unwrap();

    let reloaded = load_language(&path).unwrap();
    assert_eq!(reloaded.extras["english_name"], "Kalo");
    assert_eq!(reloaded.metadata.extra["author"], "someone");
    assert_eq!(reloaded.phonetic_inventory.get("custom"), ["x"]);
    let entry = reloaded.lexicon.find_by_spelling("pat").unwrap();
    assert_eq!(entry.metadata["source"], "field notes");
}

#[test]
fn test_save_appends_history_and_bumps_version() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kalo.json");

    let mut language = parse_language(SAMPLE).unwrap();
    save_language(&mut language, &path).unwrap();
    save_language(&mut language, &path).unwrap();

    let reloaded = load_language(&path).unwrap();
    assert_eq!(reloaded.metadata.version, 4);
    assert_eq!(reloaded.metadata.history.len(), 3);
    assert!(reloaded.metadata.history[2].starts_with("Edited in conlang-honing, saved at "));
    assert!(!dir.path().join("kalo.json.tmp").exists());
}

#[test]
fn test_change_history_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kalo.json");

    let mut language = parse_language(SAMPLE).unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 15, 30).unwrap();
    let key = ChangeKey::new(1, at);
    let before = LexiconEntry::new("pat", "pat", "strike", "verb");
    for entry in language.lexicon.iter_mut() {
        entry.phonetic = "bat".to_string();
        entry.spelled = "bat".to_string();
        entry.record_change(key.clone(), ChangeRecord::new("p", "b", before.clone()));
    }
    save_language(&mut language, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"phonetic_change_history\""));
    assert!(text.contains("\"1@2024-03-05T14:15:30.000000Z\""));

    let reloaded = load_language(&path).unwrap();
    let entry = reloaded.lexicon.find_by_spelling("bat").unwrap();
    assert_eq!(entry.history[&key].old_version, before);
    assert_eq!(reloaded.lexicon.latest_change_key(), Some(&key));
}

#[test]
fn test_load_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = load_language(&path).unwrap_err();
    match err {
        ModelError::Io { operation, path: p, .. } => {
            assert_eq!(operation, "read");
            assert_eq!(p, path);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unreadable_history_key_aborts_parse() {
    let text = r#"{
      "lexicon": [{
        "phonetic": "pat", "spelled": "pat", "english": "strike", "part_of_speech": "verb",
        "phonetic_change_history": {
          "20240305021530.1234": {
            "old_phoneme": "p", "new_phoneme": "b",
            "old_version": {"phonetic": "pat", "spelled": "pat", "english": "strike", "part_of_speech": "verb"}
          }
        }
      }]
    }"#;
    let err = parse_language(text).unwrap_err();
    assert!(matches!(err, ModelError::Deserialization { .. }));
}
