//! Command implementations.
//!
//! Each `run_*` function loads what it needs, drives the engine, prints its
//! result and writes files back unless `--dry-run` was given.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use honing_core::notation::{ipa_to_kirshenbaum, ipa_to_xsampa, xsampa_to_ipa};
use honing_core::{
    ChangeSummary, PhoneticChanger, PruneMode, SpeechEngine, Transcription, fix_latin_lookalikes,
    r_adding_rules, rebuild_inventory, replacement_candidates,
};
use honing_model::{ChangeKey, ChangeRecord, Language, load_language, save_language};

use crate::cli::{
    BatchArgs, ChangeArgs, ConfigArgs, ConvertArgs, EditArgs, HistoryArgs, InventoryArgs,
    LanguageArg, NotationArg, PruneArgs, SuggestArgs, TranscribeArgs, TranscriptFormatArg,
};
use crate::espeak::EspeakEngine;
use crate::settings::{Settings, resolve_settings_path, save_settings};
use crate::summary::{
    HistoryRow, print_candidates, print_change_summary, print_entry_history, print_history,
    print_inventory, print_rules, print_saved, print_voices,
};

/// A language opened for editing, with its optional sample text.
pub struct Session {
    pub changer: PhoneticChanger,
    language_path: PathBuf,
    sample_path: Option<PathBuf>,
    original_sample: String,
}

impl Session {
    /// Load the language and sample text named by `edit`.
    pub fn open(edit: &EditArgs, settings: &Settings) -> Result<Self> {
        let language = load_language(&edit.language)
            .with_context(|| format!("load language {}", edit.language.display()))?;
        let sample = match &edit.sample {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("read sample text {}", path.display()))?,
            None => String::new(),
        };
        let changer =
            PhoneticChanger::new(language, sample.clone()).with_options(settings.changes.options());
        Ok(Self {
            changer,
            language_path: edit.language.clone(),
            sample_path: edit.sample.clone(),
            original_sample: sample,
        })
    }

    /// Write the language (and changed sample text) unless this is a dry run.
    ///
    /// Returns `true` when anything was written.
    pub fn finish(
        mut self,
        edit: &EditArgs,
        settings: &Settings,
        language_changed: bool,
    ) -> Result<bool> {
        if edit.dry_run || !language_changed {
            return Ok(false);
        }

        if let Some(mode) = settings.history.prune_on_save() {
            let removed = self.changer.prune_history(mode);
            info!(removed, ?mode, "Pruned change history before saving");
        }
        let (mut language, sample) = self.changer.into_parts();

        let target = edit.output.as_deref().unwrap_or(&self.language_path);
        save_language(&mut language, target)
            .with_context(|| format!("save language {}", target.display()))?;

        let sample_written = match &self.sample_path {
            Some(path) if sample != self.original_sample => {
                fs::write(path, &sample)
                    .with_context(|| format!("write sample text {}", path.display()))?;
                Some(path.as_path())
            }
            _ => None,
        };
        print_saved(target, sample_written);
        Ok(true)
    }
}

pub fn run_change(args: &ChangeArgs, settings: &Settings) -> Result<ChangeSummary> {
    let span = info_span!("change", old = %args.old, new = %args.new);
    let _guard = span.enter();

    let mut session = Session::open(&args.edit, settings)?;
    let summary = session.changer.apply_change(&args.old, &args.new)?;
    print_change_summary(
        &format!("{} → {}", args.old, args.new),
        &summary,
        args.edit.dry_run,
    );
    session.finish(&args.edit, settings, !summary.is_noop())?;
    Ok(summary)
}

pub fn run_batch(args: &BatchArgs, settings: &Settings) -> Result<ChangeSummary> {
    let span = info_span!("batch", pairs = args.pairs.len());
    let _guard = span.enter();

    let mut session = Session::open(&args.edit, settings)?;
    if args.no_limit {
        let options = session.changer.options().with_batch_limit(None);
        session.changer = session.changer.with_options(options);
    }
    let summary = session.changer.apply_changes(&args.pairs)?;
    let label: Vec<String> = args
        .pairs
        .iter()
        .map(|(old, new)| format!("{old} → {new}"))
        .collect();
    print_change_summary(&label.join(", "), &summary, args.edit.dry_run);
    session.finish(&args.edit, settings, !summary.is_noop())?;
    Ok(summary)
}

pub fn run_respell(args: &EditArgs, settings: &Settings) -> Result<ChangeSummary> {
    let mut session = Session::open(args, settings)?;
    let summary = session.changer.resync_spelling_from_phonetics()?;
    print_change_summary("Respell from pronunciation", &summary, args.dry_run);
    session.finish(args, settings, !summary.is_noop())?;
    Ok(summary)
}

pub fn run_repronounce(args: &EditArgs, settings: &Settings) -> Result<ChangeSummary> {
    let mut session = Session::open(args, settings)?;
    let summary = session.changer.resync_phonetics_from_spelling()?;
    print_change_summary("Re-pronounce from spelling", &summary, args.dry_run);
    session.finish(args, settings, !summary.is_noop())?;
    Ok(summary)
}

pub fn run_revert(args: &EditArgs, settings: &Settings) -> Result<ChangeSummary> {
    let mut session = Session::open(args, settings)?;
    let summary = session.changer.revert_most_recent();
    print_change_summary("Revert", &summary, args.dry_run);
    session.finish(args, settings, summary.key.is_some())?;
    Ok(summary)
}

pub fn run_prune(args: &PruneArgs, settings: &Settings) -> Result<usize> {
    let mut session = Session::open(&args.edit, settings)?;
    let mode = if args.deep {
        PruneMode::Deep
    } else {
        settings.history.prune_mode()
    };
    let removed = session.changer.prune_history(mode);
    println!("Removed {removed} history records ({mode:?})");
    session.finish(&args.edit, settings, removed > 0)?;
    Ok(removed)
}

/// Show the inventory after the requested repairs. Returns the number of
/// look-alike letters replaced.
pub fn run_inventory(args: &InventoryArgs, settings: &Settings) -> Result<usize> {
    let mut session = Session::open(&args.edit, settings)?;
    let language = session.changer.language_mut();

    let fixed = if args.fix_lookalikes {
        let fixed = fix_latin_lookalikes(language);
        println!("Replaced {fixed} Latin look-alike letters");
        fixed
    } else {
        0
    };
    if args.rebuild {
        rebuild_inventory(language);
    }
    print_inventory(session.changer.language());

    let changed = fixed > 0 || args.rebuild;
    session.finish(&args.edit, settings, changed)?;
    Ok(fixed)
}

pub fn run_history(args: &HistoryArgs) -> Result<Vec<HistoryRow>> {
    let language = load_language(&args.language)
        .with_context(|| format!("load language {}", args.language.display()))?;

    if let Some(word) = &args.word {
        let Some(entry) = language.lexicon.find_by_spelling(word) else {
            bail!("'{word}' is not in the lexicon");
        };
        let records: Vec<(&ChangeKey, &ChangeRecord)> = entry.history.iter().rev().collect();
        print_entry_history(word, &records);
        return Ok(Vec::new());
    }

    let rows = history_rows(&language);
    print_history(&rows);
    Ok(rows)
}

/// One row per change key, newest first, counting the entries it touched.
pub fn history_rows(language: &Language) -> Vec<HistoryRow> {
    let mut rows: BTreeMap<&ChangeKey, HistoryRow> = BTreeMap::new();
    for entry in language.lexicon.iter() {
        for (key, record) in &entry.history {
            rows.entry(key)
                .or_insert_with(|| HistoryRow {
                    key: key.clone(),
                    old_phoneme: record.old_phoneme.clone(),
                    new_phoneme: record.new_phoneme.clone(),
                    entries: 0,
                })
                .entries += 1;
        }
    }
    rows.into_values().rev().collect()
}

/// Print the rule set; returns the rules flagged as adding an r.
pub fn run_rules(args: &LanguageArg) -> Result<usize> {
    let language = load_language(&args.language)
        .with_context(|| format!("load language {}", args.language.display()))?;
    let flagged = r_adding_rules(&language.sound_map_list);
    print_rules(&language.sound_map_list, &flagged);
    if !flagged.is_empty() {
        warn!(count = flagged.len(), "Rules add an r without an r sound");
    }
    Ok(flagged.len())
}

pub fn run_suggest(args: &SuggestArgs) {
    let candidates = replacement_candidates(&args.phoneme, args.reach);
    print_candidates(&args.phoneme, &candidates);
}

/// Transcribe the sample text and print it in the requested notation.
pub fn run_transcribe(args: &TranscribeArgs, settings: &Settings) -> Result<String> {
    let span = info_span!("transcribe_command", sample = %args.sample.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut language = load_language(&args.language)
        .with_context(|| format!("load language {}", args.language.display()))?;
    let sample = fs::read_to_string(&args.sample)
        .with_context(|| format!("read sample text {}", args.sample.display()))?;
    let transcription = Transcription::build(&mut language, &sample)?;
    let speed = args.speed.unwrap_or(settings.speech.default_speed);

    let rendered = match args.format {
        TranscriptFormatArg::Phonetic => transcription.phonetic_text(),
        TranscriptFormatArg::Ssml => transcription.ssml(speed),
        TranscriptFormatArg::Kirshenbaum => transcription.kirshenbaum_text(),
        TranscriptFormatArg::XSampa => ipa_to_xsampa(&transcription.phonetic_text()),
    };
    println!("{}", rendered.trim_end());

    if let Some(target) = &args.speak {
        let mut engine = EspeakEngine::new(&settings.speech.espeak_ng_path);
        engine.generate(&transcription, speed)?;
        let voice = args
            .voice
            .as_deref()
            .or(settings.speech.default_voice.as_deref());
        if engine.generate_speech(target, voice, speed)? {
            println!("Audio: {}", target.display());
        } else {
            warn!(target = %target.display(), "eSpeak-NG produced no audio");
        }
    }

    if args.save_sounded_out && !transcription.sounded_out().is_empty() {
        save_language(&mut language, &args.language)
            .with_context(|| format!("save language {}", args.language.display()))?;
        print_saved(&args.language, None);
    }

    info!(
        sounded_out = transcription.sounded_out().len(),
        duration_ms = start.elapsed().as_millis(),
        "Transcription complete"
    );
    Ok(rendered)
}

pub fn run_voices(settings: &Settings) {
    let engine = EspeakEngine::new(&settings.speech.espeak_ng_path);
    print_voices(&engine.voices());
}

pub fn run_convert(args: &ConvertArgs) -> Result<String> {
    let converted = convert_notation(&args.text, args.from, args.to)?;
    println!("{converted}");
    Ok(converted)
}

/// Convert `text` between notations. Kirshenbaum is output-only.
pub fn convert_notation(text: &str, from: NotationArg, to: NotationArg) -> Result<String> {
    let ipa = match from {
        NotationArg::Ipa => text.to_string(),
        NotationArg::XSampa => xsampa_to_ipa(text),
        NotationArg::Kirshenbaum if to == NotationArg::Kirshenbaum => return Ok(text.to_string()),
        NotationArg::Kirshenbaum => bail!("Kirshenbaum text cannot be converted back"),
    };
    Ok(match to {
        NotationArg::Ipa => ipa,
        NotationArg::XSampa => ipa_to_xsampa(&ipa),
        NotationArg::Kirshenbaum => ipa_to_kirshenbaum(&ipa),
    })
}

pub fn run_config(args: &ConfigArgs, explicit: Option<&Path>, settings: &Settings) -> Result<()> {
    let path = resolve_settings_path(explicit);
    match &path {
        Some(path) => println!("Settings file: {}", path.display()),
        None => println!("Settings file: (no config folder on this platform)"),
    }
    println!();
    print!("{}", toml::to_string_pretty(settings).context("serialize settings")?);
    if args.init {
        let written = save_settings(settings, explicit)?;
        println!();
        println!("Wrote {}", written.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_notation() {
        assert_eq!(
            convert_notation("\u{0283}a", NotationArg::Ipa, NotationArg::XSampa).unwrap(),
            "Sa"
        );
        assert_eq!(
            convert_notation("Sa", NotationArg::XSampa, NotationArg::Ipa).unwrap(),
            "\u{0283}a"
        );
        assert!(convert_notation("Sa", NotationArg::Kirshenbaum, NotationArg::Ipa).is_err());
    }
}
