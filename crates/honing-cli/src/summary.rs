//! Terminal tables for command results.

use std::collections::BTreeMap;
use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use honing_core::{Candidate, ChangeSummary, VoiceData};
use honing_model::{ChangeKey, ChangeRecord, Language, NOT_APPLICABLE, SoundMap};

/// One row of the history overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub key: ChangeKey,
    pub old_phoneme: String,
    pub new_phoneme: String,
    pub entries: usize,
}

pub fn print_change_summary(action: &str, summary: &ChangeSummary, dry_run: bool) {
    let suffix = if dry_run { " (dry run, nothing written)" } else { "" };
    if summary.is_noop() {
        println!("{action}: nothing to change{suffix}");
        return;
    }
    let key = summary
        .key
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    println!(
        "{action}: {} entries and {} affixes changed, sample text {}, key {key}{suffix}",
        summary.entries_changed,
        summary.affixes_changed,
        if summary.sample_text_changed {
            "updated"
        } else {
            "unchanged"
        }
    );
}

pub fn print_saved(language_path: &Path, sample_path: Option<&Path>) {
    println!("Saved: {}", language_path.display());
    if let Some(path) = sample_path {
        println!("Sample text: {}", path.display());
    }
}

pub fn print_history(rows: &[HistoryRow]) {
    if rows.is_empty() {
        println!("No recorded changes.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Recorded"),
        header_cell("Change"),
        header_cell("Entries"),
    ]);
    apply_table_style(&mut table);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.key.sequence()),
            Cell::new(row.key.recorded_at().format("%Y-%m-%d %H:%M:%S")),
            change_cell(&row.old_phoneme, &row.new_phoneme),
            Cell::new(row.entries),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    println!("{table}");
}

/// History of a single entry, newest first.
pub fn print_entry_history(spelled: &str, records: &[(&ChangeKey, &ChangeRecord)]) {
    if records.is_empty() {
        println!("'{spelled}' has no recorded changes.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Change"),
        header_cell("Before"),
        header_cell("Pronounced"),
    ]);
    apply_table_style(&mut table);
    for (key, record) in records {
        table.add_row(vec![
            Cell::new(key.sequence()),
            change_cell(&record.old_phoneme, &record.new_phoneme),
            Cell::new(&record.old_version.spelled),
            Cell::new(&record.old_version.phonetic),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    println!("{table}");
}

pub fn print_inventory(language: &Language) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Category"), header_cell("Phonemes")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new("phoneme_inventory").add_attribute(Attribute::Bold),
        Cell::new(language.phoneme_inventory.join(" ")),
    ]);
    for (category, phonemes) in language.phonetic_inventory.categories() {
        table.add_row(vec![Cell::new(category), Cell::new(phonemes.join(" "))]);
    }
    println!("{table}");
}

pub fn print_rules(rules: &[SoundMap], flagged: &[&SoundMap]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Phoneme"),
        header_cell("Spelling"),
        header_cell("Spelling pattern"),
        header_cell("Pronunciation pattern"),
        header_cell("Note"),
    ]);
    apply_table_style(&mut table);
    for (index, rule) in rules.iter().enumerate() {
        let note = if flagged.iter().any(|f| std::ptr::eq(*f, rule)) {
            Cell::new("adds r").fg(Color::Yellow)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&rule.phoneme),
            Cell::new(&rule.romanization),
            Cell::new(&rule.spelling_regex),
            Cell::new(&rule.pronunciation_regex),
            note,
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    println!("{table}");
}

pub fn print_candidates(phoneme: &str, candidates: &[Candidate]) {
    if candidates.is_empty() {
        println!("No suggestions for '{phoneme}'.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Phoneme"), header_cell("Description")]);
    apply_table_style(&mut table);
    for candidate in candidates {
        table.add_row(vec![
            Cell::new(&candidate.phoneme),
            candidate
                .description
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn print_voices(voices: &BTreeMap<String, VoiceData>) {
    if voices.is_empty() {
        println!("No voices found. Is eSpeak-NG installed?");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Voice"),
        header_cell("Name"),
        header_cell("Language"),
        header_cell("Gender"),
    ]);
    apply_table_style(&mut table);
    for (id, voice) in voices {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(&voice.name),
            Cell::new(&voice.language_code),
            Cell::new(&voice.gender),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn change_cell(old: &str, new: &str) -> Cell {
    if old == NOT_APPLICABLE {
        return dim_cell("re-derived");
    }
    let new = if new.is_empty() { "∅" } else { new };
    Cell::new(format!("{old} → {new}"))
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
