//! CLI argument definitions for conlang-honing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use honing_core::{Reach, SpeechSpeed};

#[derive(Parser)]
#[command(
    name = "conlang-honing",
    version,
    about = "Apply sound changes to a constructed language",
    long_about = "Apply sound changes to a constructed language.\n\n\
                  Phoneme substitutions are carried through the whole lexicon, \
                  keeping spelling and pronunciation in step through the \
                  language's sound map rules. Every change is recorded and can \
                  be reverted."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file to use instead of the one in the config folder.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replace one phoneme with another across the lexicon.
    Change(ChangeArgs),

    /// Replace several phonemes at once.
    Batch(BatchArgs),

    /// Re-derive every spelling from its pronunciation.
    Respell(EditArgs),

    /// Re-derive every pronunciation from its spelling.
    Repronounce(EditArgs),

    /// Undo the most recent change.
    Revert(EditArgs),

    /// List recorded changes, newest first.
    History(HistoryArgs),

    /// Trim change history to each entry's newest change.
    Prune(PruneArgs),

    /// Show the phonetic inventory, optionally rebuilding or repairing it.
    Inventory(InventoryArgs),

    /// Show the sound map rules and flag rules that add an r.
    Rules(LanguageArg),

    /// Suggest replacements for a phoneme.
    Suggest(SuggestArgs),

    /// Transcribe sample text for speech, optionally rendering audio.
    Transcribe(TranscribeArgs),

    /// List the voices eSpeak-NG offers.
    Voices,

    /// Convert between IPA, X-SAMPA and Kirshenbaum.
    Convert(ConvertArgs),

    /// Show or initialise the settings file.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LanguageArg {
    /// Language file (JSON).
    #[arg(value_name = "LANGUAGE")]
    pub language: PathBuf,
}

/// Arguments shared by every command that edits a language.
#[derive(Args)]
pub struct EditArgs {
    /// Language file (JSON).
    #[arg(value_name = "LANGUAGE")]
    pub language: PathBuf,

    /// Sample text file kept in step with spelling changes (rewritten in place).
    #[arg(long = "sample", value_name = "FILE")]
    pub sample: Option<PathBuf>,

    /// Write the language here instead of overwriting LANGUAGE.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report what would change without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ChangeArgs {
    #[command(flatten)]
    pub edit: EditArgs,

    /// Phoneme to replace.
    #[arg(value_name = "OLD")]
    pub old: String,

    /// Replacement phoneme (may be empty to delete).
    #[arg(value_name = "NEW")]
    pub new: String,
}

#[derive(Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub edit: EditArgs,

    /// Substitution as OLD=NEW; repeat for each pair.
    #[arg(
        long = "pair",
        short = 'p',
        value_name = "OLD=NEW",
        value_parser = parse_pair,
        required = true
    )]
    pub pairs: Vec<(String, String)>,

    /// Accept batches of any size.
    #[arg(long = "no-limit")]
    pub no_limit: bool,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Language file (JSON).
    #[arg(value_name = "LANGUAGE")]
    pub language: PathBuf,

    /// Show the history of one word (by spelling) instead of the summary.
    #[arg(long = "word", value_name = "SPELLING")]
    pub word: Option<String>,
}

#[derive(Args)]
pub struct PruneArgs {
    #[command(flatten)]
    pub edit: EditArgs,

    /// Also clear the history nested inside each kept snapshot.
    #[arg(long = "deep")]
    pub deep: bool,
}

#[derive(Args)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub edit: EditArgs,

    /// Recompute the inventory from the lexicon and save it.
    #[arg(long = "rebuild")]
    pub rebuild: bool,

    /// Replace Latin look-alike letters (g, R, ...) with IPA symbols and save.
    #[arg(long = "fix-lookalikes")]
    pub fix_lookalikes: bool,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Phoneme to find replacements for.
    #[arg(value_name = "PHONEME")]
    pub phoneme: String,

    /// How far to look: 1, 2, 3 or all.
    #[arg(long = "reach", short = 'r', default_value = "1")]
    pub reach: Reach,
}

#[derive(Args)]
pub struct TranscribeArgs {
    /// Language file (JSON).
    #[arg(value_name = "LANGUAGE")]
    pub language: PathBuf,

    /// Sample text file.
    #[arg(value_name = "SAMPLE")]
    pub sample: PathBuf,

    /// What to print.
    #[arg(long = "format", value_enum, default_value = "phonetic")]
    pub format: TranscriptFormatArg,

    /// Speaking rate (x-slow, slow, medium, fast, x-fast).
    #[arg(long = "speed")]
    pub speed: Option<SpeechSpeed>,

    /// Render the sample with eSpeak-NG to this WAV file.
    #[arg(long = "speak", value_name = "WAV")]
    pub speak: Option<PathBuf>,

    /// eSpeak-NG voice.
    #[arg(long = "voice")]
    pub voice: Option<String>,

    /// Add sounded-out words to the lexicon and save the language.
    #[arg(long = "save-sounded-out")]
    pub save_sounded_out: bool,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Text to convert.
    #[arg(value_name = "TEXT")]
    pub text: String,

    #[arg(long = "from", value_enum, default_value = "ipa")]
    pub from: NotationArg,

    #[arg(long = "to", value_enum, default_value = "x-sampa")]
    pub to: NotationArg,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the current settings (defaults if none) to the settings file.
    #[arg(long = "init")]
    pub init: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TranscriptFormatArg {
    Phonetic,
    Ssml,
    Kirshenbaum,
    XSampa,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NotationArg {
    Ipa,
    XSampa,
    Kirshenbaum,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Parse an `OLD=NEW` substitution.
pub fn parse_pair(value: &str) -> Result<(String, String), String> {
    let (old, new) = value
        .split_once('=')
        .ok_or_else(|| format!("expected OLD=NEW, got '{value}'"))?;
    let old = old.trim();
    if old.is_empty() {
        return Err(format!("missing phoneme before '=' in '{value}'"));
    }
    Ok((old.to_string(), new.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("t=d"), Ok(("t".into(), "d".into())));
        assert_eq!(parse_pair("ʃ="), Ok(("ʃ".into(), String::new())));
        assert!(parse_pair("td").is_err());
        assert!(parse_pair("=d").is_err());
    }

    #[test]
    fn test_batch_parses_repeated_pairs() {
        let cli = Cli::try_parse_from([
            "conlang-honing",
            "batch",
            "lang.json",
            "-p",
            "p=b",
            "--pair",
            "b=p",
            "--dry-run",
        ])
        .unwrap();

        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.pairs.len(), 2);
        assert!(args.edit.dry_run);
        assert!(!args.no_limit);
    }

    #[test]
    fn test_suggest_reach_and_transcribe_speed() {
        let cli = Cli::try_parse_from(["conlang-honing", "suggest", "t", "--reach", "all"]).unwrap();
        let Command::Suggest(args) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(args.reach, Reach::All);

        let cli = Cli::try_parse_from([
            "conlang-honing",
            "transcribe",
            "lang.json",
            "sample.txt",
            "--speed",
            "x-slow",
            "--format",
            "ssml",
        ])
        .unwrap();
        let Command::Transcribe(args) = cli.command else {
            panic!("expected transcribe");
        };
        assert_eq!(args.speed, Some(SpeechSpeed::XSlow));
        assert_eq!(args.format, TranscriptFormatArg::Ssml);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "conlang-honing",
            "revert",
            "lang.json",
            "--config",
            "settings.toml",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("settings.toml")));
        assert!(matches!(cli.log_format, LogFormatArg::Json));
    }

    #[test]
    fn test_bad_speed_is_rejected() {
        assert!(
            Cli::try_parse_from(["conlang-honing", "transcribe", "l", "s", "--speed", "warp"])
                .is_err()
        );
    }
}
