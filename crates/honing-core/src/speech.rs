//! The boundary between the lexicon and text-to-speech backends.
//!
//! A [`Transcription`] turns free-form sample text into a sequence of
//! pronounced words, sounding out any word the lexicon does not know. The
//! renderers produce what each kind of backend consumes: plain IPA for
//! display, SSML with IPA phoneme tags, and Kirshenbaum for eSpeak-NG.
//! Backends themselves implement [`SpeechEngine`] outside this crate.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Instant;

use honing_model::{Language, LexiconEntry};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::error::{HoningError, Result};
use crate::notation::ipa_word_to_kirshenbaum;
use crate::transducer::Transducer;

/// Gloss given to words added to the lexicon by sounding them out.
pub const SOUNDED_OUT_GLOSS: &str = "<<unknown/undefined word sounded out>>";
pub const SOUNDED_OUT_PART_OF_SPEECH: &str = "unk";
pub const SOUNDED_OUT_DECLENSION: &str = "root";

/// Rendered text is wrapped once a line reaches this many characters.
pub const WRAP_COLUMN: usize = 80;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word regex is valid"));

/// SSML prosody rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeechSpeed {
    XSlow,
    Slow,
    #[default]
    Medium,
    Fast,
    XFast,
}

impl SpeechSpeed {
    pub const ALL: [SpeechSpeed; 5] = [
        SpeechSpeed::XSlow,
        SpeechSpeed::Slow,
        SpeechSpeed::Medium,
        SpeechSpeed::Fast,
        SpeechSpeed::XFast,
    ];

    /// The value of an SSML `<prosody rate>` attribute.
    pub fn as_ssml(self) -> &'static str {
        match self {
            Self::XSlow => "x-slow",
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
            Self::XFast => "x-fast",
        }
    }

    /// eSpeak-NG speaking rate (`-s`), in words per minute.
    pub fn words_per_minute(self) -> u32 {
        match self {
            Self::XSlow => 75,
            Self::Slow => 125,
            Self::Medium => 175,
            Self::Fast => 225,
            Self::XFast => 275,
        }
    }
}

impl fmt::Display for SpeechSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ssml())
    }
}

impl FromStr for SpeechSpeed {
    type Err = HoningError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_ascii_lowercase();
        if value == "default" {
            return Ok(Self::Medium);
        }
        Self::ALL
            .into_iter()
            .find(|speed| speed.as_ssml() == value)
            .ok_or(HoningError::UnknownSpeed { value })
    }
}

/// A voice offered by a speech backend.
///
/// Field names follow the voice descriptions returned by cloud backends;
/// fields a backend does not report are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VoiceData {
    pub name: String,
    pub gender: String,
    pub id: String,
    pub language_code: String,
    pub language_name: String,
    pub additional_language_codes: Vec<String>,
    pub supported_engines: Vec<String>,
}

/// A text-to-speech backend.
pub trait SpeechEngine {
    /// Prepare the backend's input text for `transcription`.
    fn generate(&mut self, transcription: &Transcription, speed: SpeechSpeed) -> Result<()>;

    /// Render the prepared text to an audio file at `target`.
    ///
    /// Returns `false` when the backend ran but produced no audio.
    fn generate_speech(
        &mut self,
        target: &Path,
        voice: Option<&str>,
        speed: SpeechSpeed,
    ) -> Result<bool>;

    /// Voices keyed by the identifier `generate_speech` accepts.
    fn voices(&self) -> BTreeMap<String, VoiceData>;
}

/// One word of sample text with its pronunciation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenWord {
    /// Lower-cased spelling with punctuation removed. Empty for a bare
    /// punctuation token.
    pub word: String,
    pub phonetic: String,
    /// Trailing `.` or `,`.
    pub punctuation: Option<char>,
}

impl SpokenWord {
    fn is_pause_only(&self) -> bool {
        self.phonetic.trim().is_empty()
    }
}

/// Sample text resolved against a lexicon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    words: Vec<SpokenWord>,
    sounded_out: Vec<String>,
}

impl Transcription {
    /// Resolve every word of `sample_text` against `language`.
    ///
    /// Words are matched by spelling, ignoring case. Unknown words are
    /// pronounced with the language's rules and added to its lexicon so
    /// later sound changes reach them.
    pub fn build(language: &mut Language, sample_text: &str) -> Result<Self> {
        if sample_text.trim().is_empty() {
            return Err(HoningError::EmptySampleText);
        }

        let span = info_span!("transcribe", lexicon_size = language.lexicon.len());
        let _guard = span.enter();
        let start = Instant::now();

        let pronouncer = Transducer::pronouncer(&language.sound_map_list)?;
        let mut known: HashMap<String, String> = language
            .lexicon
            .iter()
            .map(|entry| (entry.spelled.trim().to_lowercase(), entry.phonetic.clone()))
            .collect();

        let mut words = Vec::new();
        let mut sounded_out = Vec::new();
        let lowered = sample_text.to_lowercase();

        for token in lowered.lines().flat_map(str::split_whitespace) {
            let Some((word, punctuation)) = split_token(token) else {
                continue;
            };
            if word.is_empty() {
                words.push(SpokenWord {
                    word,
                    phonetic: String::new(),
                    punctuation,
                });
                continue;
            }

            let phonetic = match known.get(&word) {
                Some(phonetic) => phonetic.clone(),
                None => {
                    let phonetic = pronouncer.transduce(&word);
                    debug!(word = %word, phonetic = %phonetic, "Sounded out unknown word");
                    language.lexicon.insert(
                        LexiconEntry::new(
                            word.clone(),
                            phonetic.clone(),
                            SOUNDED_OUT_GLOSS,
                            SOUNDED_OUT_PART_OF_SPEECH,
                        )
                        .with_declensions([SOUNDED_OUT_DECLENSION]),
                    );
                    known.insert(word.clone(), phonetic.clone());
                    sounded_out.push(word.clone());
                    phonetic
                }
            };

            words.push(SpokenWord {
                word,
                phonetic,
                punctuation,
            });
        }

        info!(
            words = words.len(),
            sounded_out = sounded_out.len(),
            duration_ms = start.elapsed().as_millis(),
            "Transcribed sample text"
        );

        Ok(Self { words, sounded_out })
    }

    pub fn words(&self) -> &[SpokenWord] {
        &self.words
    }

    /// Words that were missing from the lexicon, in order of first use.
    pub fn sounded_out(&self) -> &[String] {
        &self.sounded_out
    }

    /// The sample text in IPA, wrapped at [`WRAP_COLUMN`].
    pub fn phonetic_text(&self) -> String {
        let mut out = WrappedText::default();
        for spoken in self.words.iter().filter(|w| !w.is_pause_only()) {
            let mut word = spoken.phonetic.clone();
            word.extend(spoken.punctuation);
            out.push_word(&word);
        }
        out.finish()
    }

    /// The sample text as eSpeak-NG input, each word in `[[...]]` phoneme
    /// brackets.
    pub fn kirshenbaum_text(&self) -> String {
        let mut out = WrappedText::default();
        for spoken in &self.words {
            let mut word = if spoken.is_pause_only() {
                String::new()
            } else {
                ipa_word_to_kirshenbaum(&spoken.phonetic)
            };
            word.extend(spoken.punctuation);
            if !word.is_empty() {
                out.push_word(&word);
            }
        }
        out.finish()
    }

    /// SSML with an IPA `<phoneme>` tag per word and a break after each
    /// full stop (strong) or comma (weak).
    pub fn ssml(&self, speed: SpeechSpeed) -> String {
        let mut ssml = String::from("<speak>\n");
        ssml.push_str(&format!("\t<prosody rate=\"{}\">\n", speed.as_ssml()));
        for spoken in &self.words {
            if !spoken.is_pause_only() {
                ssml.push_str(&format!(
                    "\t\t<phoneme alphabet=\"ipa\" ph=\"{}\">{}</phoneme>\n",
                    xml_escape(&spoken.phonetic),
                    xml_escape(&spoken.word)
                ));
            }
            match spoken.punctuation {
                Some('.') => ssml.push_str("\t\t<break strength=\"strong\"/>\n"),
                Some(',') => ssml.push_str("\t\t<break strength=\"weak\"/>\n"),
                _ => {}
            }
        }
        ssml.push_str("\t</prosody>\n</speak>\n");
        ssml
    }
}

/// Split a lower-cased token into its bare word and trailing `.`/`,`.
fn split_token(token: &str) -> Option<(String, Option<char>)> {
    let token = token.trim();
    let (body, punctuation) = match token.chars().last()? {
        c @ ('.' | ',') => (&token[..token.len() - 1], Some(c)),
        _ => (token, None),
    };
    let word = NON_WORD.replace_all(body, "").into_owned();
    if word.is_empty() && punctuation.is_none() {
        return None;
    }
    Some((word, punctuation))
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Default)]
struct WrappedText {
    text: String,
    column: usize,
}

impl WrappedText {
    fn push_word(&mut self, word: &str) {
        self.text.push_str(word);
        self.text.push(' ');
        self.column += word.chars().count() + 1;
        if self.column >= WRAP_COLUMN {
            self.text.push('\n');
            self.column = 0;
        }
    }

    fn finish(self) -> String {
        self.text
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
