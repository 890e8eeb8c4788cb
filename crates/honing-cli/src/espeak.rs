//! eSpeak-NG speech backend.
//!
//! Words are passed as Kirshenbaum phoneme input (`[[...]]`) on stdin, so
//! eSpeak-NG speaks the lexicon's pronunciation rather than guessing from
//! the spelling.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, info_span, warn};

use honing_core::{HoningError, SpeechEngine, SpeechSpeed, Transcription, VoiceData};

/// Engine name reported in [`VoiceData::supported_engines`].
pub const ENGINE_NAME: &str = "espeak-ng";

/// Runs the `espeak-ng` executable.
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    program: PathBuf,
    input: Option<String>,
}

impl EspeakEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            input: None,
        }
    }

    /// Text prepared by the last [`SpeechEngine::generate`] call.
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn speech_error(&self, message: impl std::fmt::Display) -> HoningError {
        HoningError::Speech {
            message: format!("{}: {message}", self.program.display()),
        }
    }
}

impl SpeechEngine for EspeakEngine {
    fn generate(
        &mut self,
        transcription: &Transcription,
        speed: SpeechSpeed,
    ) -> honing_core::Result<()> {
        let text = transcription.kirshenbaum_text();
        if text.trim().is_empty() {
            return Err(HoningError::EmptySampleText);
        }
        debug!(%speed, chars = text.len(), "Prepared eSpeak-NG input");
        self.input = Some(text);
        Ok(())
    }

    fn generate_speech(
        &mut self,
        target: &Path,
        voice: Option<&str>,
        speed: SpeechSpeed,
    ) -> honing_core::Result<bool> {
        let span = info_span!("espeak", target = %target.display());
        let _guard = span.enter();

        let Some(input) = self.input.as_deref() else {
            return Err(HoningError::EmptySampleText);
        };

        let mut command = Command::new(&self.program);
        command
            .arg("--stdin")
            .arg("-s")
            .arg(speed.words_per_minute().to_string())
            .arg("-w")
            .arg(target);
        if let Some(voice) = voice {
            command.arg("-v").arg(voice);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.speech_error(e))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| self.speech_error(e))?;
        }
        let output = child.wait_with_output().map_err(|e| self.speech_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.speech_error(format!("{} {}", output.status, stderr.trim())));
        }

        let produced = target.metadata().is_ok_and(|m| m.len() > 0);
        info!(produced, voice = voice.unwrap_or("default"), "Rendered speech");
        Ok(produced)
    }

    fn voices(&self) -> BTreeMap<String, VoiceData> {
        match Command::new(&self.program).arg("--voices").output() {
            Ok(output) if output.status.success() => {
                parse_voice_list(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                warn!(status = %output.status, "eSpeak-NG could not list voices");
                BTreeMap::new()
            }
            Err(error) => {
                warn!(program = %self.program.display(), %error, "eSpeak-NG is not available");
                BTreeMap::new()
            }
        }
    }
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// Columns are priority, language, age/gender, voice name, file, then
/// other languages as `(code priority)` pairs.
pub fn parse_voice_list(listing: &str) -> BTreeMap<String, VoiceData> {
    listing
        .lines()
        .skip_while(|line| line.trim_start().starts_with("Pty"))
        .filter_map(parse_voice_line)
        .map(|voice| (voice.id.clone(), voice))
        .collect()
}

fn parse_voice_line(line: &str) -> Option<VoiceData> {
    let mut fields = line.split_whitespace();
    let _priority: u32 = fields.next()?.parse().ok()?;
    let language = fields.next()?;
    let age_gender = fields.next()?;
    let name = fields.next()?;
    let file = fields.next()?;
    let others: Vec<String> = fields
        .map(|field| field.trim_matches(|c: char| c == '(' || c == ')'))
        .filter(|field| !field.is_empty() && !field.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect();

    let gender = match age_gender.rsplit('/').next() {
        Some("M") => "Male",
        Some("F") => "Female",
        _ => "",
    };

    Some(VoiceData {
        name: name.replace('_', " "),
        gender: gender.to_string(),
        id: file.to_string(),
        language_code: language.to_string(),
        language_name: String::new(),
        additional_language_codes: others,
        supported_engines: vec![ENGINE_NAME.to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-gb           --/M      English_(Great_Britain) gmw/en           (en 2)
 5  en-us           --/F      English_(America)  gmw/en-US            (en 3)
";

    #[test]
    fn test_parse_voice_list() {
        let voices = parse_voice_list(LISTING);

        assert_eq!(voices.len(), 3);
        let us = &voices["gmw/en-US"];
        assert_eq!(us.name, "English (America)");
        assert_eq!(us.gender, "Female");
        assert_eq!(us.language_code, "en-us");
        assert_eq!(us.additional_language_codes, ["en"]);
        assert_eq!(us.supported_engines, [ENGINE_NAME]);
        assert!(voices["gmw/af"].additional_language_codes.is_empty());
    }

    #[test]
    fn test_garbage_lines_are_skipped() {
        assert!(parse_voice_list("no voices here\n\n").is_empty());
    }

    #[test]
    fn test_speech_without_generate_is_rejected() {
        let mut engine = EspeakEngine::new("espeak-ng");
        let result = engine.generate_speech(Path::new("out.wav"), None, SpeechSpeed::Medium);
        assert!(matches!(result, Err(HoningError::EmptySampleText)));
        assert!(engine.input().is_none());
    }

    #[test]
    fn test_missing_program_gives_no_voices() {
        let engine = EspeakEngine::new("definitely-not-an-espeak-binary");
        assert!(engine.voices().is_empty());
    }
}
