//! Rendering sample text for speech backends.

use honing_core::{PhoneticChanger, SpeechSpeed, Transcription};
use honing_model::{Language, LexiconEntry, SoundMap};

fn kalo() -> Language {
    let mut rules: Vec<SoundMap> = ["k", "a", "l", "o", "m", "i", "u", "s", "t", "d"]
        .map(|p| SoundMap::literal(p, p))
        .to_vec();
    rules.push(SoundMap::new("\u{027e}", "r", "\u{027e}", "r"));

    let mut language = Language {
        sound_map_list: rules,
        ..Default::default()
    };
    for (spelled, phonetic, gloss) in [
        ("kalo", "\u{02c8}kalo", "river"),
        ("miru", "\u{02c8}mi\u{027e}u", "to see"),
        ("sa", "sa", "I"),
    ] {
        language
            .lexicon
            .insert(LexiconEntry::new(spelled, phonetic, gloss, "noun"));
    }
    language
}

const SAMPLE: &str = "Kalo miru sa.\ntaki, kalo!";

#[test]
fn test_phonetic_text() {
    let mut language = kalo();
    let transcription = Transcription::build(&mut language, SAMPLE).unwrap();

    insta::assert_snapshot!(
        transcription.phonetic_text(),
        @"ˈkalo ˈmiɾu sa. taki, ˈkalo"
    );
}

#[test]
fn test_kirshenbaum_text() {
    let mut language = kalo();
    let transcription = Transcription::build(&mut language, SAMPLE).unwrap();

    insta::assert_snapshot!(
        transcription.kirshenbaum_text(),
        @"[['kalo]] [['mi*u]] [[sa]]. [[taki]], [['kalo]]"
    );
}

#[test]
fn test_ssml_breaks_follow_punctuation() {
    let mut language = kalo();
    let ssml = Transcription::build(&mut language, SAMPLE)
        .unwrap()
        .ssml(SpeechSpeed::XSlow);

    assert!(ssml.starts_with("<speak>\n\t<prosody rate=\"x-slow\">\n"));
    assert!(ssml.contains("<phoneme alphabet=\"ipa\" ph=\"\u{02c8}mi\u{027e}u\">miru</phoneme>"));
    assert_eq!(ssml.matches("<break strength=\"strong\"/>").count(), 1);
    assert_eq!(ssml.matches("<break strength=\"weak\"/>").count(), 1);
    assert!(ssml.ends_with("\t</prosody>\n</speak>\n"));
}

#[test]
fn test_sounded_out_words_take_part_in_later_changes() {
    let mut language = kalo();
    let transcription = Transcription::build(&mut language, SAMPLE).unwrap();
    assert_eq!(transcription.sounded_out(), ["taki"]);
    assert_eq!(language.lexicon.len(), 4);

    let mut changer = PhoneticChanger::new(language, SAMPLE);
    let summary = changer.apply_change("t", "d").unwrap();

    assert_eq!(summary.entries_changed, 1);
    assert_eq!(changer.sample_text(), "Kalo miru sa.\ndaki, kalo!");
    let added = changer.language().lexicon.find_by_spelling("daki").unwrap();
    assert_eq!(added.phonetic, "daki");
}
