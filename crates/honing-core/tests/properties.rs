//! Algebraic properties of the transducer and substitution engine.

use honing_core::{PhoneticChanger, SubstitutionTable, pronounce, spell};
use honing_model::{Language, LexiconEntry, SoundMap};
use proptest::prelude::*;

/// One spelling letter per phoneme, so the rules are a bijection.
fn bijective_rules() -> Vec<SoundMap> {
    [
        ("p", "p"),
        ("t", "t"),
        ("k", "k"),
        ("a", "a"),
        ("i", "i"),
        ("\u{0283}", "x"),
        ("\u{014b}", "q"),
        ("\u{0259}", "e"),
    ]
    .into_iter()
    .map(|(phoneme, letter)| SoundMap::literal(phoneme, letter))
    .collect()
}

fn rotate(c: char) -> char {
    match c {
        'p' => 'b',
        'b' => 'k',
        'k' => 'p',
        other => other,
    }
}

proptest! {
    #[test]
    fn test_spelling_then_pronouncing_is_identity(phonetic in "[ptkai\u{0283}\u{014b}\u{0259}]{0,16}") {
        let rules = bijective_rules();
        let spelled = spell(&phonetic, &rules).unwrap();
        prop_assert_eq!(pronounce(&spelled, &rules).unwrap(), phonetic);
    }

    #[test]
    fn test_batch_rotation_is_simultaneous(phonetic in "[pbkao]{0,20}") {
        let table = SubstitutionTable::new(
            [("p", "b"), ("b", "k"), ("k", "p")],
            std::iter::empty::<&str>(),
        )
        .unwrap();
        let expected: String = phonetic.chars().map(rotate).collect();
        prop_assert_eq!(table.apply(&phonetic), expected);
    }

    #[test]
    fn test_substitution_leaves_only_diacritic_variants(phonetic in "[ta\u{02b0}\u{0325}]{0,20}") {
        let table = SubstitutionTable::single("t", "d", std::iter::empty::<&str>()).unwrap();
        let result = table.apply(&phonetic);
        let chars: Vec<char> = result.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if *c == 't' {
                let next = chars.get(i + 1).copied();
                prop_assert!(matches!(next, Some('\u{02b0}' | '\u{0325}')), "bare t left in {}", result);
            }
        }
    }

    #[test]
    fn test_revert_restores_every_entry(
        words in proptest::collection::vec("[ptka]{1,6}", 1..8),
        old in "[ptka]",
        new in "[bdge]",
    ) {
        let mut language = Language {
            sound_map_list: ["p", "t", "k", "a", "b", "d", "g", "e"]
                .map(|p| SoundMap::literal(p, p))
                .to_vec(),
            ..Default::default()
        };
        for (i, word) in words.iter().enumerate() {
            language
                .lexicon
                .insert(LexiconEntry::new(word.as_str(), word.as_str(), format!("word {i}"), "noun"));
        }
        let sample = words.join(" ");
        let mut before = language.lexicon.clone();
        before.sort_canonical();

        let mut changer = PhoneticChanger::new(language, sample.clone());
        changer.apply_change(&old, &new).unwrap();
        changer.revert_most_recent();

        let mut after = changer.language().lexicon.clone();
        after.sort_canonical();
        prop_assert_eq!(after, before);
        prop_assert_eq!(changer.sample_text(), sample.as_str());
    }
}
