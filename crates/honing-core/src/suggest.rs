//! Helpers for choosing the next sound change.
//!
//! Replacement candidates come from a table of consonants that sit next to
//! each other in the IPA chart (same place or manner). Level 2 and level 3
//! widen the neighbourhood by following the table once and twice more.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use honing_model::{Language, SoundMap};
use serde_json::Value;

use crate::affix::{PRONUNCIATION_FIELDS, for_each_affix};
use crate::ipa;

/// Consonants one step away from each consonant.
pub const CONSONANT_NEIGHBOURS: &[(&str, &[&str])] = &[
    // plosive
    ("p", &["b", "m", "t", "d", "\u{0271}", "\u{0253}"]),
    ("b", &["p", "m", "t", "d", "\u{0271}", "\u{0253}"]),
    ("t", &["p", "b", "d", "\u{0288}", "\u{0256}", "\u{0271}", "n", "\u{0273}"]),
    ("d", &["p", "b", "t", "\u{0288}", "\u{0256}", "\u{0271}", "n", "\u{0273}"]),
    ("\u{0288}", &["t", "d", "\u{0256}", "c", "\u{025f}", "n", "\u{0273}", "\u{0272}"]),
    ("\u{0256}", &["t", "d", "\u{0288}", "c", "\u{025f}", "n", "\u{0273}", "\u{0272}"]),
    ("c", &["\u{0288}", "\u{0256}", "\u{025f}", "k", "\u{0261}", "\u{0273}", "\u{0272}", "\u{014b}"]),
    ("\u{025f}", &["\u{0288}", "\u{0256}", "c", "k", "\u{0261}", "\u{0273}", "\u{0272}", "\u{014b}"]),
    ("k", &["c", "\u{025f}", "\u{0261}", "q", "\u{0262}", "\u{0272}", "\u{014b}", "\u{0274}"]),
    ("\u{0261}", &["c", "\u{025f}", "k", "q", "\u{0262}", "\u{0272}", "\u{014b}", "\u{0274}"]),
    ("q", &["k", "\u{0261}", "\u{0262}", "\u{0294}", "\u{014b}", "\u{0274}"]),
    ("\u{0262}", &["k", "\u{0261}", "q", "\u{0294}", "\u{014b}", "\u{0274}"]),
    ("\u{0294}", &["q", "\u{0262}", "\u{0274}"]),
    // nasal
    ("m", &["p", "b", "\u{0271}", "\u{0299}"]),
    ("\u{0271}", &["p", "b", "t", "d", "m", "n", "\u{0299}", "r"]),
    ("n", &["\u{0271}", "t", "d", "\u{0288}", "\u{0256}", "\u{0273}", "r"]),
    ("\u{0273}", &["n", "\u{0272}", "t", "d", "\u{0288}", "\u{0256}", "c", "\u{025f}", "r"]),
    (
        "\u{0272}",
        &["\u{0273}", "\u{014b}", "\u{0274}", "\u{0288}", "\u{0256}", "c", "\u{025f}", "k", "\u{0261}", "\u{0280}"],
    ),
    ("\u{014b}", &["\u{0272}", "\u{0274}", "c", "\u{025f}", "k", "\u{0261}", "q", "\u{0262}"]),
    ("\u{0274}", &["\u{014b}", "k", "\u{0261}", "q", "\u{0262}", "\u{0294}"]),
    // trill
    ("\u{0299}", &["r", "m", "\u{0271}", "\u{2c71}"]),
    ("r", &["\u{0299}", "\u{0280}", "\u{0271}", "n", "\u{0273}", "\u{2c71}", "\u{027e}", "\u{027d}"]),
    ("\u{0280}", &["r", "\u{014b}"]),
    // tap or flap
    ("\u{2c71}", &["\u{027e}", "\u{0299}", "r", "\u{0278}", "\u{03b2}", "f", "v", "\u{03b8}", "\u{00f0}"]),
    ("\u{027e}", &["\u{2c71}", "\u{027d}", "r", "\u{03b8}", "\u{00f0}", "s", "z", "\u{0283}", "\u{0292}"]),
    ("\u{027d}", &["\u{027e}", "r", "\u{0283}", "\u{0292}", "\u{0282}", "\u{0290}", "\u{00e7}", "\u{029d}"]),
    // affricate
    (
        "\u{02a6}",
        &["\u{02a3}", "\u{02a7}", "\u{02a4}", "n", "\u{03b8}", "\u{00f0}", "s", "z", "\u{0283}", "\u{0292}"],
    ),
    (
        "\u{02a3}",
        &["\u{02a6}", "\u{02a7}", "\u{02a4}", "n", "\u{03b8}", "\u{00f0}", "s", "z", "\u{0283}", "\u{0292}"],
    ),
    (
        "\u{02a7}",
        &[
            "\u{02a4}", "\u{02a3}", "\u{02a6}", "n", "\u{0273}", "s", "z", "\u{0283}", "\u{0292}", "\u{0282}",
            "\u{0290}",
        ],
    ),
    (
        "\u{02a4}",
        &[
            "\u{02a7}", "\u{02a3}", "\u{02a6}", "n", "\u{0273}", "s", "z", "\u{0283}", "\u{0292}", "\u{0282}",
            "\u{0290}",
        ],
    ),
    ("\u{02a8}", &["\u{02a5}", "\u{0273}", "\u{0283}", "\u{0292}", "\u{0255}", "\u{0291}"]),
    ("\u{02a5}", &["\u{02a8}", "\u{0273}", "\u{0283}", "\u{0292}", "\u{0255}", "\u{0291}"]),
    // fricative
    ("\u{0278}", &["\u{03b2}", "f", "v", "\u{2c71}"]),
    ("\u{03b2}", &["\u{0278}", "f", "v", "\u{2c71}"]),
    (
        "f",
        &["v", "\u{0278}", "\u{03b2}", "\u{03b8}", "\u{00f0}", "\u{2c71}", "\u{027e}", "\u{026c}", "\u{026e}"],
    ),
    (
        "v",
        &["f", "\u{0278}", "\u{03b2}", "\u{03b8}", "\u{00f0}", "\u{2c71}", "\u{027e}", "\u{026c}", "\u{026e}"],
    ),
    ("\u{03b8}", &["\u{00f0}", "f", "v", "s", "z", "\u{2c71}", "\u{027e}", "\u{026c}", "\u{026e}"]),
    ("\u{00f0}", &["\u{03b8}", "f", "v", "s", "z", "\u{2c71}", "\u{027e}", "\u{026c}", "\u{026e}"]),
    (
        "s",
        &["z", "\u{03b8}", "\u{00f0}", "\u{0283}", "\u{0292}", "\u{027e}", "\u{027d}", "\u{026c}", "\u{026e}"],
    ),
    (
        "z",
        &["s", "\u{03b8}", "\u{00f0}", "\u{0283}", "\u{0292}", "\u{027e}", "\u{027d}", "\u{026c}", "\u{026e}"],
    ),
    (
        "\u{0283}",
        &["\u{0292}", "s", "z", "\u{0282}", "\u{0290}", "\u{027e}", "\u{027d}", "\u{026c}", "\u{026e}"],
    ),
    (
        "\u{0292}",
        &["\u{0283}", "s", "z", "\u{0282}", "\u{0290}", "\u{027e}", "\u{027d}", "\u{026c}", "\u{026e}"],
    ),
    ("\u{0282}", &["\u{0290}", "\u{0283}", "\u{0292}", "\u{00e7}", "\u{029d}", "\u{027e}", "\u{027d}"]),
    ("\u{0290}", &["\u{0282}", "\u{0283}", "\u{0292}", "\u{00e7}", "\u{029d}", "\u{027e}", "\u{027d}"]),
    (
        "\u{0255}",
        &["\u{0291}", "\u{0282}", "\u{0290}", "\u{00e7}", "\u{029d}", "\u{02a6}", "\u{02a5}", "\u{026d}", "j"],
    ),
    (
        "\u{0291}",
        &["\u{0255}", "\u{0282}", "\u{0290}", "\u{00e7}", "\u{029d}", "\u{02a6}", "\u{02a5}", "\u{026d}", "j"],
    ),
    ("\u{00e7}", &["\u{029d}", "\u{0282}", "\u{0290}", "x", "\u{0263}", "\u{027d}"]),
    ("\u{029d}", &["\u{00e7}", "\u{0282}", "\u{0290}", "x", "\u{0263}", "\u{027d}"]),
    ("x", &["\u{0263}", "\u{00e7}", "\u{029d}", "\u{03c7}", "\u{0281}"]),
    ("\u{0263}", &["x", "\u{00e7}", "\u{029d}", "\u{03c7}", "\u{0281}"]),
    ("\u{03c7}", &["\u{0281}", "x", "\u{0263}", "\u{0127}", "\u{0295}"]),
    ("\u{0281}", &["\u{03c7}", "x", "\u{0263}", "\u{0127}", "\u{0295}"]),
    ("\u{0127}", &["\u{0295}", "\u{03c7}", "\u{0281}", "h", "\u{0266}"]),
    ("\u{0295}", &["\u{0127}", "\u{03c7}", "\u{0281}", "h", "\u{0266}"]),
    ("h", &["\u{0266}", "\u{0127}", "\u{0295}"]),
    ("\u{0266}", &["h", "\u{0127}", "\u{0295}"]),
    // lateral fricative
    (
        "\u{026c}",
        &["\u{026e}", "\u{03b8}", "\u{00f0}", "s", "z", "\u{0283}", "\u{0292}", "\u{028b}", "\u{0279}", "\u{027b}"],
    ),
    (
        "\u{026e}",
        &["\u{026c}", "\u{03b8}", "\u{00f0}", "s", "z", "\u{0283}", "\u{0292}", "\u{028b}", "\u{0279}", "\u{027b}"],
    ),
    // approximant
    ("\u{028b}", &["\u{0279}", "\u{026c}", "\u{026e}", "l"]),
    ("\u{0279}", &["\u{028b}", "\u{027b}", "\u{026c}", "\u{026e}", "l", "\u{026d}"]),
    ("\u{027b}", &["\u{0279}", "j", "\u{026c}", "\u{026e}", "l", "\u{026d}", "\u{028e}"]),
    ("j", &["\u{027b}", "\u{0270}", "\u{026d}", "\u{028e}", "\u{029f}", "\u{028d}", "w"]),
    ("\u{0270}", &["j", "\u{028e}", "\u{029f}", "\u{028d}", "w"]),
    // lateral approximant
    ("l", &["\u{026d}", "\u{028b}", "\u{0279}", "\u{027b}"]),
    ("\u{026d}", &["l", "\u{028e}", "\u{0279}", "\u{027b}", "j"]),
    ("\u{028e}", &["\u{026d}", "\u{029f}", "\u{027b}", "j", "\u{0270}", "\u{028d}", "w"]),
    ("\u{029f}", &["\u{028e}", "j", "\u{0270}", "\u{028d}", "w"]),
    // click
    ("\u{0298}", &["\u{01c0}", "\u{01c3}", "\u{01c2}", "\u{01c1}"]),
    ("\u{01c0}", &["\u{0298}", "\u{01c3}", "\u{01c2}", "\u{01c1}"]),
    ("\u{01c3}", &["\u{0298}", "\u{01c0}", "\u{01c2}", "\u{01c1}"]),
    ("\u{01c2}", &["\u{0298}", "\u{01c0}", "\u{01c3}", "\u{01c1}"]),
    ("\u{01c1}", &["\u{0298}", "\u{01c0}", "\u{01c3}", "\u{01c2}"]),
    // voiced implosive
    ("\u{0253}", &["b", "p", "m", "\u{0257}", "t", "d"]),
    ("\u{0257}", &["t", "d", "n", "\u{0273}", "\u{0253}", "b", "p", "\u{0288}", "\u{0256}"]),
    ("\u{0284}", &["c", "\u{025f}", "\u{0288}", "\u{0256}", "k", "\u{0261}", "n", "\u{0273}", "\u{0272}"]),
    ("\u{0260}", &["k", "\u{0261}", "c", "\u{025f}", "q", "\u{0262}", "\u{0273}", "\u{0272}", "\u{0274}"]),
    ("\u{029b}", &["q", "\u{0262}", "\u{0272}", "\u{0274}"]),
    // other
    ("\u{028d}", &["w", "\u{028b}", "\u{0279}", "\u{027b}", "j", "\u{0270}", "\u{029d}", "x"]),
    ("w", &["\u{028d}", "\u{028b}", "\u{0279}", "\u{027b}", "j", "\u{0270}", "\u{029d}", "x"]),
];

/// Latin letters commonly typed in place of the IPA symbol they resemble.
pub const LATIN_LOOKALIKES: &[(char, char)] = &[
    ('g', '\u{0261}'),
    ('G', '\u{0262}'),
    ('N', '\u{0274}'),
    ('B', '\u{0299}'),
    ('R', '\u{0280}'),
    ('H', '\u{029c}'),
    ('L', '\u{029f}'),
    ('I', '\u{026a}'),
];

/// Top-level language field holding the native name in IPA.
const NATIVE_NAME_PHONETIC: &str = "native_name_phonetic";

type Neighbourhood = BTreeMap<&'static str, Vec<&'static str>>;

static LEVEL_1: LazyLock<Neighbourhood> = LazyLock::new(|| {
    CONSONANT_NEIGHBOURS
        .iter()
        .map(|&(consonant, neighbours)| (consonant, neighbours.to_vec()))
        .collect()
});
static LEVEL_2: LazyLock<Neighbourhood> = LazyLock::new(|| widen(&LEVEL_1));
static LEVEL_3: LazyLock<Neighbourhood> = LazyLock::new(|| widen(&LEVEL_2));

/// Add the neighbours of every neighbour, after the existing ones.
fn widen(level: &Neighbourhood) -> Neighbourhood {
    level
        .iter()
        .map(|(&consonant, neighbours)| {
            let added: BTreeSet<&'static str> = neighbours
                .iter()
                .filter_map(|n| level.get(n))
                .flatten()
                .copied()
                .filter(|c| *c != consonant && !neighbours.contains(c))
                .collect();
            let mut widened = neighbours.clone();
            widened.extend(added);
            (consonant, widened)
        })
        .collect()
}

/// How far from the original sound a replacement may be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reach {
    #[default]
    Level1,
    Level2,
    Level3,
    /// Every consonant in the table.
    All,
}

impl FromStr for Reach {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "l1" => Ok(Self::Level1),
            "2" | "l2" => Ok(Self::Level2),
            "3" | "l3" => Ok(Self::Level3),
            "all" => Ok(Self::All),
            other => Err(format!("unknown reach '{other}', expected 1, 2, 3 or all")),
        }
    }
}

impl fmt::Display for Reach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level1 => f.write_str("1"),
            Self::Level2 => f.write_str("2"),
            Self::Level3 => f.write_str("3"),
            Self::All => f.write_str("all"),
        }
    }
}

/// A candidate replacement with its IPA description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub phoneme: String,
    pub description: Option<&'static str>,
}

impl Candidate {
    fn new(phoneme: impl Into<String>) -> Self {
        let phoneme = phoneme.into();
        let description = ipa::describe(&phoneme);
        Self {
            phoneme,
            description,
        }
    }
}

/// Replacement candidates for `phoneme`.
///
/// Consonants use the neighbourhood at `reach`; a vowel may become any
/// other vowel. Sounds outside both are given no candidates.
pub fn replacement_candidates(phoneme: &str, reach: Reach) -> Vec<Candidate> {
    let mut chars = phoneme.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && ipa::is_vowel(c)
    {
        return ipa::VOWELS
            .iter()
            .filter(|&&v| v != c)
            .map(|v| Candidate::new(v.to_string()))
            .collect();
    }

    let neighbours: Vec<&str> = match reach {
        Reach::Level1 => LEVEL_1.get(phoneme).cloned().unwrap_or_default(),
        Reach::Level2 => LEVEL_2.get(phoneme).cloned().unwrap_or_default(),
        Reach::Level3 => LEVEL_3.get(phoneme).cloned().unwrap_or_default(),
        Reach::All => LEVEL_1
            .keys()
            .copied()
            .filter(|c| *c != phoneme)
            .collect(),
    };
    neighbours.into_iter().map(Candidate::new).collect()
}

/// Replace Latin look-alikes in plain IPA text.
pub fn substitute_latin_lookalikes(text: &str) -> String {
    text.chars().map(ipa_lookalike).collect()
}

/// Replace Latin look-alikes in a regex pattern, leaving escapes such as
/// `\B` alone.
pub fn substitute_latin_lookalikes_in_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut escaped = false;
    for c in pattern.chars() {
        out.push(if escaped { c } else { ipa_lookalike(c) });
        escaped = !escaped && c == '\\';
    }
    out
}

fn ipa_lookalike(c: char) -> char {
    LATIN_LOOKALIKES
        .iter()
        .find_map(|&(latin, ipa)| (latin == c).then_some(ipa))
        .unwrap_or(c)
}

/// Replace Latin look-alikes in every field of `language` that holds IPA.
///
/// Returns the number of fields changed.
pub fn fix_latin_lookalikes(language: &mut Language) -> usize {
    let mut changed = 0;
    let mut fix = |text: &mut String, in_pattern: bool| {
        let fixed = if in_pattern {
            substitute_latin_lookalikes_in_pattern(text)
        } else {
            substitute_latin_lookalikes(text)
        };
        if fixed != *text {
            *text = fixed;
            changed += 1;
        }
    };

    for phoneme in &mut language.phoneme_inventory {
        fix(phoneme, false);
    }
    for (_, phonemes) in language.phonetic_inventory.categories_mut() {
        for phoneme in phonemes.iter_mut() {
            fix(phoneme, false);
        }
    }
    for rule in &mut language.sound_map_list {
        fix(&mut rule.phoneme, false);
        fix(&mut rule.spelling_regex, true);
    }
    for entry in language.lexicon.iter_mut() {
        fix(&mut entry.phonetic, false);
    }

    if let Some(Value::String(name)) = language.extras.get_mut(NATIVE_NAME_PHONETIC) {
        fix(name, false);
    }

    changed
        + for_each_affix(&mut language.extras, |affix| {
            let mut affix_changed = false;
            for field in PRONUNCIATION_FIELDS {
                let Some(Value::String(text)) = affix.get_mut(*field) else {
                    continue;
                };
                let fixed = if field.ends_with("_regex") {
                    substitute_latin_lookalikes_in_pattern(text)
                } else {
                    substitute_latin_lookalikes(text)
                };
                if fixed != *text {
                    *text = fixed;
                    affix_changed = true;
                }
            }
            affix_changed
        })
}

/// Rules that put an `r` into a spelling without an r-like sound, or an
/// r-like pronunciation pattern without an r-like phoneme.
pub fn r_adding_rules(rules: &[SoundMap]) -> Vec<&SoundMap> {
    let has_r_sound = |text: &str| {
        text.chars()
            .any(|c| c == '\u{025a}' || c == '\u{02de}' || ipa::is_r_phoneme(c))
    };
    rules
        .iter()
        .filter(|rule| {
            (rule.romanization.contains('r') && !has_r_sound(&rule.spelling_regex))
                || (rule.pronunciation_regex.contains('r') && !has_r_sound(&rule.phoneme))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use honing_model::LexiconEntry;
    use serde_json::json;

    fn phonemes(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.phoneme.as_str()).collect()
    }

    #[test]
    fn level_one_is_the_table_row() {
        let candidates = replacement_candidates("p", Reach::Level1);
        assert_eq!(phonemes(&candidates), ["b", "m", "t", "d", "\u{0271}", "\u{0253}"]);
        assert_eq!(candidates[0].description, ipa::describe("b"));
    }

    #[test]
    fn wider_levels_extend_without_self_or_duplicates() {
        let l1 = replacement_candidates("p", Reach::Level1);
        let l2 = replacement_candidates("p", Reach::Level2);
        let l3 = replacement_candidates("p", Reach::Level3);

        assert!(l2.len() > l1.len());
        assert!(l3.len() >= l2.len());
        assert_eq!(&l2[..l1.len()], &l1[..]);
        assert_eq!(&l3[..l2.len()], &l2[..]);
        for level in [&l2, &l3] {
            let list = phonemes(level);
            assert!(!list.contains(&"p"));
            let unique: BTreeSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len());
        }
        // n is a neighbour of t, which neighbours p
        assert!(phonemes(&l2).contains(&"n"));
    }

    #[test]
    fn every_neighbour_row_excludes_itself() {
        for (consonant, neighbours) in CONSONANT_NEIGHBOURS {
            assert!(!neighbours.contains(consonant), "{consonant} lists itself");
        }
    }

    #[test]
    fn vowels_may_become_any_other_vowel() {
        let candidates = replacement_candidates("a", Reach::Level1);
        assert_eq!(candidates.len(), ipa::VOWELS.len() - 1);
        assert!(!phonemes(&candidates).contains(&"a"));
    }

    #[test]
    fn unknown_sounds_have_no_candidates() {
        assert!(replacement_candidates("\u{2603}", Reach::Level2).is_empty());
    }

    #[test]
    fn lookalikes_are_replaced_outside_escapes() {
        assert_eq!(substitute_latin_lookalikes("gaN"), "\u{0261}a\u{0274}");
        assert_eq!(substitute_latin_lookalikes_in_pattern(r"\Bga"), "\\B\u{0261}a");
        assert_eq!(substitute_latin_lookalikes_in_pattern(r"\\B"), "\\\\\u{0299}");
    }

    #[test]
    fn fixes_every_ipa_field() {
        let mut language = Language {
            phoneme_inventory: vec!["g".into()],
            sound_map_list: vec![SoundMap::new("ga", "ga", "g", "ga")],
            ..Default::default()
        };
        language.phonetic_inventory.set("p_consonants", vec!["g".into()]);
        language
            .lexicon
            .insert(LexiconEntry::new("gat", "gat", "cat", "noun"));
        language.extras.insert(NATIVE_NAME_PHONETIC.into(), json!("gaN"));
        language.extras.insert(
            "derivational_affix_map".into(),
            json!({"AGENT": {"pronunciation_add": "ga", "spelling_add": "ga"}}),
        );

        let changed = fix_latin_lookalikes(&mut language);

        assert_eq!(changed, 7);
        let g = "\u{0261}";
        assert_eq!(language.phoneme_inventory, [g]);
        assert_eq!(language.phonetic_inventory.get("p_consonants"), [g]);
        assert_eq!(language.sound_map_list[0].phoneme, format!("{g}a"));
        assert_eq!(language.sound_map_list[0].spelling_regex, g);
        assert_eq!(language.sound_map_list[0].romanization, "ga");
        assert_eq!(language.lexicon.iter().next().unwrap().spelled, "gat");
        assert_eq!(language.extras[NATIVE_NAME_PHONETIC], json!(format!("{g}a\u{0274}")));
        assert_eq!(
            language.extras["derivational_affix_map"]["AGENT"]["spelling_add"],
            json!("ga")
        );
    }

    #[test]
    fn finds_rules_that_add_r() {
        let rules = vec![
            SoundMap::new("\u{0251}", "ar", "\u{0251}", "ar"),
            SoundMap::new("\u{0279}", "r", "\u{0279}", "r"),
            SoundMap::new("\u{025a}", "er", "\u{025a}", "er"),
            SoundMap::new("k", "k", "k", "k"),
        ];
        let found = r_adding_rules(&rules);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].romanization, "ar");
    }
}
