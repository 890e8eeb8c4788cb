//! IPA character classes.
//!
//! Every table holds single Unicode scalar values. Multi-character phonemes
//! are built from a base character followed by diacritics or modifiers.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Pulmonic consonants.
pub const PULMONIC_CONSONANTS: &[char] = &[
    'b', '\u{03b2}', '\u{0299}', 'c', '\u{00e7}', 'd', '\u{0256}', '\u{1d91}', '\u{02a3}',
    '\u{02a5}', '\u{02a4}', '\u{ab66}', 'f', '\u{0278}', 'g', '\u{0261}', '\u{0262}', '\u{0270}',
    'h', '\u{0266}', '\u{0127}', '\u{0267}', 'j', '\u{029d}', '\u{025f}', 'k', 'l', '\u{026c}',
    '\u{026e}', '\u{026d}', '\u{a78e}', '\u{029f}', 'm', '\u{0271}', 'n', '\u{0273}', '\u{0272}',
    '\u{014b}', '\u{0274}', 'p', 'q', 'r', '\u{0279}', '\u{027e}', '\u{027d}', '\u{027b}',
    '\u{027a}', '\u{0281}', '\u{0280}', 's', '\u{0282}', '\u{0283}', 't', '\u{0288}', '\u{02a6}',
    '\u{02a8}', '\u{02a7}', '\u{ab67}', 'v', '\u{2c71}', '\u{028b}', 'x', '\u{0263}', '\u{03c7}',
    '\u{028e}', 'z', '\u{0290}', '\u{0292}', '\u{03b8}', '\u{00f0}', '\u{0294}', '\u{0295}',
    '\u{0255}', '\u{0291}',
];

/// Non-pulmonic consonants (implosives, clicks, ejective-adjacent glides).
pub const NON_PULMONIC_CONSONANTS: &[char] = &[
    '\u{0253}', '\u{0257}', '\u{0284}', '\u{0260}', '\u{029b}', 'w', '\u{028d}', '\u{0265}',
    '\u{02a1}', '\u{02a2}', '\u{029c}', '\u{0298}', '\u{01c0}', '\u{01c3}', '\u{01c2}',
    '\u{01c1}', '\u{1df0a}',
];

pub const VOWELS: &[char] = &[
    'a', '\u{00e6}', '\u{0251}', '\u{0252}', '\u{0250}', 'e', '\u{025b}', '\u{025c}', '\u{025e}',
    '\u{0259}', 'i', '\u{0268}', '\u{026a}', 'y', '\u{028f}', '\u{00f8}', '\u{0258}', '\u{0275}',
    '\u{0153}', '\u{0276}', '\u{0264}', 'o', '\u{0254}', 'u', '\u{0289}', '\u{028a}', '\u{026f}',
    '\u{028c}', '\u{025a}',
];

/// Length marks and the non-syllabic mark.
pub const VOWEL_MODIFIERS: &[char] = &['\u{02d0}', '\u{02d1}', '\u{032f}'];

pub const DIACRITICS: &[char] = &[
    '\u{02f3}', '\u{0325}', '\u{030a}', '\u{0324}', '\u{032a}', '\u{0329}', '\u{032c}',
    '\u{02f7}', '\u{0330}', '\u{02fd}', '\u{033a}', '\u{032f}', '\u{02b0}', '\u{033c}',
    '\u{033b}', '\u{02d2}', '\u{0339}', '\u{02b7}', '\u{0303}', '\u{02b2}', '\u{02d3}',
    '\u{031c}', '\u{02d6}', '\u{031f}', '\u{207f}', '\u{00a8}', '\u{0308}', '\u{02e0}',
    '\u{02cd}', '\u{0320}', '\u{20e1}', '\u{02df}', '\u{033d}', '\u{02e4}', '\u{ab68}',
    '\u{0319}', '\u{02de}', '\u{02bc}',
];

/// Stress marks, length marks and tie bars.
pub const SUPRASEGMENTALS: &[char] = &[
    '\u{02d0}', '\u{02d1}', '\u{02c8}', '\u{02cc}', '\u{035c}', '\u{0361}',
];

pub const PRIMARY_STRESS: char = '\u{02c8}';
pub const SECONDARY_STRESS: char = '\u{02cc}';
pub const TIE_BARS: &[char] = &['\u{035c}', '\u{0361}'];

/// Phonemes that can stand in for rhoticity.
pub const R_PHONEMES: &[char] = &['\u{0279}', '\u{027e}', '\u{027a}', '\u{027d}', '\u{027b}', 'r'];

pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

pub fn is_pulmonic_consonant(c: char) -> bool {
    PULMONIC_CONSONANTS.contains(&c)
}

pub fn is_non_pulmonic_consonant(c: char) -> bool {
    NON_PULMONIC_CONSONANTS.contains(&c)
}

pub fn is_consonant(c: char) -> bool {
    is_pulmonic_consonant(c) || is_non_pulmonic_consonant(c)
}

pub fn is_vowel_modifier(c: char) -> bool {
    VOWEL_MODIFIERS.contains(&c)
}

/// Diacritics and vowel modifiers; these bind to the preceding phoneme.
pub fn is_diacritic(c: char) -> bool {
    DIACRITICS.contains(&c) || is_vowel_modifier(c)
}

pub fn is_suprasegmental(c: char) -> bool {
    SUPRASEGMENTALS.contains(&c)
}

pub fn is_tie_bar(c: char) -> bool {
    TIE_BARS.contains(&c)
}

pub fn is_stress_mark(c: char) -> bool {
    c == PRIMARY_STRESS || c == SECONDARY_STRESS
}

pub fn is_r_phoneme(c: char) -> bool {
    R_PHONEMES.contains(&c)
}

pub fn contains_vowel(text: &str) -> bool {
    text.chars().any(is_vowel)
}

pub fn count_vowels(text: &str) -> usize {
    text.chars().filter(|&c| is_vowel(c)).count()
}

pub fn count_diacritics(text: &str) -> usize {
    text.chars().filter(|&c| is_diacritic(c)).count()
}

/// Two vowels plus at most two vowel modifiers, nothing else.
pub fn is_possible_diphthong(phoneme: &str) -> bool {
    let mut vowels = 0;
    let mut modifiers = 0;
    for c in phoneme.chars() {
        if is_vowel(c) {
            vowels += 1;
        } else if is_vowel_modifier(c) {
            modifiers += 1;
        } else {
            return false;
        }
    }
    vowels == 2 && modifiers <= vowels
}

/// Human-readable descriptions of IPA symbols.
pub const PHONEME_DESCRIPTIONS: &[(&str, &str)] = &[
    // Plosives
    ("p", "unvoiced bilabial plosive"),
    ("b", "voiced bilabial plosive"),
    ("p\u{032a}", "unvoiced labiodental plosive"),
    ("b\u{032a}", "voiced labiodental plosive"),
    ("t\u{032a}", "unvoiced dental plosive"),
    ("d\u{032a}", "voiced dental plosive"),
    ("t", "unvoiced alveolar plosive"),
    ("d", "voiced alveolar plosive"),
    ("\u{0288}", "unvoiced retroflex plosive"),
    ("\u{0256}", "voiced retroflex plosive"),
    ("c", "unvoiced palatal plosive"),
    ("\u{025f}", "voiced palatal plosive"),
    ("k\u{0361}p", "unvoiced labial-velar plosive"),
    ("\u{0261}\u{0361}b", "voiced labial-velar plosive"),
    ("k", "unvoiced velar plosive"),
    ("\u{0261}", "voiced velar plosive"),
    ("q", "unvoiced uvular plosive"),
    ("\u{0262}", "voiced uvular plosive"),
    ("\u{02a1}", "unvoiced epiglottal plosive"),
    ("\u{0294}", "unvoiced glottal plosive"),
    // Implosives
    ("\u{0253}", "voiced bilabial implosive"),
    ("\u{0257}", "voiced alveolar implosive"),
    ("\u{1d91}", "voiced retroflex implosive"),
    ("\u{0284}", "voiced palatal implosive"),
    ("\u{0260}", "voiced velar implosive"),
    ("\u{029b}", "voiced uvular implosive"),
    // Ejectives
    ("p\u{02bc}", "unvoiced bilabial ejective"),
    ("t\u{02bc}", "unvoiced alveolar ejective"),
    ("k\u{02bc}", "unvoiced velar ejective"),
    ("q\u{02bc}", "unvoiced uvular ejective"),
    // Nasals
    ("m", "voiced bilabial nasal"),
    ("\u{0271}", "voiced labiodental nasal"),
    ("n", "voiced alveolar nasal"),
    ("\u{0273}", "voiced retroflex nasal"),
    ("\u{0272}", "voiced palatal nasal"),
    ("\u{014b}", "voiced velar nasal"),
    ("\u{0274}", "voiced uvular nasal"),
    // Trills and taps
    ("\u{0299}", "voiced bilabial trill"),
    ("r", "voiced alveolar trill"),
    ("\u{0280}", "voiced uvular trill"),
    ("\u{2c71}", "voiced labiodental tap or flap"),
    ("\u{027e}", "voiced alveolar tap or flap"),
    ("\u{027d}", "voiced retroflex tap or flap"),
    ("\u{027a}", "voiced alveolar lateral flap"),
    // Affricates
    ("\u{02a6}", "unvoiced alveolar affricate"),
    ("\u{02a3}", "voiced alveolar affricate"),
    ("\u{02a7}", "unvoiced postalveolar affricate"),
    ("\u{02a4}", "voiced postalveolar affricate"),
    ("\u{02a8}", "unvoiced alveolo-palatal affricate"),
    ("\u{02a5}", "voiced alveolo-palatal affricate"),
    // Fricatives
    ("\u{0278}", "unvoiced bilabial fricative"),
    ("\u{03b2}", "voiced bilabial fricative"),
    ("f", "unvoiced labiodental fricative"),
    ("v", "voiced labiodental fricative"),
    ("\u{03b8}", "unvoiced dental fricative"),
    ("\u{00f0}", "voiced dental fricative"),
    ("s", "unvoiced alveolar fricative"),
    ("z", "voiced alveolar fricative"),
    ("\u{0283}", "unvoiced postalveolar fricative"),
    ("\u{0292}", "voiced postalveolar fricative"),
    ("\u{0282}", "unvoiced retroflex fricative"),
    ("\u{0290}", "voiced retroflex fricative"),
    ("\u{0267}", "unvoiced postalveolar-velar fricative"),
    ("\u{0255}", "unvoiced alveolo-palatal fricative"),
    ("\u{0291}", "voiced alveolo-palatal fricative"),
    ("\u{00e7}", "unvoiced palatal fricative"),
    ("\u{029d}", "voiced palatal fricative"),
    ("x", "unvoiced velar fricative"),
    ("\u{0263}", "voiced velar fricative"),
    ("\u{03c7}", "unvoiced uvular fricative"),
    ("\u{0281}", "voiced uvular fricative"),
    ("\u{0127}", "unvoiced pharyngeal fricative"),
    ("\u{0295}", "voiced pharyngeal fricative"),
    ("\u{029c}", "unvoiced epiglottal fricative"),
    ("\u{02a2}", "voiced epiglottal fricative"),
    ("h", "unvoiced glottal fricative"),
    ("\u{0266}", "voiced glottal fricative"),
    ("\u{026c}", "unvoiced alveolar lateral fricative"),
    ("\u{026e}", "voiced alveolar lateral fricative"),
    ("\u{a78e}", "unvoiced retroflex lateral fricative"),
    // Approximants
    ("\u{028b}", "voiced labiodental approximant"),
    ("\u{0279}", "voiced alveolar approximant"),
    ("\u{027b}", "voiced retroflex approximant"),
    ("\u{0265}", "voiced labialized palatal approximant"),
    ("j", "voiced palatal approximant"),
    ("\u{028d}", "unvoiced labial-velar approximant"),
    ("w", "voiced labial-velar approximant"),
    ("\u{0270}", "voiced velar approximant"),
    ("l", "voiced alveolar lateral approximant"),
    ("\u{026d}", "voiced retroflex lateral approximant"),
    ("\u{028e}", "voiced palatal lateral approximant"),
    ("\u{029f}", "voiced velar lateral approximant"),
    // Clicks
    ("\u{0298}", "bilabial click"),
    ("\u{01c0}", "dental click"),
    ("\u{01c3}", "alveolar click"),
    ("\u{01c2}", "postalveolar click"),
    ("\u{01c1}", "alveolar lateral click"),
    // Vowels, close to open
    ("i", "close front unrounded vowel"),
    ("y", "close front rounded vowel"),
    ("\u{0268}", "close central unrounded vowel"),
    ("\u{0289}", "close central rounded vowel"),
    ("\u{026f}", "close back unrounded vowel"),
    ("u", "close back rounded vowel"),
    ("\u{026a}", "near-close front unrounded vowel"),
    ("\u{028f}", "near-close front rounded vowel"),
    ("\u{028a}", "near-close back rounded vowel"),
    ("e", "close-mid front unrounded vowel"),
    ("\u{00f8}", "close-mid front rounded vowel"),
    ("\u{0258}", "close-mid central unrounded vowel"),
    ("\u{0275}", "close-mid central rounded vowel"),
    ("\u{0264}", "close-mid back unrounded vowel"),
    ("o", "close-mid back rounded vowel"),
    ("\u{0259}", "mid central vowel"),
    ("\u{025a}", "mid central vowel with rhoticity"),
    ("\u{025b}", "open-mid front unrounded vowel"),
    ("\u{0153}", "open-mid front rounded vowel"),
    ("\u{025c}", "open-mid central unrounded vowel"),
    ("\u{025e}", "open-mid central rounded vowel"),
    ("\u{028c}", "open-mid back unrounded vowel"),
    ("\u{0254}", "open-mid back rounded vowel"),
    ("\u{00e6}", "near-open front unrounded vowel"),
    ("\u{0250}", "near-open central unrounded vowel"),
    ("a", "open front unrounded vowel"),
    ("\u{0276}", "open front rounded vowel"),
    ("\u{0251}", "open back unrounded vowel"),
    ("\u{0252}", "open back rounded vowel"),
    // Diacritics and suprasegmentals
    ("\u{0325}", "voiceless"),
    ("\u{030a}", "voiceless"),
    ("\u{0324}", "breathy voiced"),
    ("\u{032a}", "dental"),
    ("\u{0329}", "syllabic"),
    ("\u{032c}", "voiced"),
    ("\u{0330}", "creaky voiced"),
    ("\u{033a}", "apical"),
    ("\u{032f}", "non-syllabic"),
    ("\u{02b0}", "aspirated"),
    ("\u{033c}", "linguolabial"),
    ("\u{033b}", "laminal"),
    ("\u{0339}", "more rounded"),
    ("\u{02b7}", "labialized"),
    ("\u{0303}", "nasalized"),
    ("\u{02b2}", "palatalized"),
    ("\u{031c}", "less rounded"),
    ("\u{031f}", "advanced"),
    ("\u{207f}", "nasal release"),
    ("\u{0308}", "centralized"),
    ("\u{02e0}", "velarized"),
    ("\u{0320}", "retracted"),
    ("\u{033d}", "mid-centralized"),
    ("\u{02e4}", "pharyngealized"),
    ("\u{0319}", "retracted tongue root"),
    ("\u{02de}", "rhoticity"),
    ("\u{02bc}", "ejective"),
    ("\u{02d0}", "long"),
    ("\u{02d1}", "half-long"),
    ("\u{02c8}", "primary stress"),
    ("\u{02cc}", "secondary stress"),
];

static DESCRIPTIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| PHONEME_DESCRIPTIONS.iter().copied().collect());

/// Description of an IPA symbol.
///
/// Falls back to the base character when the full phoneme (with its
/// diacritics) has no entry of its own.
pub fn describe(phoneme: &str) -> Option<&'static str> {
    if let Some(&description) = DESCRIPTIONS.get(phoneme) {
        return Some(description);
    }
    let base = phoneme.chars().next()?;
    let mut buf = [0u8; 4];
    DESCRIPTIONS.get(&*base.encode_utf8(&mut buf)).copied()
}
