//! IPA to Kirshenbaum, the ASCII notation eSpeak-NG reads on its command line.

use std::collections::HashMap;
use std::sync::LazyLock;

/// IPA symbol to Kirshenbaum.
pub const IPA_KIRSHENBAUM: &[(char, &str)] = &[
    ('a', "a"), ('b', "b"), ('\u{0253}', "b`"), ('c', "c"), ('d', "d"), ('\u{0256}', "d."),
    ('\u{0257}', "d`"), ('e', "e"), ('f', "f"), ('g', "g"), ('\u{0261}', "g"), ('\u{0260}', "g`"),
    ('h', "h"), ('\u{0266}', "h<?>"), ('i', "i"), ('j', "j"), ('k', "k"), ('l', "l"),
    ('\u{026d}', "l."), ('\u{027a}', "*<lat>"), ('m', "m"), ('n', "n"), ('\u{0273}', "n."),
    ('o', "o"), ('p', "p"), ('\u{0278}', "P"), ('q', "q"), ('r', "r<trl>"), ('\u{027d}', "r."),
    ('\u{0279}', "r"), ('\u{027b}', "r."), ('s', "s"), ('t', "t"), ('\u{0288}', "t."),
    ('u', "u"), ('v', "v"), ('\u{028b}', "r<lbd>"), ('w', "w"), ('x', "x"), ('y', "y"),
    ('z', "z"), ('\u{0290}', "z."), ('\u{0251}', "A"), ('\u{03b2}', "B"), ('\u{0299}', "b<trl>"),
    ('\u{00e7}', "C"), ('\u{00f0}', "D"), ('\u{025b}', "E"), ('\u{0271}', "M"), ('\u{0263}', "Q"),
    ('\u{0262}', "G"), ('\u{029c}', "H"), ('\u{026a}', "I"), ('\u{0272}', "n^"),
    ('\u{025f}', "J"), ('\u{026c}', "s<lat>"), ('\u{026e}', "z<lat>"), ('\u{028e}', "l["),
    ('\u{029f}', "L"), ('\u{026f}', "u-"), ('\u{0270}', "j<vel>"), ('\u{014b}', "N"),
    ('\u{0274}', "n\""), ('\u{0254}', "o-"), ('\u{0281}', "g\""), ('\u{0280}', "r\""),
    ('\u{0283}', "S"), ('\u{03b8}', "T"), ('\u{028a}', "U"), ('\u{028c}', "V"),
    ('\u{028d}', "w<vls>"), ('\u{03c7}', "X"), ('\u{0127}', "H<vls>"), ('\u{028f}', "I."),
    ('\u{0292}', "Z"), ('\u{02c8}', "'"), ('\u{02cc}', ","), ('\u{02d0}', ":"),
    ('\u{0259}', "@"), ('\u{0258}', "@<umd>"), ('\u{00e6}', "&"), ('\u{0289}', "u\""),
    ('\u{0268}', "i\""), ('\u{00f8}', "Y"), ('\u{025c}', "V\""), ('\u{025e}', "O\""),
    ('\u{027e}', "*"), ('\u{026b}', "l~"), ('\u{0264}', "o-"), ('\u{0153}', "W"),
    ('\u{0276}', "a."), ('\u{0294}', "?"), ('\u{0295}', "H<vcd>"), ('\u{01c3}', "!"),
    ('\u{0308}', "\""), ('\u{0329}', "-"), ('\u{02bc}', "`"), ('\u{02de}', "<r>"),
    ('\u{0303}', "~"), ('\u{032a}', "["), ('\u{02e0}', "~"), ('\u{02b0}', "<h>"),
    ('\u{031e}', "_o"), ('\u{0324}', "<?>"), ('\u{029d}', "C<vcd>"), ('\u{0282}', "s."),
    ('\u{0255}', "s;"), ('\u{0267}', "x;"), ('\u{0291}', "z;"), ('\u{0265}', "j<rnd>"),
    ('\u{0284}', "J`"), ('\u{0298}', "p!"), ('\u{0252}', "A."), ('\u{025a}', "@<r>"),
    ('\u{0250}', "V\""), ('\u{0275}', "@."), ('\u{01c0}', "t!"), ('\u{01c2}', "c!"),
    ('\u{01c1}', "l!"), ('\u{02a6}', "ts"), ('\u{02a3}', "dz"), ('\u{02a7}', "tS"),
    ('\u{02a4}', "dZ"),
];

/// IPA symbols known to have no Kirshenbaum form.
pub const UNMAPPED: &[char] = &[
    '\u{029b}', '\u{1d7b}', '\u{1d7f}', '.', '\u{02b2}', '\u{02d1}', '\u{02a2}', '\u{02a1}',
    '\u{a71b}', '\u{a71c}', '|', '\u{2016}', '\u{203f}', '\u{031f}', '\u{0320}', '\u{030c}',
    '\u{0325}', '\u{02e4}', '\u{0302}', '\u{032f}', '\u{031a}', '\u{0318}', '\u{033a}',
    '\u{031c}', '\u{033b}', '\u{033c}', '\u{0339}', '\u{0319}', '\u{0330}', '\u{031d}',
    '\u{02b7}', '\u{0361}', '\u{035c}',
];

static TABLE: LazyLock<HashMap<char, &'static str>> =
    LazyLock::new(|| IPA_KIRSHENBAUM.iter().copied().collect());

/// Convert IPA text to Kirshenbaum, keeping whitespace.
pub fn ipa_to_kirshenbaum(ipa: &str) -> String {
    super::convert_ipa(ipa, &TABLE, UNMAPPED, "kirshenbaum")
}

/// Convert one IPA word to the `[[...]]` form eSpeak-NG reads as phonemes.
pub fn ipa_word_to_kirshenbaum(word: &str) -> String {
    format!("[[{}]]", ipa_to_kirshenbaum(word.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_word_with_stress_and_length() {
        assert_eq!(ipa_word_to_kirshenbaum("\u{02c8}\u{0283}a\u{02d0}"), "[['Sa:]]");
    }

    #[test]
    fn drops_unmapped_symbols() {
        assert_eq!(ipa_to_kirshenbaum("pa\u{02b7}"), "pa");
        assert_eq!(ipa_to_kirshenbaum("p\u{2603}a"), "pa");
    }

    #[test]
    fn keeps_spaces_between_words() {
        assert_eq!(ipa_to_kirshenbaum("pa ta"), "pa ta");
    }

    #[test]
    fn table_has_no_duplicate_keys() {
        assert_eq!(TABLE.len(), IPA_KIRSHENBAUM.len());
        for c in UNMAPPED {
            assert!(!TABLE.contains_key(c), "{c} is both mapped and unmapped");
        }
    }
}
