//! IPA and X-SAMPA in both directions.

use std::collections::HashMap;
use std::sync::LazyLock;

/// IPA symbol to its preferred X-SAMPA form.
pub const IPA_XSAMPA: &[(char, &str)] = &[
    ('a', "a"), ('b', "b"), ('\u{0253}', "b_<"), ('c', "c"), ('d', "d"), ('\u{0256}', "d`"),
    ('\u{0257}', "d_<"), ('e', "e"), ('f', "f"), ('\u{0261}', "g"), ('\u{0260}', "g_<"),
    ('h', "h"), ('\u{0266}', "h\\"), ('i', "i"), ('j', "j"), ('\u{029d}', "j\\"), ('k', "k"),
    ('l', "l"), ('\u{026d}', "l`"), ('\u{027a}', "l\\"), ('m', "m"), ('n', "n"),
    ('\u{0273}', "n`"), ('o', "o"), ('p', "p"), ('\u{0278}', "p\\"), ('q', "q"), ('r', "r"),
    ('\u{027d}', "r`"), ('\u{0279}', "r\\"), ('\u{027b}', "r\\`"), ('s', "s"),
    ('\u{0282}', "s`"), ('\u{0255}', "s\\"), ('t', "t"), ('\u{0288}', "t`"), ('u', "u"),
    ('v', "v"), ('\u{028b}', "v\\"), ('w', "w"), ('x', "x"), ('\u{0267}', "x\\"), ('y', "y"),
    ('z', "z"), ('\u{0290}', "z`"), ('\u{0291}', "z\\"), ('\u{0251}', "A"), ('\u{03b2}', "B"),
    ('\u{0299}', "B\\"), ('\u{00e7}', "C"), ('\u{00f0}', "D"), ('\u{025b}', "E"),
    ('\u{0271}', "F"), ('\u{0263}', "G"), ('\u{0262}', "G\\"), ('\u{029b}', "G\\<"),
    ('\u{0265}', "H"), ('\u{029c}', "H\\"), ('\u{026a}', "I"), ('\u{1d7b}', "I\\"),
    ('\u{0272}', "J"), ('\u{025f}', "J\\"), ('\u{0284}', "J\\_<"), ('\u{026c}', "K"),
    ('\u{026e}', "K\\"), ('\u{028e}', "L"), ('\u{029f}', "L\\"), ('\u{026f}', "M"),
    ('\u{0270}', "M\\"), ('\u{014b}', "N"), ('\u{0274}', "N\\"), ('\u{0254}', "O"),
    ('\u{0298}', "O\\"), ('\u{0252}', "Q"), ('\u{0281}', "R"), ('\u{0280}', "R\\"),
    ('\u{0283}', "S"), ('\u{03b8}', "T"), ('\u{028a}', "U"), ('\u{1d7f}', "U\\"),
    ('\u{028c}', "V"), ('\u{028d}', "W"), ('\u{03c7}', "X"), ('\u{0127}', "X\\"),
    ('\u{028f}', "Y"), ('\u{0292}', "Z"), ('.', "."), ('\u{02c8}', "\""), ('\u{02cc}', "%"),
    ('\u{02b2}', "'"), ('\u{02d0}', ":"), ('\u{02d1}', ":\\"), ('\u{0259}', "@"),
    ('\u{0258}', "@\\"), ('\u{025a}', "@`"), ('\u{00e6}', "{"), ('\u{0289}', "}"),
    ('\u{0268}', "1"), ('\u{00f8}', "2"), ('\u{025c}', "3"), ('\u{025e}', "3\\"),
    ('\u{027e}', "4"), ('\u{026b}', "5"), ('\u{0250}', "6"), ('\u{0264}', "7"),
    ('\u{0275}', "8"), ('\u{0153}', "9"), ('\u{0276}', "&"), ('\u{0294}', "?"),
    ('\u{0295}', "?\\"), ('\u{02a2}', "<\\"), ('\u{02a1}', ">\\"), ('\u{a71b}', "^"),
    ('\u{a71c}', "!"), ('\u{01c3}', "!\\"), ('|', "|"), ('\u{01c0}', "|\\"),
    ('\u{2016}', "||"), ('\u{01c1}', "|\\|\\"), ('\u{01c2}', "=\\"), ('\u{203f}', "-\\"),
    ('\u{0308}', "_\""), ('\u{031f}', "_+"), ('\u{0320}', "_-"), ('\u{030c}', "_/"),
    ('\u{0325}', "_0"), ('\u{0329}', "_="), ('\u{02bc}', "_>"), ('\u{02e4}', "_?\\"),
    ('\u{0302}', "_\\"), ('\u{032f}', "_^"), ('\u{031a}', "_}"), ('\u{02de}', "`"),
    ('\u{0303}', "~"), ('\u{0318}', "_A"), ('\u{033a}', "_a"), ('\u{031c}', "_c"),
    ('\u{032a}', "_d"), ('\u{02e0}', "_G"), ('\u{02b0}', "_h"), ('\u{033b}', "_m"),
    ('\u{033c}', "_N"), ('\u{0339}', "_O"), ('\u{031e}', "_o"), ('\u{0319}', "_q"),
    ('\u{0330}', "_k"), ('\u{031d}', "_r"), ('\u{0324}', "_t"), ('\u{02b7}', "_w"),
];

static FORWARD: LazyLock<HashMap<char, &'static str>> =
    LazyLock::new(|| IPA_XSAMPA.iter().copied().collect());

static REVERSE: LazyLock<HashMap<&'static str, char>> =
    LazyLock::new(|| IPA_XSAMPA.iter().map(|&(ipa, xs)| (xs, ipa)).collect());

static LONGEST_SYMBOL: LazyLock<usize> =
    LazyLock::new(|| IPA_XSAMPA.iter().map(|(_, xs)| xs.len()).max().unwrap_or(1));

/// Convert IPA text to X-SAMPA, keeping whitespace.
pub fn ipa_to_xsampa(ipa: &str) -> String {
    super::convert_ipa(ipa, &FORWARD, &[], "x-sampa")
}

/// Convert X-SAMPA text to IPA, taking the longest symbol at each position.
///
/// X-SAMPA is pure ASCII, so byte offsets are char boundaries for any valid
/// input; non-ASCII characters are dropped.
pub fn xsampa_to_ipa(xsampa: &str) -> String {
    let mut out = String::with_capacity(xsampa.len());
    let mut pos = 0;
    while pos < xsampa.len() {
        let rest = &xsampa[pos..];
        let Some(first) = rest.chars().next() else {
            break;
        };
        if first.is_whitespace() {
            out.push(first);
            pos += first.len_utf8();
            continue;
        }

        let longest = (*LONGEST_SYMBOL).min(rest.len());
        let matched = (1..=longest)
            .rev()
            .filter(|&len| rest.is_char_boundary(len))
            .find_map(|len| REVERSE.get(&rest[..len]).map(|&ipa| (ipa, len)));

        match matched {
            Some((ipa, len)) => {
                out.push(ipa);
                pos += len;
            }
            None => {
                tracing::debug!(symbol = %first, "No IPA symbol for X-SAMPA");
                pos += first.len_utf8();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_ipa_word() {
        assert_eq!(ipa_to_xsampa("\u{02c8}\u{0283}\u{00e6}\u{014b}"), "\"S{N");
    }

    #[test]
    fn reverse_prefers_longest_symbol() {
        assert_eq!(xsampa_to_ipa("r\\`a"), "\u{027b}a");
        assert_eq!(xsampa_to_ipa("r\\a"), "\u{0279}a");
        assert_eq!(xsampa_to_ipa("ra"), "ra");
        assert_eq!(xsampa_to_ipa("|\\|\\"), "\u{01c1}");
        assert_eq!(xsampa_to_ipa("||"), "\u{2016}");
    }

    #[test]
    fn reverse_keeps_spaces() {
        assert_eq!(xsampa_to_ipa("pa tS"), "pa t\u{0283}");
    }

    #[test]
    fn mapping_is_one_to_one() {
        assert_eq!(FORWARD.len(), IPA_XSAMPA.len());
        assert_eq!(REVERSE.len(), IPA_XSAMPA.len());
    }

    #[test]
    fn ipa_round_trips_through_xsampa() {
        let word = "\u{02c8}t\u{0283}\u{0251}\u{02d0}\u{0279}\u{0259}";
        assert_eq!(xsampa_to_ipa(&ipa_to_xsampa(word)), word);
    }
}
