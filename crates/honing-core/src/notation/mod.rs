//! ASCII phonetic notations.
//!
//! Lookup-only conversions from IPA into Kirshenbaum (eSpeak-NG input) and
//! X-SAMPA, plus X-SAMPA back to IPA. Conversion is lossy: symbols with no
//! counterpart are dropped, never reported as errors.

pub mod kirshenbaum;
pub mod xsampa;

use std::collections::HashMap;

pub use kirshenbaum::{ipa_to_kirshenbaum, ipa_word_to_kirshenbaum};
pub use xsampa::{ipa_to_xsampa, xsampa_to_ipa};

/// Convert IPA text character by character.
///
/// Whitespace is kept. Characters listed in `unmapped` are known to have no
/// counterpart and are dropped quietly; other unknown characters are dropped
/// with a debug log.
fn convert_ipa(
    ipa: &str,
    table: &HashMap<char, &'static str>,
    unmapped: &[char],
    notation: &'static str,
) -> String {
    let mut out = String::with_capacity(ipa.len());
    for c in ipa.chars() {
        if c.is_whitespace() {
            out.push(c);
        } else if let Some(symbol) = table.get(&c) {
            out.push_str(symbol);
        } else if !unmapped.contains(&c) {
            tracing::debug!(
                notation,
                symbol = %c,
                code = format!("U+{:04X}", u32::from(c)),
                "No mapping for IPA symbol"
            );
        }
    }
    out
}
