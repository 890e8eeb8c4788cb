//! Rule-driven conversion between spelling and pronunciation.
//!
//! The input is scanned left to right. At each position the rules are tried
//! in list order and the first one whose pattern matches *at* that position
//! wins: its target text is emitted and the cursor moves past the match.
//! Characters no rule matches pass through unchanged. A choice, once made,
//! is never revisited.

use regex::Regex;

use honing_model::SoundMap;

use crate::error::{HoningError, Result};

/// Which representation is read and which is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Spelled text to IPA (`pronunciation_regex` -> `phoneme`).
    Pronounce,
    /// IPA to spelled text (`spelling_regex` -> `romanization`).
    Spell,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Regex,
    target: String,
}

/// A rule set compiled for one direction.
#[derive(Debug, Clone)]
pub struct Transducer {
    direction: Direction,
    rules: Vec<CompiledRule>,
}

impl Transducer {
    /// Compile `rules` for `direction`.
    ///
    /// Rules with an empty source pattern are skipped. An invalid pattern
    /// fails the whole compilation.
    pub fn new(rules: &[SoundMap], direction: Direction) -> Result<Self> {
        let compiled = rules
            .iter()
            .filter_map(|rule| {
                let (pattern, target) = match direction {
                    Direction::Pronounce => (&rule.pronunciation_regex, &rule.phoneme),
                    Direction::Spell => (&rule.spelling_regex, &rule.romanization),
                };
                (!pattern.is_empty()).then(|| compile(pattern, target))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(?direction, rules = compiled.len(), "Compiled rule set");
        Ok(Self {
            direction,
            rules: compiled,
        })
    }

    pub fn pronouncer(rules: &[SoundMap]) -> Result<Self> {
        Self::new(rules, Direction::Pronounce)
    }

    pub fn speller(rules: &[SoundMap]) -> Result<Self> {
        Self::new(rules, Direction::Spell)
    }

    pub fn transduce(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut pos = 0;
        while pos < input.len() {
            match self.match_at(input, pos) {
                Some(matched) => {
                    tracing::trace!(
                        direction = ?self.direction,
                        at = pos,
                        rule = matched.rule.pattern.as_str(),
                        "Rule matched"
                    );
                    pos = matched.emit(&mut output);
                }
                None => {
                    let Some(c) = input[pos..].chars().next() else {
                        break;
                    };
                    output.push(c);
                    pos += c.len_utf8();
                }
            }
        }
        output
    }

    fn match_at<'a>(&'a self, input: &'a str, pos: usize) -> Option<RuleMatch<'a>> {
        self.rules.iter().find_map(|rule| {
            let caps = rule.pattern.captures_at(input, pos)?;
            let whole = caps.get(0)?;
            (whole.start() == pos && whole.end() > pos).then_some(RuleMatch {
                rule,
                caps,
                end: whole.end(),
            })
        })
    }
}

struct RuleMatch<'a> {
    rule: &'a CompiledRule,
    caps: regex::Captures<'a>,
    end: usize,
}

impl RuleMatch<'_> {
    /// Write the rule's target and return the new cursor position.
    fn emit(self, output: &mut String) -> usize {
        self.caps.expand(&self.rule.target, output);
        self.end
    }
}

fn compile(pattern: &str, target: &str) -> Result<CompiledRule> {
    let regex = Regex::new(pattern).map_err(|e| HoningError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })?;
    Ok(CompiledRule {
        pattern: regex,
        target: target.to_string(),
    })
}

/// Convert a spelled word to IPA.
pub fn pronounce(spelled: &str, rules: &[SoundMap]) -> Result<String> {
    Ok(Transducer::pronouncer(rules)?.transduce(spelled))
}

/// Convert an IPA string to its spelling.
pub fn spell(phonetic: &str, rules: &[SoundMap]) -> Result<String> {
    Ok(Transducer::speller(rules)?.transduce(phonetic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<SoundMap> {
        vec![
            SoundMap::new("\u{0283}", "sh", "\u{0283}", "sh"),
            SoundMap::literal("s", "s"),
            SoundMap::literal("h", "h"),
            SoundMap::literal("a", "a"),
        ]
    }

    #[test]
    fn earlier_rule_wins_at_a_position() {
        assert_eq!(pronounce("sha", &rules()).unwrap(), "\u{0283}a");
        assert_eq!(spell("\u{0283}a", &rules()).unwrap(), "sha");
    }

    #[test]
    fn rule_order_matters() {
        let mut reordered = rules();
        reordered.rotate_left(1);
        // "s" now comes before "sh", so the digraph is never seen.
        assert_eq!(pronounce("sha", &reordered).unwrap(), "sha");
    }

    #[test]
    fn unmatched_characters_pass_through() {
        assert_eq!(pronounce("s-x", &rules()).unwrap(), "s-x");
    }

    #[test]
    fn anchors_see_the_whole_input() {
        let rules = vec![
            SoundMap::new("k", "c", "^k", "^c"),
            SoundMap::new("s", "c", "s", "c"),
        ];
        assert_eq!(pronounce("cac", &rules).unwrap(), "kas");
    }

    #[test]
    fn capture_groups_expand_into_target() {
        let rules = vec![SoundMap::new("${1}\u{02d0}", "", "", "([aeiou])h")];
        assert_eq!(pronounce("ahe", &rules).unwrap(), "a\u{02d0}e");
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let rules = vec![SoundMap::new("p", "p", "(", "p")];
        let err = spell("p", &rules).unwrap_err();
        assert!(matches!(err, HoningError::InvalidPattern { pattern, .. } if pattern == "("));
    }
}
