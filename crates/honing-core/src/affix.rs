//! Carrying phoneme changes into affix definitions.
//!
//! Affix maps are kept as raw JSON on the language. Any object under one of
//! [`AFFIX_MAPS`] that has a pronunciation field is treated as an affix: its
//! pronunciations go through the substitution table and the matching
//! spelling is re-derived.

use serde_json::{Map, Value};

use crate::substitution::SubstitutionTable;
use crate::transducer::Transducer;

/// Top-level language fields holding affix definitions.
pub const AFFIX_MAPS: &[&str] = &["affix_map", "derivational_affix_map"];

/// Pronunciation fields and the spelling field derived from each.
const ADDED_SOUNDS: &[(&str, &str)] = &[
    ("pronunciation_add", "spelling_add"),
    ("t_pronunciation_add", "t_spelling_add"),
    ("f_pronunciation_add", "f_spelling_add"),
];

const PRONUNCIATION_PATTERN: &str = "pronunciation_regex";

/// Every affix field holding IPA.
pub const PRONUNCIATION_FIELDS: &[&str] = &[
    "pronunciation_add",
    "t_pronunciation_add",
    "f_pronunciation_add",
    "pronunciation_regex",
    "pronunciation_replacement",
];

/// Apply `table` to every affix. Returns the number of affixes changed.
pub fn rewrite_affixes(
    extras: &mut Map<String, Value>,
    table: &SubstitutionTable,
    speller: &Transducer,
) -> usize {
    for_each_affix(extras, |affix| rewrite_affix(affix, table, speller))
}

/// Visit every affix object under [`AFFIX_MAPS`], however deeply nested.
///
/// `visit` returns whether it changed the affix; the number of changed
/// affixes is returned.
pub fn for_each_affix<F>(extras: &mut Map<String, Value>, mut visit: F) -> usize
where
    F: FnMut(&mut Map<String, Value>) -> bool,
{
    let mut changed = 0;
    for name in AFFIX_MAPS {
        if let Some(map) = extras.get_mut(*name) {
            changed += walk(map, &mut visit);
        }
    }
    changed
}

fn walk<F>(value: &mut Value, visit: &mut F) -> usize
where
    F: FnMut(&mut Map<String, Value>) -> bool,
{
    match value {
        Value::Array(items) => items.iter_mut().map(|v| walk(v, visit)).sum(),
        Value::Object(object) if is_affix(object) => usize::from(visit(object)),
        Value::Object(object) => object.values_mut().map(|v| walk(v, visit)).sum(),
        _ => 0,
    }
}

fn is_affix(object: &Map<String, Value>) -> bool {
    object.contains_key(PRONUNCIATION_PATTERN)
        || ADDED_SOUNDS
            .iter()
            .any(|(pronunciation, _)| object.contains_key(*pronunciation))
}

fn rewrite_affix(
    object: &mut Map<String, Value>,
    table: &SubstitutionTable,
    speller: &Transducer,
) -> bool {
    let mut changed = false;

    for (pronunciation, spelling) in ADDED_SOUNDS {
        let Some(old) = object.get(*pronunciation).and_then(Value::as_str) else {
            continue;
        };
        if old.is_empty() {
            continue;
        }
        let new = table.apply(old);
        if new != old {
            let spelled = speller.transduce(&new);
            object.insert((*pronunciation).to_string(), Value::String(new));
            object.insert((*spelling).to_string(), Value::String(spelled));
            changed = true;
        }
    }

    if let Some(old) = object.get(PRONUNCIATION_PATTERN).and_then(Value::as_str) {
        let new = table.apply(old);
        if new != old {
            object.insert(PRONUNCIATION_PATTERN.to_string(), Value::String(new));
            changed = true;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use honing_model::SoundMap;
    use serde_json::json;

    #[test]
    fn rewrites_nested_declension_affixes() {
        let mut extras = json!({
            "affix_map": {
                "noun": [{
                    "suffix": [{
                        "plural": {"pronunciation_add": "pa", "spelling_add": "pa"},
                        "dual": {"pronunciation_add": "ku", "spelling_add": "ku"}
                    }]
                }]
            },
            "derivational_affix_map": {
                "AGENT": {"pronunciation_regex": "p$", "t_pronunciation_add": "po", "t_spelling_add": "po"}
            },
            "english_name": "pa"
        });
        let extras = extras.as_object_mut().unwrap();
        let table = SubstitutionTable::single("p", "b", ["ai"]).unwrap();
        let rules = ["b", "a", "k", "u", "o"].map(|p| SoundMap::literal(p, p));
        let speller = Transducer::speller(&rules).unwrap();

        let changed = rewrite_affixes(extras, &table, &speller);

        assert_eq!(changed, 2);
        let plural = &extras["affix_map"]["noun"][0]["suffix"][0]["plural"];
        assert_eq!(plural["pronunciation_add"], "ba");
        assert_eq!(plural["spelling_add"], "ba");
        let agent = &extras["derivational_affix_map"]["AGENT"];
        assert_eq!(agent["pronunciation_regex"], "b$");
        assert_eq!(agent["t_spelling_add"], "bo");
        assert_eq!(extras["english_name"], "pa");
    }

    #[test]
    fn visits_affixes_in_both_maps() {
        let mut extras = json!({
            "affix_map": {"verb": [{"prefix": [{"past": {"pronunciation_add": "e"}}]}]},
            "derivational_affix_map": {"ABSTRACT": {"pronunciation_add": "ti"}},
            "phrase_map": {"greeting": {"pronunciation_add": "ha"}}
        });
        let extras = extras.as_object_mut().unwrap();
        let mut seen = Vec::new();

        let changed = for_each_affix(extras, |affix| {
            let sound = affix["pronunciation_add"].as_str().unwrap_or_default();
            seen.push(sound.to_string());
            sound == "ti"
        });

        assert_eq!(seen, ["e", "ti"]);
        assert_eq!(changed, 1);
    }
}
