//! Built-in random-string tables and `\rNAME\` resolution policy.

use rand::Rng;

use crate::model::ChatAssets;

pub const RANDOM_MISC: &[&str] = &["woohoo", "whoopass", "hmmmm"];
pub const RANDOM_INSULT: &[&str] = &["lamer", "loser", "sucker"];

/// `true` iff `name` names one of the hard-coded built-in tables.
pub fn is_builtin_table(name: &str) -> bool {
    name.eq_ignore_ascii_case("random_misc") || name.eq_ignore_ascii_case("random_insult")
}

fn builtin_table(name: &str) -> Option<&'static [&'static str]> {
    if name.eq_ignore_ascii_case("random_misc") {
        Some(RANDOM_MISC)
    } else if name.eq_ignore_ascii_case("random_insult") {
        Some(RANDOM_INSULT)
    } else {
        None
    }
}

/// Resolves `\rNAME\` to a concrete phrase.
///
/// Looks up a synonym context whose suffix matches `name` first; if one
/// exists, performs weighted selection across all of its phrases. Otherwise
/// falls back to uniform selection from a built-in table. Returns `None`
/// when `name` names neither a synonym context nor a built-in table, or
/// when a matching synonym context exists but has no phrases at all.
pub fn resolve(assets: &ChatAssets, name: &str, rng: &mut dyn rand::RngCore) -> Option<String> {
    if let Some(context) = assets.find_synonym_context_by_suffix(name) {
        return select_weighted(context, rng);
    }
    let table = builtin_table(name)?;
    let index = rng.gen_range(0..table.len());
    Some(table[index].to_string())
}

fn select_weighted(
    context: &crate::model::SynonymContext,
    rng: &mut dyn rand::RngCore,
) -> Option<String> {
    let phrases: Vec<&crate::model::SynonymPhrase> = context.phrases().collect();
    if phrases.is_empty() {
        return None;
    }
    let total: f64 = phrases.iter().map(|p| p.selection_weight()).sum();
    if total <= 0.0 {
        return Some(phrases[0].text.clone());
    }
    let mut pick = rng.gen_range(0.0..total);
    for phrase in &phrases {
        let weight = phrase.selection_weight();
        if pick < weight {
            return Some(phrase.text.clone());
        }
        pick -= weight;
    }
    Some(phrases.last().unwrap().text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SynonymContext, SynonymPhrase};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn is_builtin_table_is_case_insensitive() {
        assert!(is_builtin_table("RANDOM_MISC"));
        assert!(is_builtin_table("random_insult"));
        assert!(!is_builtin_table("random_nope"));
    }

    #[test]
    fn falls_back_to_builtin_table_when_no_synonym_context_matches() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = resolve(&assets, "random_misc", &mut rng).unwrap();
        assert!(RANDOM_MISC.contains(&result.as_str()));
    }

    #[test]
    fn unknown_name_with_no_matching_context_resolves_to_none() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(resolve(&assets, "unit_test_missing", &mut rng), None);
    }

    #[test]
    fn synonym_context_match_takes_priority_over_builtin_table() {
        let mut assets = ChatAssets::default();
        assets.synonym_contexts.push(SynonymContext {
            name: "CONTEXT_random_misc".to_string(),
            groups: vec![vec![SynonymPhrase {
                text: "override".to_string(),
                weight: 1.0,
            }]],
        });
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            resolve(&assets, "random_misc", &mut rng),
            Some("override".to_string())
        );
    }

    #[test]
    fn weighted_selection_only_returns_zero_weight_phrase_when_it_is_the_only_one() {
        let mut assets = ChatAssets::default();
        assets.synonym_contexts.push(SynonymContext {
            name: "CONTEXT_solo".to_string(),
            groups: vec![vec![SynonymPhrase {
                text: "only".to_string(),
                weight: 0.0,
            }]],
        });
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(resolve(&assets, "solo", &mut rng), Some("only".to_string()));
    }

    #[test]
    fn empty_synonym_context_resolves_to_none() {
        let mut assets = ChatAssets::default();
        assets.synonym_contexts.push(SynonymContext {
            name: "CONTEXT_empty".to_string(),
            groups: vec![],
        });
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(resolve(&assets, "empty", &mut rng), None);
    }
}
