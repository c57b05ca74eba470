//! Template-to-message assembly with `\rNAME\` escape expansion
//! (`BotConstructChatMessage`).

use crate::error::ConstructError;
use crate::model::ChatAssets;
use crate::random;

const MAX_LEN: usize = 255;

/// Assembles `template` into a concrete reply string.
///
/// Fails closed on the assembled message being too long, an invalid escape
/// sequence, or an unknown random-string name. Does not touch the console
/// queue or cooldown state; callers enqueue on success.
pub fn construct_message(
    assets: &ChatAssets,
    template: &str,
    rng: &mut dyn rand::RngCore,
) -> Result<String, ConstructError> {
    if template.chars().count() > MAX_LEN {
        return Err(ConstructError::TooLong(template.to_string()));
    }

    let chars: Vec<char> = template.chars().collect();
    let mut assembled = String::new();
    let mut i = 0usize;

    while i < chars.len() {
        let ch = chars[i];
        if ch != '\\' {
            push_checked(&mut assembled, ch, template)?;
            i += 1;
            continue;
        }

        i += 1;
        match chars.get(i) {
            Some('r') => {}
            _ => return Err(ConstructError::InvalidEscape(template.to_string())),
        }
        i += 1;

        let name_start = i;
        while i < chars.len() && chars[i] != '\\' {
            i += 1;
        }
        if i >= chars.len() {
            return Err(ConstructError::InvalidEscape(template.to_string()));
        }
        let name: String = chars[name_start..i].iter().collect();
        i += 1; // consume closing backslash

        if name.is_empty() {
            return Err(ConstructError::UnknownRandomString(String::new()));
        }
        if !random::is_builtin_table(&name) && assets.find_synonym_context_by_suffix(&name).is_none()
        {
            return Err(ConstructError::UnknownRandomString(name));
        }

        let replacement = random::resolve(assets, &name, rng)
            .ok_or_else(|| ConstructError::UnknownRandomString(name.clone()))?;

        for rch in replacement.chars() {
            push_checked(&mut assembled, rch, template)?;
        }
    }

    Ok(assembled)
}

fn push_checked(assembled: &mut String, ch: char, template: &str) -> Result<(), ConstructError> {
    if assembled.chars().count() + 1 > MAX_LEN {
        return Err(ConstructError::TooLong(template.to_string()));
    }
    assembled.push(ch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SynonymContext, SynonymPhrase};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn literal_template_passes_through_unchanged() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            construct_message(&assets, "hello there", &mut rng).unwrap(),
            "hello there"
        );
    }

    #[test]
    fn too_long_template_fails_before_scanning() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        let long = "a".repeat(256);
        assert_eq!(
            construct_message(&assets, &long, &mut rng),
            Err(ConstructError::TooLong(long))
        );
    }

    #[test]
    fn backslash_not_followed_by_r_is_invalid_escape() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        let template = "oops \\x\\";
        assert_eq!(
            construct_message(&assets, template, &mut rng),
            Err(ConstructError::InvalidEscape(template.to_string()))
        );
    }

    #[test]
    fn missing_closing_backslash_is_invalid_escape() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        let template = "oops \\rrandom_misc";
        assert_eq!(
            construct_message(&assets, template, &mut rng),
            Err(ConstructError::InvalidEscape(template.to_string()))
        );
    }

    #[test]
    fn empty_name_is_unknown_random_string_empty() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            construct_message(&assets, "oops \\r\\ there", &mut rng),
            Err(ConstructError::UnknownRandomString(String::new()))
        );
    }

    #[test]
    fn unknown_random_name_fails() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            construct_message(&assets, "oops \\runit_test_missing\\ there", &mut rng),
            Err(ConstructError::UnknownRandomString(
                "unit_test_missing".to_string()
            ))
        );
    }

    #[test]
    fn known_builtin_name_expands_to_a_table_member() {
        let assets = ChatAssets::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = construct_message(&assets, "say \\rrandom_misc\\.", &mut rng).unwrap();
        assert!(result.starts_with("say "));
        assert!(result.ends_with('.'));
        let middle = &result["say ".len()..result.len() - 1];
        assert!(crate::random::RANDOM_MISC.contains(&middle));
    }

    #[test]
    fn synonym_context_expansion_prefers_context_over_builtin() {
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
            construct_message(&assets, "say \\rrandom_misc\\.", &mut rng).unwrap(),
            "say override."
        );
    }

    #[test]
    fn expansion_overflow_fails_as_too_long() {
        let mut assets = ChatAssets::default();
        assets.synonym_contexts.push(SynonymContext {
            name: "CONTEXT_huge".to_string(),
            groups: vec![vec![SynonymPhrase {
                text: "a".repeat(260),
                weight: 1.0,
            }]],
        });
        let mut rng = StdRng::seed_from_u64(1);
        let template = "say \\rhuge\\";
        assert_eq!(
            construct_message(&assets, template, &mut rng),
            Err(ConstructError::TooLong(template.to_string()))
        );
    }
}
