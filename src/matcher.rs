//! Template/message tokenization and matching.

use crate::model::ChatAssets;

const MAX_TOKENS: usize = 64;
const MAX_TOKEN_LEN: usize = 63;

/// Splits `text` into lowercased runs of `[A-Za-z0-9_]`, ASCII-only.
///
/// Stops collecting once `MAX_TOKENS` tokens have been produced; each token
/// is truncated to `MAX_TOKEN_LEN` bytes.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if current.len() < MAX_TOKEN_LEN {
                current.push(ch.to_ascii_lowercase());
            }
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
            if tokens.len() == MAX_TOKENS {
                return tokens;
            }
        }
    }
    if !current.is_empty() && tokens.len() < MAX_TOKENS {
        tokens.push(current);
    }
    tokens
}

/// Does `template` match `message` under a left-to-right cursor walk,
/// where a synonym-context token in the template may match any of its
/// phrases in `message`? A template or message with zero tokens never
/// matches.
pub fn template_matches(assets: &ChatAssets, template: &str, message: &str) -> bool {
    let template_tokens = tokenize(template);
    let message_tokens = tokenize(message);

    if template_tokens.is_empty() || message_tokens.is_empty() {
        return false;
    }

    let mut cursor = 0usize;
    for token in &template_tokens {
        match assets.find_synonym_context_by_suffix(token) {
            Some(context) => {
                match find_phrase_match(context, &message_tokens, cursor) {
                    Some(advance_to) => cursor = advance_to,
                    None => return false,
                }
            }
            None => match find_literal_match(token, &message_tokens, cursor) {
                Some(advance_to) => cursor = advance_to,
                None => return false,
            },
        }
    }
    true
}

fn find_literal_match(token: &str, message_tokens: &[String], from: usize) -> Option<usize> {
    (from..message_tokens.len())
        .find(|&i| message_tokens[i] == token)
        .map(|i| i + 1)
}

/// Tries every phrase in every group of `context`, in source order; the
/// first whose token sequence occurs at-or-after `from` wins.
fn find_phrase_match(
    context: &crate::model::SynonymContext,
    message_tokens: &[String],
    from: usize,
) -> Option<usize> {
    for phrase in context.phrases() {
        let phrase_tokens = tokenize(&phrase.text);
        if phrase_tokens.is_empty() {
            continue;
        }
        if let Some(advance_to) = find_subsequence_from(&phrase_tokens, message_tokens, from) {
            return Some(advance_to);
        }
    }
    None
}

fn find_subsequence_from(needle: &[String], haystack: &[String], from: usize) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    let last_start = haystack.len() - needle.len();
    for start in from..=last_start {
        if haystack[start..start + needle.len()] == *needle {
            return Some(start + needle.len());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SynonymContext, SynonymPhrase};

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("Hello, World! foo_bar 123"),
            vec!["hello", "world", "foo_bar", "123"]
        );
    }

    #[test]
    fn tokenize_caps_token_count_at_64() {
        let text = (0..100).map(|n| n.to_string()).collect::<Vec<_>>().join(" ");
        assert_eq!(tokenize(&text).len(), 64);
    }

    #[test]
    fn empty_template_never_matches() {
        let assets = ChatAssets::default();
        assert!(!template_matches(&assets, "   ", "hello world"));
    }

    #[test]
    fn empty_message_never_matches() {
        let assets = ChatAssets::default();
        assert!(!template_matches(&assets, "hello", "   "));
    }

    #[test]
    fn literal_tokens_must_occur_in_order() {
        let assets = ChatAssets::default();
        assert!(template_matches(&assets, "hello world", "well hello there world"));
        assert!(!template_matches(&assets, "world hello", "hello world"));
    }

    #[test]
    fn synonym_context_token_matches_any_contained_phrase() {
        let mut assets = ChatAssets::default();
        assets.synonym_contexts.push(SynonymContext {
            name: "CONTEXT_greeting".to_string(),
            groups: vec![vec![
                SynonymPhrase {
                    text: "hello there".to_string(),
                    weight: 1.0,
                },
                SynonymPhrase {
                    text: "hi".to_string(),
                    weight: 1.0,
                },
            ]],
        });
        assert!(template_matches(&assets, "greeting friend", "hi friend"));
        assert!(template_matches(
            &assets,
            "greeting friend",
            "well hello there my friend"
        ));
        assert!(!template_matches(&assets, "greeting friend", "bye friend"));
    }

    #[test]
    fn cursor_advances_past_matched_phrase() {
        let mut assets = ChatAssets::default();
        assets.synonym_contexts.push(SynonymContext {
            name: "CONTEXT_greeting".to_string(),
            groups: vec![vec![SynonymPhrase {
                text: "hello".to_string(),
                weight: 1.0,
            }]],
        });
        assert!(!template_matches(&assets, "greeting hello", "hello"));
        assert!(template_matches(&assets, "greeting hello", "hello hello"));
    }
}
