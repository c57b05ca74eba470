//! In-memory asset tables populated by [`crate::parser::Parser`] and
//! consumed by the matcher, constructor, and dispatch facade.

/// A single weighted phrase inside a [`SynonymGroup`].
///
/// Weight `<= 0.0` is treated as `1.0` during weighted selection, but the
/// raw authored weight is preserved here so round-trip inspection
/// (`has_synonym_phrase`) sees exactly what was parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymPhrase {
    pub text: String,
    pub weight: f32,
}

impl SynonymPhrase {
    /// The weight used during selection: authored weight, or `1.0` if the
    /// authored value was `<= 0.0`.
    pub fn selection_weight(&self) -> f64 {
        if self.weight <= 0.0 {
            1.0
        } else {
            self.weight as f64
        }
    }
}

/// An ordered group of phrases, corresponding to one `[ (…,w), … ]` block.
pub type SynonymGroup = Vec<SynonymPhrase>;

/// A named synonym table (`CONTEXT_*`), used both as a matcher wildcard and
/// as a weighted pool for `\rNAME\` expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymContext {
    /// Raw identifier from source, including its `CONTEXT_` prefix.
    pub name: String,
    pub groups: Vec<SynonymGroup>,
}

impl SynonymContext {
    /// Identifier with the `CONTEXT_` prefix stripped, for suffix matching.
    pub fn suffix(&self) -> &str {
        self.name.strip_prefix("CONTEXT_").unwrap_or(&self.name)
    }

    /// Every phrase across every group, in source order.
    pub fn phrases(&self) -> impl Iterator<Item = &SynonymPhrase> {
        self.groups.iter().flatten()
    }
}

/// A numeric message-type bucket of canonicalized match templates.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchContext {
    pub message_type: u32,
    pub templates: Vec<String>,
}

/// A numeric reply-fallback bucket of canonicalized responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRule {
    pub context: u32,
    pub responses: Vec<String>,
}

/// The three owned tables a loaded chat file populates.
///
/// Lookups are deliberately linear scans: a duplicate context or context id
/// resolves to whichever entry was registered first, and that
/// first-match-wins behavior depends on scan order, not a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatAssets {
    pub synonym_contexts: Vec<SynonymContext>,
    pub match_contexts: Vec<MatchContext>,
    pub reply_rules: Vec<ReplyRule>,
}

impl ChatAssets {
    pub fn find_match_context(&self, message_type: u32) -> Option<&MatchContext> {
        self.match_contexts
            .iter()
            .find(|ctx| ctx.message_type == message_type)
    }

    pub fn find_match_context_mut(&mut self, message_type: u32) -> Option<&mut MatchContext> {
        self.match_contexts
            .iter_mut()
            .find(|ctx| ctx.message_type == message_type)
    }

    pub fn find_reply_rule(&self, context: u32) -> Option<&ReplyRule> {
        self.reply_rules.iter().find(|rule| rule.context == context)
    }

    pub fn find_reply_rule_mut(&mut self, context: u32) -> Option<&mut ReplyRule> {
        self.reply_rules
            .iter_mut()
            .find(|rule| rule.context == context)
    }

    /// Finds the synonym context whose suffix case-insensitively equals
    /// `token`. Comparison is ASCII-only; no locale-dependent folding.
    pub fn find_synonym_context_by_suffix(&self, token: &str) -> Option<&SynonymContext> {
        self.synonym_contexts
            .iter()
            .find(|ctx| ctx.suffix().eq_ignore_ascii_case(token))
    }

    pub fn has_reply_chats(&self) -> bool {
        self.reply_rules.iter().any(|rule| !rule.responses.is_empty())
    }
}
