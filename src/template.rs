//! Incremental assembly of a template string from lexed tokens, mirroring
//! `BotConstructChatMessage`'s source-side accumulator.

/// Accumulates pieces of an in-progress template. Every push appends its
/// content followed by exactly one trailing space; only the final result
/// is right-trimmed, so interior spacing is whatever the token stream
/// produces, just like the `strncat`-based source builder.
#[derive(Debug, Default, Clone)]
pub struct TemplateBuilder {
    buffer: String,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// String token: raw characters, then a single space.
    pub fn push_string(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push(' ');
    }

    /// Name token: `{IDENT}` (uppercased ASCII), then a single space.
    pub fn push_name(&mut self, name: &str) {
        self.buffer.push('{');
        self.buffer.push_str(&name.to_ascii_uppercase());
        self.buffer.push('}');
        self.buffer.push(' ');
    }

    /// Number token: the source lexeme, then a single space.
    pub fn push_number(&mut self, number: &str) {
        self.buffer.push_str(number);
        self.buffer.push(' ');
    }

    /// Punctuation `,`: a single space, nothing else.
    pub fn push_comma_space(&mut self) {
        self.buffer.push(' ');
    }

    /// Finishes the build, trimming trailing spaces. Returns `None` if the
    /// trimmed result is empty, matching the source's "empty reply is no
    /// reply" behavior.
    pub fn finish(self) -> Option<String> {
        let trimmed = self.buffer.trim_end().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_finishes_to_none() {
        assert_eq!(TemplateBuilder::new().finish(), None);
    }

    #[test]
    fn whitespace_only_builder_finishes_to_none() {
        let mut builder = TemplateBuilder::new();
        builder.push_comma_space();
        assert_eq!(builder.finish(), None);
    }

    #[test]
    fn trims_trailing_spaces() {
        let mut builder = TemplateBuilder::new();
        builder.push_string("hello");
        builder.push_name("world");
        assert_eq!(builder.finish(), Some("hello {WORLD}".to_string()));
    }

    #[test]
    fn name_token_is_wrapped_in_braces_and_uppercased() {
        let mut builder = TemplateBuilder::new();
        builder.push_name("netname");
        builder.push_string("entered the game");
        assert_eq!(builder.finish(), Some("{NETNAME} entered the game".to_string()));
    }

    #[test]
    fn number_token_keeps_source_lexeme() {
        let mut builder = TemplateBuilder::new();
        builder.push_string("wait");
        builder.push_number("3.5");
        assert_eq!(builder.finish(), Some("wait 3.5".to_string()));
    }

    #[test]
    fn comma_token_appends_a_bare_space() {
        let mut builder = TemplateBuilder::new();
        builder.push_string("a");
        builder.push_comma_space();
        builder.push_string("b");
        assert_eq!(builder.finish(), Some("a  b".to_string()));
    }
}
