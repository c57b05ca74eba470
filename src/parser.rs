//! Lexer adapter and two-pass parser that turn a chat-asset token stream
//! into [`crate::model::ChatAssets`].

use crate::error::ParseError;
use crate::model::{ChatAssets, MatchContext, ReplyRule, SynonymContext, SynonymGroup, SynonymPhrase};
use crate::template::TemplateBuilder;

/// One lexical token, classified the way the external preprocessor-driven
/// source would hand it to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Name(String),
    String(String),
    Number { int: i64, float: f64, lexeme: String },
    Punctuation(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
}

/// External collaborator supplying a token stream; the engine only ever
/// needs `reset` + `next_token` from whatever preprocessor feeds it.
pub trait TokenSource {
    fn reset(&mut self);
    fn next_token(&mut self) -> Option<Token>;
}

/// A minimal embedded tokenizer standing in for the real preprocessor.
///
/// Recognizes C-style `//` and `/* */` comments, double-quoted strings,
/// integer/float numbers, `[A-Za-z_][A-Za-z0-9_]*` names, and single-char
/// punctuation. `#include` and any other `#`-directive are not implemented,
/// since the real preprocessor is an external collaborator this adapter
/// does not reimplement, so a bare `#` token reaches the parser, which
/// rejects it with [`ParseError::IncludeUnsupported`] rather than silently
/// ignoring it.
pub struct PreprocessedTokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl PreprocessedTokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.pos += 1;
                }
                Some('/') if self.chars.get(self.pos + 1) == Some(&'/') => {
                    while let Some(c) = self.peek_char() {
                        self.pos += 1;
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.chars.get(self.pos + 1) == Some(&'*') => {
                    self.pos += 2;
                    while self.pos < self.chars.len()
                        && !(self.chars[self.pos] == '*'
                            && self.chars.get(self.pos + 1) == Some(&'/'))
                    {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.chars.len());
                }
                _ => break,
            }
        }
    }
}

impl TokenSource for PreprocessedTokenizer {
    fn reset(&mut self) {
        self.pos = 0;
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        let ch = self.peek_char()?;

        if ch == '"' {
            self.pos += 1;
            let mut text = String::new();
            while let Some(c) = self.peek_char() {
                if c == '"' {
                    self.pos += 1;
                    break;
                }
                if c == '\\' && self.chars.get(self.pos + 1) == Some(&'"') {
                    text.push('"');
                    self.pos += 2;
                    continue;
                }
                text.push(c);
                self.pos += 1;
            }
            return Some(Token {
                kind: TokenKind::String(text),
            });
        }

        if ch.is_ascii_digit() || (ch == '-' && self.chars.get(self.pos + 1).is_some_and(|c| c.is_ascii_digit())) {
            let start = self.pos;
            self.pos += 1;
            while self.peek_char().is_some_and(|c| c.is_ascii_digit() || c == '.') {
                self.pos += 1;
            }
            let lexeme: String = self.chars[start..self.pos].iter().collect();
            let float: f64 = lexeme.parse().unwrap_or(0.0);
            let int: i64 = lexeme.parse().unwrap_or(float as i64);
            return Some(Token {
                kind: TokenKind::Number { int, float, lexeme },
            });
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let start = self.pos;
            while self.peek_char().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
                self.pos += 1;
            }
            let name: String = self.chars[start..self.pos].iter().collect();
            return Some(Token {
                kind: TokenKind::Name(name),
            });
        }

        self.pos += 1;
        Some(Token {
            kind: TokenKind::Punctuation(ch),
        })
    }
}

/// Buffers a single token of lookahead/pushback over a [`TokenSource`].
pub struct Lexer<'a, T: TokenSource> {
    source: &'a mut T,
    pushback: Option<Token>,
}

impl<'a, T: TokenSource> Lexer<'a, T> {
    pub fn new(source: &'a mut T) -> Self {
        Self {
            source,
            pushback: None,
        }
    }

    pub fn reset(&mut self) {
        self.pushback = None;
        self.source.reset();
    }

    pub fn next_token(&mut self) -> Option<Token> {
        self.pushback.take().or_else(|| self.source.next_token())
    }

    pub fn unread(&mut self, token: Token) {
        self.pushback = Some(token);
    }

    pub fn peek_matches_name(&mut self, expected: &str) -> bool {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::Name(name),
            }) if name.eq_ignore_ascii_case(expected) => true,
            Some(other) => {
                self.unread(other);
                false
            }
            None => false,
        }
    }

    pub fn expect_punctuation(&mut self, expected: char) -> Result<(), ParseError> {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::Punctuation(c),
            }) if c == expected => Ok(()),
            Some(other) => {
                self.unread(other);
                Err(ParseError::ExpectedPunctuation { expected })
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }

    pub fn expect_string(&mut self) -> Result<String, ParseError> {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::String(text),
            }) => Ok(text),
            Some(other) => {
                self.unread(other);
                Err(ParseError::ExpectedString)
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }

    pub fn expect_number(&mut self) -> Result<(i64, f64, String), ParseError> {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::Number { int, float, lexeme },
            }) => Ok((int, float, lexeme)),
            Some(other) => {
                self.unread(other);
                Err(ParseError::ExpectedNumber)
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }

    pub fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::Name(name),
            }) => Ok(name),
            Some(other) => {
                self.unread(other);
                Err(ParseError::ExpectedName)
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }
}

/// Resolves a `MSG_*` identifier to its numeric code. Unknown identifiers
/// yield `0`.
pub fn message_type_from_identifier(ident: &str) -> u32 {
    const TABLE: &[(&str, u32)] = &[
        ("MSG_DEATH", 1),
        ("MSG_ENTERGAME", 2),
        ("MSG_HELP", 3),
        ("MSG_ACCOMPANY", 4),
        ("MSG_DEFENDKEYAREA", 5),
        ("MSG_RUSHBASE", 6),
        ("MSG_GETFLAG", 7),
        ("MSG_STARTTEAMLEADERSHIP", 8),
        ("MSG_STOPTEAMLEADERSHIP", 9),
        ("MSG_WAIT", 10),
        ("MSG_WHATAREYOUDOING", 11),
        ("MSG_JOINSUBTEAM", 12),
        ("MSG_LEAVESUBTEAM", 13),
        ("MSG_CREATENEWFORMATION", 14),
        ("MSG_FORMATIONPOSITION", 15),
        ("MSG_FORMATIONSPACE", 16),
        ("MSG_DOFORMATION", 17),
        ("MSG_DISMISS", 18),
        ("MSG_CAMP", 19),
        ("MSG_CHECKPOINT", 20),
        ("MSG_PATROL", 21),
    ];
    TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(ident))
        .map(|(_, code)| *code)
        .unwrap_or(0)
}

/// Runs the two-pass parse, producing a fully populated [`ChatAssets`] or
/// the first [`ParseError`] encountered.
pub struct Parser<'a, T: TokenSource> {
    lexer: Lexer<'a, T>,
}

impl<'a, T: TokenSource> Parser<'a, T> {
    pub fn new(source: &'a mut T) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    pub fn parse(mut self) -> Result<ChatAssets, ParseError> {
        let mut assets = ChatAssets::default();

        self.lexer.reset();
        self.parse_synonym_pass(&mut assets)?;

        self.lexer.reset();
        self.parse_match_reply_pass(&mut assets)?;

        Ok(assets)
    }

    fn parse_synonym_pass(&mut self, assets: &mut ChatAssets) -> Result<(), ParseError> {
        while let Some(token) = self.lexer.next_token() {
            if token.kind == TokenKind::Punctuation('#') {
                return Err(ParseError::IncludeUnsupported);
            }
            let name = match token.kind {
                TokenKind::Name(name) if name.to_ascii_uppercase().starts_with("CONTEXT_") => name,
                _ => continue,
            };

            self.lexer.expect_punctuation('{')?;
            let mut groups = Vec::new();

            loop {
                match self.lexer.next_token() {
                    Some(Token {
                        kind: TokenKind::Punctuation('}'),
                    }) => break,
                    Some(Token {
                        kind: TokenKind::Punctuation('['),
                    }) => {
                        groups.push(self.parse_synonym_group()?);
                    }
                    Some(other) => {
                        self.lexer.unread(other);
                        return Err(ParseError::ExpectedPunctuation { expected: '}' });
                    }
                    None => return Err(ParseError::UnexpectedEof),
                }
            }

            assets.synonym_contexts.push(SynonymContext { name, groups });
        }
        Ok(())
    }

    fn parse_synonym_group(&mut self) -> Result<SynonymGroup, ParseError> {
        let mut group = SynonymGroup::new();
        loop {
            self.lexer.expect_punctuation('(')?;
            let text = self.lexer.expect_string()?;
            self.lexer.expect_punctuation(',')?;
            let (_, float, _) = self.lexer.expect_number()?;
            self.lexer.expect_punctuation(')')?;
            group.push(SynonymPhrase {
                text,
                weight: float as f32,
            });

            match self.lexer.next_token() {
                Some(Token {
                    kind: TokenKind::Punctuation(','),
                }) => continue,
                Some(Token {
                    kind: TokenKind::Punctuation(']'),
                }) => break,
                Some(_) => return Err(ParseError::ExpectedPunctuation { expected: ']' }),
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(group)
    }

    fn parse_match_reply_pass(&mut self, assets: &mut ChatAssets) -> Result<(), ParseError> {
        while let Some(token) = self.lexer.next_token() {
            match token.kind {
                TokenKind::Name(name) if name.to_ascii_uppercase().starts_with("MTCONTEXT_") => {
                    self.parse_match_context(assets)?;
                }
                TokenKind::Punctuation('[') => {
                    self.parse_reply_block(assets)?;
                }
                TokenKind::Punctuation('#') => return Err(ParseError::IncludeUnsupported),
                _ => continue,
            }
        }
        Ok(())
    }

    fn parse_match_context(&mut self, assets: &mut ChatAssets) -> Result<(), ParseError> {
        self.lexer.expect_punctuation('{')?;
        loop {
            match self.lexer.next_token() {
                Some(Token {
                    kind: TokenKind::Punctuation('}'),
                }) => break,
                Some(other) => {
                    self.lexer.unread(other);
                    self.parse_match_template(assets)?;
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(())
    }

    fn parse_match_template(&mut self, assets: &mut ChatAssets) -> Result<(), ParseError> {
        let mut builder = TemplateBuilder::new();

        loop {
            match self.lexer.next_token() {
                Some(Token {
                    kind: TokenKind::Punctuation('='),
                }) => break,
                Some(Token {
                    kind: TokenKind::String(text),
                }) => {
                    builder.push_string(&text);
                }
                Some(Token {
                    kind: TokenKind::Name(name),
                }) => {
                    builder.push_name(&name.to_ascii_uppercase());
                }
                Some(Token {
                    kind: TokenKind::Number { lexeme, .. },
                }) => {
                    builder.push_number(&lexeme);
                }
                Some(Token {
                    kind: TokenKind::Punctuation(','),
                }) => {
                    builder.push_comma_space();
                }
                Some(_) => {}
                None => return Err(ParseError::UnexpectedEof),
            }
        }

        self.lexer.expect_punctuation('(')?;
        let ident = self.lexer.expect_name()?;
        let message_type = message_type_from_identifier(&ident);
        self.skip_until_punctuation(';')?;

        if let Some(template) = builder.finish() {
            if message_type != 0 {
                match assets.find_match_context_mut(message_type) {
                    Some(ctx) => ctx.templates.push(template),
                    None => assets.match_contexts.push(MatchContext {
                        message_type,
                        templates: vec![template],
                    }),
                }
            }
        }

        Ok(())
    }

    fn parse_reply_block(&mut self, assets: &mut ChatAssets) -> Result<(), ParseError> {
        self.skip_balanced_brackets()?;
        self.lexer.expect_punctuation('=')?;
        let (context_int, _, _) = self.lexer.expect_number()?;
        let context = context_int.max(0) as u32;
        self.lexer.expect_punctuation('{')?;

        let mut responses = Vec::new();
        loop {
            match self.lexer.next_token() {
                Some(Token {
                    kind: TokenKind::Punctuation('}'),
                }) => break,
                Some(other) => {
                    self.lexer.unread(other);
                    if let Some(response) = self.parse_reply_template()? {
                        responses.push(response);
                    }
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }

        match assets.find_reply_rule_mut(context) {
            Some(rule) => rule.responses.extend(responses),
            None => assets.reply_rules.push(ReplyRule { context, responses }),
        }
        Ok(())
    }

    fn parse_reply_template(&mut self) -> Result<Option<String>, ParseError> {
        let mut builder = TemplateBuilder::new();
        loop {
            match self.lexer.next_token() {
                Some(Token {
                    kind: TokenKind::Punctuation(';'),
                }) => break,
                Some(Token {
                    kind: TokenKind::String(text),
                }) => builder.push_string(&text),
                Some(Token {
                    kind: TokenKind::Name(name),
                }) => builder.push_name(&name.to_ascii_uppercase()),
                Some(Token {
                    kind: TokenKind::Number { lexeme, .. },
                }) => builder.push_number(&lexeme),
                Some(Token {
                    kind: TokenKind::Punctuation(','),
                }) => builder.push_comma_space(),
                Some(_) => {}
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(builder.finish())
    }

    fn skip_until_punctuation(&mut self, target: char) -> Result<(), ParseError> {
        loop {
            match self.lexer.next_token() {
                Some(Token {
                    kind: TokenKind::Punctuation(c),
                }) if c == target => return Ok(()),
                Some(_) => continue,
                None => return Err(ParseError::UnexpectedEof),
            }
        }
    }

    /// Skips a `[...]` reply-block header; its label text is discarded,
    /// only the numeric context that follows it is kept.
    fn skip_balanced_brackets(&mut self) -> Result<(), ParseError> {
        let mut depth = 1;
        loop {
            match self.lexer.next_token() {
                Some(Token {
                    kind: TokenKind::Punctuation('['),
                }) => depth += 1,
                Some(Token {
                    kind: TokenKind::Punctuation(']'),
                }) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(_) => continue,
                None => return Err(ParseError::UnexpectedEof),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_source(source: &str) -> ChatAssets {
        let mut tokenizer = PreprocessedTokenizer::new(source);
        Parser::new(&mut tokenizer).parse().unwrap()
    }

    #[test]
    fn message_type_lookup_is_case_insensitive_and_unknown_is_zero() {
        assert_eq!(message_type_from_identifier("msg_entergame"), 2);
        assert_eq!(message_type_from_identifier("MSG_PATROL"), 21);
        assert_eq!(message_type_from_identifier("MSG_NOPE"), 0);
    }

    #[test]
    fn parses_a_synonym_context_with_multiple_groups() {
        let assets = parse_source(
            r#"
            CONTEXT_greeting {
                [ ("hello", 1.0), ("hi", 0.5) ]
                [ ("yo", 2.0) ]
            }
            "#,
        );
        assert_eq!(assets.synonym_contexts.len(), 1);
        let ctx = &assets.synonym_contexts[0];
        assert_eq!(ctx.name, "CONTEXT_greeting");
        assert_eq!(ctx.groups.len(), 2);
        assert_eq!(ctx.groups[0][0].text, "hello");
        assert_eq!(ctx.groups[0][1].weight, 0.5);
    }

    #[test]
    fn parses_a_match_context_with_name_placeholder() {
        let assets = parse_source(
            r#"
            MTCONTEXT_ENTERGAME {
                NETNAME "entered the game" = (MSG_ENTERGAME) ;
            }
            "#,
        );
        let ctx = assets.find_match_context(2).unwrap();
        assert_eq!(ctx.templates, vec!["{NETNAME} entered the game".to_string()]);
    }

    #[test]
    fn unknown_msg_identifier_discards_the_template() {
        let assets = parse_source(
            r#"
            MTCONTEXT_ENTERGAME {
                "hello" = (MSG_NOPE) ;
            }
            "#,
        );
        assert!(assets.match_contexts.is_empty());
    }

    #[test]
    fn empty_lhs_is_silently_discarded() {
        let assets = parse_source(
            r#"
            MTCONTEXT_ENTERGAME {
                = (MSG_ENTERGAME) ;
            }
            "#,
        );
        assert!(assets.find_match_context(2).is_none());
    }

    #[test]
    fn parses_a_reply_block_with_numeric_context() {
        let assets = parse_source(
            r#"
            ["greeting"] = 9200 {
                "hello there" ;
                "hi" ;
            }
            "#,
        );
        let rule = assets.find_reply_rule(9200).unwrap();
        assert_eq!(rule.responses, vec!["hello there".to_string(), "hi".to_string()]);
    }

    #[test]
    fn include_directive_is_a_parse_error() {
        let mut tokenizer =
            PreprocessedTokenizer::new("#include \"other.c\"\nCONTEXT_x { [ (\"a\", 1.0) ] }");
        let result = Parser::new(&mut tokenizer).parse();
        assert_eq!(result, Err(ParseError::IncludeUnsupported));
    }

    #[test]
    fn missing_closing_brace_is_a_parse_error() {
        let mut tokenizer = PreprocessedTokenizer::new("CONTEXT_oops { [ (\"a\", 1.0) ]");
        let result = Parser::new(&mut tokenizer).parse();
        assert!(result.is_err());
    }
}
