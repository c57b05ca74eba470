use thiserror::Error;

/// Failure reported while tokenizing or structurally parsing a chat asset.
///
/// Parse errors never escape [`crate::state::ChatState::load_chat_file`] on
/// their own; they are always wrapped in [`LoadFailure::Parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of token stream")]
    UnexpectedEof,

    #[error("expected '{expected}'")]
    ExpectedPunctuation { expected: char },

    #[error("expected a string token")]
    ExpectedString,

    #[error("expected a number token")]
    ExpectedNumber,

    #[error("expected a name token")]
    ExpectedName,

    #[error("#include is not supported by the embedded tokenizer")]
    IncludeUnsupported,
}

/// Why a chat asset failed to load.
///
/// The public diagnostic text is produced by
/// [`crate::state::ChatState::load_chat_file`], not by `Display` here, since
/// the exact wording depends on the chat name/file the caller supplied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    #[error("chatting disabled by nochat")]
    NoChat,

    #[error("source file could not be read")]
    SourceMissing,

    #[error("script wrapper failed")]
    ScriptWrapperFailed,

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Why [`crate::constructor::construct_message`] rejected a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructError {
    #[error("message \"{0}\" too long")]
    TooLong(String),

    #[error("message \"{0}\" invalid escape char")]
    InvalidEscape(String),

    #[error("unknown random string {0}")]
    UnknownRandomString(String),
}

/// Errors surfaced by the bot chat engine's public API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("couldn't load chat: {0}")]
    Load(#[from] LoadFailure),

    #[error("couldn't construct message: {0}")]
    Construct(#[from] ConstructError),
}

/// A `Result` type that uses this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
