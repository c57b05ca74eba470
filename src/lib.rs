//! A declarative chat-script compiler and response selection engine for
//! scripted bot dialogue: loads synonym tables, templated match/response
//! utterances, and reply-fallback rules, then answers two runtime
//! questions: what a bot says on entering the game, and how it replies
//! to another player's line.

pub mod config;
pub mod console;
pub mod constructor;
pub mod cooldown;
pub mod error;
pub mod hash;
pub mod logger;
pub mod matcher;
pub mod model;
pub mod parser;
pub mod random;
pub mod state;
pub mod template;

pub use config::ChatConfig;
pub use console::{ConsoleMessage, ConsoleQueue};
pub use cooldown::{ChatCooldownEntry, ClientCooldownSlot, CooldownGovernor};
pub use error::{ConstructError, Error, LoadFailure, ParseError, Result};
pub use logger::{Logger, Severity, TracingLogger};
pub use model::{ChatAssets, MatchContext, ReplyRule, SynonymContext, SynonymGroup, SynonymPhrase};
pub use parser::{Parser, PreprocessedTokenizer, Token, TokenKind, TokenSource};
pub use state::{ChatState, ClientCommandSink, RecordingSink, SendTo};
