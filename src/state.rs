//! The `ChatState` aggregate and dispatch facade.

use rand::rngs::ThreadRng;

use crate::config::ChatConfig;
use crate::console::{ConsoleMessage, ConsoleQueue};
use crate::constructor;
use crate::cooldown::CooldownGovernor;
use crate::error::{ConstructError, Error, LoadFailure, Result};
use crate::hash;
use crate::logger::{Logger, Severity, TracingLogger};
use crate::matcher;
use crate::model::ChatAssets;
use crate::parser::{Parser, TokenSource};

/// The context number `BotEnterChat` always evaluates against.
const ENTER_GAME_CONTEXT: u32 = 2;

/// External collaborator that actually delivers a constructed chat line to
/// the host game, mirroring the engine's `SendClientCommand`.
pub trait ClientCommandSink {
    fn send(&mut self, client: i32, command: &str);
}

/// Test double that records every dispatched command instead of sending
/// it anywhere.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Vec<(i32, String)>,
}

impl ClientCommandSink for RecordingSink {
    fn send(&mut self, client: i32, command: &str) {
        self.sent.push((client, command.to_string()));
    }
}

/// `sendto` selector for [`ChatState::enter_chat`] / reply dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendTo {
    Say,
    SayTeam,
    Tell,
}

impl From<i32> for SendTo {
    fn from(value: i32) -> Self {
        match value {
            1 => SendTo::SayTeam,
            2 => SendTo::Tell,
            _ => SendTo::Say,
        }
    }
}

fn format_command(sendto: SendTo, client: i32, message: &str) -> String {
    match sendto {
        SendTo::Say => format!("say {message}"),
        SendTo::SayTeam => format!("say_team {message}"),
        SendTo::Tell => format!("tell {client} {message}"),
    }
}

/// The single-owner aggregate created by `alloc`/`new` and released by
/// `free_chat_state`. Every operation runs synchronously on one thread;
/// the engine performs no internal synchronization.
pub struct ChatState {
    active_chat_file: String,
    active_chat_name: String,
    console: ConsoleQueue,
    assets: ChatAssets,
    cooldowns: CooldownGovernor,
    has_time_override: bool,
    time_override_seconds: f64,
    speaking_client: i32,
    logged_no_rchats: bool,
    rng: ThreadRng,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// `BotAllocChatState`.
    pub fn new() -> Self {
        Self {
            active_chat_file: String::new(),
            active_chat_name: String::new(),
            console: ConsoleQueue::new(),
            assets: ChatAssets::default(),
            cooldowns: CooldownGovernor::new(),
            has_time_override: false,
            time_override_seconds: 0.0,
            speaking_client: -1,
            logged_no_rchats: false,
            rng: rand::thread_rng(),
        }
    }

    /// `BotFreeChatState`: releases the asset tables and cooldown vectors
    /// in addition to what [`Self::free_chat_file`] releases.
    pub fn free_chat_state(&mut self) {
        self.free_chat_file();
        self.cooldowns = CooldownGovernor::new();
    }

    /// `BotFreeChatFile`: releases owned string buffers and table vectors;
    /// the console queue is preserved across this call.
    pub fn free_chat_file(&mut self) {
        self.active_chat_file.clear();
        self.active_chat_name.clear();
        self.assets = ChatAssets::default();
        self.logged_no_rchats = false;
    }

    /// `BotLoadChatFile(state, path, name) -> bool`.
    ///
    /// `source` stands in for the file contents the external loader would
    /// supply; `None` models "source file could not be read".
    pub fn load_chat_file<T: TokenSource>(
        &mut self,
        config: &ChatConfig,
        logger: &dyn Logger,
        path: &str,
        name: &str,
        mut tokenizer: T,
    ) -> Result<()> {
        if config.nochat {
            let message = format!("couldn't load chat {name} from {path}");
            logger.log(Severity::Fatal, &message);
            if config.fastchat {
                self.console.enqueue(Severity::Fatal as i32, message);
            }
            return Err(Error::Load(LoadFailure::NoChat));
        }

        let assets = Parser::new(&mut tokenizer).parse().map_err(|e| {
            let message = format!("couldn't find chat {name} in {path}");
            logger.log(Severity::Error, &message);
            if config.fastchat {
                self.console.enqueue(Severity::Error as i32, message);
            }
            LoadFailure::Parse(e)
        })?;

        self.active_chat_file = path.chars().take(127).collect();
        self.active_chat_name = name.chars().take(63).collect();
        self.assets = assets;
        self.logged_no_rchats = false;
        Ok(())
    }

    pub fn set_context_cooldown(&mut self, context: u32, seconds: f64) {
        self.cooldowns.set_context_cooldown(context, seconds);
    }

    /// `BotChat_SetTime`: `seconds < 0` clears the override.
    pub fn set_time(&mut self, seconds: f64) {
        if seconds < 0.0 {
            self.has_time_override = false;
            self.time_override_seconds = 0.0;
        } else {
            self.has_time_override = true;
            self.time_override_seconds = seconds;
        }
    }

    fn now(&self) -> f64 {
        if self.has_time_override {
            self.time_override_seconds
        } else {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0)
        }
    }

    pub fn queue_console_message(&mut self, message_type: i32, text: impl Into<String>) {
        self.console.enqueue(message_type, text);
    }

    pub fn next_console_message(&self) -> Option<&ConsoleMessage> {
        self.console.peek()
    }

    pub fn remove_console_message(&mut self, message_type: i32) -> bool {
        self.console.remove_by_type(message_type)
    }

    pub fn num_console_messages(&self) -> usize {
        self.console.len()
    }

    pub fn dequeue_console_message(&mut self) -> Option<ConsoleMessage> {
        self.console.dequeue()
    }

    pub fn has_synonym_phrase(&self, context: &str, phrase: &str) -> bool {
        self.assets
            .find_synonym_context_by_suffix(context)
            .map(|ctx| ctx.phrases().any(|p| p.text == phrase))
            .unwrap_or(false)
    }

    pub fn has_reply_template(&self, context: u32, template: &str) -> bool {
        self.assets
            .find_reply_rule(context)
            .map(|rule| rule.responses.iter().any(|r| r == template))
            .unwrap_or(false)
    }

    /// The active chat name's length, an ambient diagnostic the source
    /// engine surfaces as `BotChatLength`.
    pub fn chat_length(&self) -> usize {
        self.active_chat_name.len()
    }

    fn construct_and_queue(&mut self, context: u32, template: &str) -> Option<String> {
        match constructor::construct_message(&self.assets, template, &mut self.rng) {
            Ok(message) => {
                self.console.enqueue(context as i32, message.clone());
                Some(message)
            }
            Err(err) => {
                let diagnostic = match &err {
                    ConstructError::TooLong(t) => {
                        format!("BotConstructChat: message \"{t}\" too long")
                    }
                    ConstructError::InvalidEscape(t) => {
                        format!("BotConstructChat: message \"{t}\" invalid escape char")
                    }
                    ConstructError::UnknownRandomString(name) => {
                        format!("BotConstructChat: unknown random string {name}")
                    }
                };
                tracing::error!("{diagnostic}");
                None
            }
        }
    }

    /// `BotEnterChat(state, client, sendto)`.
    pub fn enter_chat(
        &mut self,
        config: &ChatConfig,
        client: i32,
        sendto: impl Into<SendTo>,
        sink: &mut dyn ClientCommandSink,
    ) {
        self.speaking_client = client;
        let sendto = sendto.into();
        let now = self.now();

        if self
            .cooldowns
            .event_allowed(config, client, ENTER_GAME_CONTEXT, now, &mut self.console)
            .is_err()
        {
            return;
        }

        let Some(ctx) = self.assets.find_match_context(ENTER_GAME_CONTEXT) else {
            tracing::info!("BotEnterChat: no templates loaded for enter game context");
            return;
        };
        if ctx.templates.is_empty() {
            tracing::info!("BotEnterChat: no templates loaded for enter game context");
            return;
        }

        let index = hash::select_index(&self.active_chat_name, ctx.templates.len());
        let template = ctx.templates[index].clone();
        if let Some(message) = self.construct_and_queue(ENTER_GAME_CONTEXT, &template) {
            let command = format_command(sendto, client, &message);
            sink.send(client, &command);
        }
    }

    /// `BotReplyChat(state, message, context) -> bool`.
    pub fn reply_chat(
        &mut self,
        config: &ChatConfig,
        message: &str,
        context: u32,
        sendto: impl Into<SendTo>,
        sink: &mut dyn ClientCommandSink,
    ) -> bool {
        let sendto = sendto.into();
        let client = self.speaking_client;
        let now = self.now();

        if self
            .cooldowns
            .event_allowed(config, client, context, now, &mut self.console)
            .is_err()
        {
            return false;
        }

        let matching_templates: Vec<String> = self
            .assets
            .find_match_context(context)
            .map(|ctx| {
                ctx.templates
                    .iter()
                    .filter(|t| matcher::template_matches(&self.assets, t, message))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if !matching_templates.is_empty() {
            let index = hash::select_index(message, matching_templates.len());
            let template = matching_templates[index].clone();
            if let Some(reply) = self.construct_and_queue(context, &template) {
                sink.send(client, &format_command(sendto, client, &reply));
                return true;
            }
        } else if self.assets.has_reply_chats() {
            if let Some(rule) = self.assets.find_reply_rule(context) {
                if !rule.responses.is_empty() {
                    let index = hash::select_index(message, rule.responses.len());
                    let template = rule.responses[index].clone();
                    if let Some(reply) = self.construct_and_queue(context, &template) {
                        sink.send(client, &format_command(sendto, client, &reply));
                        return true;
                    }
                }
            }
        }

        if !self.logged_no_rchats {
            tracing::info!("no rchats");
            self.logged_no_rchats = true;
        }
        false
    }
}
