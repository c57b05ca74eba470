//! Dual cooldown governor (per-context, per-client) plus the four-gate
//! `EventAllowed` evaluator.

use crate::config::ChatConfig;
use crate::console::ConsoleQueue;
use crate::logger::Severity;

/// Minimum seconds between two per-client events, absent `fastchat`.
pub const PER_CLIENT_MIN_INTERVAL: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatCooldownEntry {
    pub context: u32,
    pub duration_seconds: f64,
    pub next_allowed_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientCooldownSlot {
    pub next_allowed_time: f64,
}

/// Why an event was denied; carries enough detail to format the exact
/// diagnostic text queued for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Denial {
    NoChat,
    OutsideBounds { client: i32 },
    ClientCooldown { client: i32, remaining: f64 },
    ContextCooldown { context: u32, remaining: f64 },
}

impl Denial {
    pub fn diagnostic(&self) -> String {
        match self {
            Denial::NoChat => "chatting disabled by nochat\n".to_string(),
            Denial::OutsideBounds { client } => {
                format!("client {client} outside chat bounds\n")
            }
            Denial::ClientCooldown { client, remaining } => {
                format!("client {client} blocked by chat cooldown ({remaining:.2}s remaining)\n")
            }
            Denial::ContextCooldown { context, remaining } => {
                format!("context {context} blocked by cooldown ({remaining:.2}s remaining)\n")
            }
        }
    }

    /// The message type the diagnostic is queued under, mirroring the
    /// source's choice of queue key per gate: `nochat`/bounds denials use
    /// a print-severity code (there is no natural context number for
    /// them), per-client denials use the client id, and per-context
    /// denials use the context itself.
    pub fn queue_type(&self) -> i32 {
        match self {
            Denial::NoChat => Severity::Message as i32,
            Denial::OutsideBounds { .. } => Severity::Warning as i32,
            Denial::ClientCooldown { client, .. } => *client,
            Denial::ContextCooldown { context, .. } => *context as i32,
        }
    }
}

/// Owns per-context and per-client cooldown state and evaluates events
/// against them.
#[derive(Debug, Clone, Default)]
pub struct CooldownGovernor {
    contexts: Vec<ChatCooldownEntry>,
    clients: Vec<ClientCooldownSlot>,
}

impl CooldownGovernor {
    pub fn new() -> Self {
        Self::default()
    }

    /// `SetContextCooldown`: negative `seconds` clamps to `0`.
    pub fn set_context_cooldown(&mut self, context: u32, seconds: f64) {
        let duration = seconds.max(0.0);
        match self.contexts.iter_mut().find(|e| e.context == context) {
            Some(entry) => entry.duration_seconds = duration,
            None => self.contexts.push(ChatCooldownEntry {
                context,
                duration_seconds: duration,
                next_allowed_time: 0.0,
            }),
        }
    }

    fn ensure_client_slot(&mut self, client: usize) {
        if client >= self.clients.len() {
            let mut new_len = self.clients.len().max(1);
            while new_len <= client {
                new_len *= 2;
            }
            self.clients.resize(new_len, ClientCooldownSlot::default());
        }
    }

    /// Runs the four gates in order (nochat, client bounds, per-client
    /// interval, per-context cooldown), mutating state on each gate passed,
    /// including the context gate, even though a downstream construction
    /// failure may later discard the constructed message.
    pub fn event_allowed(
        &mut self,
        config: &ChatConfig,
        client: i32,
        context: u32,
        now: f64,
        console: &mut ConsoleQueue,
    ) -> Result<(), ()> {
        if config.nochat {
            self.deny(Denial::NoChat, console);
            return Err(());
        }

        if client < 0 || (config.maxclients > 0 && client >= config.maxclients) {
            self.deny(Denial::OutsideBounds { client }, console);
            return Err(());
        }

        let interval = if config.fastchat {
            0.0
        } else {
            PER_CLIENT_MIN_INTERVAL
        };
        self.ensure_client_slot(client as usize);
        let slot = &mut self.clients[client as usize];
        if now < slot.next_allowed_time {
            let remaining = slot.next_allowed_time - now;
            self.deny(Denial::ClientCooldown { client, remaining }, console);
            return Err(());
        }
        slot.next_allowed_time = now + interval;

        match self.contexts.iter_mut().find(|e| e.context == context) {
            Some(entry) if now < entry.next_allowed_time => {
                let remaining = entry.next_allowed_time - now;
                drop(entry);
                self.deny(Denial::ContextCooldown { context, remaining }, console);
                Err(())
            }
            Some(entry) => {
                entry.next_allowed_time = now + entry.duration_seconds;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn deny(&self, denial: Denial, console: &mut ConsoleQueue) {
        let message_type = denial.queue_type();
        console.enqueue(message_type, denial.diagnostic());
    }
}
