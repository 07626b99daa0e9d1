//! Command dispatch core.
//!
//! Commands are registered once at startup into a `CommandRouter`. Dispatch
//! is a total function: unknown commands get a command-list reply, and a
//! failing handler is caught at this boundary and converted into a user-safe
//! apology so one broken feature cannot take down the chat session.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::{
    config::Config,
    domain::{ChatId, UserId},
    errors::Error,
    formatting::escape_html,
    Result,
};

/// Input carried from an inbound message to the handler.
#[derive(Clone, Debug, Default)]
pub struct CommandInput {
    /// Free text after the command token.
    pub args: String,
    /// Telegram file ids of photos attached to the command message.
    pub photo_file_ids: Vec<String>,
}

impl CommandInput {
    pub fn text(args: impl Into<String>) -> Self {
        Self {
            args: args.into(),
            photo_file_ids: Vec::new(),
        }
    }
}

/// Per-dispatch context threaded into every handler.
///
/// The config (including the mock/live mode) is immutable for the process
/// lifetime; handlers never read it from ambient globals.
#[derive(Clone)]
pub struct DispatchContext {
    pub cfg: Arc<Config>,
    pub chat_id: ChatId,
    pub user_id: UserId,
}

/// One inline button under a reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

/// The result of handling one command: reply payload plus a success flag.
///
/// Nothing in here outlives the request.
#[derive(Clone, Debug)]
pub struct Reply {
    /// Telegram-HTML reply text. Never empty for a dispatched command.
    pub html: String,
    /// Optional video attachment to send along with the text.
    pub video: Option<PathBuf>,
    /// Optional inline keyboard.
    pub buttons: Vec<Button>,
    /// False when the feature failed and the text is a user-safe apology.
    pub ok: bool,
}

impl Reply {
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            html: text.into(),
            video: None,
            buttons: Vec::new(),
            ok: true,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            html: text.into(),
            video: None,
            buttons: Vec::new(),
            ok: false,
        }
    }

    pub fn with_video(mut self, path: PathBuf) -> Self {
        self.video = Some(path);
        self
    }

    pub fn with_button(mut self, label: impl Into<String>, data: impl Into<String>) -> Self {
        self.buttons.push(Button {
            label: label.into(),
            data: data.into(),
        });
        self
    }
}

/// The unit of behavior bound to one command name.
///
/// Handlers are stateless across calls and independently invokable. In mock
/// mode a handler must be deterministic and side-effect-free; in live mode it
/// may perform at most one outbound call through the render port.
#[async_trait]
pub trait Feature: Send + Sync {
    async fn handle(&self, input: &CommandInput, ctx: &DispatchContext) -> Result<Reply>;
}

/// String command name -> handler registry.
pub struct CommandRouter {
    handlers: HashMap<String, Arc<dyn Feature>>,
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRouter {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Bind a handler to a command name.
    ///
    /// Registration happens once at startup, so a duplicate name is a
    /// programming error and is rejected rather than silently overwritten.
    pub fn register(&mut self, name: &str, handler: Arc<dyn Feature>) -> Result<()> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::Config("empty command name".to_string()));
        }
        if self.handlers.contains_key(&name) {
            return Err(Error::DuplicateCommand(name));
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Route `name` to its handler.
    ///
    /// Never returns an error: unknown commands produce a help reply, and a
    /// handler failure is converted here into an apology reply with
    /// `ok = false` and logged for the operator.
    pub async fn dispatch(&self, name: &str, input: &CommandInput, ctx: &DispatchContext) -> Reply {
        let name = name.trim().trim_start_matches('/').to_lowercase();

        let Some(handler) = self.handlers.get(&name) else {
            return self.unknown_command_reply(&name);
        };

        match handler.handle(input, ctx).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(command = %name, error = %e, "handler failed");
                Reply::failure("⚠️ Something went wrong. Try again or type /help")
            }
        }
    }

    fn unknown_command_reply(&self, name: &str) -> Reply {
        let list = self
            .commands()
            .into_iter()
            .map(|c| format!("/{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        Reply::html(format!(
            "Unknown command: /{}\n\nAvailable commands: {list}\nType /help for details.",
            escape_html(name)
        ))
    }
}
