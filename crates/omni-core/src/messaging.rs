//! Cross-messenger port.
//!
//! Telegram is the only implementation today; the shape is kept small and
//! adapter-agnostic so the scheduler and the runtime share one delivery path.

use std::path::Path;

use async_trait::async_trait;

use crate::{
    dispatch::{Button, Reply},
    domain::{ChatId, MessageRef},
    Result,
};

/// Outgoing "chat action" (typing indicator, etc).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
    UploadVideo,
}

/// Inline keyboard, one button per row.
#[derive(Clone, Debug)]
pub struct InlineKeyboard {
    pub buttons: Vec<Button>,
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<Button>) -> Self {
        Self { buttons }
    }
}

#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    async fn send_video(&self, chat_id: ChatId, path: &Path, caption: &str)
        -> Result<MessageRef>;

    async fn send_inline_keyboard(
        &self,
        chat_id: ChatId,
        html: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}

/// Map a dispatch `Reply` onto the messenger surface.
///
/// Used by both the Telegram runtime and the daily scheduler so attachments
/// and keyboards behave the same on every path.
pub async fn deliver(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    reply: &Reply,
) -> Result<()> {
    if let Some(path) = &reply.video {
        // Uploads can take a moment; the action is best-effort.
        let _ = messenger
            .send_chat_action(chat_id, ChatAction::UploadVideo)
            .await;
        messenger.send_video(chat_id, path, &reply.html).await?;
        return Ok(());
    }

    if !reply.buttons.is_empty() {
        messenger
            .send_inline_keyboard(chat_id, &reply.html, InlineKeyboard::new(reply.buttons.clone()))
            .await?;
        return Ok(());
    }

    messenger.send_html(chat_id, &reply.html).await?;
    Ok(())
}
