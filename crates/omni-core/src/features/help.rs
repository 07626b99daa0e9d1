//! Welcome / help overview.

use async_trait::async_trait;

use crate::{
    dispatch::{CommandInput, DispatchContext, Feature, Reply},
    Result,
};

pub struct HelpFeature;

#[async_trait]
impl Feature for HelpFeature {
    async fn handle(&self, _input: &CommandInput, ctx: &DispatchContext) -> Result<Reply> {
        let mode = if ctx.cfg.mode.is_mock() {
            "mock (no external calls)"
        } else {
            "live"
        };

        Ok(Reply::html(format!(
            "⚡ <b>Omni Bot</b>\n\n\
             Your personal assistant. Mode: {mode}\n\n\
             🎥 /video - AI video generation\n\
             🍳 /dinner - Dinner suggestions\n\
             💰 /money - Track income &amp; wealth\n\
             💰 /income - Log income entry\n\
             📊 /leads - Lead generation\n\
             🧠 /memory - Memory system\n\
             📅 /calendar - Smart scheduling\n\
             📈 /trade - Prediction market bot\n\n\
             Type /help to see this list again."
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::{test_config, Mode},
        domain::{ChatId, UserId},
    };

    #[tokio::test]
    async fn help_mentions_every_feature_command() {
        let ctx = DispatchContext {
            cfg: Arc::new(test_config(Mode::Mock)),
            chat_id: ChatId(1),
            user_id: UserId(1),
        };
        let reply = HelpFeature
            .handle(&CommandInput::default(), &ctx)
            .await
            .unwrap();

        for cmd in ["/video", "/dinner", "/money", "/income", "/leads"] {
            assert!(reply.html.contains(cmd), "missing {cmd}");
        }
        assert!(reply.html.contains("mock"));
    }
}
