//! Lead generation placeholder.

use async_trait::async_trait;

use crate::{
    dispatch::{CommandInput, DispatchContext, Feature, Reply},
    Result,
};

pub struct LeadsFeature;

#[async_trait]
impl Feature for LeadsFeature {
    async fn handle(&self, _input: &CommandInput, _ctx: &DispatchContext) -> Result<Reply> {
        Ok(Reply::html(
            "📊 <b>Lead Generation</b>\n\n\
             This feature will help you find leads from:\n\
             • LinkedIn\n\
             • Google Maps\n\
             • Industry directories\n\n\
             <i>Coming soon...</i>\n\n\
             For now, use the full LeadForge platform."
                .to_string(),
        ))
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
    async fn reply_lists_lead_sources() {
        let ctx = DispatchContext {
            cfg: Arc::new(test_config(Mode::Mock)),
            chat_id: ChatId(1),
            user_id: UserId(1),
        };
        let reply = LeadsFeature
            .handle(&CommandInput::default(), &ctx)
            .await
            .unwrap();
        assert!(reply.ok);
        assert!(reply.html.contains("LinkedIn"));
    }
}
