//! Strategy placeholders: memory, calendar, and trading status replies.

use async_trait::async_trait;

use crate::{
    dispatch::{CommandInput, DispatchContext, Feature, Reply},
    Result,
};

pub struct MemoryFeature;

#[async_trait]
impl Feature for MemoryFeature {
    async fn handle(&self, _input: &CommandInput, _ctx: &DispatchContext) -> Result<Reply> {
        Ok(Reply::html(
            "🧠 <b>Memory Management</b>\n\n\
             Long-term memory storage\n\n\
             <b>Features:</b>\n\
             • Weekly compression: Auto-summarize old memories\n\
             • Key facts extraction: Important info never lost\n\
             • Semantic search: Find anything instantly\n\n\
             <b>Status:</b> ✅ Active\n\
             Daily maintenance at 3 AM"
                .to_string(),
        ))
    }
}

pub struct CalendarFeature;

#[async_trait]
impl Feature for CalendarFeature {
    async fn handle(&self, _input: &CommandInput, _ctx: &DispatchContext) -> Result<Reply> {
        Ok(Reply::html(
            "📅 <b>Calendar &amp; Email Automation</b>\n\n\
             <b>Features:</b>\n\
             • Smart scheduling: High energy = hard tasks\n\
             • Auto-decline: Conflicting invites\n\
             • Email triage: Urgent/important/bulk auto-sort\n\n\
             <b>Status:</b> 🔄 In development\n\
             Connect Google Calendar to activate"
                .to_string(),
        ))
    }
}

pub struct TradeFeature;

#[async_trait]
impl Feature for TradeFeature {
    async fn handle(&self, _input: &CommandInput, _ctx: &DispatchContext) -> Result<Reply> {
        Ok(Reply::html(
            "📈 <b>Prediction Market Bot</b>\n\n\
             <b>Safety Limits:</b>\n\
             • Max 5% per trade\n\
             • Daily loss limit: €50\n\
             • Manual approval &gt;€100\n\n\
             <b>Status:</b> 🔄 API integration pending\n\
             Risk management active"
                .to_string(),
        ))
    }
}
