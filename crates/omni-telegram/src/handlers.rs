//! Telegram update handlers.
//!
//! Each update goes through the same gauntlet: allow-list auth, per-user rate
//! limit, command extraction, core dispatch, delivery, audit.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use omni_core::{
    audit::AuditEvent,
    auth::is_authorized,
    dispatch::{CommandInput, DispatchContext},
    domain::{ChatId as CoreChatId, UserId},
    features::meal,
    messaging::{deliver, ChatAction},
};

use crate::router::AppState;

/// Split `/cmd@botname arg1 ...` into (command, args).
fn parse_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// The largest size of an attached photo, if any.
fn photo_file_ids(msg: &Message) -> Vec<String> {
    msg.photo()
        .and_then(|sizes| sizes.last())
        .map(|p| vec![p.file.id.clone()])
        .unwrap_or_default()
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    let user_id = user.id.0 as i64;
    let username = user
        .username
        .clone()
        .unwrap_or_else(|| "unknown".to_string());
    let chat_id = CoreChatId(msg.chat.id.0);

    if !is_authorized(Some(UserId(user_id)), &state.cfg.telegram_allowed_users) {
        let _ = state.audit.write(AuditEvent::auth(user_id, &username, false));
        let _ = bot
            .send_message(msg.chat.id, "Unauthorized. Contact the bot owner for access.")
            .await;
        return Ok(());
    }

    // The command token may arrive as message text or as a photo caption.
    let text = msg.text().or_else(|| msg.caption()).unwrap_or("").to_string();
    if !text.trim_start().starts_with('/') {
        if !text.trim().is_empty() || msg.photo().is_some() {
            let _ = state
                .messenger
                .send_html(chat_id, "Send a command to get started — see /help.")
                .await;
        }
        return Ok(());
    }

    {
        let mut limiter = state.rate_limiter.lock().await;
        let (allowed, retry_after) = limiter.check(UserId(user_id));
        if !allowed {
            let secs = retry_after.map(|d| d.as_secs().max(1)).unwrap_or(1);
            let _ = state
                .audit
                .write(AuditEvent::rate_limit(user_id, &username, secs as f64));
            let _ = bot
                .send_message(
                    msg.chat.id,
                    format!("⏳ Rate limit exceeded. Try again in {secs}s."),
                )
                .await;
            return Ok(());
        }
    }

    let (cmd, args) = parse_command(&text);
    let input = CommandInput {
        args,
        photo_file_ids: photo_file_ids(&msg),
    };
    let ctx = DispatchContext {
        cfg: state.cfg.clone(),
        chat_id,
        user_id: UserId(user_id),
    };

    let _ = state
        .messenger
        .send_chat_action(chat_id, ChatAction::Typing)
        .await;

    let reply = state.router.dispatch(&cmd, &input, &ctx).await;

    let _ = state.audit.write(AuditEvent::dispatch(
        user_id, &username, &cmd, &input.args, &reply.html, reply.ok,
    ));

    if let Err(e) = deliver(state.messenger.as_ref(), chat_id, &reply).await {
        tracing::warn!(error = %e, command = %cmd, "reply delivery failed");
        let _ = state
            .audit
            .write(AuditEvent::error(user_id, &username, &format!("{e}")));
    }

    Ok(())
}

pub async fn handle_callback(
    _bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let cb_id = q.id.clone();
    let user = q.from.clone();
    let chat = q.message.as_ref().map(|m| m.chat.id.0);
    let data = q.data.clone().unwrap_or_default();

    let Some(chat) = chat else {
        let _ = state.messenger.answer_callback_query(&cb_id, None).await;
        return Ok(());
    };
    let chat_id = CoreChatId(chat);
    let user_id = user.id.0 as i64;
    let username = user
        .username
        .clone()
        .unwrap_or_else(|| "unknown".to_string());

    if !is_authorized(Some(UserId(user_id)), &state.cfg.telegram_allowed_users) {
        let _ = state
            .messenger
            .answer_callback_query(&cb_id, Some("Unauthorized"))
            .await;
        return Ok(());
    }

    if data == meal::CALLBACK_NEXT {
        let _ = state.messenger.answer_callback_query(&cb_id, None).await;

        // Key the re-dispatch by the unique callback id so the pick rotates
        // even though mock replies are deterministic per input.
        let input = CommandInput::text(cb_id);
        let ctx = DispatchContext {
            cfg: state.cfg.clone(),
            chat_id,
            user_id: UserId(user_id),
        };
        let reply = state.router.dispatch("dinner", &input, &ctx).await;

        let _ = state.audit.write(AuditEvent::dispatch(
            user_id, &username, "dinner", &input.args, &reply.html, reply.ok,
        ));
        if let Err(e) = deliver(state.messenger.as_ref(), chat_id, &reply).await {
            tracing::warn!(error = %e, "callback reply delivery failed");
        }
        return Ok(());
    }

    let _ = state.messenger.answer_callback_query(&cb_id, None).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_strips_slash_and_botname() {
        assert_eq!(
            parse_command("/video@omni_bot dance party"),
            ("video".to_string(), "dance party".to_string())
        );
        assert_eq!(parse_command("/DINNER"), ("dinner".to_string(), String::new()));
        assert_eq!(
            parse_command("  /income personal | 100 | 0 | x "),
            (
                "income".to_string(),
                "personal | 100 | 0 | x".to_string()
            )
        );
    }
}
