//! Polling runtime: application state + teloxide dispatcher wiring.

use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::Mutex;

use omni_core::{
    audit::AuditLogger, auth::RateLimiter, config::Config, dispatch::CommandRouter,
    messaging::MessagingPort, scheduler::DailySuggestion,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub router: Arc<CommandRouter>,
    pub messenger: Arc<dyn MessagingPort>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
    pub audit: Arc<AuditLogger>,
}

pub async fn run_polling(cfg: Arc<Config>, router: Arc<CommandRouter>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    if let Ok(me) = bot.get_me().await {
        tracing::info!(username = %me.username(), mode = ?cfg.mode, "bot started");
    }
    tracing::info!(
        allowed_users = cfg.telegram_allowed_users.len(),
        commands = router.commands().len(),
        "dispatch table ready"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    let daily = DailySuggestion::new(cfg.clone(), router.clone(), messenger.clone());
    let daily_task = daily.spawn();

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        router,
        messenger,
        rate_limiter: Arc::new(Mutex::new(RateLimiter::new(
            cfg.rate_limit_enabled,
            cfg.rate_limit_requests,
            cfg.rate_limit_window,
        ))),
        audit: Arc::new(AuditLogger::new(
            cfg.audit_log_path.clone(),
            cfg.audit_log_json,
        )),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    daily.stop();
    if let Some(task) = daily_task {
        task.abort();
    }

    Ok(())
}
