//! Daily dinner suggestion timer.
//!
//! A single timer firing a single action: when `DAILY_SUGGESTION_TIME` is
//! configured, the bot dispatches the dinner suggestion once per day at that
//! local time and sends it to the first allowed user. Failures are logged and
//! the timer keeps running.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local, TimeZone};
use tokio::{task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    dispatch::{CommandInput, CommandRouter, DispatchContext},
    domain::{ChatId, UserId},
    messaging::{deliver, MessagingPort},
};

#[derive(Clone)]
pub struct DailySuggestion {
    cfg: Arc<Config>,
    router: Arc<CommandRouter>,
    messenger: Arc<dyn MessagingPort>,
    cancel: CancellationToken,
}

impl DailySuggestion {
    pub fn new(
        cfg: Arc<Config>,
        router: Arc<CommandRouter>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            cfg,
            router,
            messenger,
            cancel: CancellationToken::new(),
        }
    }

    /// Spawn the timer task. Returns `None` when no time is configured.
    pub fn spawn(&self) -> Option<JoinHandle<()>> {
        let (hour, minute) = self.cfg.daily_suggestion_time?;
        let this = self.clone();
        tracing::info!(hour, minute, "daily suggestion timer enabled");
        Some(tokio::spawn(async move {
            this.run_loop(hour, minute).await;
        }))
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    async fn run_loop(self, hour: u32, minute: u32) {
        loop {
            let Some(next) = next_occurrence(Local::now(), hour, minute) else {
                tracing::warn!(hour, minute, "no next occurrence, stopping daily timer");
                break;
            };
            let dur = (next - Local::now()).to_std().unwrap_or(Duration::ZERO);

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = sleep(dur) => self.fire().await,
            }
        }
    }

    async fn fire(&self) {
        let Some(&user_id) = self.cfg.telegram_allowed_users.first() else {
            return;
        };
        let chat_id = ChatId(user_id);

        let ctx = DispatchContext {
            cfg: self.cfg.clone(),
            chat_id,
            user_id: UserId(user_id),
        };
        let reply = self
            .router
            .dispatch("dinner", &CommandInput::text("daily suggestion"), &ctx)
            .await;

        match deliver(self.messenger.as_ref(), chat_id, &reply).await {
            Ok(()) => tracing::info!("daily suggestion sent"),
            Err(e) => tracing::warn!(error = %e, "daily suggestion delivery failed"),
        }
    }
}

/// Next wall-clock occurrence of `hour:minute` strictly after `now`.
///
/// Scans a few days forward so a DST gap at the target time skips to the next
/// valid day instead of erroring.
pub fn next_occurrence(
    now: DateTime<Local>,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Local>> {
    for day_offset in 0..3 {
        let date = now.date_naive() + chrono::Duration::days(day_offset);
        let naive = date.and_hms_opt(hour, minute, 0)?;
        if let Some(t) = Local.from_local_datetime(&naive).earliest() {
            if t > now {
                return Some(t);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn next_occurrence_is_today_when_time_is_ahead() {
        let now = Local.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let next = next_occurrence(now, 18, 30).unwrap();
        assert_eq!(next.date_naive(), now.date_naive());
        assert_eq!((next.hour(), next.minute()), (18, 30));
    }

    #[test]
    fn next_occurrence_rolls_to_tomorrow_when_time_has_passed() {
        let now = Local.with_ymd_and_hms(2026, 3, 2, 19, 0, 0).unwrap();
        let next = next_occurrence(now, 18, 30).unwrap();
        assert_eq!(
            next.date_naive(),
            now.date_naive() + chrono::Duration::days(1)
        );
    }

    #[test]
    fn next_occurrence_is_strictly_in_the_future_at_the_exact_minute() {
        let now = Local.with_ymd_and_hms(2026, 3, 2, 18, 30, 0).unwrap();
        let next = next_occurrence(now, 18, 30).unwrap();
        assert!(next > now);
    }
}
