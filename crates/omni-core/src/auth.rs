//! Authorization + per-user rate limiting.

use std::{
    collections::{HashMap, VecDeque},
    time::{Duration, Instant},
};

use crate::domain::UserId;

// ============== Authorization ==============

/// Allow-list check for the admin identities permitted to use the bot.
pub fn is_authorized(user_id: Option<UserId>, allowed_users: &[i64]) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    if allowed_users.is_empty() {
        return false;
    }
    allowed_users.contains(&user_id.0)
}

// ============== Rate Limiter (sliding window) ==============

/// Per-user sliding-window rate limiter.
///
/// Keeps the timestamps of the last `max_requests` accepted requests per user
/// and denies a request while the window is full, reporting how long until
/// the oldest entry expires.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    enabled: bool,
    max_requests: usize,
    window: Duration,
    hits: HashMap<UserId, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(enabled: bool, max_requests: u32, window: Duration) -> Self {
        Self {
            enabled,
            max_requests: max_requests.max(1) as usize,
            window,
            hits: HashMap::new(),
        }
    }

    /// Returns (allowed, retry_after).
    pub fn check(&mut self, user_id: UserId) -> (bool, Option<Duration>) {
        self.check_at(user_id, Instant::now())
    }

    pub fn check_at(&mut self, user_id: UserId, now: Instant) -> (bool, Option<Duration>) {
        if !self.enabled {
            return (true, None);
        }

        let hits = self.hits.entry(user_id).or_default();
        while hits
            .front()
            .map(|t| now.duration_since(*t) >= self.window)
            .unwrap_or(false)
        {
            hits.pop_front();
        }

        if hits.len() < self.max_requests {
            hits.push_back(now);
            return (true, None);
        }

        let Some(&oldest) = hits.front() else {
            // max_requests >= 1, so a full window is never empty.
            hits.push_back(now);
            return (true, None);
        };
        let retry_after = self.window.saturating_sub(now.duration_since(oldest));
        (false, Some(retry_after))
    }
}
