use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Operating mode, resolved once at startup and immutable afterwards.
///
/// Mock is the fail-safe default: an absent or unparseable flag never turns
/// on real outbound calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Mock,
    Live,
}

impl Mode {
    /// Resolve the mode from the boolean-like `MOCK_MODE` flag.
    ///
    /// Only an explicit falsy value ("0", "false", "no", "off") goes live;
    /// anything else, including garbage and absence, stays mock.
    pub fn from_flag(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()) {
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Mode::Live,
            _ => Mode::Mock,
        }
    }

    pub fn is_mock(self) -> bool {
        self == Mode::Mock
    }
}

/// Typed configuration for the bot, loaded once at process start.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub telegram_allowed_users: Vec<i64>,
    pub mode: Mode,

    // Seedance render API
    pub seedance_api_key: Option<String>,
    pub seedance_api_url: String,
    pub video_storage_dir: PathBuf,
    pub generation_deadline: Duration,
    pub status_poll_interval: Duration,
    pub request_timeout: Duration,

    // Features
    pub monthly_income_target: f64,
    pub cutover_note: String,
    pub daily_suggestion_time: Option<(u32, u32)>,

    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window: Duration,

    // Audit
    pub audit_log_path: PathBuf,
    pub audit_log_json: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        let telegram_allowed_users = parse_csv_i64(env_str("TELEGRAM_ALLOWED_USERS"));

        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }
        if telegram_allowed_users.is_empty() {
            return Err(Error::Config(
                "TELEGRAM_ALLOWED_USERS environment variable is required".to_string(),
            ));
        }

        let mode = Mode::from_flag(env_str("MOCK_MODE").as_deref());

        // Seedance render API
        let seedance_api_key = env_str("SEEDANCE_API_KEY").and_then(non_empty);
        let seedance_api_url = env_str("SEEDANCE_API_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| "https://api.seedance.example.com/v1".to_string());
        let video_storage_dir =
            PathBuf::from(env_str("VIDEO_STORAGE_PATH").unwrap_or("./videos".to_string()));
        let generation_deadline =
            Duration::from_secs(env_u64("GENERATION_TIMEOUT").unwrap_or(300));
        let status_poll_interval =
            Duration::from_secs(env_u64("STATUS_UPDATE_INTERVAL").unwrap_or(5));
        let request_timeout = Duration::from_secs(env_u64("REQUEST_TIMEOUT").unwrap_or(30));

        // Ensure the video storage dir exists so live renders have a landing spot.
        fs::create_dir_all(&video_storage_dir)?;

        // Features
        let monthly_income_target = env_f64("MONTHLY_INCOME_TARGET").unwrap_or(5363.0);
        let cutover_note = env_str("RENDER_CUTOVER_NOTE")
            .and_then(non_empty)
            .unwrap_or_else(|| "the live cutover (Feb 24)".to_string());
        let daily_suggestion_time =
            env_str("DAILY_SUGGESTION_TIME").and_then(|s| parse_hh_mm(&s));

        // Rate limiting
        let rate_limit_enabled = env_bool("RATE_LIMIT_ENABLED").unwrap_or(true);
        let rate_limit_requests = env_u32("RATE_LIMIT_REQUESTS").unwrap_or(20);
        let rate_limit_window = Duration::from_secs(env_u64("RATE_LIMIT_WINDOW").unwrap_or(60));

        // Audit logging
        let audit_log_path = PathBuf::from(
            env_str("AUDIT_LOG_PATH").unwrap_or("/tmp/omni-bot-audit.log".to_string()),
        );
        let audit_log_json = env_bool("AUDIT_LOG_JSON").unwrap_or(false);

        Ok(Self {
            telegram_bot_token,
            telegram_allowed_users,
            mode,
            seedance_api_key,
            seedance_api_url,
            video_storage_dir,
            generation_deadline,
            status_poll_interval,
            request_timeout,
            monthly_income_target,
            cutover_note,
            daily_suggestion_time,
            rate_limit_enabled,
            rate_limit_requests,
            rate_limit_window,
            audit_log_path,
            audit_log_json,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

/// Parse "HH:MM" into (hour, minute); out-of-range values are rejected.
fn parse_hh_mm(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.trim().split_once(':')?;
    let hour = h.trim().parse::<u32>().ok()?;
    let minute = m.trim().parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn env_f64(key: &str) -> Option<f64> {
    env_str(key).and_then(|s| s.trim().parse::<f64>().ok())
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A fully populated config for unit tests across the crate.
#[cfg(test)]
pub(crate) fn test_config(mode: Mode) -> Config {
    Config {
        telegram_bot_token: "token".to_string(),
        telegram_allowed_users: vec![1],
        mode,
        seedance_api_key: None,
        seedance_api_url: "https://api.seedance.example.com/v1".to_string(),
        video_storage_dir: PathBuf::from("/tmp"),
        generation_deadline: Duration::from_secs(300),
        status_poll_interval: Duration::from_secs(5),
        request_timeout: Duration::from_secs(30),
        monthly_income_target: 5363.0,
        cutover_note: "the live cutover (Feb 24)".to_string(),
        daily_suggestion_time: None,
        rate_limit_enabled: true,
        rate_limit_requests: 20,
        rate_limit_window: Duration::from_secs(60),
        audit_log_path: PathBuf::from("/tmp/omni-audit-test.log"),
        audit_log_json: true,
    }
}
