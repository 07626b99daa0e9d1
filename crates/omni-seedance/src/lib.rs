//! Seedance render adapter.
//!
//! Implements the core `RenderApi` port against the Seedance HTTP API:
//! submit a generation job, poll its status until the configured deadline,
//! then download the finished video into the storage directory. This adapter
//! performs real calls only; mock-mode handlers never construct a request.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::time::sleep;

use omni_core::{
    config::Config,
    errors::Error,
    render::{RenderApi, RenderOutcome, RenderRequest},
    Result,
};

#[derive(Clone, Debug)]
pub struct SeedanceClient {
    api_key: Option<String>,
    api_url: String,
    storage_dir: PathBuf,
    poll_interval: Duration,
    deadline: Duration,
    http: reqwest::Client,
}

enum JobStatus {
    Pending,
    Completed { video_url: String },
    Failed { error: String },
}

impl SeedanceClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|e| Error::External(format!("http client build: {e}")))?;

        Ok(Self {
            api_key: cfg.seedance_api_key.clone(),
            api_url: cfg.seedance_api_url.trim_end_matches('/').to_string(),
            storage_dir: cfg.video_storage_dir.clone(),
            poll_interval: cfg.status_poll_interval,
            deadline: cfg.generation_deadline,
            http,
        })
    }

    async fn submit(&self, api_key: &str, req: &RenderRequest) -> Result<String> {
        let body = serde_json::json!({
            "prompt": req.prompt,
            "reference_images": req.reference_images,
            "options": { "duration": 5, "resolution": "1080p" },
        });

        let resp = self
            .http
            .post(format!("{}/generate", self.api_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ExternalCall(format!("seedance request error: {e}")))?;

        let v = read_json(resp, "job submission").await?;
        job_id_from_response(&v)
    }

    async fn poll(&self, api_key: &str, job_id: &str) -> Result<JobStatus> {
        let resp = self
            .http
            .get(format!("{}/jobs/{job_id}", self.api_url))
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| Error::ExternalCall(format!("seedance request error: {e}")))?;

        let v = read_json(resp, "job status").await?;
        Ok(parse_job_status(&v))
    }

    async fn download(&self, job_id: &str, video_url: &str) -> Result<PathBuf> {
        let resp = self
            .http
            .get(video_url)
            .send()
            .await
            .map_err(|e| Error::ExternalCall(format!("video download error: {e}")))?;

        if !resp.status().is_success() {
            return Err(http_error("video download", resp).await);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::ExternalCall(format!("video download error: {e}")))?;

        tokio::fs::create_dir_all(&self.storage_dir).await?;
        let path = self.storage_dir.join(video_file_name(job_id));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }
}

#[async_trait]
impl RenderApi for SeedanceClient {
    async fn generate(&self, req: RenderRequest) -> Result<RenderOutcome> {
        let Some(api_key) = self.api_key.clone() else {
            return Err(Error::ExternalCall(
                "Seedance API key not configured".to_string(),
            ));
        };

        let started = Instant::now();
        let job_id = self.submit(&api_key, &req).await?;
        tracing::info!(job_id = %job_id, "render job submitted");

        loop {
            if started.elapsed() >= self.deadline {
                return Err(Error::ExternalCall(format!(
                    "timed out after {}s waiting for render job {job_id}",
                    self.deadline.as_secs()
                )));
            }

            sleep(self.poll_interval).await;

            match self.poll(&api_key, &job_id).await? {
                JobStatus::Pending => {}
                JobStatus::Failed { error } => {
                    return Err(Error::ExternalCall(format!("render job failed: {error}")));
                }
                JobStatus::Completed { video_url } => {
                    let video_path = self.download(&job_id, &video_url).await?;
                    return Ok(RenderOutcome {
                        job_id,
                        video_path,
                    });
                }
            }
        }
    }
}

async fn read_json(resp: reqwest::Response, context: &str) -> Result<serde_json::Value> {
    if !resp.status().is_success() {
        return Err(http_error(context, resp).await);
    }
    resp.json()
        .await
        .map_err(|e| Error::ExternalCall(format!("seedance {context} json error: {e}")))
}

async fn http_error(context: &str, resp: reqwest::Response) -> Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Error::ExternalCall(format!(
        "seedance {context} failed: {status} {}",
        body.chars().take(200).collect::<String>()
    ))
}

fn job_id_from_response(v: &serde_json::Value) -> Result<String> {
    v.get("job_id")
        .and_then(|j| j.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::ExternalCall("seedance response missing job_id".to_string()))
}

fn parse_job_status(v: &serde_json::Value) -> JobStatus {
    match v.get("status").and_then(|s| s.as_str()).unwrap_or("pending") {
        "completed" => match v.get("video_url").and_then(|u| u.as_str()) {
            Some(url) => JobStatus::Completed {
                video_url: url.to_string(),
            },
            None => JobStatus::Failed {
                error: "completed without video_url".to_string(),
            },
        },
        "failed" => JobStatus::Failed {
            error: v
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
        },
        _ => JobStatus::Pending,
    }
}

fn video_file_name(job_id: &str) -> String {
    // Remote job ids are opaque; keep only filesystem-safe characters.
    let safe: String = job_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{safe}.mp4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_is_extracted_or_rejected() {
        let ok = serde_json::json!({"job_id": "abc123"});
        assert_eq!(job_id_from_response(&ok).unwrap(), "abc123");

        for bad in [
            serde_json::json!({}),
            serde_json::json!({"job_id": ""}),
            serde_json::json!({"job_id": 42}),
        ] {
            assert!(job_id_from_response(&bad).is_err());
        }
    }

    #[test]
    fn status_parsing_covers_the_contract() {
        let done = serde_json::json!({"status": "completed", "video_url": "https://x/v.mp4"});
        assert!(matches!(
            parse_job_status(&done),
            JobStatus::Completed { video_url } if video_url == "https://x/v.mp4"
        ));

        let failed = serde_json::json!({"status": "failed", "error": "no gpu"});
        assert!(matches!(
            parse_job_status(&failed),
            JobStatus::Failed { error } if error == "no gpu"
        ));

        // Completed without a URL is a failure, not a panic.
        let odd = serde_json::json!({"status": "completed"});
        assert!(matches!(parse_job_status(&odd), JobStatus::Failed { .. }));

        // Anything else keeps polling.
        assert!(matches!(
            parse_job_status(&serde_json::json!({"status": "queued"})),
            JobStatus::Pending
        ));
        assert!(matches!(
            parse_job_status(&serde_json::json!({})),
            JobStatus::Pending
        ));
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(video_file_name("job-1"), "job-1.mp4");
        assert_eq!(video_file_name("../etc/passwd"), "___etc_passwd.mp4");
    }

    fn keyless_config() -> Config {
        Config {
            telegram_bot_token: "token".to_string(),
            telegram_allowed_users: vec![1],
            mode: omni_core::config::Mode::Live,
            seedance_api_key: None,
            seedance_api_url: "https://api.seedance.example.com/v1/".to_string(),
            video_storage_dir: PathBuf::from("/tmp"),
            generation_deadline: Duration::from_secs(1),
            status_poll_interval: Duration::from_millis(10),
            request_timeout: Duration::from_secs(1),
            monthly_income_target: 5363.0,
            cutover_note: "the live cutover".to_string(),
            daily_suggestion_time: None,
            rate_limit_enabled: false,
            rate_limit_requests: 20,
            rate_limit_window: Duration::from_secs(60),
            audit_log_path: PathBuf::from("/tmp/omni-audit.log"),
            audit_log_json: true,
        }
    }

    #[test]
    fn trailing_slash_is_trimmed_from_api_url() {
        let client = SeedanceClient::from_config(&keyless_config()).unwrap();
        assert_eq!(client.api_url, "https://api.seedance.example.com/v1");
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let client = SeedanceClient::from_config(&keyless_config()).unwrap();
        let err = client
            .generate(RenderRequest {
                prompt: "x".to_string(),
                reference_images: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ExternalCall(msg) if msg.contains("API key")));
    }
}
