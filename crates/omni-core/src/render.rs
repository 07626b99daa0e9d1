//! Outbound render integration port.
//!
//! Live-mode handlers perform exactly one call through this port per command.
//! There is no mock behavior here: mock-mode handlers branch before reaching
//! it, so an implementation only ever performs real calls.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::Result;

/// One render job submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    pub prompt: String,
    /// Opaque reference-image ids forwarded to the render service.
    pub reference_images: Vec<String>,
}

/// A completed render: the remote job id and the downloaded video.
#[derive(Clone, Debug)]
pub struct RenderOutcome {
    pub job_id: String,
    pub video_path: PathBuf,
}

/// Port to the third-party rendering API.
///
/// Implementations must bound the whole call with a deadline and surface any
/// failure (timeout, HTTP error, rejected job) as `Error::ExternalCall` so
/// the owning handler can produce a user-facing message instead of crashing
/// the session.
#[async_trait]
pub trait RenderApi: Send + Sync {
    async fn generate(&self, req: RenderRequest) -> Result<RenderOutcome>;
}
