//! AI video generation.
//!
//! Mock mode replies with a deterministic acknowledgment and never touches
//! the render port; live mode performs exactly one call through it and maps
//! any failure onto a polite reply.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    dispatch::{CommandInput, DispatchContext, Feature, Reply},
    formatting::escape_html,
    render::{RenderApi, RenderRequest},
    Result,
};

/// Template prompts selectable as `/video <name>`.
const TEMPLATES: &[(&str, &str)] = &[
    (
        "dance",
        "Professional dance video, smooth movements, energetic atmosphere",
    ),
    (
        "walk",
        "Cinematic walking shot, natural lighting, urban environment",
    ),
    (
        "nature",
        "Nature documentary style, breathtaking landscapes, peaceful",
    ),
    (
        "action",
        "Action movie style, dynamic camera movements, intense atmosphere",
    ),
    (
        "fashion",
        "Fashion runway walk, studio lighting, high-end aesthetic",
    ),
    (
        "travel",
        "Travel vlog style, adventure, exploration, scenic locations",
    ),
    (
        "celebration",
        "Celebration party, joyful moments, festive atmosphere",
    ),
    (
        "workout",
        "Fitness workout video, dynamic energy, gym environment",
    ),
];

pub struct VideoFeature {
    render: Arc<dyn RenderApi>,
}

impl VideoFeature {
    pub fn new(render: Arc<dyn RenderApi>) -> Self {
        Self { render }
    }
}

#[async_trait]
impl Feature for VideoFeature {
    async fn handle(&self, input: &CommandInput, ctx: &DispatchContext) -> Result<Reply> {
        let args = input.args.trim();
        if args.is_empty() && input.photo_file_ids.is_empty() {
            return Ok(usage_reply());
        }

        let prompt = resolve_prompt(args);

        if ctx.cfg.mode.is_mock() {
            return Ok(mock_reply(&prompt, input.photo_file_ids.len(), &ctx.cfg.cutover_note));
        }

        let request = RenderRequest {
            prompt,
            reference_images: input.photo_file_ids.clone(),
        };

        match self.render.generate(request).await {
            Ok(outcome) => {
                tracing::info!(job_id = %outcome.job_id, "render completed");
                Ok(Reply::html(format!(
                    "🎥 <b>Video ready</b>\nJob: <code>{}</code>",
                    escape_html(&outcome.job_id)
                ))
                .with_video(outcome.video_path))
            }
            Err(e) => {
                tracing::warn!(error = %e, "render failed");
                Ok(Reply::failure(
                    "😔 Sorry, video generation didn't work out this time. \
                     Please try again in a few minutes.",
                ))
            }
        }
    }
}

/// `/video dance` picks the template; anything else is a free-text prompt.
fn resolve_prompt(args: &str) -> String {
    let key = args.to_lowercase();
    for (name, template) in TEMPLATES {
        if *name == key {
            return template.to_string();
        }
    }
    if args.is_empty() {
        // Photos without a prompt still render; give the service something.
        return "Cinematic video from the attached photos".to_string();
    }
    args.to_string()
}

fn usage_reply() -> Reply {
    let templates = TEMPLATES
        .iter()
        .map(|(name, _)| format!("<code>{name}</code>"))
        .collect::<Vec<_>>()
        .join(", ");
    Reply::html(format!(
        "🎥 <b>Video Generation</b>\n\n\
         Send <code>/video &lt;prompt&gt;</code> with up to 4 photos attached.\n\
         Templates: {templates}"
    ))
}

fn mock_reply(prompt: &str, photo_count: usize, cutover_note: &str) -> Reply {
    Reply::html(format!(
        "🎬 <b>Render request received</b> (mock mode)\n\n\
         Prompt: <i>{}</i>\n\
         Reference photos: {}\n\n\
         A real render will run after {}.",
        escape_html(prompt),
        photo_count,
        escape_html(cutover_note),
    ))
}

#[cfg(test)]
mod tests {
    use std::{
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{
        config::{test_config, Mode},
        domain::{ChatId, UserId},
        errors::Error,
        render::RenderOutcome,
    };

    /// Counts calls; succeeds or fails on demand.
    struct SpyRender {
        calls: AtomicUsize,
        fail_with: Option<String>,
    }

    impl SpyRender {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(msg.to_string()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderApi for SpyRender {
        async fn generate(&self, _req: RenderRequest) -> Result<RenderOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(msg) => Err(Error::ExternalCall(msg.clone())),
                None => Ok(RenderOutcome {
                    job_id: "job-1".to_string(),
                    video_path: PathBuf::from("/tmp/job-1.mp4"),
                }),
            }
        }
    }

    fn ctx(mode: Mode) -> DispatchContext {
        DispatchContext {
            cfg: Arc::new(test_config(mode)),
            chat_id: ChatId(1),
            user_id: UserId(1),
        }
    }

    fn input_with_photo(args: &str) -> CommandInput {
        CommandInput {
            args: args.to_string(),
            photo_file_ids: vec!["photo-file-id".to_string()],
        }
    }

    #[tokio::test]
    async fn mock_mode_never_calls_the_render_port() {
        let spy = SpyRender::ok();
        let feature = VideoFeature::new(spy.clone());

        let reply = feature
            .handle(&input_with_photo("dance"), &ctx(Mode::Mock))
            .await
            .unwrap();

        assert_eq!(spy.calls(), 0);
        assert!(reply.ok);
        assert!(reply.html.contains("mock mode"));
        assert!(reply.html.contains("Feb 24"));
    }

    #[tokio::test]
    async fn mock_reply_is_idempotent() {
        let feature = VideoFeature::new(SpyRender::ok());
        let input = input_with_photo("nature");

        let a = feature.handle(&input, &ctx(Mode::Mock)).await.unwrap();
        let b = feature.handle(&input, &ctx(Mode::Mock)).await.unwrap();
        assert_eq!(a.html, b.html);
    }

    #[tokio::test]
    async fn live_mode_makes_exactly_one_call_and_attaches_video() {
        let spy = SpyRender::ok();
        let feature = VideoFeature::new(spy.clone());

        let reply = feature
            .handle(&input_with_photo("a custom prompt"), &ctx(Mode::Live))
            .await
            .unwrap();

        assert_eq!(spy.calls(), 1);
        assert!(reply.ok);
        assert_eq!(reply.video, Some(PathBuf::from("/tmp/job-1.mp4")));
    }

    #[tokio::test]
    async fn live_failure_becomes_polite_reply() {
        let spy = SpyRender::failing("render timed out after 300s");
        let feature = VideoFeature::new(spy.clone());

        let reply = feature
            .handle(&input_with_photo("dance"), &ctx(Mode::Live))
            .await
            .unwrap();

        assert_eq!(spy.calls(), 1);
        assert!(!reply.ok);
        assert!(!reply.html.contains("timed out"), "no raw error leakage");
        assert!(!reply.html.is_empty());
    }

    #[tokio::test]
    async fn empty_input_gets_usage_text() {
        let feature = VideoFeature::new(SpyRender::ok());
        let reply = feature
            .handle(&CommandInput::default(), &ctx(Mode::Mock))
            .await
            .unwrap();
        assert!(reply.html.contains("/video"));
        assert!(reply.html.contains("dance"));
    }

    #[test]
    fn template_lookup_falls_back_to_free_text() {
        assert!(resolve_prompt("dance").contains("Professional dance"));
        assert!(resolve_prompt("DANCE").contains("Professional dance"));
        assert_eq!(resolve_prompt("my own idea"), "my own idea");
    }
}
