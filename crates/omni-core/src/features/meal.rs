//! Dinner suggestions from the built-in recipe set.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::{
    dispatch::{CommandInput, DispatchContext, Feature, Reply},
    formatting::{bullet_list, escape_html},
    Result,
};

use super::meal_data::{Recipe, RECIPES};

/// Callback data for the "Another" button; the runtime re-dispatches the
/// suggestion with fresh input when it is tapped.
pub const CALLBACK_NEXT: &str = "meal:next";

const SHOWN_INGREDIENTS: usize = 5;

pub struct MealFeature;

#[async_trait]
impl Feature for MealFeature {
    async fn handle(&self, input: &CommandInput, ctx: &DispatchContext) -> Result<Reply> {
        let idx = if ctx.cfg.mode.is_mock() {
            // Mock replies must be a deterministic function of the input.
            deterministic_index(&input.args, RECIPES.len())
        } else {
            clock_index(RECIPES.len())
        };

        Ok(suggestion_reply(&RECIPES[idx]))
    }
}

fn suggestion_reply(recipe: &Recipe) -> Reply {
    let ingredients = bullet_list(recipe.ingredients.iter().copied().take(SHOWN_INGREDIENTS));
    let html = format!(
        "🍽️ <b>{}</b> ({})\n⏱️ {} min | 💰 €{}\n\n<i>{}</i>\n\n<b>Ingredients:</b>\n{}...",
        escape_html(recipe.name),
        escape_html(recipe.cuisine),
        recipe.time_min,
        recipe.cost_eur,
        escape_html(recipe.description),
        ingredients,
    );
    Reply::html(html).with_button("🔄 Another", CALLBACK_NEXT)
}

/// Stable pick: SHA-256 of the input text reduced modulo the set size.
fn deterministic_index(input: &str, len: usize) -> usize {
    let digest = Sha256::digest(input.trim().to_lowercase().as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % len as u64) as usize
}

/// Time-seeded pick for live mode, where variety beats reproducibility.
fn clock_index(len: usize) -> usize {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as u64;
    (nanos % len as u64) as usize
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::{test_config, Mode},
        domain::{ChatId, UserId},
    };

    fn ctx(mode: Mode) -> DispatchContext {
        DispatchContext {
            cfg: Arc::new(test_config(mode)),
            chat_id: ChatId(1),
            user_id: UserId(1),
        }
    }

    #[tokio::test]
    async fn mock_suggestion_is_idempotent() {
        let feature = MealFeature;
        let input = CommandInput::text("daily");

        let a = feature.handle(&input, &ctx(Mode::Mock)).await.unwrap();
        let b = feature.handle(&input, &ctx(Mode::Mock)).await.unwrap();
        assert_eq!(a.html, b.html);
        assert!(a.ok);
    }

    #[tokio::test]
    async fn mock_suggestion_is_from_the_fixed_set() {
        let feature = MealFeature;
        let reply = feature
            .handle(&CommandInput::default(), &ctx(Mode::Mock))
            .await
            .unwrap();

        assert!(RECIPES.iter().any(|r| reply.html.contains(r.name)));
        assert!(!reply.html.is_empty());
    }

    #[tokio::test]
    async fn different_inputs_can_rotate_the_pick() {
        let feature = MealFeature;
        let mut seen = std::collections::HashSet::new();
        for args in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            let reply = feature
                .handle(&CommandInput::text(args), &ctx(Mode::Mock))
                .await
                .unwrap();
            seen.insert(reply.html);
        }
        assert!(seen.len() > 1, "hash pick should not collapse to one recipe");
    }

    #[tokio::test]
    async fn suggestion_has_another_button() {
        let feature = MealFeature;
        let reply = feature
            .handle(&CommandInput::default(), &ctx(Mode::Mock))
            .await
            .unwrap();
        assert_eq!(reply.buttons.len(), 1);
        assert_eq!(reply.buttons[0].data, CALLBACK_NEXT);
    }

    #[test]
    fn deterministic_index_stays_in_range() {
        for input in ["", "x", "a longer input string"] {
            assert!(deterministic_index(input, RECIPES.len()) < RECIPES.len());
        }
    }
}
