pub mod grounding;
pub mod intent;

pub use grounding::{build_grounding_prompt, DEFAULT_PROMPT_BUDGET};
pub use intent::{classify, Intent, TurnContext};

use crate::catalog::CatalogView;
use crate::llm::TextGenerator;
use crate::model::{ArtTool, ChatLog};

/// Fixed reply appended when the generative model call fails. The chat
/// session survives; the user can simply try again.
pub const MODEL_FAILURE_REPLY: &str = "❌ Lỗi khi gọi Gemini API.";

const MAX_SAMPLE_NAMES: usize = 5;

/// Per-turn dialogue logic: answer deterministically from local data when a
/// rule matches, otherwise ground the question in the catalog and favorites
/// and delegate to the generative model.
///
/// Stateless across turns apart from the caller-owned [`ChatLog`].
pub struct DialogueRouter<G> {
    generator: G,
    prompt_budget: usize,
}

impl<G: TextGenerator> DialogueRouter<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            prompt_budget: DEFAULT_PROMPT_BUDGET,
        }
    }

    pub fn with_prompt_budget(mut self, budget: usize) -> Self {
        self.prompt_budget = budget;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Process one user turn. Appends the user message and exactly one bot
    /// message to `log`; whitespace-only input is ignored entirely. No error
    /// escapes: every failure path degrades to a bot message.
    pub async fn handle_turn(
        &self,
        utterance: &str,
        catalog: CatalogView<'_>,
        favorites: &[ArtTool],
        log: &mut ChatLog,
    ) {
        let trimmed = utterance.trim();
        if trimmed.is_empty() {
            return;
        }
        log.push_user(trimmed);

        let ctx = TurnContext::new(trimmed, catalog, favorites);
        let reply = match classify(&ctx) {
            Intent::FavoritesCount => answer_count(favorites),
            Intent::FavoritesList => answer_list(favorites),
            Intent::FavoriteCheck(tool) => answer_membership(tool, favorites),
            Intent::ProductInfo(tool) => summarize_product(tool),
            Intent::CatalogUnavailable(message) => message.to_string(),
            Intent::OpenEnded => {
                let prompt = build_grounding_prompt(
                    catalog.products,
                    favorites,
                    trimmed,
                    self.prompt_budget,
                );
                match self.generator.generate(&prompt).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("model call failed: {e}");
                        MODEL_FAILURE_REPLY.to_string()
                    }
                }
            }
        };

        log.push_bot(reply);
    }
}

// ── deterministic answers ──────────────────────────────────────────────

fn answer_count(favorites: &[ArtTool]) -> String {
    let n = favorites.len();
    if n == 0 {
        return "You have 0 favorite art tools saved.".to_string();
    }

    let names: Vec<&str> = favorites
        .iter()
        .take(MAX_SAMPLE_NAMES)
        .map(|t| t.art_name.as_str())
        .collect();
    let suffix = if n > MAX_SAMPLE_NAMES {
        format!(" and {} more", n - MAX_SAMPLE_NAMES)
    } else {
        String::new()
    };
    let plural = if n == 1 { "" } else { "s" };

    format!(
        "You have {n} favorite art tool{plural} saved: {}{suffix}.",
        names.join(", ")
    )
}

fn answer_list(favorites: &[ArtTool]) -> String {
    if favorites.is_empty() {
        return "Your favorites list is empty. Tap the heart on a product to save it."
            .to_string();
    }

    let mut out = String::from("Here is everything you have saved:\n");
    for (i, tool) in favorites.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} (${:.2})\n",
            i + 1,
            tool.art_name,
            tool.price
        ));
    }
    out.trim_end().to_string()
}

fn answer_membership(tool: &ArtTool, favorites: &[ArtTool]) -> String {
    if favorites.iter().any(|f| f.id == tool.id) {
        format!("Yes, {} is in your favorites.", tool.art_name)
    } else {
        format!("No, {} is not in your favorites yet.", tool.art_name)
    }
}

fn summarize_product(tool: &ArtTool) -> String {
    let mut out = format!(
        "{} by {} costs ${:.2}.",
        tool.art_name, tool.brand, tool.price
    );

    if !tool.description.is_empty() {
        out.push(' ');
        out.push_str(tool.description.trim_end());
        if !out.ends_with(['.', '!', '?', ';']) {
            out.push('.');
        }
    }

    if tool.glass_surface {
        out.push_str(" It works on glass surfaces.");
    } else {
        out.push_str(" It is not suited for glass surfaces.");
    }

    if tool.has_deal() {
        out.push_str(&format!(
            " It is currently {}% off for a limited time.",
            tool.deal_percent()
        ));
    }

    if !tool.feedbacks.is_empty() {
        out.push_str(&format!(
            " Customers rate it {:.1}/5 across {} review{}.",
            tool.average_rating(),
            tool.feedbacks.len(),
            if tool.feedbacks.len() == 1 { "" } else { "s" }
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Feedback;

    fn tool(id: &str, name: &str, price: f64) -> ArtTool {
        ArtTool {
            id: id.into(),
            art_name: name.into(),
            price,
            description: String::new(),
            image: String::new(),
            brand: "Arteza".into(),
            limited_time_deal: 0.0,
            glass_surface: false,
            feedbacks: Vec::new(),
        }
    }

    #[test]
    fn count_answer_includes_literal_count_and_samples() {
        let favorites = vec![tool("1", "3D Fabric Paint, Glow in the Dark A402", 5.0)];
        let answer = answer_count(&favorites);
        assert!(answer.contains('1'));
        assert!(answer.contains("3D Fabric Paint, Glow in the Dark A402"));
    }

    #[test]
    fn count_answer_caps_samples_at_five() {
        let favorites: Vec<ArtTool> = (0..7)
            .map(|i| tool(&i.to_string(), &format!("Tool {i}"), 1.0))
            .collect();
        let answer = answer_count(&favorites);
        assert!(answer.contains("7 favorite art tools"));
        assert!(answer.contains("Tool 4"));
        assert!(!answer.contains("Tool 5"));
        assert!(answer.contains("and 2 more"));
    }

    #[test]
    fn list_answer_numbers_entries_with_prices() {
        let favorites = vec![tool("1", "Fabric Paint", 5.0), tool("2", "Neon Paint", 13.0)];
        let answer = answer_list(&favorites);
        assert!(answer.contains("1. Fabric Paint ($5.00)"));
        assert!(answer.contains("2. Neon Paint ($13.00)"));
    }

    #[test]
    fn list_answer_states_empty_list() {
        let answer = answer_list(&[]);
        assert!(answer.contains("empty"));
    }

    #[test]
    fn membership_answer_yes_and_no() {
        let edding = tool("3", "Edding 4500", 29.0);
        let favorites = vec![edding.clone()];
        assert!(answer_membership(&edding, &favorites).starts_with("Yes"));
        assert!(answer_membership(&edding, &[]).starts_with("No"));
    }

    #[test]
    fn product_summary_covers_all_fields() {
        let mut t = tool("1", "3D Fabric Paint", 5.0);
        t.description = "Puffy paint for fabric - bright and vibrant".into();
        t.glass_surface = true;
        t.limited_time_deal = 0.27;
        t.feedbacks = vec![Feedback {
            rating: 5,
            comment: "great".into(),
            author: "John".into(),
            date: String::new(),
        }];

        let summary = summarize_product(&t);
        assert!(summary.contains("3D Fabric Paint by Arteza costs $5.00."));
        assert!(summary.contains("Puffy paint"));
        assert!(summary.contains("works on glass surfaces"));
        assert!(summary.contains("27% off"));
        assert!(summary.contains("5.0/5 across 1 review."));
    }

    #[test]
    fn product_summary_without_extras_stays_plain() {
        let summary = summarize_product(&tool("3", "Edding 4500", 29.0));
        assert!(summary.contains("costs $29.00"));
        assert!(summary.contains("not suited for glass"));
        assert!(!summary.contains("% off"));
        assert!(!summary.contains("review"));
    }
}
