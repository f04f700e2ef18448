use crate::model::{ArtTool, Feedback};

/// Default character budget for the catalog section of the prompt. Keeps the
/// payload bounded for large catalogs; the model config can override it.
pub const DEFAULT_PROMPT_BUDGET: usize = 12_000;

const MAX_FEEDBACK_PER_PRODUCT: usize = 2;
const MAX_COMMENT_CHARS: usize = 80;
const MAX_DESCRIPTION_CHARS: usize = 160;

const INSTRUCTION: &str = "Answer using only the facts listed above. \
If the facts are not enough to answer, say you are not sure instead of guessing.";

/// Serialize the catalog and favorites into a bounded grounding prompt,
/// ending with the user's literal question.
///
/// Products are packed greedily in catalog order until `budget` characters
/// of product lines are used; anything dropped is acknowledged with an
/// omission marker so the model knows the list is incomplete.
pub fn build_grounding_prompt(
    catalog: &[ArtTool],
    favorites: &[ArtTool],
    question: &str,
    budget: usize,
) -> String {
    let mut out = String::new();
    out.push_str("You are a shopping assistant for an art-supply catalog app.\n\n");
    out.push_str("Product catalog:\n");

    let mut used = 0;
    let mut included = 0;
    for tool in catalog {
        let line = product_line(tool);
        if used + line.len() > budget {
            break;
        }
        used += line.len();
        included += 1;
        out.push_str(&line);
    }
    if catalog.is_empty() {
        out.push_str("(the catalog is currently empty)\n");
    } else if included < catalog.len() {
        out.push_str(&format!(
            "({} more products omitted to fit the context limit)\n",
            catalog.len() - included
        ));
    }

    out.push_str("\nSaved favorites:\n");
    if favorites.is_empty() {
        out.push_str("(no favorites saved yet)\n");
    } else {
        for tool in favorites {
            out.push_str(&format!(
                "- {} ({}, ${:.2})\n",
                tool.art_name, tool.brand, tool.price
            ));
        }
    }

    out.push('\n');
    out.push_str(INSTRUCTION);
    out.push_str("\n\nQuestion: ");
    out.push_str(question);
    out
}

fn product_line(tool: &ArtTool) -> String {
    let mut line = format!(
        "- [id {}] {} | brand: {} | price: ${:.2} | glass surface: {}",
        tool.id,
        tool.art_name,
        tool.brand,
        tool.price,
        if tool.glass_surface { "yes" } else { "no" },
    );

    if tool.has_deal() {
        line.push_str(&format!(" | deal: {}% off", tool.deal_percent()));
    }

    if !tool.description.is_empty() {
        line.push_str(" | ");
        line.push_str(&truncate(&tool.description, MAX_DESCRIPTION_CHARS));
    }

    if !tool.feedbacks.is_empty() {
        line.push_str(&format!(
            " | rated {:.1}/5 ({} reviews)",
            tool.average_rating(),
            tool.feedbacks.len()
        ));
        for feedback in tool.feedbacks.iter().take(MAX_FEEDBACK_PER_PRODUCT) {
            line.push_str(&feedback_summary(feedback));
        }
    }

    line.push('\n');
    line
}

fn feedback_summary(feedback: &Feedback) -> String {
    format!(
        "; {}/5 by {}: \"{}\"",
        feedback.rating,
        feedback.author,
        truncate(&feedback.comment, MAX_COMMENT_CHARS)
    )
}

/// Truncate on a char boundary, marking the cut.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
