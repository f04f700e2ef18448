use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AtelierError, Result};

/// A single review left on a product. Owned by its parent [`ArtTool`] and
/// never mutated after creation; used only for read-side aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: u8,
    pub comment: String,
    pub author: String,
    /// ISO-8601 timestamp, kept verbatim as received.
    pub date: String,
}

impl Feedback {
    /// Date formatted as `YYYY-MM-DD` when parseable, verbatim otherwise.
    pub fn date_display(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.date) {
            Ok(dt) => dt.format("%Y-%m-%d").to_string(),
            Err(_) => self.date.clone(),
        }
    }
}

/// A catalog product. Internal code may assume every field respects its
/// invariant: this type is only constructed through [`ArtTool::from_raw`]
/// (catalog boundary) or deserialized from our own persisted snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtTool {
    pub id: String,
    pub art_name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    /// Externally hosted image URI; not owned by this app.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub brand: String,
    /// Discount fraction in `[0, 1)`; `0.0` means no active deal.
    #[serde(default)]
    pub limited_time_deal: f64,
    #[serde(default)]
    pub glass_surface: bool,
    #[serde(default)]
    pub feedbacks: Vec<Feedback>,
}

impl ArtTool {
    /// Convert a loosely-shaped API record into an invariant-respecting
    /// product. Coercions are lenient (missing optionals get defaults,
    /// out-of-range numbers are clamped with a warning); only a missing
    /// `id` or `artName` rejects the record.
    pub fn from_raw(raw: RawArtTool) -> Result<Self> {
        let id = raw
            .id
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AtelierError::InvalidInput("product record missing id".into()))?;
        let art_name = raw
            .art_name
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AtelierError::InvalidInput(format!("product {id} missing artName"))
            })?;

        let price = match raw.price {
            Some(p) if p >= 0.0 => p,
            Some(p) => {
                tracing::warn!("product {id}: negative price {p}, clamping to 0");
                0.0
            }
            None => 0.0,
        };

        let limited_time_deal = match raw.limited_time_deal {
            Some(d) if (0.0..1.0).contains(&d) => d,
            Some(d) => {
                tracing::warn!("product {id}: deal fraction {d} out of [0,1), clamping");
                d.clamp(0.0, 0.99)
            }
            None => 0.0,
        };

        let feedbacks = raw
            .feedbacks
            .unwrap_or_default()
            .into_iter()
            .map(|f| Feedback {
                rating: f.rating.unwrap_or(1).clamp(1, 5) as u8,
                comment: f.comment.unwrap_or_default(),
                author: f.author.unwrap_or_default(),
                date: f.date.unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            id,
            art_name,
            price,
            description: raw.description.unwrap_or_default(),
            image: raw.image.unwrap_or_default(),
            brand: raw.brand.unwrap_or_default(),
            limited_time_deal,
            glass_surface: raw.glass_surface.unwrap_or(false),
            feedbacks,
        })
    }

    pub fn has_deal(&self) -> bool {
        self.limited_time_deal > 0.0
    }

    /// Discount as a whole percentage, e.g. `0.27` -> `27`.
    pub fn deal_percent(&self) -> u8 {
        (self.limited_time_deal * 100.0).round() as u8
    }

    /// Mean rating across all feedback entries, `0.0` when there are none.
    pub fn average_rating(&self) -> f64 {
        if self.feedbacks.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.feedbacks.iter().map(|f| u32::from(f.rating)).sum();
        f64::from(sum) / self.feedbacks.len() as f64
    }

    /// Per-star counts ordered 5 stars down to 1, matching the detail view.
    pub fn rating_histogram(&self) -> [(u8, usize); 5] {
        let mut groups = [(5u8, 0usize), (4, 0), (3, 0), (2, 0), (1, 0)];
        for feedback in &self.feedbacks {
            for group in &mut groups {
                if group.0 == feedback.rating {
                    group.1 += 1;
                }
            }
        }
        groups
    }
}

/// Wire shape of a catalog record: every field loosely optional, validated
/// into an [`ArtTool`] exactly once at the collaborator boundary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArtTool {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub art_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub limited_time_deal: Option<f64>,
    #[serde(default)]
    pub glass_surface: Option<bool>,
    #[serde(default)]
    pub feedbacks: Option<Vec<RawFeedback>>,
}

#[derive(Debug, Deserialize)]
pub struct RawFeedback {
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}
