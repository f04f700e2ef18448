use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::CatalogView;
use crate::lookup::find_mention;
use crate::model::ArtTool;

/// Everything one classification pass may look at. Built once per turn.
pub struct TurnContext<'a> {
    pub utterance: &'a str,
    /// Lowercased copy used by the keyword predicates.
    pub lowered: String,
    pub catalog: CatalogView<'a>,
    pub favorites: &'a [ArtTool],
}

impl<'a> TurnContext<'a> {
    pub fn new(utterance: &'a str, catalog: CatalogView<'a>, favorites: &'a [ArtTool]) -> Self {
        Self {
            utterance,
            lowered: utterance.to_lowercase(),
            catalog,
            favorites,
        }
    }
}

/// What the router decided to do with a turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent<'a> {
    /// "How many favorites do I have?"
    FavoritesCount,
    /// "List my favorites" / "mục đã lưu gồm những gì?"
    FavoritesList,
    /// "Is <product> in my favorites?"
    FavoriteCheck(&'a ArtTool),
    /// "Tell me about <product>"
    ProductInfo(&'a ArtTool),
    /// Catalog failed to load and nothing deterministic matched.
    CatalogUnavailable(&'a str),
    /// Delegate to the generative model with a grounding prompt.
    OpenEnded,
}

type Rule = for<'a, 'b> fn(&'b TurnContext<'a>) -> Option<Intent<'a>>;

/// Ordered rule list; the first rule to produce an intent wins.
const RULES: &[Rule] = &[
    favorites_count_rule,
    favorites_list_rule,
    favorite_check_rule,
    product_info_rule,
    catalog_error_rule,
];

pub fn classify<'a>(ctx: &TurnContext<'a>) -> Intent<'a> {
    RULES
        .iter()
        .find_map(|rule| rule(ctx))
        .unwrap_or(Intent::OpenEnded)
}

// ── predicates ─────────────────────────────────────────────────────────

/// Mixed English/Vietnamese cues for "my favorites / saved items".
const FAVORITES_CUES: &[&str] = &["favorite", "favourite", "yêu thích", "đã lưu", "saved"];

/// Cues asking for the contents of the favorites list.
const LISTING_CUES: &[&str] = &[
    "list", "which", "what are", "show", "those", "gì", "nào", "gồm những",
];

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"how many|bao nhiêu|số lượng|\bcount\b").unwrap()
});

pub fn mentions_favorites(lowered: &str) -> bool {
    FAVORITES_CUES.iter().any(|cue| lowered.contains(cue))
}

pub fn asks_count(lowered: &str) -> bool {
    COUNT_RE.is_match(lowered)
}

pub fn asks_listing(lowered: &str) -> bool {
    LISTING_CUES.iter().any(|cue| lowered.contains(cue))
}

// ── rules ──────────────────────────────────────────────────────────────
// Each rule carries its own full predicate so it can be tested in
// isolation; the ordering in RULES resolves the remaining overlaps.

fn favorites_count_rule<'a>(ctx: &TurnContext<'a>) -> Option<Intent<'a>> {
    (mentions_favorites(&ctx.lowered) && asks_count(&ctx.lowered)).then_some(Intent::FavoritesCount)
}

fn favorites_list_rule<'a>(ctx: &TurnContext<'a>) -> Option<Intent<'a>> {
    (mentions_favorites(&ctx.lowered)
        && asks_listing(&ctx.lowered)
        && !asks_count(&ctx.lowered))
    .then_some(Intent::FavoritesList)
}

fn favorite_check_rule<'a>(ctx: &TurnContext<'a>) -> Option<Intent<'a>> {
    if !mentions_favorites(&ctx.lowered) {
        return None;
    }
    find_mention(ctx.utterance, ctx.catalog.products).map(Intent::FavoriteCheck)
}

fn product_info_rule<'a>(ctx: &TurnContext<'a>) -> Option<Intent<'a>> {
    if mentions_favorites(&ctx.lowered) {
        return None;
    }
    find_mention(ctx.utterance, ctx.catalog.products).map(Intent::ProductInfo)
}

fn catalog_error_rule<'a>(ctx: &TurnContext<'a>) -> Option<Intent<'a>> {
    ctx.catalog.load_error.map(Intent::CatalogUnavailable)
}
