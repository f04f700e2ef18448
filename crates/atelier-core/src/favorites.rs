use crate::error::Result;
use crate::model::ArtTool;
use crate::storage::RecordBackend;

/// Name of the durable record holding the serialized favorites array.
pub const FAVORITES_KEY: &str = "savedProducts";

/// Result of a [`FavoritesStore::toggle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Add direction requested but the id could not be resolved from the
    /// catalog (stale id); nothing changed.
    NotResolved,
}

/// The user's saved product subset.
///
/// Entries are full snapshot copies keyed by `id` (at most one per id); they
/// do not track later catalog changes. Every mutation rewrites the whole
/// persisted record (write-through, no deltas) and screens re-`load` on
/// focus, so durable storage stays the cross-screen source of truth. Two
/// store instances over the same record are last-write-wins.
pub struct FavoritesStore<B> {
    records: B,
    items: Vec<ArtTool>,
}

impl<B: RecordBackend> FavoritesStore<B> {
    pub fn new(records: B) -> Self {
        Self {
            records,
            items: Vec::new(),
        }
    }

    /// Reload the in-memory set from durable storage. A missing or corrupt
    /// record yields an empty set; corruption is logged, never surfaced.
    pub async fn load(&mut self) -> Result<()> {
        match self.records.get(FAVORITES_KEY).await? {
            None => self.items.clear(),
            Some(raw) => match serde_json::from_str::<Vec<ArtTool>>(&raw) {
                Ok(list) => self.items = dedupe_by_id(list),
                Err(e) => {
                    tracing::warn!("corrupt favorites record, starting empty: {e}");
                    self.items.clear();
                }
            },
        }
        Ok(())
    }

    /// Remove the favorite with `product_id` if present; otherwise resolve
    /// it from `catalog` and insert a snapshot copy. Unresolvable adds are
    /// no-ops. The full collection is persisted after every mutation.
    pub async fn toggle(&mut self, product_id: &str, catalog: &[ArtTool]) -> Result<ToggleOutcome> {
        if let Some(pos) = self.items.iter().position(|t| t.id == product_id) {
            self.items.remove(pos);
            self.persist().await?;
            return Ok(ToggleOutcome::Removed);
        }

        let Some(tool) = catalog.iter().find(|t| t.id == product_id) else {
            tracing::debug!("toggle: product {product_id} not in catalog, skipping add");
            return Ok(ToggleOutcome::NotResolved);
        };

        self.items.push(tool.clone());
        self.persist().await?;
        Ok(ToggleOutcome::Added)
    }

    /// Remove one entry; returns whether anything was removed.
    pub async fn remove(&mut self, product_id: &str) -> Result<bool> {
        let before = self.items.len();
        self.items.retain(|t| t.id != product_id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.records.delete(FAVORITES_KEY).await
    }

    pub fn list(&self) -> &[ArtTool] {
        &self.items
    }

    pub fn is_favorite(&self, product_id: &str) -> bool {
        self.items.iter().any(|t| t.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Case-insensitive substring search over saved names (favorites screen
    /// search box).
    pub fn filter_by_name(&self, keyword: &str) -> Vec<&ArtTool> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|t| t.art_name.to_lowercase().contains(&keyword))
            .collect()
    }

    async fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.items)?;
        self.records.put(FAVORITES_KEY, &raw).await
    }
}

/// Keep the first entry per id. Guards the set invariant even against a
/// hand-edited or merged record.
fn dedupe_by_id(list: Vec<ArtTool>) -> Vec<ArtTool> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::with_capacity(list.len());
    for tool in list {
        if !seen.contains(&tool.id) {
            seen.push(tool.id.clone());
            out.push(tool);
        }
    }
    out
}
