use crate::config::CatalogConfig;
use crate::error::{AtelierError, Result};
use crate::model::{ArtTool, RawArtTool};

/// Remote catalog collaborator: `GET {base}` for the full list,
/// `GET {base}/{id}` for one product.
pub trait CatalogSource: Send + Sync {
    fn fetch_all(&self) -> impl std::future::Future<Output = Result<Vec<ArtTool>>> + Send;

    fn fetch_one(&self, id: &str) -> impl std::future::Future<Output = Result<ArtTool>> + Send;
}

/// HTTP implementation of [`CatalogSource`] against the art-tools API.
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Build a client from configuration. A missing base URL is a
    /// configuration error for the catalog feature, surfaced here rather
    /// than at first use.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            AtelierError::Config(
                "catalog.base_url is not configured; set it in config.toml".to_string(),
            )
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate raw records at the boundary; invalid ones are dropped with a
    /// warning instead of failing the whole list.
    fn normalize_list(raws: Vec<RawArtTool>) -> Vec<ArtTool> {
        raws.into_iter()
            .filter_map(|raw| match ArtTool::from_raw(raw) {
                Ok(tool) => Some(tool),
                Err(e) => {
                    tracing::warn!("dropping invalid catalog record: {e}");
                    None
                }
            })
            .collect()
    }
}

impl CatalogSource for HttpCatalogClient {
    async fn fetch_all(&self) -> Result<Vec<ArtTool>> {
        let resp = self.client.get(&self.base_url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AtelierError::Catalog(format!(
                "catalog fetch failed {status}: {text}"
            )));
        }

        let raws: Vec<RawArtTool> = resp
            .json()
            .await
            .map_err(|e| AtelierError::Catalog(format!("catalog response parse error: {e}")))?;

        Ok(Self::normalize_list(raws))
    }

    async fn fetch_one(&self, id: &str) -> Result<ArtTool> {
        let url = format!("{}/{}", self.base_url, id);
        let resp = self.client.get(&url).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AtelierError::NotFound(format!("product {id}")));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AtelierError::Catalog(format!(
                "product fetch failed {status}: {text}"
            )));
        }

        let raw: RawArtTool = resp
            .json()
            .await
            .map_err(|e| AtelierError::Catalog(format!("product response parse error: {e}")))?;

        ArtTool::from_raw(raw)
    }
}

/// Read-only view over the current catalog state, handed to the dialogue
/// router once per turn.
#[derive(Debug, Clone, Copy)]
pub struct CatalogView<'a> {
    pub products: &'a [ArtTool],
    pub load_error: Option<&'a str>,
}

/// In-memory snapshot of the remote catalog.
///
/// `refresh` replaces the snapshot wholesale on success; on failure the
/// previous snapshot stays available (stale-but-available) and the error is
/// recorded for the UI. Retry is manual, there is no backoff loop.
pub struct CatalogStore<S> {
    source: S,
    snapshot: Vec<ArtTool>,
    error: Option<String>,
}

impl<S: CatalogSource> CatalogStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: Vec::new(),
            error: None,
        }
    }

    /// Fetch the full product list and replace the snapshot atomically.
    /// Readers never observe a partial list.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.source.fetch_all().await {
            Ok(list) => {
                tracing::debug!("catalog refreshed: {} products", list.len());
                self.snapshot = list;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("catalog refresh failed, keeping previous snapshot: {e}");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Current snapshot; empty before the first successful refresh.
    pub fn list(&self) -> &[ArtTool] {
        &self.snapshot
    }

    pub fn get_by_id(&self, id: &str) -> Option<&ArtTool> {
        self.snapshot.iter().find(|tool| tool.id == id)
    }

    /// Fetch a single product from the remote source (detail screen path).
    /// Does not touch the snapshot.
    pub async fn fetch_detail(&self, id: &str) -> Result<ArtTool> {
        self.source.fetch_one(id).await
    }

    /// Message from the most recent failed refresh, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Distinct brands in first-appearance order (home screen filter row).
    pub fn brands(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = Vec::new();
        for tool in &self.snapshot {
            if !tool.brand.is_empty() && !brands.contains(&tool.brand.as_str()) {
                brands.push(&tool.brand);
            }
        }
        brands
    }

    pub fn view(&self) -> CatalogView<'_> {
        CatalogView {
            products: &self.snapshot,
            load_error: self.error.as_deref(),
        }
    }
}
