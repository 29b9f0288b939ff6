use anyhow::Context;
use domain::{Milonga, Post};
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, warn};

mod repo;
mod seed;

pub use seed::SeedData;

/// Owner of the canonical post and milonga collections.
///
/// Every mutation swaps in the collection returned by the pure operations in
/// [`domain::thread`], so readers holding an older snapshot are unaffected.
#[derive(Clone, Default)]
pub struct Store {
    pub(crate) inner: Arc<RwLock<Collections>>,
}

#[derive(Default)]
pub(crate) struct Collections {
    pub posts: Vec<Arc<Post>>,
    pub milongas: Vec<Arc<Milonga>>,
}

impl Store {
    /// Builds a store from the JSON seed at `seed_path`. A missing file gives
    /// an empty store.
    pub async fn new(seed_path: Option<&str>) -> anyhow::Result<Self> {
        let Some(path_str) = seed_path.filter(|p| !p.is_empty()) else {
            info!("No seed file configured, starting empty");
            return Ok(Self::default());
        };

        let path = Path::new(path_str);
        if !path.exists() {
            warn!("Seed file {} not found, starting empty", path.display());
            return Ok(Self::default());
        }

        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
        let seed = SeedData::from_json(&raw)
            .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;

        info!(
            "Loaded {} post(s) and {} milonga(s) from {}",
            seed.posts.len(),
            seed.milongas.len(),
            path.display()
        );
        Ok(Self::from_seed(seed))
    }

    pub fn from_seed(seed: SeedData) -> Self {
        let collections = Collections {
            posts: seed.posts.into_iter().map(Arc::new).collect(),
            milongas: seed.milongas.into_iter().map(Arc::new).collect(),
        };
        Self {
            inner: Arc::new(RwLock::new(collections)),
        }
    }
}
