use crate::Store;
use domain::{thread, ItemId, Milonga};
use std::sync::Arc;

impl Store {
    /// Milongas ordered by start time.
    pub async fn list_milongas(&self) -> Vec<Arc<Milonga>> {
        let mut milongas = self.inner.read().await.milongas.clone();
        milongas.sort_by_key(|m| m.starts_at);
        milongas
    }

    pub async fn get_milonga(&self, id: &ItemId) -> Option<Arc<Milonga>> {
        let guard = self.inner.read().await;
        thread::find_item(&guard.milongas, id).cloned()
    }
}
