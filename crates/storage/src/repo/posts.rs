use crate::Store;
use domain::{thread, ItemId, Post, ThreadError, UserId};
use std::sync::Arc;
use tracing::info;

impl Store {
    /// Posts in feed order, oldest first.
    pub async fn list_posts(&self) -> Vec<Arc<Post>> {
        self.inner.read().await.posts.clone()
    }

    pub async fn get_post(&self, id: &ItemId) -> Option<Arc<Post>> {
        let guard = self.inner.read().await;
        thread::find_item(&guard.posts, id).cloned()
    }

    pub async fn create_post(&self, author_id: UserId, content: &str) -> Result<Post, ThreadError> {
        if content.trim().is_empty() {
            return Err(ThreadError::EmptyContent);
        }

        let post = Post::new(author_id, content);
        let mut guard = self.inner.write().await;
        guard.posts.push(Arc::new(post.clone()));

        info!("Post created: {} by {}", post.id, post.author_id);
        Ok(post)
    }
}
