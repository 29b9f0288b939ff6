use crate::Store;
use domain::{thread, Comment, NodeId, ReactionKind, Target, ThreadError, UserId};
use std::sync::Arc;
use tracing::{info, warn};

/// Replaces the held collection with the updated one. On error the held
/// collection stays as it was.
fn commit<T, R>(
    held: &mut Vec<Arc<T>>,
    outcome: Result<(Vec<Arc<T>>, R), ThreadError>,
) -> Result<R, ThreadError> {
    let (items, value) = outcome?;
    *held = items;
    Ok(value)
}

impl Store {
    pub async fn add_reply(
        &self,
        target: &Target,
        author_id: UserId,
        content: &str,
        reply_to: Option<&NodeId>,
    ) -> Result<Comment, ThreadError> {
        let mut guard = self.inner.write().await;
        let result = match target {
            Target::Post(id) => {
                let outcome = thread::add_reply(&guard.posts, id, content, author_id, reply_to);
                commit(&mut guard.posts, outcome)
            }
            Target::Milonga(id) => {
                let outcome = thread::add_reply(&guard.milongas, id, content, author_id, reply_to);
                commit(&mut guard.milongas, outcome)
            }
        };

        match &result {
            Ok(comment) => info!(
                "Reply added on {}: {} (parent: {})",
                target,
                comment.id,
                reply_to.map(NodeId::as_str).unwrap_or("-")
            ),
            Err(e) => warn!("Reply on {} dropped: {}", target, e),
        }
        result
    }

    pub async fn toggle_reaction(
        &self,
        target: &Target,
        node_id: &NodeId,
        user_id: &UserId,
        kind: ReactionKind,
    ) -> Result<Option<ReactionKind>, ThreadError> {
        let mut guard = self.inner.write().await;
        let result = match target {
            Target::Post(id) => {
                let outcome = thread::toggle_reaction(&guard.posts, id, node_id, user_id, kind);
                commit(&mut guard.posts, outcome)
            }
            Target::Milonga(id) => {
                let outcome = thread::toggle_reaction(&guard.milongas, id, node_id, user_id, kind);
                commit(&mut guard.milongas, outcome)
            }
        };

        match &result {
            Ok(held) => info!(
                "Reaction on {}/{} by {}: {}",
                target,
                node_id,
                user_id,
                held.map(|k| k.as_str()).unwrap_or("none")
            ),
            Err(e) => warn!("Reaction on {}/{} ignored: {}", target, node_id, e),
        }
        result
    }
}
