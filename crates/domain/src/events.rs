use crate::commands::Target;
use crate::models::{Comment, NodeId, Post, ReactionKind, UserId};
use serde::{Deserialize, Serialize};

/// What an applied [`ThreadCommand`](crate::ThreadCommand) changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ThreadEvent {
    #[serde(rename_all = "camelCase")]
    PostCreated { post: Post },
    #[serde(rename_all = "camelCase")]
    ReplyAdded {
        target: Target,
        reply_to: Option<NodeId>,
        comment: Comment,
    },
    #[serde(rename_all = "camelCase")]
    ReactionToggled {
        target: Target,
        node_id: NodeId,
        user_id: UserId,
        reaction: Option<ReactionKind>,
    },
}
