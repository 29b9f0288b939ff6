use crate::models::{ItemId, NodeId, ReactionKind, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which collection a thread lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Target {
    Post(ItemId),
    Milonga(ItemId),
}

impl Target {
    pub fn item_id(&self) -> &ItemId {
        match self {
            Target::Post(id) | Target::Milonga(id) => id,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Post(id) => write!(f, "post/{}", id),
            Target::Milonga(id) => write!(f, "milonga/{}", id),
        }
    }
}

#[derive(Debug)]
pub enum ThreadCommand {
    CreatePost {
        author_id: UserId,
        content: String,
    },
    AddReply {
        target: Target,
        author_id: UserId,
        content: String,
        reply_to: Option<NodeId>, // None: top-level comment
    },
    ToggleReaction {
        target: Target,
        node_id: NodeId,
        user_id: UserId,
        kind: ReactionKind,
    },
}
