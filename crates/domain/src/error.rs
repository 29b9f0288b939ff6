use crate::models::{ItemId, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThreadError {
    #[error("content item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("comment not found: {0}")]
    NodeNotFound(NodeId),

    #[error("content must not be empty")]
    EmptyContent,
}
