mod commands;
mod error;
mod events;
mod models;
pub mod thread;

pub use commands::{Target, ThreadCommand};
pub use error::ThreadError;
pub use events::ThreadEvent;
pub use models::{
    Comment, ItemId, Milonga, MilongaKind, NodeId, Post, Reaction, ReactionKind, Reactions, UserId,
};
pub use thread::Threaded;
