use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Id of a post or a milonga.
    ItemId
);
string_id!(
    /// Id of a comment or inquiry node.
    NodeId
);
string_id!(UserId);

impl NodeId {
    pub fn generate() -> Self {
        Self(format!("c{:x}", rand::random::<u128>()))
    }
}

impl ItemId {
    pub fn generate() -> Self {
        Self(format!("p{:x}", rand::random::<u128>()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReactionKind {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 6] = [
        ReactionKind::Like,
        ReactionKind::Love,
        ReactionKind::Haha,
        ReactionKind::Wow,
        ReactionKind::Sad,
        ReactionKind::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "Like",
            ReactionKind::Love => "Love",
            ReactionKind::Haha => "Haha",
            ReactionKind::Wow => "Wow",
            ReactionKind::Sad => "Sad",
            ReactionKind::Angry => "Angry",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown reaction type: {}", s))
    }
}

/// One user's reaction as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: ReactionKind,
}

/// Reactions on a single node, keyed by user so that a user holds at most one.
///
/// Serialized as a list of [`Reaction`] in the order users first reacted; a
/// changed reaction keeps its position. When a list repeats a user, the last
/// entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Reaction>", into = "Vec<Reaction>")]
pub struct Reactions(IndexMap<UserId, ReactionKind>);

impl Reactions {
    /// Applies a click on `kind` by `user` and returns the reaction the user
    /// holds afterwards.
    pub fn toggle(&mut self, user: UserId, kind: ReactionKind) -> Option<ReactionKind> {
        match self.0.get(&user) {
            Some(existing) if *existing == kind => {
                self.0.shift_remove(&user);
                None
            }
            _ => {
                self.0.insert(user, kind);
                Some(kind)
            }
        }
    }

    pub fn of(&self, user: &UserId) -> Option<ReactionKind> {
        self.0.get(user).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, ReactionKind)> {
        self.0.iter().map(|(u, k)| (u, *k))
    }

    /// Number of reactions per kind, omitting kinds nobody used.
    pub fn counts(&self) -> BTreeMap<ReactionKind, usize> {
        let mut counts = BTreeMap::new();
        for (_, kind) in self.iter() {
            *counts.entry(kind).or_insert(0) += 1;
        }
        counts
    }
}

impl From<Vec<Reaction>> for Reactions {
    fn from(list: Vec<Reaction>) -> Self {
        Self(list.into_iter().map(|r| (r.user_id, r.kind)).collect())
    }
}

impl From<Reactions> for Vec<Reaction> {
    fn from(reactions: Reactions) -> Self {
        reactions
            .0
            .into_iter()
            .map(|(user_id, kind)| Reaction { user_id, kind })
            .collect()
    }
}

/// A comment, reply or inquiry. Replies are shared by reference between
/// successive versions of a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: NodeId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reactions: Reactions,
    #[serde(default)]
    pub replies: Vec<Arc<Comment>>,
}

impl Comment {
    pub fn new(author_id: UserId, content: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            author_id,
            content: content.into(),
            created_at: Utc::now(),
            reactions: Reactions::default(),
            replies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: ItemId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Arc<Comment>>,
}

impl Post {
    pub fn new(author_id: UserId, content: impl Into<String>) -> Self {
        Self {
            id: ItemId::generate(),
            author_id,
            content: content.into(),
            created_at: Utc::now(),
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilongaKind {
    Milonga,
    Class,
    Workshop,
    Festival,
    Practica,
}

/// A dated event listing. Questions about it are threaded as inquiries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milonga {
    pub id: ItemId,
    pub title: String,
    pub kind: MilongaKind,
    pub organizer_id: UserId,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub dj: Option<String>,
    #[serde(default)]
    pub inquiries: Vec<Arc<Comment>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_replaces_and_removes() {
        let mut reactions = Reactions::default();
        let u1 = UserId::from("u1");

        assert_eq!(reactions.toggle(u1.clone(), ReactionKind::Like), Some(ReactionKind::Like));
        assert_eq!(reactions.of(&u1), Some(ReactionKind::Like));

        assert_eq!(reactions.toggle(u1.clone(), ReactionKind::Love), Some(ReactionKind::Love));
        assert_eq!(reactions.len(), 1);

        assert_eq!(reactions.toggle(u1.clone(), ReactionKind::Love), None);
        assert!(reactions.is_empty());
    }

    #[test]
    fn counts_group_by_kind() {
        let mut reactions = Reactions::default();
        reactions.toggle("u1".into(), ReactionKind::Like);
        reactions.toggle("u2".into(), ReactionKind::Like);
        reactions.toggle("u3".into(), ReactionKind::Wow);

        let counts = reactions.counts();
        assert_eq!(counts.get(&ReactionKind::Like), Some(&2));
        assert_eq!(counts.get(&ReactionKind::Wow), Some(&1));
        assert_eq!(counts.get(&ReactionKind::Sad), None);
    }

    #[test]
    fn list_keeps_first_reaction_order() {
        let mut reactions = Reactions::default();
        reactions.toggle("u9".into(), ReactionKind::Like);
        reactions.toggle("u1".into(), ReactionKind::Wow);
        reactions.toggle("u5".into(), ReactionKind::Sad);
        // u9 changes its mind, u1 takes its reaction back
        reactions.toggle("u9".into(), ReactionKind::Love);
        reactions.toggle("u1".into(), ReactionKind::Wow);
        reactions.toggle("u3".into(), ReactionKind::Haha);

        let list: Vec<Reaction> = reactions.into();
        let order: Vec<(&str, ReactionKind)> =
            list.iter().map(|r| (r.user_id.as_str(), r.kind)).collect();
        assert_eq!(
            order,
            vec![
                ("u9", ReactionKind::Love),
                ("u5", ReactionKind::Sad),
                ("u3", ReactionKind::Haha),
            ]
        );
    }

    #[test]
    fn reactions_wire_format_is_a_list() {
        let mut reactions = Reactions::default();
        reactions.toggle("u1".into(), ReactionKind::Haha);

        let json = serde_json::to_value(&reactions).unwrap();
        assert_eq!(json, serde_json::json!([{ "userId": "u1", "type": "Haha" }]));
    }

    #[test]
    fn duplicate_users_in_input_collapse_to_last() {
        let reactions: Reactions = serde_json::from_value(serde_json::json!([
            { "userId": "u1", "type": "Like" },
            { "userId": "u1", "type": "Sad" },
        ]))
        .unwrap();

        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions.of(&"u1".into()), Some(ReactionKind::Sad));
    }

    #[test]
    fn reaction_kind_parses_case_insensitively() {
        assert_eq!("love".parse::<ReactionKind>(), Ok(ReactionKind::Love));
        assert_eq!("ANGRY".parse::<ReactionKind>(), Ok(ReactionKind::Angry));
        assert!("meh".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn comment_deserializes_without_optional_lists() {
        let comment: Comment = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "authorId": "u2",
            "content": "see you there",
            "createdAt": "2024-05-01T19:30:00Z",
        }))
        .unwrap();

        assert_eq!(comment.id.as_str(), "c1");
        assert!(comment.reactions.is_empty());
        assert!(comment.replies.is_empty());
    }
}
