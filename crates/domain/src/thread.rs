//! Updates to comment threads.
//!
//! Every operation takes a collection of content items by reference and
//! returns a new collection. Nodes on the path from the item down to the
//! touched node are rebuilt; everything else is shared with the input by
//! `Arc`. The input is never modified, so a caller that gets an error back
//! simply keeps what it had.

use std::sync::Arc;

use crate::error::ThreadError;
use crate::models::{Comment, ItemId, Milonga, NodeId, Post, ReactionKind, UserId};

/// A content item that owns a forest of comment threads.
pub trait Threaded: Clone {
    fn id(&self) -> &ItemId;
    fn thread(&self) -> &[Arc<Comment>];
    fn thread_mut(&mut self) -> &mut Vec<Arc<Comment>>;
}

impl Threaded for Post {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn thread(&self) -> &[Arc<Comment>] {
        &self.comments
    }

    fn thread_mut(&mut self) -> &mut Vec<Arc<Comment>> {
        &mut self.comments
    }
}

impl Threaded for Milonga {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn thread(&self) -> &[Arc<Comment>] {
        &self.inquiries
    }

    fn thread_mut(&mut self) -> &mut Vec<Arc<Comment>> {
        &mut self.inquiries
    }
}

pub fn find_item<'a, T: Threaded>(items: &'a [Arc<T>], item_id: &ItemId) -> Option<&'a Arc<T>> {
    items.iter().find(|item| item.id() == item_id)
}

/// Depth-first search for a node anywhere in a forest.
pub fn find_node<'a>(forest: &'a [Arc<Comment>], id: &NodeId) -> Option<&'a Arc<Comment>> {
    for node in forest {
        if node.id == *id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Total number of nodes in a forest, replies included.
pub fn count_nodes(forest: &[Arc<Comment>]) -> usize {
    forest
        .iter()
        .map(|node| 1 + count_nodes(&node.replies))
        .sum()
}

/// Rebuilds `forest` with `edit` applied to the node named `target`.
///
/// Returns `None` when no node in the forest has that id. Only the matched
/// node and its ancestors are copied.
fn rebuild<F>(forest: &[Arc<Comment>], target: &NodeId, edit: &mut F) -> Option<Vec<Arc<Comment>>>
where
    F: FnMut(&mut Comment),
{
    for (idx, node) in forest.iter().enumerate() {
        let replacement = if node.id == *target {
            let mut updated = Comment::clone(node);
            edit(&mut updated);
            updated
        } else {
            match rebuild(&node.replies, target, edit) {
                Some(replies) => Comment {
                    replies,
                    ..Comment::clone(node)
                },
                None => continue,
            }
        };

        let mut out = forest.to_vec();
        out[idx] = Arc::new(replacement);
        return Some(out);
    }
    None
}

fn update_item<T, F>(items: &[Arc<T>], item_id: &ItemId, edit: F) -> Result<Vec<Arc<T>>, ThreadError>
where
    T: Threaded,
    F: FnOnce(&mut T) -> Result<(), ThreadError>,
{
    let idx = items
        .iter()
        .position(|item| item.id() == item_id)
        .ok_or_else(|| ThreadError::ItemNotFound(item_id.clone()))?;

    let mut updated = T::clone(&items[idx]);
    edit(&mut updated)?;

    let mut out = items.to_vec();
    out[idx] = Arc::new(updated);
    Ok(out)
}

/// Appends an already built node under `parent`, or at the top level of the
/// item's thread when `parent` is `None`.
pub fn insert_reply<T: Threaded>(
    items: &[Arc<T>],
    item_id: &ItemId,
    parent: Option<&NodeId>,
    reply: Comment,
) -> Result<Vec<Arc<T>>, ThreadError> {
    update_item(items, item_id, |item| {
        let Some(parent_id) = parent else {
            item.thread_mut().push(Arc::new(reply));
            return Ok(());
        };

        let mut reply = Some(reply);
        let forest = rebuild(item.thread(), parent_id, &mut |node: &mut Comment| {
            if let Some(r) = reply.take() {
                node.replies.push(Arc::new(r));
            }
        })
        .ok_or_else(|| ThreadError::NodeNotFound(parent_id.clone()))?;

        *item.thread_mut() = forest;
        Ok(())
    })
}

/// Creates a reply by `author_id` and appends it under `parent` (or at the
/// top level). Returns the new collection together with the created node.
pub fn add_reply<T: Threaded>(
    items: &[Arc<T>],
    item_id: &ItemId,
    text: &str,
    author_id: UserId,
    parent: Option<&NodeId>,
) -> Result<(Vec<Arc<T>>, Comment), ThreadError> {
    if text.trim().is_empty() {
        return Err(ThreadError::EmptyContent);
    }

    let reply = Comment::new(author_id, text);
    let items = insert_reply(items, item_id, parent, reply.clone())?;
    Ok((items, reply))
}

/// Toggles `user_id`'s reaction on a node. The second value is the reaction
/// the user holds on that node afterwards.
pub fn toggle_reaction<T: Threaded>(
    items: &[Arc<T>],
    item_id: &ItemId,
    node_id: &NodeId,
    user_id: &UserId,
    kind: ReactionKind,
) -> Result<(Vec<Arc<T>>, Option<ReactionKind>), ThreadError> {
    let mut outcome = None;
    let items = update_item(items, item_id, |item| {
        let forest = rebuild(item.thread(), node_id, &mut |node: &mut Comment| {
            outcome = node.reactions.toggle(user_id.clone(), kind);
        })
        .ok_or_else(|| ThreadError::NodeNotFound(node_id.clone()))?;

        *item.thread_mut() = forest;
        Ok(())
    })?;
    Ok((items, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MilongaKind, Reaction};
    use chrono::{DateTime, TimeZone, Utc};
    use rand::{seq::SliceRandom, Rng};
    use std::collections::HashMap;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
    }

    fn node(id: &str, replies: Vec<Arc<Comment>>) -> Arc<Comment> {
        Arc::new(Comment {
            id: id.into(),
            author_id: "u0".into(),
            content: format!("text of {}", id),
            created_at: at(),
            reactions: Default::default(),
            replies,
        })
    }

    /// p1
    /// ├── c1
    /// ├── c2
    /// │   ├── c21
    /// │   │   └── c211
    /// │   │       └── c2111
    /// │   └── c22
    /// └── c3
    fn posts() -> Vec<Arc<Post>> {
        let c2 = node(
            "c2",
            vec![
                node("c21", vec![node("c211", vec![node("c2111", vec![])])]),
                node("c22", vec![]),
            ],
        );
        vec![
            Arc::new(Post {
                id: "p0".into(),
                author_id: "u5".into(),
                content: "another post".into(),
                created_at: at(),
                comments: vec![node("x1", vec![])],
            }),
            Arc::new(Post {
                id: "p1".into(),
                author_id: "u0".into(),
                content: "Milonga tonight?".into(),
                created_at: at(),
                comments: vec![node("c1", vec![]), c2, node("c3", vec![])],
            }),
        ]
    }

    fn all_ids(forest: &[Arc<Comment>], out: &mut Vec<NodeId>) {
        for n in forest {
            out.push(n.id.clone());
            all_ids(&n.replies, out);
        }
    }

    fn thread_of(items: &[Arc<Post>], id: &str) -> Vec<Arc<Comment>> {
        find_item(items, &id.into()).unwrap().comments.clone()
    }

    #[test]
    fn reply_to_top_level_comment() {
        let items = posts();

        let (items, created) =
            add_reply(&items, &"p1".into(), "hello", "u9".into(), Some(&"c1".into())).unwrap();

        let thread = thread_of(&items, "p1");
        let c1 = &thread[0];
        assert_eq!(c1.replies.len(), 1);
        assert_eq!(c1.replies[0].content, "hello");
        assert_eq!(c1.replies[0].author_id.as_str(), "u9");
        assert_eq!(c1.replies[0].id, created.id);
        assert!(c1.replies[0].reactions.is_empty());
        assert!(c1.replies[0].replies.is_empty());
    }

    #[test]
    fn reply_is_appended_last_under_every_parent() {
        let before = posts();
        let mut ids = Vec::new();
        all_ids(before[1].thread(), &mut ids);

        for parent in &ids {
            let (after, created) =
                add_reply(&before, &"p1".into(), "reply", "u9".into(), Some(parent)).unwrap();

            let old = find_node(before[1].thread(), parent).unwrap();
            let new = find_node(after[1].thread(), parent).unwrap();
            assert_eq!(new.replies.len(), old.replies.len() + 1);
            assert_eq!(new.replies.last().unwrap().id, created.id);
            assert_eq!(&new.replies[..old.replies.len()], &old.replies[..]);
            assert_eq!(count_nodes(after[1].thread()), count_nodes(before[1].thread()) + 1);
        }
    }

    #[test]
    fn top_level_comment_is_appended() {
        let before = posts();

        let (after, created) =
            add_reply(&before, &"p1".into(), "first!", "u2".into(), None).unwrap();

        let old = before[1].thread();
        let new = after[1].thread();
        assert_eq!(new.len(), old.len() + 1);
        assert_eq!(new.last().unwrap().id, created.id);
        for (a, b) in old.iter().zip(new.iter()) {
            assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn missing_parent_leaves_everything_unchanged() {
        let before = posts();
        let snapshot = before.clone();

        let err = add_reply(&before, &"p1".into(), "lost", "u9".into(), Some(&"nope".into()))
            .unwrap_err();

        assert_eq!(err, ThreadError::NodeNotFound("nope".into()));
        assert_eq!(before, snapshot);
        assert_eq!(count_nodes(before[1].thread()), 7);
    }

    #[test]
    fn parent_from_another_item_is_not_found() {
        let items = posts();
        let err = add_reply(&items, &"p1".into(), "hi", "u9".into(), Some(&"x1".into()))
            .unwrap_err();
        assert_eq!(err, ThreadError::NodeNotFound("x1".into()));
    }

    #[test]
    fn missing_item_is_reported() {
        let items = posts();
        let err = add_reply(&items, &"p404".into(), "hi", "u9".into(), None).unwrap_err();
        assert_eq!(err, ThreadError::ItemNotFound("p404".into()));

        let err = toggle_reaction(&items, &"p404".into(), &"c1".into(), &"u1".into(), ReactionKind::Like)
            .unwrap_err();
        assert_eq!(err, ThreadError::ItemNotFound("p404".into()));
    }

    #[test]
    fn blank_text_is_rejected() {
        let items = posts();
        let err = add_reply(&items, &"p1".into(), "  \n", "u9".into(), None).unwrap_err();
        assert_eq!(err, ThreadError::EmptyContent);
    }

    #[test]
    fn like_then_love_then_love() {
        let items = posts();
        let (p, c, u) = (ItemId::from("p1"), NodeId::from("c3"), UserId::from("u1"));

        let (items, held) = toggle_reaction(&items, &p, &c, &u, ReactionKind::Like).unwrap();
        assert_eq!(held, Some(ReactionKind::Like));
        let reactions: Vec<Reaction> = find_node(items[1].thread(), &c).unwrap().reactions.clone().into();
        assert_eq!(reactions, vec![Reaction { user_id: u.clone(), kind: ReactionKind::Like }]);

        let (items, held) = toggle_reaction(&items, &p, &c, &u, ReactionKind::Love).unwrap();
        assert_eq!(held, Some(ReactionKind::Love));
        let reactions: Vec<Reaction> = find_node(items[1].thread(), &c).unwrap().reactions.clone().into();
        assert_eq!(reactions, vec![Reaction { user_id: u.clone(), kind: ReactionKind::Love }]);

        let (items, held) = toggle_reaction(&items, &p, &c, &u, ReactionKind::Love).unwrap();
        assert_eq!(held, None);
        assert!(find_node(items[1].thread(), &c).unwrap().reactions.is_empty());
    }

    #[test]
    fn same_reaction_twice_is_a_no_op_overall() {
        let before = posts();
        let mut ids = Vec::new();
        all_ids(before[1].thread(), &mut ids);

        for id in &ids {
            for kind in ReactionKind::ALL {
                let (once, _) = toggle_reaction(&before, &"p1".into(), id, &"u7".into(), kind).unwrap();
                let (twice, held) = toggle_reaction(&once, &"p1".into(), id, &"u7".into(), kind).unwrap();
                assert_eq!(held, None);
                assert_eq!(twice, before);
            }
        }
    }

    #[test]
    fn random_toggles_keep_one_reaction_per_user() {
        let mut rng = rand::thread_rng();
        let users: Vec<UserId> = ["u1", "u2", "u3"].into_iter().map(UserId::from).collect();
        let mut ids = Vec::new();
        let mut items = posts();
        all_ids(items[1].thread(), &mut ids);

        let mut expected: HashMap<(NodeId, UserId), ReactionKind> = HashMap::new();
        for _ in 0..300 {
            let id = ids.choose(&mut rng).unwrap().clone();
            let user = users.choose(&mut rng).unwrap().clone();
            let kind = ReactionKind::ALL[rng.gen_range(0..ReactionKind::ALL.len())];

            let (next, held) = toggle_reaction(&items, &"p1".into(), &id, &user, kind).unwrap();
            items = next;

            let key = (id.clone(), user.clone());
            if expected.get(&key) == Some(&kind) {
                expected.remove(&key);
            } else {
                expected.insert(key, kind);
            }
            assert_eq!(held, expected.get(&(id.clone(), user.clone())).copied());

            let list: Vec<Reaction> = find_node(items[1].thread(), &id).unwrap().reactions.clone().into();
            assert!(list.iter().filter(|r| r.user_id == user).count() <= 1);
        }
    }

    #[test]
    fn reacting_on_missing_node_is_reported() {
        let items = posts();
        let err = toggle_reaction(&items, &"p1".into(), &"ghost".into(), &"u1".into(), ReactionKind::Wow)
            .unwrap_err();
        assert_eq!(err, ThreadError::NodeNotFound("ghost".into()));
    }

    #[test]
    fn deep_update_only_copies_the_path() {
        let before = posts();
        let deepest = NodeId::from("c2111");

        let (after, _) =
            add_reply(&before, &"p1".into(), "deep", "u4".into(), Some(&deepest)).unwrap();
        let (after, _) =
            toggle_reaction(&after, &"p1".into(), &deepest, &"u4".into(), ReactionKind::Love).unwrap();

        // untouched item
        assert!(Arc::ptr_eq(&before[0], &after[0]));

        let (old, new) = (before[1].thread(), after[1].thread());
        assert!(Arc::ptr_eq(&old[0], &new[0]));
        assert!(Arc::ptr_eq(&old[2], &new[2]));
        assert!(!Arc::ptr_eq(&old[1], &new[1]));

        let (old_c2, new_c2) = (&old[1], &new[1]);
        assert!(Arc::ptr_eq(&old_c2.replies[1], &new_c2.replies[1]));
        assert_eq!(old_c2.replies[1], new_c2.replies[1]);
        assert_eq!(old_c2.content, new_c2.content);

        let new_deepest = find_node(new, &deepest).unwrap();
        assert_eq!(new_deepest.replies.len(), 1);
        assert_eq!(new_deepest.reactions.of(&"u4".into()), Some(ReactionKind::Love));
        assert!(find_node(old, &deepest).unwrap().replies.is_empty());
    }

    #[test]
    fn sibling_subtrees_keep_their_values() {
        let before = posts();
        let (after, _) =
            add_reply(&before, &"p1".into(), "under c21", "u3".into(), Some(&"c21".into())).unwrap();

        for sibling in ["c1", "c22", "c3"] {
            let id = NodeId::from(sibling);
            assert_eq!(
                find_node(before[1].thread(), &id),
                find_node(after[1].thread(), &id)
            );
        }
    }

    #[test]
    fn milonga_inquiries_use_the_same_operations() {
        let milongas = vec![Arc::new(Milonga {
            id: "m1".into(),
            title: "Friday Milonga".into(),
            kind: MilongaKind::Milonga,
            organizer_id: "org".into(),
            venue: "Hongdae".into(),
            starts_at: at(),
            dj: Some("DJ Kim".into()),
            inquiries: vec![node("q1", vec![])],
        })];

        let (milongas, answer) = add_reply(
            &milongas,
            &"m1".into(),
            "Entrance is 15,000 won",
            "org".into(),
            Some(&"q1".into()),
        )
        .unwrap();
        let (milongas, _) =
            toggle_reaction(&milongas, &"m1".into(), &answer.id, &"u1".into(), ReactionKind::Like)
                .unwrap();

        let q1 = &milongas[0].inquiries[0];
        assert_eq!(q1.replies.len(), 1);
        assert_eq!(q1.replies[0].reactions.of(&"u1".into()), Some(ReactionKind::Like));
    }

    #[test]
    fn count_and_find() {
        let items = posts();
        assert_eq!(count_nodes(items[1].thread()), 7);
        assert_eq!(count_nodes(&[]), 0);
        assert_eq!(
            find_node(items[1].thread(), &"c211".into()).map(|n| n.replies.len()),
            Some(1)
        );
        assert!(find_node(items[1].thread(), &"x1".into()).is_none());
    }
}
