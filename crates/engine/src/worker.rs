use domain::{ThreadCommand, ThreadError, ThreadEvent};
use storage::Store;

pub async fn apply(store: &Store, cmd: ThreadCommand) -> Result<ThreadEvent, ThreadError> {
    match cmd {
        ThreadCommand::CreatePost { author_id, content } => {
            let post = store.create_post(author_id, &content).await?;
            Ok(ThreadEvent::PostCreated { post })
        }
        ThreadCommand::AddReply {
            target,
            author_id,
            content,
            reply_to,
        } => {
            let comment = store
                .add_reply(&target, author_id, &content, reply_to.as_ref())
                .await?;
            Ok(ThreadEvent::ReplyAdded {
                target,
                reply_to,
                comment,
            })
        }
        ThreadCommand::ToggleReaction {
            target,
            node_id,
            user_id,
            kind,
        } => {
            let reaction = store
                .toggle_reaction(&target, &node_id, &user_id, kind)
                .await?;
            Ok(ThreadEvent::ReactionToggled {
                target,
                node_id,
                user_id,
                reaction,
            })
        }
    }
}
