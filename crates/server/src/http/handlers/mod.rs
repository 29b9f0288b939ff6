pub mod milongas;
pub mod posts;

use axum::{http::StatusCode, Json};
use domain::{
    thread, Comment, NodeId, ReactionKind, Target, ThreadCommand, ThreadError, ThreadEvent, UserId,
};
use engine::CommandEnvelope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::state::AppState;

pub type ApiError = (StatusCode, String);

const WORKER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub author_id: String,
    pub content: String,
    pub reply_to: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize)]
pub struct ReactionResponse {
    pub reaction: Option<ReactionKind>,
    pub counts: BTreeMap<ReactionKind, usize>,
}

pub(crate) fn reject(e: ThreadError) -> ApiError {
    let status = match e {
        ThreadError::ItemNotFound(_) | ThreadError::NodeNotFound(_) => StatusCode::NOT_FOUND,
        ThreadError::EmptyContent => StatusCode::BAD_REQUEST,
    };
    (status, e.to_string())
}

pub(crate) fn require_user(raw: &str, field: &str) -> Result<UserId, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err((StatusCode::BAD_REQUEST, format!("{} is required", field)));
    }
    Ok(UserId::new(raw))
}

/// Hands a command to the worker and waits for its result.
pub(crate) async fn dispatch(state: &AppState, cmd: ThreadCommand) -> Result<ThreadEvent, ApiError> {
    let (envelope, rx) = CommandEnvelope::new(cmd);

    state
        .sender
        .send(envelope)
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Worker closed".to_string()))?;

    match tokio::time::timeout(WORKER_TIMEOUT, rx).await {
        Ok(Ok(result)) => result.map_err(reject),
        Ok(Err(_)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Worker dropped the request".to_string(),
        )),
        Err(_) => Err((StatusCode::GATEWAY_TIMEOUT, "Timeout".into())),
    }
}

pub(crate) async fn add_reply(
    state: &AppState,
    target: Target,
    payload: ReplyRequest,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let author_id = require_user(&payload.author_id, "authorId")?;

    let cmd = ThreadCommand::AddReply {
        target,
        author_id,
        content: payload.content,
        reply_to: payload.reply_to.map(NodeId::new),
    };

    match dispatch(state, cmd).await? {
        ThreadEvent::ReplyAdded { comment, .. } => Ok((StatusCode::CREATED, Json(comment))),
        other => Err(unexpected(other)),
    }
}

pub(crate) async fn toggle_reaction(
    state: &AppState,
    target: Target,
    node_id: String,
    payload: ReactionRequest,
) -> Result<Json<ReactionResponse>, ApiError> {
    let user_id = require_user(&payload.user_id, "userId")?;
    let kind: ReactionKind = payload
        .kind
        .parse()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let node_id = NodeId::new(node_id);

    let cmd = ThreadCommand::ToggleReaction {
        target: target.clone(),
        node_id: node_id.clone(),
        user_id,
        kind,
    };

    let reaction = match dispatch(state, cmd).await? {
        ThreadEvent::ReactionToggled { reaction, .. } => reaction,
        other => return Err(unexpected(other)),
    };

    let counts = node_reaction_counts(state, &target, &node_id)
        .await
        .unwrap_or_default();
    Ok(Json(ReactionResponse { reaction, counts }))
}

async fn node_reaction_counts(
    state: &AppState,
    target: &Target,
    node_id: &NodeId,
) -> Option<BTreeMap<ReactionKind, usize>> {
    match target {
        Target::Post(id) => {
            let post = state.store.get_post(id).await?;
            thread::find_node(&post.comments, node_id).map(|n| n.reactions.counts())
        }
        Target::Milonga(id) => {
            let milonga = state.store.get_milonga(id).await?;
            thread::find_node(&milonga.inquiries, node_id).map(|n| n.reactions.counts())
        }
    }
}

pub(crate) fn unexpected(event: ThreadEvent) -> ApiError {
    tracing::error!("Worker answered with an unrelated event: {:?}", event);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Unexpected worker response".to_string(),
    )
}
