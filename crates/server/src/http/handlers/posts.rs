use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::{thread, Comment, ItemId, Post, Target, ThreadCommand, ThreadError, ThreadEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::Store;

use super::{add_reply, dispatch, reject, require_user, toggle_reaction, unexpected};
use super::{ApiError, ReactionRequest, ReactionResponse, ReplyRequest};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub author_id: String,
    pub content: String,
}

/// Feed entry: the post plus the size of its whole thread.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
    #[serde(flatten)]
    pub post: Arc<Post>,
    pub comment_count: usize,
}

pub async fn list_posts(State(store): State<Store>) -> Json<Vec<PostCard>> {
    let cards = store
        .list_posts()
        .await
        .into_iter()
        .map(|post| PostCard {
            comment_count: thread::count_nodes(&post.comments),
            post,
        })
        .collect();
    Json(cards)
}

pub async fn get_post(
    State(store): State<Store>,
    Path(post_id): Path<String>,
) -> Result<Json<Arc<Post>>, ApiError> {
    let id = ItemId::new(post_id);
    store
        .get_post(&id)
        .await
        .map(Json)
        .ok_or_else(|| reject(ThreadError::ItemNotFound(id)))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let author_id = require_user(&payload.author_id, "authorId")?;
    let cmd = ThreadCommand::CreatePost {
        author_id,
        content: payload.content,
    };

    match dispatch(&state, cmd).await? {
        ThreadEvent::PostCreated { post } => Ok((StatusCode::CREATED, Json(post))),
        other => Err(unexpected(other)),
    }
}

pub async fn post_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(payload): Json<ReplyRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    add_reply(&state, Target::Post(ItemId::new(post_id)), payload).await
}

pub async fn react_to_comment(
    State(state): State<AppState>,
    Path((post_id, node_id)): Path<(String, String)>,
    Json(payload): Json<ReactionRequest>,
) -> Result<Json<ReactionResponse>, ApiError> {
    toggle_reaction(&state, Target::Post(ItemId::new(post_id)), node_id, payload).await
}
