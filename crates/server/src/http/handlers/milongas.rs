use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::{Comment, ItemId, Milonga, Target, ThreadError};
use std::sync::Arc;
use storage::Store;

use super::{add_reply, reject, toggle_reaction, ApiError, ReactionRequest, ReactionResponse, ReplyRequest};
use crate::state::AppState;

pub async fn list_milongas(State(store): State<Store>) -> Json<Vec<Arc<Milonga>>> {
    Json(store.list_milongas().await)
}

pub async fn get_milonga(
    State(store): State<Store>,
    Path(milonga_id): Path<String>,
) -> Result<Json<Arc<Milonga>>, ApiError> {
    let id = ItemId::new(milonga_id);
    store
        .get_milonga(&id)
        .await
        .map(Json)
        .ok_or_else(|| reject(ThreadError::ItemNotFound(id)))
}

pub async fn post_inquiry(
    State(state): State<AppState>,
    Path(milonga_id): Path<String>,
    Json(payload): Json<ReplyRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    add_reply(&state, Target::Milonga(ItemId::new(milonga_id)), payload).await
}

pub async fn react_to_inquiry(
    State(state): State<AppState>,
    Path((milonga_id, node_id)): Path<(String, String)>,
    Json(payload): Json<ReactionRequest>,
) -> Result<Json<ReactionResponse>, ApiError> {
    toggle_reaction(&state, Target::Milonga(ItemId::new(milonga_id)), node_id, payload).await
}
