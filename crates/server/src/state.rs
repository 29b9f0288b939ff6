use axum::extract::FromRef;
use engine::CommandEnvelope;
use storage::Store;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    // every mutation goes through the worker
    pub sender: mpsc::Sender<CommandEnvelope>,
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
