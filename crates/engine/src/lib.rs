mod worker;

pub use worker::apply;

use domain::{ThreadCommand, ThreadError, ThreadEvent};
use storage::Store;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A command plus the channel its result is sent back on.
pub struct CommandEnvelope {
    pub cmd: ThreadCommand,
    pub resp: oneshot::Sender<Result<ThreadEvent, ThreadError>>,
}

impl CommandEnvelope {
    pub fn new(cmd: ThreadCommand) -> (Self, oneshot::Receiver<Result<ThreadEvent, ThreadError>>) {
        let (resp, rx) = oneshot::channel();
        (Self { cmd, resp }, rx)
    }
}

/// Applies commands one at a time, in the order they were received, until the
/// channel closes or `cancel_token` fires.
pub async fn start_with_cancel_token(
    store: Store,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel_token: CancellationToken,
) -> anyhow::Result<()> {
    info!("Thread worker started");

    loop {
        tokio::select! {
            envelope = rx.recv() => {
                let Some(CommandEnvelope { cmd, resp }) = envelope else {
                    break;
                };

                let result = apply(&store, cmd).await;
                if resp.send(result).is_err() {
                    debug!("Caller went away before the result was delivered");
                }
            },
            _ = cancel_token.cancelled() => break,
        }
    }

    info!("Thread worker stopped");
    Ok(())
}
