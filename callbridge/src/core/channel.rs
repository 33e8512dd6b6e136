use async_channel::{Receiver, Sender};
use callbridge_core::host::Host;
use callbridge_core::transport::Transport;
use std::sync::Arc;
use tracing::warn;

/// In-process transport: outbound messages are queued on an unbounded
/// channel for a [`serve`] loop to pick up.
#[derive(Clone)]
pub struct ChannelTransport {
    sender: Sender<String>,
}

impl ChannelTransport {
    pub fn unbounded() -> (Self, Receiver<String>) {
        let (sender, receiver) = async_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: String) {
        if self.sender.try_send(message).is_err() {
            warn!("host channel closed, outbound call dropped");
        }
    }
}

/// Answers every message arriving on `receiver`, each on its own task, and
/// hands the replies to `deliver`. Returns once all senders are gone.
pub async fn serve<H, D>(host: Arc<H>, receiver: Receiver<String>, deliver: D)
where
    H: Host + ?Sized + 'static,
    D: Fn(String) + Send + Sync + 'static,
{
    let deliver = Arc::new(deliver);

    while let Ok(message) = receiver.recv().await {
        let host = host.clone();
        let deliver = deliver.clone();

        tokio::spawn(async move {
            if let Some(reply) = host.handle(&message).await {
                deliver(reply);
            }
        });
    }
}
