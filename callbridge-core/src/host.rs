use async_trait::async_trait;

/// The answering side of the protocol.
#[async_trait]
pub trait Host: Send + Sync {
    /// Answers one outbound message. `None` means the message could not be
    /// decoded and there is no token to reply to.
    async fn handle(&self, message: &str) -> Option<String>;
}
