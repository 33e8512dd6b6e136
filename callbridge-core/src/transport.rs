/// One-way channel to the host process.
///
/// Sending is fire-and-forget: there is no acknowledgement and no error
/// reported back to the broker.
pub trait Transport: Send + Sync {
    fn send(&self, message: String);
}

impl<F> Transport for F
where
    F: Fn(String) + Send + Sync,
{
    fn send(&self, message: String) {
        self(message)
    }
}
