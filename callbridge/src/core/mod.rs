use callbridge_core::calls::*;
use callbridge_core::transport::Transport;
use serde_json::Value;
use tracing::{debug, trace, warn};

pub mod call;
pub mod channel;
pub mod config;
pub mod host;
mod pending;
pub mod token;
pub mod wire;

use crate::core::call::CallFuture;
use crate::core::config::BrokerConfig;
use crate::core::pending::{PendingCalls, Settle};
use crate::core::token::TokenGenerator;
use crate::core::wire::WireFormat;
use tokio::sync::oneshot;

/// Sends calls through a [`Transport`] and settles their futures when the
/// host pushes the responses back through [`Broker::complete`].
pub struct Broker<T> {
    transport: T,
    pending: PendingCalls,
    tokens: TokenGenerator,
    wire_format: WireFormat,
}

impl<T> Broker<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, BrokerConfig::default())
    }

    pub fn with_config(transport: T, config: BrokerConfig) -> Self {
        Self {
            transport,
            pending: PendingCalls::default(),
            tokens: TokenGenerator::new(config.tokens),
            wire_format: config.wire_format,
        }
    }

    /// Sends `method(args...)` to the host. Never blocks and never fails
    /// synchronously; every outcome arrives through the returned future.
    pub fn invoke(&self, method: &str, args: Vec<Value>) -> CallFuture {
        if !wire::is_valid_method(method) {
            warn!(method, "rejecting call with invalid method name");
            return CallFuture::rejected(CallError::InvalidMethod(method.to_owned()));
        }

        let (settle, outcome) = oneshot::channel();
        let id = self.register(settle);

        let request = CallRequest::new(&id, method, args);
        let message = wire::encode_request(self.wire_format, &request);
        trace!(id = %id, message = %message, "encoded call");

        // The table lock is released here, so a transport may answer re-entrantly.
        debug!(id = %id, method, "dispatching call");
        self.transport.send(message);

        CallFuture::new(id, outcome)
    }

    /// Entry point for the host: decodes a response envelope and settles the
    /// matching call. Malformed envelopes and unknown tokens are dropped.
    pub fn complete(&self, envelope: &str) {
        match wire::parse_response(envelope) {
            Ok(response) => self.complete_response(response),
            Err(err) => warn!(error = %err, "dropping malformed response envelope"),
        }
    }

    pub fn complete_response(&self, response: CallResponse) {
        let Some(settle) = self.pending.take(response.id()) else {
            debug!(id = %response.id, "ignoring response for unknown call");
            return;
        };

        let id = response.id.clone();
        let outcome = response.into_outcome();
        debug!(id = %id, ok = outcome.is_ok(), "settling call");

        // The caller may have dropped its future already.
        let _ = settle.send(outcome);
    }

    /// Withdraws a pending call and fails its future with
    /// [`CallError::Cancelled`]. A response arriving later is ignored.
    pub fn cancel(&self, id: &str) -> bool {
        match self.pending.take(id) {
            Some(settle) => {
                debug!(id, "cancelling call");
                let _ = settle.send(Err(CallError::Cancelled));
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.pending.ids()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn register(&self, mut settle: Settle) -> String {
        loop {
            let id = self.tokens.next();

            match self.pending.register(&id, settle) {
                Ok(()) => return id,
                Err(returned) => {
                    warn!(id = %id, "correlation token already in flight, drawing another");
                    settle = returned;
                }
            }
        }
    }
}

impl<T> callbridge_core::broker::Broker for Broker<T>
where
    T: Transport,
{
    type Call = CallFuture;

    fn invoke(&self, method: &str, args: Vec<Value>) -> Self::Call {
        Broker::invoke(self, method, args)
    }

    fn complete(&self, envelope: &str) {
        Broker::complete(self, envelope)
    }

    fn cancel(&self, id: &str) -> bool {
        Broker::cancel(self, id)
    }
}
