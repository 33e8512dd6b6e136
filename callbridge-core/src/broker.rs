use crate::error::CallError;
use serde_json::Value;
use std::future::Future;

pub trait Broker: Send + Sync {
    type Call: Future<Output = Result<Value, CallError>> + Send + 'static;

    fn invoke(&self, method: &str, args: Vec<Value>) -> Self::Call;
    fn complete(&self, envelope: &str);
    fn cancel(&self, id: &str) -> bool;
}
