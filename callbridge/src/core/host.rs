use crate::core::wire;
use async_trait::async_trait;
use callbridge_core::error::{HostError, RegistryError};
use callbridge_core::host::Host;
use callbridge_core::request::CallRequest;
use callbridge_core::response::CallResponse;
use futures_util::future::BoxFuture;
use futures_util::{FutureExt, TryFutureExt};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use tokio::sync::Mutex;
use tower::{Service, ServiceExt};
use tracing::{debug, warn};

pub(crate) type BoxHandlerService = tower::util::BoxService<CallRequest, Value, HostError>;

/// Adapts an async closure into a handler.
pub fn handler_fn<F, Fut, R, E>(f: F) -> tower::util::ServiceFn<F>
where
    F: FnMut(CallRequest) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    tower::service_fn(f)
}

#[repr(transparent)]
pub(crate) struct HandlerService<S>(pub S);

impl<S> Service<CallRequest> for HandlerService<S>
where
    S: Service<CallRequest> + Send + 'static,
    S::Response: Into<Value> + Send + 'static,
    S::Error: Into<HostError> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Value;
    type Error = HostError;
    type Future = BoxFuture<'static, Result<Value, HostError>>;

    #[inline(always)]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.0.poll_ready(cx).map_err(Into::into)
    }

    #[inline(always)]
    fn call(&mut self, req: CallRequest) -> Self::Future {
        self.0
            .call(req)
            .map_ok(Into::into)
            .map_err(Into::into)
            .boxed()
    }
}

/// A registered handler. Becomes dead once its name is removed or replaced.
#[derive(Clone)]
pub struct Handler(pub(crate) Weak<Mutex<BoxHandlerService>>);

impl Handler {
    pub async fn call(&self, req: CallRequest) -> Result<Value, HostError> {
        let Some(handler) = self.0.upgrade() else {
            return Err(HostError::UnknownMethod(req.method));
        };

        let response = {
            let mut guard = handler.lock().await;
            let svc = &mut *guard;
            svc.ready().await?.call(req)
        };

        response.await
    }
}

pub struct HandlersRegistry {
    handlers: RwLock<HashMap<String, Arc<Mutex<BoxHandlerService>>>>,
}

impl Default for HandlersRegistry {
    fn default() -> Self {
        Self {
            handlers: Default::default(),
        }
    }
}

impl HandlersRegistry {
    pub fn register<S>(&self, name: &str, svc: S) -> Result<(), RegistryError>
    where
        S: Service<CallRequest> + Send + 'static,
        S::Response: Into<Value> + Send + 'static,
        S::Error: Into<HostError> + Send + 'static,
        S::Future: Send + 'static,
    {
        let mut handlers = self.handlers.write();

        match handlers.entry(name.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyExists(name.to_string())),
            Entry::Vacant(entry) => {
                let svc = BoxHandlerService::new(HandlerService(svc));
                entry.insert(Arc::new(Mutex::new(svc)));
                Ok(())
            }
        }
    }

    pub fn register_or_replace<S>(&self, name: &str, svc: S)
    where
        S: Service<CallRequest> + Send + 'static,
        S::Response: Into<Value> + Send + 'static,
        S::Error: Into<HostError> + Send + 'static,
        S::Future: Send + 'static,
    {
        let svc = BoxHandlerService::new(HandlerService(svc));

        self.handlers
            .write()
            .insert(name.to_string(), Arc::new(Mutex::new(svc)));
    }

    pub fn get(&self, name: &str) -> Option<Handler> {
        let handlers = self.handlers.read();
        handlers.get(name).map(|h| Handler(Arc::downgrade(h)))
    }

    pub fn remove(&self, name: &str) {
        self.handlers.write().remove(name);
    }
}

/// Host half of the protocol: decodes calls, runs the named handler and
/// encodes the response envelope.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HandlersRegistry,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S>(&self, method: &str, svc: S) -> Result<(), RegistryError>
    where
        S: Service<CallRequest> + Send + 'static,
        S::Response: Into<Value> + Send + 'static,
        S::Error: Into<HostError> + Send + 'static,
        S::Future: Send + 'static,
    {
        self.handlers.register(method, svc)
    }

    pub fn register_or_replace<S>(&self, method: &str, svc: S)
    where
        S: Service<CallRequest> + Send + 'static,
        S::Response: Into<Value> + Send + 'static,
        S::Error: Into<HostError> + Send + 'static,
        S::Future: Send + 'static,
    {
        self.handlers.register_or_replace(method, svc)
    }

    pub fn deregister(&self, method: &str) {
        self.handlers.remove(method)
    }

    pub async fn dispatch(&self, request: CallRequest) -> CallResponse {
        let id = request.id.clone();

        let outcome = match self.handlers.get(request.method()) {
            Some(handler) => handler.call(request).await,
            None => Err(HostError::UnknownMethod(request.method)),
        };

        match outcome {
            Ok(result) => CallResponse::ok(&id, result),
            Err(err) => {
                debug!(id = %id, error = %err, "call failed on host");
                CallResponse::err(&id, &err.to_string())
            }
        }
    }
}

#[async_trait]
impl Host for Dispatcher {
    async fn handle(&self, message: &str) -> Option<String> {
        let request = match wire::parse_request(message) {
            Ok(v) => v,
            Err(err) => {
                warn!(error = %err, "dropping undecodable call");
                return None;
            }
        };

        let response = self.dispatch(request).await;

        Some(wire::encode_response(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::convert::Infallible;

    fn add(req: CallRequest) -> impl Future<Output = Result<Value, HostError>> {
        async move {
            let mut sum = 0;
            for arg in req.args() {
                sum += match arg {
                    Value::Number(v) => v.as_i64(),
                    Value::String(v) => v.parse().ok(),
                    _ => None,
                }
                .ok_or_else(|| HostError::Failed(format!("not a number: {arg}")))?;
            }

            Ok(json!(sum))
        }
    }

    fn dispatcher() -> Dispatcher {
        let dispatcher = Dispatcher::new();
        dispatcher.register("add", handler_fn(add)).unwrap();
        dispatcher
            .register(
                "fail",
                handler_fn(|_| async { Err::<Value, _>(anyhow::anyhow!("boom")) }),
            )
            .unwrap();
        dispatcher
    }

    #[tokio::test]
    async fn answers_legacy_call() {
        let reply = dispatcher().handle("k1:add,2,3").await.unwrap();

        assert_eq!(wire::parse_response(&reply).unwrap(), CallResponse::ok("k1", json!(5)));
    }

    #[tokio::test]
    async fn handler_error_becomes_error_envelope() {
        let reply = dispatcher().handle("k1:fail,").await.unwrap();

        assert_eq!(wire::parse_response(&reply).unwrap(), CallResponse::err("k1", "boom"));
    }

    #[tokio::test]
    async fn unknown_method() {
        let reply = dispatcher().handle("k1:missing,").await.unwrap();
        let response = wire::parse_response(&reply).unwrap();

        assert_eq!(response, CallResponse::err("k1", "unknown method: missing"));
    }

    #[tokio::test]
    async fn undecodable_call_gets_no_reply() {
        assert!(dispatcher().handle("garbage").await.is_none());
    }

    #[tokio::test]
    async fn duplicate_registration() {
        let dispatcher = dispatcher();
        let echo = handler_fn(|req: CallRequest| async move {
            Ok::<_, Infallible>(Value::Array(req.args))
        });

        assert!(matches!(
            dispatcher.register("add", echo.clone()),
            Err(RegistryError::AlreadyExists(name)) if name == "add"
        ));

        dispatcher.register_or_replace("add", echo);
        let response = dispatcher
            .dispatch(CallRequest::new("k2", "add", vec![json!(1)]))
            .await;

        assert_eq!(response, CallResponse::ok("k2", json!([1])));
    }

    #[tokio::test]
    async fn deregistered_handler_is_unknown() {
        let dispatcher = dispatcher();
        let handler = dispatcher.handlers.get("add").unwrap();
        dispatcher.deregister("add");

        let outcome = handler.call(CallRequest::new("k3", "add", vec![])).await;
        assert_eq!(outcome, Err(HostError::UnknownMethod("add".into())));
    }
}
