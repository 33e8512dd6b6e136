use serde_json::Value;

/// A single outbound call: the correlation token, the method to run on the
/// host and its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    pub id: String,
    pub method: String,
    pub args: Vec<Value>,
}

impl CallRequest {
    pub fn new(id: &str, method: &str, args: Vec<Value>) -> Self {
        Self {
            id: id.to_owned(),
            method: method.to_owned(),
            args,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}
