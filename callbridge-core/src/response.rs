use crate::error::CallError;
use crate::value::{is_truthy, render};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The envelope a host pushes back once a call has been answered.
///
/// Only one of `result` and `error` is meaningful. A truthy `error` wins even
/// when a result is present too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
    #[serde(rename = "callId", deserialize_with = "call_id")]
    pub id: String,
    #[serde(default)]
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl CallResponse {
    pub fn ok(id: &str, result: Value) -> Self {
        Self {
            id: id.to_owned(),
            result,
            error: None,
        }
    }

    pub fn err(id: &str, message: &str) -> Self {
        Self {
            id: id.to_owned(),
            result: Value::Null,
            error: Some(Value::String(message.to_owned())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_failure(&self) -> bool {
        self.error.as_ref().map_or(false, is_truthy)
    }

    pub fn into_outcome(self) -> Result<Value, CallError> {
        match self.error {
            Some(error) if is_truthy(&error) => Err(CallError::Remote(render(&error))),
            _ => Ok(self.result),
        }
    }
}

fn call_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(v) => Ok(v),
        number @ Value::Number(_) => Ok(render(&number)),
        other => Err(serde::de::Error::custom(format!(
            "callId must be a string or a number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(text: &str) -> CallResponse {
        serde_json::from_str(text).expect("valid envelope")
    }

    #[test]
    fn error_takes_precedence_over_result() {
        let response = decode(r#"{"callId":"a1","result":5,"error":"boom"}"#);

        assert!(response.is_failure());
        assert_eq!(response.into_outcome(), Err(CallError::Remote("boom".into())));
    }

    #[test]
    fn falsy_error_is_success() {
        let response = decode(r#"{"callId":"a1","result":{"x":[1,2]},"error":""}"#);

        assert_eq!(response.into_outcome(), Ok(json!({"x": [1, 2]})));
    }

    #[test]
    fn missing_result_is_null() {
        let response = decode(r#"{"callId":"a1"}"#);

        assert_eq!(response.into_outcome(), Ok(Value::Null));
    }

    #[test]
    fn numeric_call_id() {
        assert_eq!(decode(r#"{"callId":17,"result":1}"#).id(), "17");
    }

    #[test]
    fn integral_float_call_id_matches_integer_token() {
        assert_eq!(decode(r#"{"callId":1.0,"result":5}"#).id(), "1");
    }

    #[test]
    fn rejects_missing_call_id() {
        assert!(serde_json::from_str::<CallResponse>(r#"{"result":1}"#).is_err());
        assert!(serde_json::from_str::<CallResponse>(r#"{"callId":null}"#).is_err());
    }

    #[test]
    fn non_string_error_is_rendered() {
        let response = decode(r#"{"callId":"a1","error":404}"#);

        assert_eq!(response.into_outcome(), Err(CallError::Remote("404".into())));
    }

    #[test]
    fn serializes_with_call_id_field() {
        let text = serde_json::to_string(&CallResponse::ok("a1", json!(5))).unwrap();

        assert_eq!(text, r#"{"callId":"a1","result":5}"#);
    }
}
