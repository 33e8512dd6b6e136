//! Text encodings used between the broker and the host.
//!
//! Outbound calls travel either in the legacy `token:method,arg,...` form or
//! as a JSON object. Responses are always JSON envelopes.

use callbridge_core::error::WireError;
use callbridge_core::request::CallRequest;
use callbridge_core::response::CallResponse;
use callbridge_core::value::render;
use nom::branch::alt;
use nom::bytes::complete::{is_not, take_while};
use nom::character::complete::{char, satisfy};
use nom::combinator::{all_consuming, eof, map, recognize, rest, value};
use nom::multi::separated_list1;
use nom::sequence::{pair, preceded, tuple};
use nom::IResult;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// `"<token>:<method>,<arg1>,...,<argN>"`. Arguments lose their types.
    #[default]
    Legacy,
    /// `{"callId": .., "method": .., "args": [..]}`.
    Json,
}

#[derive(Serialize, Deserialize)]
struct JsonRequest {
    #[serde(rename = "callId")]
    call_id: String,
    method: String,
    #[serde(default)]
    args: Vec<Value>,
}

pub fn encode_request(format: WireFormat, request: &CallRequest) -> String {
    match format {
        WireFormat::Legacy => {
            let args = request.args.iter().map(render).collect::<Vec<_>>();

            format!("{}:{},{}", request.id, request.method, args.join(","))
        }
        WireFormat::Json => json!({
            "callId": request.id,
            "method": request.method,
            "args": request.args,
        })
        .to_string(),
    }
}

/// Decodes an outbound call on the host side, detecting the format from the
/// first character.
pub fn parse_request(text: &str) -> Result<CallRequest, WireError> {
    if text.trim_start().starts_with('{') {
        let JsonRequest {
            call_id,
            method,
            args,
        } = serde_json::from_str(text)?;

        if !is_valid_method(&method) {
            return Err(WireError::Malformed(format!("invalid method name `{method}`")));
        }

        return Ok(CallRequest {
            id: call_id,
            method,
            args,
        });
    }

    let (_, (id, _, method, args)) =
        legacy_request(text).map_err(|e| WireError::Malformed(format!("{:?}", e)))?;

    let args = match args {
        None | Some("") => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(|arg| Value::String(arg.to_owned()))
            .collect(),
    };

    Ok(CallRequest::new(id, method, args))
}

pub fn encode_response(response: &CallResponse) -> String {
    let mut envelope = json!({
        "callId": response.id,
        "result": response.result,
    });

    if let Some(error) = &response.error {
        envelope["error"] = error.clone();
    }

    envelope.to_string()
}

pub fn parse_response(text: &str) -> Result<CallResponse, WireError> {
    Ok(serde_json::from_str(text)?)
}

/// One or more identifiers separated by `.`.
pub fn is_valid_method(name: &str) -> bool {
    all_consuming(method_name)(name).is_ok()
}

#[rustfmt::skip]
fn legacy_request(input: &str) -> IResult<&str, (&str, char, &str, Option<&str>)> {
    all_consuming(
        tuple((
            is_not(":"),
            char(':'),
            method_name,
            alt((
                value(None, eof),
                map(preceded(char(','), rest), Some),
            )),
        ))
    )(input)
}

fn method_name(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(char('.'), identifier))(input)
}

#[rustfmt::skip]
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(
        pair(
            satisfy(|c| c.is_ascii_alphabetic() || c == '_' || c == '$'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        )
    )(input)
}
