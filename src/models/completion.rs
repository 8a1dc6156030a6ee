use serde::ser::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use super::chat::{ChatCompletionResponse, ChatUsage};
use crate::error::ClientError;

const DISPLAY_INDENT: &[u8] = b"    ";

/// Raw payload returned by the endpoint for one chat completion.
///
/// The body keeps the endpoint's field order; the accessors below only read it.
/// Endpoints differ in the fields they add, so nothing beyond "a JSON object"
/// is enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    body: Map<String, Value>,
}

impl CompletionResponse {
    /// Parse a response body. Anything other than a JSON object is rejected as
    /// a transport-level failure, since the request itself was accepted.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ClientError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| ClientError::network(format!("malformed response body: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        match value {
            Value::Object(body) => Ok(Self { body }),
            other => Err(ClientError::network(format!(
                "malformed response body: expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn as_json(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.body)
    }

    pub fn id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }

    pub fn model(&self) -> Option<&str> {
        self.body.get("model").and_then(Value::as_str)
    }

    fn first_choice(&self) -> Option<&Value> {
        self.body.get("choices")?.as_array()?.first()
    }

    /// Generated assistant text of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.first_choice()?
            .get("message")?
            .get("content")?
            .as_str()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.first_choice()?.get("finish_reason")?.as_str()
    }

    pub fn usage(&self) -> Option<ChatUsage> {
        self.body
            .get("usage")
            .and_then(|u| serde_json::from_value(u.clone()).ok())
    }

    /// Typed view, when the payload follows the OpenAI response shape.
    pub fn typed(&self) -> Result<ChatCompletionResponse, serde_json::Error> {
        serde_json::from_value(Value::Object(self.body.clone()))
    }

    /// Indented JSON rendering used for display.
    pub fn to_pretty_json(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompletionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(DISPLAY_INDENT));
        self.body.serialize(&mut ser).map_err(|_| fmt::Error)?;
        let text = std::str::from_utf8(&buf).map_err(|_| fmt::Error)?;
        f.write_str(text)
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
