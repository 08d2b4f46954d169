//! Request field access and response construction.
//!
//! Requests are decoded JSON objects; handlers pull fields out through the
//! `require_*` accessors, which produce the deterministic error strings
//! clients are tested against. Responses are built through [`Response`],
//! which guarantees the `ok` field is always present.

use serde_json::{Map, Value};

/// Primitive type named in field errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Str,
    Int,
    Bool,
    Array,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Str => "String",
            Kind::Int => "int",
            Kind::Bool => "Boolean",
            Kind::Array => "JSON Array",
        };
        write!(f, "{}", name)
    }
}

/// Field validation failure, formatted exactly as clients expect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Required field absent from the request
    Missing(String),
    /// Field present with the wrong primitive type
    WrongKind(String, Kind),
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::Missing(name) => {
                write!(f, "Field {} does not exist in request", name)
            }
            FieldError::WrongKind(name, kind) => {
                write!(f, "Field {} needs to be of type: {}", name, kind)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// A decoded request document
#[derive(Debug, Clone)]
pub struct Request {
    fields: Map<String, Value>,
}

impl Request {
    pub fn new(fields: Map<String, Value>) -> Self {
        Request { fields }
    }

    /// Whether the field is present at all
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Require the field to be present
    pub fn require(&self, name: &str) -> Result<&Value, FieldError> {
        self.fields
            .get(name)
            .ok_or_else(|| FieldError::Missing(name.to_string()))
    }

    /// Require a string field
    pub fn require_str(&self, name: &str) -> Result<&str, FieldError> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| FieldError::WrongKind(name.to_string(), Kind::Str))
    }

    /// Require a boolean field
    pub fn require_bool(&self, name: &str) -> Result<bool, FieldError> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| FieldError::WrongKind(name.to_string(), Kind::Bool))
    }

    /// Require an array field
    pub fn require_array(&self, name: &str) -> Result<&Vec<Value>, FieldError> {
        self.require(name)?
            .as_array()
            .ok_or_else(|| FieldError::WrongKind(name.to_string(), Kind::Array))
    }

    /// Require an integer field, accepting the string-encoded form
    pub fn require_int(&self, name: &str) -> Result<i64, FieldError> {
        let value = self.require(name)?;
        as_int(value).ok_or_else(|| FieldError::WrongKind(name.to_string(), Kind::Int))
    }

    /// Parse a request from raw JSON for tests
    #[cfg(test)]
    pub fn from_json(raw: &str) -> Self {
        let value: Value = serde_json::from_str(raw).unwrap();
        Request::new(value.as_object().unwrap().clone())
    }
}

/// Integer coercion: a JSON integer, or a string holding one.
///
/// Floats, booleans, and non-numeric strings are rejected.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}

/// Builder for response documents; `ok` is set at construction
#[derive(Debug, Clone)]
pub struct Response {
    fields: Map<String, Value>,
}

impl Response {
    /// Successful response for an operation type
    pub fn success(op: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("ok".to_string(), Value::Bool(true));
        fields.insert("type".to_string(), Value::String(op.to_string()));
        Response { fields }
    }

    /// Failure with a message and no operation type
    pub fn failure(message: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("ok".to_string(), Value::Bool(false));
        fields.insert("message".to_string(), Value::String(message.to_string()));
        Response { fields }
    }

    /// Failure tagged with the operation type it arose from
    pub fn failure_for(op: &str, message: &str) -> Self {
        let mut response = Response::failure(message);
        response
            .fields
            .insert("type".to_string(), Value::String(op.to_string()));
        response
    }

    /// Attach an extra field
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Render to the wire payload
    pub fn into_json(self) -> String {
        Value::Object(self.fields).to_string()
    }
}
