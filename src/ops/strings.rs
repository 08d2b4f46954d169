//! String concatenation in its pair and list shapes.

use crate::message::{FieldError, Kind, Request, Response};
use crate::ops::OpError;
use serde_json::json;

const OP: &str = "stringconcatenation";

/// Route to the list or pair shape.
///
/// Requests carrying a `strings` field are the list shape; everything else
/// is treated as the two-field pair shape.
pub fn handle(request: &Request) -> Result<Response, OpError> {
    if request.has("strings") {
        concat_list(request)
    } else {
        concat_pair(request)
    }
}

/// Concatenate the `string1` and `string2` fields.
///
/// Presence of both fields is checked before either type.
fn concat_pair(request: &Request) -> Result<Response, OpError> {
    let first = request.require("string1")?;
    let second = request.require("string2")?;

    let first = first
        .as_str()
        .ok_or_else(|| FieldError::WrongKind("string1".to_string(), Kind::Str))?;
    let second = second
        .as_str()
        .ok_or_else(|| FieldError::WrongKind("string2".to_string(), Kind::Str))?;

    Ok(Response::success(OP).with("result", json!(format!("{}{}", first, second))))
}

/// Concatenate every element of the `strings` list in order.
fn concat_list(request: &Request) -> Result<Response, OpError> {
    let strings = request.require_array("strings")?;

    let mut result = String::new();
    for value in strings {
        match value.as_str() {
            Some(s) => result.push_str(s),
            None => {
                return Err(OpError::Domain(
                    "All elements in strings must be of type: String".to_string(),
                ))
            }
        }
    }

    Ok(Response::success(OP).with("result", json!(result)))
}
