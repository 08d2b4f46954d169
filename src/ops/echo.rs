//! Echo operation: returns the supplied text behind a fixed prefix.

use crate::message::{Request, Response};
use crate::ops::OpError;
use serde_json::json;

/// Prefix prepended to every echoed string
const ECHO_PREFIX: &str = "Here is your echo: ";

pub fn handle(request: &Request) -> Result<Response, OpError> {
    let data = request.require_str("data")?;
    Ok(Response::success("echo").with("echo", json!(format!("{}{}", ECHO_PREFIX, data))))
}
