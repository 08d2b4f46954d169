//! Request routing.
//!
//! Takes one decoded frame payload, validates its shape, routes it to the
//! matching operation handler, and renders every failure into a response
//! document so the connection can keep going.

use crate::message::{FieldError, Kind, Request, Response};
use crate::ops::{self, OpError};
use crate::quiz::{QuestionBank, QuizSession};
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error};

/// Message sent when a handler fails in an unforeseen way
const INTERNAL_ERROR: &str = "Internal server error while processing request.";

/// Turn one request payload into the reply payload.
///
/// Never fails: malformed input, validation failures, and handler panics
/// all come back as error documents.
pub fn dispatch(payload: &str, session: &mut QuizSession, bank: &QuestionBank) -> String {
    respond(payload, session, bank).into_json()
}

fn respond(payload: &str, session: &mut QuizSession, bank: &QuestionBank) -> Response {
    let document: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(_) => return Response::failure("req not JSON"),
    };

    let fields = match document {
        Value::Object(fields) => fields,
        // Valid JSON but not a request object; arrays get their own reply
        Value::Array(_) => return Response::failure("Invalid JSON format."),
        _ => return Response::failure("req not JSON"),
    };

    let request = Request::new(fields);

    let op = match request.get("type") {
        None => return Response::failure("No request type was given."),
        Some(Value::String(op)) => op.clone(),
        Some(_) => {
            let err = FieldError::WrongKind("type".to_string(), Kind::Str);
            return Response::failure(&err.to_string());
        }
    };

    let outcome = catch_unwind(AssertUnwindSafe(|| route(&op, &request, session, bank)));

    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            debug!(op = %op, error = %err, "Request rejected");
            Response::failure_for(&op, &err.to_string())
        }
        Err(panic) => {
            error!(op = %op, detail = %panic_detail(&panic), "Handler panicked");
            Response::failure_for(&op, INTERNAL_ERROR)
        }
    }
}

fn route(
    op: &str,
    request: &Request,
    session: &mut QuizSession,
    bank: &QuestionBank,
) -> Result<Response, OpError> {
    match op {
        "echo" => ops::echo::handle(request),
        "add" => ops::math::add(request),
        "addmany" => ops::math::add_many(request),
        "stringconcatenation" => ops::strings::handle(request),
        "quizgame" => ops::quizgame::handle(request, session, bank),
        other => Err(OpError::Domain(format!("Type {} is not supported.", other))),
    }
}

fn panic_detail(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
