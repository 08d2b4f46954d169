//! Quiz game operations.
//!
//! One wire type covers two shapes. Requests with an `options` field are
//! the self-contained multiple-choice form, which touches no state.
//! Everything else drives the per-connection session machine: add a
//! question to the shared bank, draw a question, or answer the question
//! currently outstanding.

use crate::message::{as_int, FieldError, Kind, Request, Response};
use crate::ops::OpError;
use crate::quiz::{QuestionBank, QuizQuestion, QuizSession};
use serde_json::json;

const OP: &str = "quizgame";

pub fn handle(
    request: &Request,
    session: &mut QuizSession,
    bank: &QuestionBank,
) -> Result<Response, OpError> {
    if request.has("options") {
        multiple_choice(request)
    } else {
        session_turn(request, session, bank)
    }
}

/// One turn of the session game.
///
/// `addQuestion` is the first discriminator checked; a request carrying
/// both `addQuestion` and `answer` follows the add branch.
fn session_turn(
    request: &Request,
    session: &mut QuizSession,
    bank: &QuestionBank,
) -> Result<Response, OpError> {
    if request.has("addQuestion") {
        if request.require_bool("addQuestion")? {
            add_question(request, bank)
        } else {
            next_question(session, bank)
        }
    } else if request.has("answer") {
        check_answer(request, session)
    } else {
        Err(OpError::Domain(
            "Invalid quizgame request. Must include 'addQuestion' or 'answer'.".to_string(),
        ))
    }
}

/// Append a new question to the shared bank.
fn add_question(request: &Request, bank: &QuestionBank) -> Result<Response, OpError> {
    let text = request.require("question")?;
    let answer = request.require("answer")?;

    let text = text
        .as_str()
        .ok_or_else(|| FieldError::WrongKind("question".to_string(), Kind::Str))?;
    let answer = answer
        .as_str()
        .ok_or_else(|| FieldError::WrongKind("answer".to_string(), Kind::Str))?;

    if text.trim().is_empty() {
        return Err(OpError::Domain("Field question must not be empty".to_string()));
    }

    bank.add(QuizQuestion::new(text, answer));
    Ok(Response::success(OP))
}

/// Draw a random question and make it the session's outstanding one.
fn next_question(session: &mut QuizSession, bank: &QuestionBank) -> Result<Response, OpError> {
    match bank.pick() {
        Some(question) => {
            let text = question.text.clone();
            session.begin(question);
            Ok(Response::success(OP).with("question", json!(text)))
        }
        None => Err(OpError::Domain("No quiz questions available.".to_string())),
    }
}

/// Grade an answer against the outstanding question.
///
/// The no-active-question check runs before the answer's type is
/// validated. A correct answer clears the session; a wrong one leaves
/// the question outstanding and repeats its text as a hint.
fn check_answer(request: &Request, session: &mut QuizSession) -> Result<Response, OpError> {
    let question = match session.current() {
        Some(question) => question.clone(),
        None => {
            return Err(OpError::Domain(
                "No active quiz question. Please request a new question first.".to_string(),
            ))
        }
    };

    let given = request.require_str("answer")?;

    if question.accepts(given) {
        session.clear();
        Ok(Response::success(OP).with("result", json!(true)))
    } else {
        Ok(Response::success(OP)
            .with("result", json!(false))
            .with("question", json!(question.text)))
    }
}

/// Grade a self-contained multiple-choice question.
///
/// The answer is an index into `options`; the response echoes it back.
fn multiple_choice(request: &Request) -> Result<Response, OpError> {
    let question = request.require("question")?;
    let options = request.require("options")?;
    let answer = request.require("answer")?;

    question
        .as_str()
        .ok_or_else(|| FieldError::WrongKind("question".to_string(), Kind::Str))?;
    let options = options
        .as_array()
        .ok_or_else(|| FieldError::WrongKind("options".to_string(), Kind::Array))?;
    let answer =
        as_int(answer).ok_or_else(|| FieldError::WrongKind("answer".to_string(), Kind::Int))?;

    if answer < 0 || answer as usize >= options.len() {
        return Err(OpError::Domain("Answer is not in range of options".to_string()));
    }

    Ok(Response::success(OP).with("result", json!(answer)))
}
