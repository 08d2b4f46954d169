//! Arithmetic operations: pairwise add and list summation.

use crate::message::{as_int, FieldError, Kind, Request, Response};
use crate::ops::OpError;
use serde_json::json;

/// Add two integer fields.
///
/// Presence of both fields is checked before either value is parsed, and
/// a value that is neither an integer nor an integer-valued string yields
/// the shared num1/num2 type error.
pub fn add(request: &Request) -> Result<Response, OpError> {
    let first = request.require("num1")?;
    let second = request.require("num2")?;

    let sum = match (as_int(first), as_int(second)) {
        (Some(a), Some(b)) => a.wrapping_add(b),
        _ => {
            return Err(FieldError::WrongKind("num1/num2".to_string(), Kind::Int).into());
        }
    };

    Ok(Response::success("add").with("result", json!(sum)))
}

/// Sum a list of integers.
///
/// Any element that fails integer coercion aborts the whole request; no
/// partial sum is reported.
pub fn add_many(request: &Request) -> Result<Response, OpError> {
    let nums = request.require_array("nums")?;

    let mut sum: i64 = 0;
    for value in nums {
        match as_int(value) {
            Some(n) => sum = sum.wrapping_add(n),
            None => {
                return Err(OpError::Domain(
                    "Values in array need to be ints".to_string(),
                ))
            }
        }
    }

    Ok(Response::success("addmany").with("result", json!(sum)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn body(response: Response) -> Value {
        serde_json::from_str(&response.into_json()).unwrap()
    }

    #[test]
    fn test_add_integers() {
        let request = Request::from_json(r#"{"type":"add","num1":1,"num2":2}"#);
        let body = body(add(&request).unwrap());
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["type"], json!("add"));
        assert_eq!(body["result"], json!(3));
    }

    #[test]
    fn test_add_string_encoded_integers() {
        let request = Request::from_json(r#"{"type":"add","num1":"1","num2":"2"}"#);
        let body = body(add(&request).unwrap());
        assert_eq!(body["result"], json!(3));
    }

    #[test]
    fn test_add_negative_numbers() {
        let request = Request::from_json(r#"{"type":"add","num1":-5,"num2":"3"}"#);
        let body = body(add(&request).unwrap());
        assert_eq!(body["result"], json!(-2));
    }

    #[test]
    fn test_add_missing_num2() {
        let request = Request::from_json(r#"{"type":"add","num1":1}"#);
        let err = add(&request).unwrap_err();
        assert_eq!(err.to_string(), "Field num2 does not exist in request");
    }

    #[test]
    fn test_add_missing_num1_takes_precedence() {
        let request = Request::from_json(r#"{"type":"add","num2":2}"#);
        let err = add(&request).unwrap_err();
        assert_eq!(err.to_string(), "Field num1 does not exist in request");

        let request = Request::from_json(r#"{"type":"add"}"#);
        let err = add(&request).unwrap_err();
        assert_eq!(err.to_string(), "Field num1 does not exist in request");
    }

    #[test]
    fn test_add_non_numeric_value() {
        let request = Request::from_json(r#"{"type":"add","num1":"hello","num2":2}"#);
        let err = add(&request).unwrap_err();
        assert_eq!(err.to_string(), "Field num1/num2 needs to be of type: int");

        let request = Request::from_json(r#"{"type":"add","num1":1,"num2":true}"#);
        let err = add(&request).unwrap_err();
        assert_eq!(err.to_string(), "Field num1/num2 needs to be of type: int");
    }

    #[test]
    fn test_add_many_mixed_forms() {
        let request = Request::from_json(r#"{"type":"addmany","nums":["12","15","111","42"]}"#);
        let body = body(add_many(&request).unwrap());
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["type"], json!("addmany"));
        assert_eq!(body["result"], json!(180));

        let request = Request::from_json(r#"{"type":"addmany","nums":[1,"2",3]}"#);
        let body = self::body(add_many(&request).unwrap());
        assert_eq!(body["result"], json!(6));
    }

    #[test]
    fn test_add_many_empty_list() {
        let request = Request::from_json(r#"{"type":"addmany","nums":[]}"#);
        let body = body(add_many(&request).unwrap());
        assert_eq!(body["result"], json!(0));
    }

    #[test]
    fn test_add_many_rejects_non_numeric_entry() {
        let request = Request::from_json(r#"{"type":"addmany","nums":[1,"two",3]}"#);
        let err = add_many(&request).unwrap_err();
        assert_eq!(err.to_string(), "Values in array need to be ints");
    }

    #[test]
    fn test_add_many_missing_nums() {
        let request = Request::from_json(r#"{"type":"addmany"}"#);
        let err = add_many(&request).unwrap_err();
        assert_eq!(err.to_string(), "Field nums does not exist in request");
    }

    #[test]
    fn test_add_many_non_array_nums() {
        let request = Request::from_json(r#"{"type":"addmany","nums":"12"}"#);
        let err = add_many(&request).unwrap_err();
        assert_eq!(err.to_string(), "Field nums needs to be of type: JSON Array");
    }
}
