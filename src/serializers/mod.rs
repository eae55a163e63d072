//! JSON representations of snippets and users, and request body parsing.

mod links;
pub use links::Links;

pub mod pagination;
pub mod snippet_serializer;
pub mod user_serializer;

use actix_web::{web::Bytes, HttpMessage, HttpRequest};
use serde_json::{Map, Value};

use crate::error::{ApiError, FieldErrors};

/// Parses a request body as a JSON document.
///
/// An empty body reads as an empty object.
pub fn parse_body(req: &HttpRequest, body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let content_type = req.content_type();
    if content_type != "application/json" && !content_type.ends_with("+json") {
        return Err(ApiError::UnsupportedMediaType);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Borrows the body as an object, or reports what it was instead.
pub fn expect_object(data: &Value) -> Result<&Map<String, Value>, ApiError> {
    match data {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::Validation(FieldErrors::single(
            "non_field_errors",
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(other)
            ),
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
