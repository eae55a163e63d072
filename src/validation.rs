//! Field checks for writable snippet and user fields.
//!
//! Input is checked in two layers. [`string_field`] and [`parse_bool`] turn
//! raw JSON into typed values, reporting missing, null and mistyped fields.
//! Constraints on the typed values (blank, length, choices) are `validator`
//! rules declared on the structs themselves. A field reports at most one
//! message, and a type error hides any constraint error for the same field.

use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{error::FieldErrors, models::SnippetFields};

pub const REQUIRED: &str = "This field is required.";
pub const NULL: &str = "This field may not be null.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_BOOLEAN: &str = "Must be a valid boolean.";

pub fn invalid_choice_message(value: &str) -> String {
    format!("\"{value}\" is not a valid choice.")
}

/// Converts a raw JSON value to a string. Numbers keep their textual form.
pub fn string_value(raw: &Value) -> Result<String, &'static str> {
    match raw {
        Value::Null => Err(NULL),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(INVALID_STRING),
    }
}

/// Reads the string field `name` from `map`, falling back to `fallback` when
/// it is absent. Absent without a fallback is reported as required.
pub fn string_field(
    map: &Map<String, Value>,
    name: &str,
    fallback: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<String> {
    match (map.get(name), fallback) {
        (Some(raw), _) => string_value(raw)
            .map_err(|message| errors.add(name, message))
            .ok(),
        (None, Some(value)) => Some(value.to_owned()),
        (None, None) => {
            errors.add(name, REQUIRED);
            None
        }
    }
}

pub fn parse_bool(raw: &Value) -> Result<bool, &'static str> {
    match raw {
        Value::Null => Err(NULL),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(INVALID_BOOLEAN),
        },
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
            "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
            _ => Err(INVALID_BOOLEAN),
        },
        _ => Err(INVALID_BOOLEAN),
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("blank").with_message(BLANK.into()));
    }
    Ok(())
}

/// Membership in `choices`. The empty string is left to the blank rule.
pub fn one_of(value: &str, choices: &[&str]) -> Result<(), ValidationError> {
    if value.is_empty() || choices.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_choice").with_message(invalid_choice_message(value).into()))
}

/// Adds the first message of each failed field to `errors`, skipping fields
/// that already carry an error.
pub fn collect(errors: &mut FieldErrors, invalid: &ValidationErrors) {
    for (field, failures) in invalid.field_errors() {
        let field = field.to_string();
        if errors.get(&field).is_some() {
            continue;
        }
        if let Some(first) = failures.first() {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            errors.add(&field, message);
        }
    }
}

/// Re-checks a complete set of snippet fields before it is written.
pub fn validate_snippet(fields: &SnippetFields) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Err(invalid) = fields.validate() {
        collect(&mut errors, &invalid);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn fields() -> SnippetFields {
        SnippetFields::with_code("print(1)")
    }

    #[test]
    fn empty_code_is_blank() {
        let mut bad = fields();
        bad.code.clear();
        let errors = validate_snippet(&bad).unwrap_err();
        assert_eq!(errors.get("code").unwrap(), [BLANK.to_owned()]);
    }

    #[rstest]
    #[case("   ")]
    #[case("\n")]
    #[case("x")]
    fn whitespace_code_is_not_blank(#[case] code: &str) {
        let mut ok = fields();
        ok.code = code.into();
        assert!(validate_snippet(&ok).is_ok());
    }

    #[rstest]
    #[case(100, true)]
    #[case(101, false)]
    fn title_length_is_counted_in_characters(#[case] len: usize, #[case] ok: bool) {
        let mut snippet = fields();
        snippet.title = "é".repeat(len);
        match validate_snippet(&snippet) {
            Ok(()) => assert!(ok),
            Err(errors) => {
                assert!(!ok);
                assert_eq!(
                    errors.get("title").unwrap(),
                    ["Ensure this field has no more than 100 characters.".to_owned()]
                );
            }
        }
    }

    #[test]
    fn unknown_language_is_not_a_choice() {
        let mut bad = fields();
        bad.language = "brainfudge".into();
        let errors = validate_snippet(&bad).unwrap_err();
        assert_eq!(
            errors.get("language").unwrap(),
            ["\"brainfudge\" is not a valid choice.".to_owned()]
        );
    }

    #[test]
    fn blank_style_reports_only_blank() {
        let mut bad = fields();
        bad.style.clear();
        let errors = validate_snippet(&bad).unwrap_err();
        assert_eq!(errors.get("style").unwrap(), [BLANK.to_owned()]);
    }

    #[test]
    fn type_errors_hide_constraint_errors() {
        let mut bad = fields();
        bad.code.clear();
        let mut errors = FieldErrors::single("code", REQUIRED);
        collect(&mut errors, &bad.validate().unwrap_err());
        assert_eq!(errors.get("code").unwrap(), [REQUIRED.to_owned()]);
    }

    #[rstest]
    #[case(json!(null), Err(NULL))]
    #[case(json!(true), Err(INVALID_STRING))]
    #[case(json!(["a"]), Err(INVALID_STRING))]
    #[case(json!(42), Ok("42"))]
    #[case(json!("hi"), Ok("hi"))]
    fn strings_from_json_values(#[case] raw: Value, #[case] expected: Result<&str, &str>) {
        assert_eq!(string_value(&raw), expected.map(str::to_owned));
    }

    #[test]
    fn missing_field_without_fallback_is_required() {
        let map = Map::new();
        let mut errors = FieldErrors::new();
        assert_eq!(string_field(&map, "code", None, &mut errors), None);
        assert_eq!(string_field(&map, "title", Some(""), &mut errors), Some(String::new()));
        assert_eq!(errors, FieldErrors::single("code", REQUIRED));
    }

    #[rstest]
    #[case(json!(true), Ok(true))]
    #[case(json!("False"), Ok(false))]
    #[case(json!(1), Ok(true))]
    #[case(json!(2), Err(INVALID_BOOLEAN))]
    #[case(json!("maybe"), Err(INVALID_BOOLEAN))]
    #[case(json!(null), Err(NULL))]
    fn booleans(#[case] raw: Value, #[case] expected: Result<bool, &str>) {
        assert_eq!(parse_bool(&raw), expected);
    }

    #[test]
    fn validate_snippet_reports_every_bad_field() {
        let mut bad = fields();
        bad.code.clear();
        bad.title = "t".repeat(101);
        bad.style = "neon".into();

        let errors = validate_snippet(&bad).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["code", "style", "title"]);
        assert_eq!(errors.get("style").unwrap(), ["\"neon\" is not a valid choice.".to_owned()]);
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_snippet(&fields()).is_ok());
    }
}
