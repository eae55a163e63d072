use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{expect_object, Links};
use crate::{
    error::{ApiError, FieldErrors},
    models::{
        snippets::{DEFAULT_LANGUAGE, DEFAULT_STYLE},
        Snippet, SnippetFields,
    },
    validation::{self, string_field},
};

/// Outbound form of a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRepr {
    pub url: String,
    pub id: i64,
    pub highlight: String,
    pub owner: Option<String>,
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: String,
    pub style: String,
}

impl SnippetRepr {
    pub fn new(snippet: &Snippet, links: &Links) -> Self {
        Self {
            url: links.snippet(snippet.id),
            id: snippet.id,
            highlight: links.highlight(snippet.id),
            owner: snippet.owner_username.clone(),
            title: snippet.title.clone(),
            code: snippet.code.clone(),
            linenos: snippet.linenos,
            language: snippet.language.clone(),
            style: snippet.style.clone(),
        }
    }
}

/// Turns an inbound body into snippet fields.
///
/// `instance` is the snippet being updated, if any. Fields missing from
/// `data` fall back to the instance, then to the model defaults. `code` has
/// no default and is required unless `partial` is set. Read-only keys such
/// as `id`, `url` or `owner` are ignored.
pub fn deserialize(
    data: &Value,
    instance: Option<&SnippetFields>,
    partial: bool,
) -> Result<SnippetFields, ApiError> {
    let map = expect_object(data)?;
    let mut errors = FieldErrors::new();

    let title = string_field(
        map,
        "title",
        Some(instance.map_or("", |i| i.title.as_str())),
        &mut errors,
    );
    let code = string_field(
        map,
        "code",
        if partial { instance.map(|i| i.code.as_str()) } else { None },
        &mut errors,
    );
    let linenos = match map.get("linenos") {
        None => Some(instance.is_some_and(|i| i.linenos)),
        Some(raw) => validation::parse_bool(raw)
            .map_err(|message| errors.add("linenos", message))
            .ok(),
    };
    let language = string_field(
        map,
        "language",
        Some(instance.map_or(DEFAULT_LANGUAGE, |i| i.language.as_str())),
        &mut errors,
    );
    let style = string_field(
        map,
        "style",
        Some(instance.map_or(DEFAULT_STYLE, |i| i.style.as_str())),
        &mut errors,
    );

    let fields = SnippetFields {
        title: title.unwrap_or_default(),
        code: code.unwrap_or_default(),
        linenos: linenos.unwrap_or_default(),
        language: language.unwrap_or_default(),
        style: style.unwrap_or_default(),
    };
    if let Err(invalid) = fields.validate() {
        validation::collect(&mut errors, &invalid);
    }
    errors.into_result()?;
    Ok(fields)
}
