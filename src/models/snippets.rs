use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::validation::{not_blank, one_of};

pub const DEFAULT_LANGUAGE: &str = "python";
pub const DEFAULT_STYLE: &str = "friendly";

/// Languages a snippet may declare.
pub const LANGUAGES: &[&str] = &[
    "bash", "c", "clojure", "cpp", "csharp", "css", "d", "diff", "erlang", "go", "groovy",
    "haskell", "html", "java", "javascript", "json", "latex", "lisp", "lua", "makefile",
    "markdown", "matlab", "objective-c", "ocaml", "perl", "php", "python", "r", "ruby", "rust",
    "scala", "sql", "text", "typescript", "xml", "yaml",
];

/// Highlight color themes a snippet may declare.
pub const STYLES: &[&str] = &[
    "abap", "algol", "autumn", "borland", "bw", "colorful", "default", "emacs", "friendly",
    "fruity", "igor", "lovelace", "manni", "monokai", "murphy", "native", "paraiso-dark",
    "paraiso-light", "pastie", "perldoc", "rrt", "solarized-dark", "solarized-light", "tango",
    "trac", "vim", "vs", "xcode",
];

// ______________________________________ Snippets ______________________________________
/// A stored snippet, joined with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Snippet {
    pub id: i64,
    pub created: DateTime<Utc>,
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: String,
    pub style: String,
    pub owner_id: Option<i64>,
    pub owner_username: Option<String>,
}

impl Snippet {
    pub fn fields(&self) -> SnippetFields {
        SnippetFields {
            title: self.title.clone(),
            code: self.code.clone(),
            linenos: self.linenos,
            language: self.language.clone(),
            style: self.style.clone(),
        }
    }
}

/// The writable part of a snippet, as accepted by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SnippetFields {
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub title: String,

    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub code: String,

    pub linenos: bool,

    #[validate(custom(function = "language_choice"))]
    pub language: String,

    #[validate(custom(function = "style_choice"))]
    pub style: String,
}

fn language_choice(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    one_of(value, LANGUAGES)
}

fn style_choice(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    one_of(value, STYLES)
}

impl SnippetFields {
    /// Fields with the model defaults applied to everything except `code`.
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            code: code.into(),
            linenos: false,
            language: DEFAULT_LANGUAGE.to_owned(),
            style: DEFAULT_STYLE.to_owned(),
        }
    }
}
