//! HTML rendering of a snippet's code, backed by syntect.

use std::{borrow::Cow, fmt::Write};

use syntect::{
    easy::HighlightLines,
    highlighting::{Color, Theme, ThemeSet},
    html::{styled_line_to_highlighted_html, IncludeBackground},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::{error::ApiError, models::Snippet};

const FALLBACK_THEME: &str = "InspiredGitHub";

/// Loaded syntax definitions and themes. Build once and share.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    fn syntax_for(&self, language: &str) -> &SyntaxReference {
        self.syntaxes
            .find_syntax_by_token(syntax_token(language))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn theme_for(&self, style: &str) -> Result<&Theme, ApiError> {
        self.themes
            .themes
            .get(theme_name(style))
            .or_else(|| self.themes.themes.get(FALLBACK_THEME))
            .ok_or_else(|| ApiError::Internal(format!("no highlight theme for style {style:?}")))
    }

    /// Renders `snippet` as a standalone HTML page.
    pub fn render(&self, snippet: &Snippet) -> Result<String, ApiError> {
        let syntax = self.syntax_for(&snippet.language);
        let theme = self.theme_for(&snippet.style)?;
        let mut lines = HighlightLines::new(syntax, theme);

        let mut code = String::new();
        for line in LinesWithEndings::from(&snippet.code) {
            let regions = lines
                .highlight_line(line, &self.syntaxes)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            code.push_str(&html);
        }

        let mut pre_style = String::new();
        if let Some(bg) = theme.settings.background {
            let _ = write!(pre_style, "background-color:{};", css_color(bg));
        }
        if let Some(fg) = theme.settings.foreground {
            let _ = write!(pre_style, "color:{};", css_color(fg));
        }

        let body = if snippet.linenos {
            let count = snippet.code.lines().count().max(1);
            let numbers = (1..=count).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
            format!(
                "<table class=\"highlighttable\"><tr>\
                 <td class=\"linenos\"><pre>{numbers}</pre></td>\
                 <td class=\"code\"><pre style=\"{pre_style}\">{code}</pre></td>\
                 </tr></table>"
            )
        } else {
            format!("<div class=\"highlight\"><pre style=\"{pre_style}\">{code}</pre></div>")
        };

        let title = escape_html(&snippet.title);
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
             <body>\n<h2>{title}</h2>\n{body}\n</body>\n</html>\n"
        ))
    }
}

/// Escapes text for use outside syntect's highlighted regions.
fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn css_color(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Maps a language name onto a name or extension syntect knows.
fn syntax_token(language: &str) -> &str {
    match language {
        "bash" => "sh",
        "csharp" => "cs",
        "clojure" => "clj",
        "erlang" => "erl",
        "haskell" => "hs",
        "javascript" | "typescript" => "js",
        "latex" => "tex",
        "makefile" => "Makefile",
        "markdown" => "md",
        "matlab" => "m",
        "objective-c" => "mm",
        "ocaml" => "ml",
        "text" => "txt",
        other => other,
    }
}

/// Maps a style name onto one of syntect's bundled themes.
fn theme_name(style: &str) -> &'static str {
    match style {
        "monokai" | "fruity" | "native" | "vim" | "rrt" => "base16-mocha.dark",
        "paraiso-dark" => "base16-eighties.dark",
        "solarized-dark" => "Solarized (dark)",
        "solarized-light" => "Solarized (light)",
        "paraiso-light" | "tango" => "base16-ocean.light",
        _ => FALLBACK_THEME,
    }
}
