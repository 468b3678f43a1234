//! Form presentation.
//!
//! Renders the static welcome panel shown by the form. The only caller-supplied
//! text is the description, which is HTML-escaped before it is embedded.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Panel title.
pub const TITLE: &str = "Welcome to SharePoint!";

/// Panel subtitle.
pub const SUBTITLE: &str = "Customize SharePoint experiences using Web Parts.";

/// Target of the call-to-action link.
pub const LEARN_MORE_URL: &str = "https://aka.ms/spfx";

/// Label of the call-to-action link.
pub const LEARN_MORE_LABEL: &str = "Learn more";

/// Class names applied to each element of the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormStyles {
    /// Outermost wrapper.
    pub root: String,
    /// Layout container.
    pub container: String,
    /// Layout row.
    pub row: String,
    /// Layout column.
    pub column: String,
    /// Title span.
    pub title: String,
    /// Subtitle paragraph.
    pub sub_title: String,
    /// Description paragraph.
    pub description: String,
    /// Call-to-action link.
    pub button: String,
    /// Link label span.
    pub label: String,
}

impl Default for FormStyles {
    fn default() -> Self {
        Self {
            root: "typeProcessForm".to_string(),
            container: "container".to_string(),
            row: "row".to_string(),
            column: "column".to_string(),
            title: "title".to_string(),
            sub_title: "subTitle".to_string(),
            description: "description".to_string(),
            button: "button".to_string(),
            label: "label".to_string(),
        }
    }
}

/// Input to [`render_form`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProps {
    /// Free text shown under the subtitle.
    pub description: String,
    /// Styling hooks.
    #[serde(default)]
    pub styles: FormStyles,
}

impl FormProps {
    /// Props with the given description and default styles.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            styles: FormStyles::default(),
        }
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for safe inclusion in HTML.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the welcome panel as an HTML fragment.
#[must_use]
pub fn render_form(props: &FormProps) -> String {
    let s = &props.styles;
    format!(
        concat!(
            "<div class=\"{root}\">",
            "<div class=\"{container}\">",
            "<div class=\"{row}\">",
            "<div class=\"{column}\">",
            "<span class=\"{title}\">{title_text}</span>",
            "<p class=\"{sub_title}\">{sub_title_text}</p>",
            "<p class=\"{description}\">{description_text}</p>",
            "<a href=\"{href}\" class=\"{button}\">",
            "<span class=\"{label}\">{label_text}</span>",
            "</a>",
            "</div></div></div></div>"
        ),
        root = escape_html(&s.root),
        container = escape_html(&s.container),
        row = escape_html(&s.row),
        column = escape_html(&s.column),
        title = escape_html(&s.title),
        title_text = TITLE,
        sub_title = escape_html(&s.sub_title),
        sub_title_text = SUBTITLE,
        description = escape_html(&s.description),
        description_text = escape_html(&props.description),
        href = LEARN_MORE_URL,
        button = escape_html(&s.button),
        label = escape_html(&s.label),
        label_text = LEARN_MORE_LABEL,
    )
}

/// Render the panel and write it to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the file cannot be written.
pub fn write_form(path: &Path, props: &FormProps) -> Result<()> {
    std::fs::write(path, render_form(props))?;
    Ok(())
}
