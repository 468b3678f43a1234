//! Localized message templates.
//!
//! Messages are looked up by key and formatted with positional `{0}`, `{1}`, ...
//! placeholders. [`StringTable`] ships the built-in en-US strings and can be
//! overridden from a TOML resource file.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Key of the message shown when the server refuses access to a web.
pub const ERROR_WEB_ACCESS_DENIED: &str = "ErrorWebAccessDenied";

/// Key of the message shown when a web cannot be found.
pub const ERROR_WEB_NOT_FOUND: &str = "ErrorWebNotFound";

const DEFAULT_ACCESS_DENIED: &str =
    "You don't have access to the site '{0}'. Make sure you have permission to add items to this list.";
const DEFAULT_NOT_FOUND: &str =
    "The site '{0}' could not be found. Check the site URL and try again.";

/// Lookup of localized templates with positional formatting.
pub trait Localizer: Send + Sync {
    /// The raw template for `key`, if known.
    fn template(&self, key: &str) -> Option<&str>;

    /// Format the template for `key` with `args`.
    ///
    /// Unknown keys format to the key itself so a missing translation is
    /// visible rather than silent.
    fn format(&self, key: &str, args: &[&str]) -> String {
        match self.template(key) {
            Some(template) => format_template(template, args),
            None => key.to_string(),
        }
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("Invalid regex pattern"))
}

/// Replace `{N}` placeholders in `template` with `args[N]`.
///
/// Placeholders without a matching argument are left untouched.
#[must_use]
pub fn format_template(template: &str, args: &[&str]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map_or_else(|| caps[0].to_string(), |arg| (*arg).to_string())
        })
        .into_owned()
}

/// A key/template table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    entries: BTreeMap<String, String>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::from_entries([
            (ERROR_WEB_ACCESS_DENIED, DEFAULT_ACCESS_DENIED),
            (ERROR_WEB_NOT_FOUND, DEFAULT_NOT_FOUND),
        ])
    }
}

impl StringTable {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a table from key/template pairs.
    #[must_use]
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load a table from a TOML file of `Key = "template"` lines.
    ///
    /// Keys missing from the file keep their built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::StringTableLoad {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            });
        }

        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| Error::StringTableLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Insert or replace a template.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    /// Number of templates in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for StringTable {
    fn template(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}
