//! Translation lookup.
//!
//! The feed's user-visible strings (event summaries, the calendar name,
//! error messages) go through the [`Translate`] seam so the language is an
//! explicit input to the pipeline rather than ambient process state.
//! [`Catalog`] is the built-in implementation with English and German
//! tables.

/// Translates a message key with positional arguments.
///
/// Implementations substitute `{0}`, `{1}`, ... with the given arguments.
/// An unknown key is returned verbatim; translation never fails.
pub trait Translate: Send + Sync {
    /// Looks up `key` and substitutes `args` into the template.
    fn translate(&self, key: &str, args: &[&str]) -> String;
}

/// Languages with a built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// English (the fallback).
    #[default]
    English,
    /// German.
    German,
}

impl Language {
    /// Resolves a BCP 47-ish language tag, falling back to English.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            t if t.starts_with("de") => Self::German,
            _ => Self::English,
        }
    }

    /// Returns the primary language tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::German => "de",
        }
    }
}

/// Built-in message catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    language: Language,
}

impl Catalog {
    /// Creates a catalog for the given language.
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Creates a catalog from a language tag, falling back to English.
    pub fn for_tag(tag: &str) -> Self {
        Self::new(Language::from_tag(tag))
    }

    /// Returns the catalog's language.
    pub fn language(&self) -> Language {
        self.language
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str, args: &[&str]) -> String {
        let template = match self.language {
            Language::English => english(key),
            Language::German => german(key),
        };
        match template {
            Some(template) => substitute(template, args),
            None => key.to_string(),
        }
    }
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "calendar.name" => "Birthdays",
        "contact.unknown" => "Unknown",
        "summary.generic" => "Birthday of {0}",
        "summary.born" => "{0} was born",
        "summary.turns_one" => "{0} turns 1 year old",
        "summary.turns" => "{0} turns {1} years old",
        "error.source" => "Could not load the contact data: {0}",
        _ => return None,
    })
}

fn german(key: &str) -> Option<&'static str> {
    Some(match key {
        "calendar.name" => "Geburtstage",
        "contact.unknown" => "Unbekannt",
        "summary.generic" => "Geburtstag von {0}",
        "summary.born" => "{0} wurde geboren",
        "summary.turns_one" => "{0} wird 1 Jahr alt",
        "summary.turns" => "{0} wird {1} Jahre alt",
        "error.source" => "Die Kontaktdaten konnten nicht geladen werden: {0}",
        _ => return None,
    })
}

/// Substitutes `{0}`, `{1}`, ... placeholders with positional arguments.
fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = template.to_string();
    for (index, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{index}}}"), arg);
    }
    out
}
