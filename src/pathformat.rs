// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Path formatting and templating.

use crate::book::Book;
use crate::Config;
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Characters that are forbidden in paths on Microsoft Windows (in addition to control characters).
#[cfg(target_os = "windows")]
const ILLEGAL_PATH_CHARS: &str = r#"\/:*?"<>|"#;

/// Characters that are forbidden in paths on Unices (in addition to control characters).
#[cfg(not(target_os = "windows"))]
const ILLEGAL_PATH_CHARS: &str = "/";

/// Strips control characters and escapes forbidden characters.
fn escape_path_chars(data: &str) -> String {
    data.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .map(|c| {
            if ILLEGAL_PATH_CHARS.contains(c) {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
}

/// Formatter for destination paths inside the library.
pub struct PathFormatter<'a>(Handlebars<'a>);

impl PathFormatter<'_> {
    /// Create a new path formatter from the configured layout template.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout template is malformed.
    pub fn new(config: &Config) -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(escape_path_chars);
        handlebars.register_template_string("book", config.paths.layout())?;
        Ok(Self(handlebars))
    }

    /// Format a path with the given values.
    ///
    /// # Errors
    ///
    /// Returns an error if the template rendering fails.
    pub fn format(&self, values: &PathFormatterValues<'_>) -> Result<String, RenderError> {
        self.0.render("book", values)
    }
}

/// Possible values that can be used in a path formatter template.
///
/// All fields are serialized even when empty so that `{{#if ...}}` blocks work under strict mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathFormatterValues<'a> {
    /// The primary author.
    pub author: Option<Cow<'a, str>>,
    /// The book title.
    pub title: Option<Cow<'a, str>>,
    /// The series name.
    pub series: Option<Cow<'a, str>>,
    /// The position within the series.
    pub series_position: Option<Cow<'a, str>>,
    /// The publication year.
    pub year: Option<u16>,
}

impl<'a> PathFormatterValues<'a> {
    /// Assign fields from a [`Book`].
    #[must_use]
    pub fn with_book(mut self, book: &'a Book) -> Self {
        self.author = Some(Cow::from(book.author().unwrap_or("Unknown Author")));
        self.title = Some(Cow::from(&book.title));
        self.series = book.series.as_deref().map(Cow::from);
        self.series_position = book.series_position.as_deref().map(Cow::from);
        self.year = book.year;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_without_series() {
        let book = Book {
            title: "Project Hail Mary".to_string(),
            authors: vec!["Andy Weir".to_string()],
            ..Book::default()
        };

        let config = Config::default();
        let formatter = PathFormatter::new(&config).unwrap();
        let values = PathFormatterValues::default().with_book(&book);

        assert_eq!(
            formatter.format(&values).unwrap(),
            "Andy Weir/Project Hail Mary"
        );
    }

    #[test]
    fn test_default_layout_with_series() {
        let book = Book {
            title: "Golden Son".to_string(),
            authors: vec!["Pierce Brown".to_string()],
            series: Some("Red Rising".to_string()),
            series_position: Some("2".to_string()),
            ..Book::default()
        };

        let config = Config::default();
        let formatter = PathFormatter::new(&config).unwrap();
        let values = PathFormatterValues::default().with_book(&book);

        assert_eq!(
            formatter.format(&values).unwrap(),
            "Pierce Brown/Red Rising/2 - Golden Son"
        );
    }

    #[test]
    fn test_illegal_path_chars_are_escaped() {
        let book = Book {
            title: "Either/Or".to_string(),
            authors: vec!["Søren Kierkegaard".to_string()],
            ..Book::default()
        };

        let config = Config::default();
        let formatter = PathFormatter::new(&config).unwrap();
        let values = PathFormatterValues::default().with_book(&book);

        assert_eq!(
            formatter.format(&values).unwrap(),
            "Søren Kierkegaard/Either_Or"
        );
    }

    #[test]
    fn test_missing_author_falls_back() {
        let book = Book {
            title: "Beowulf".to_string(),
            ..Book::default()
        };

        let config = Config::default();
        let formatter = PathFormatter::new(&config).unwrap();
        let values = PathFormatterValues::default().with_book(&book);

        assert_eq!(formatter.format(&values).unwrap(), "Unknown Author/Beowulf");
    }
}
