// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! The [`Book`] metadata model.

use crate::folder::ParsedName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata describing one audiobook, as assembled from a metadata provider and the parsed
/// folder name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Book title.
    pub title: String,
    /// Subtitle (if any).
    pub subtitle: Option<String>,
    /// Author names.
    pub authors: Vec<String>,
    /// Narrator names.
    pub narrators: Vec<String>,
    /// Series name.
    pub series: Option<String>,
    /// Position within the series (kept as a string, e.g. "2.5").
    pub series_position: Option<String>,
    /// Year of first publication.
    pub year: Option<u16>,
    /// Publisher name.
    pub publisher: Option<String>,
    /// Description or summary text.
    pub description: Option<String>,
    /// ISBN (10 or 13).
    pub isbn: Option<String>,
    /// Genre names.
    pub genres: Vec<String>,
    /// URL of the cover image.
    pub cover_url: Option<String>,
}

impl Book {
    /// The primary author, if any.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// All authors joined for display and tagging.
    #[must_use]
    pub fn joined_authors(&self) -> Option<String> {
        (!self.authors.is_empty()).then(|| self.authors.join("; "))
    }

    /// All narrators joined for display and tagging.
    #[must_use]
    pub fn joined_narrators(&self) -> Option<String> {
        (!self.narrators.is_empty()).then(|| self.narrators.join("; "))
    }

    /// Fill fields the provider does not know from the parsed folder name.
    ///
    /// Narrator, series and series position virtually never come from book APIs, so the folder
    /// name wins whenever the provider left them empty. Author and year are only taken from the
    /// folder when the provider had none at all.
    #[must_use]
    pub fn supplemented_with(mut self, parsed: &ParsedName) -> Self {
        if self.authors.is_empty() {
            self.authors.extend(parsed.author.clone());
        }
        if self.narrators.is_empty() {
            self.narrators.extend(parsed.narrator.clone());
        }
        if self.series.is_none() {
            self.series.clone_from(&parsed.series);
        }
        if self.series_position.is_none() {
            self.series_position.clone_from(&parsed.series_position);
        }
        if self.year.is_none() {
            self.year = parsed.year;
        }
        self
    }

    /// Build a bare-bones book from the parsed folder name alone.
    ///
    /// Used when no provider returns anything (or lookups are skipped), so that the import can
    /// still organize and tag with what the folder name gives away.
    #[must_use]
    pub fn from_parsed_name(parsed: &ParsedName) -> Self {
        Book {
            title: parsed.title.clone(),
            ..Book::default()
        }
        .supplemented_with(parsed)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{author} - {title}",
            author = self.author().unwrap_or("[unknown author]"),
            title = self.title
        )?;
        if let Some(series) = &self.series {
            write!(f, " ({series}")?;
            if let Some(position) = &self.series_position {
                write!(f, " #{position}")?;
            }
            write!(f, ")")?;
        }
        if let Some(year) = self.year {
            write!(f, " [{year}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::parse_folder_name;

    #[test]
    fn test_supplement_fills_missing_fields_only() {
        let parsed = parse_folder_name("Andy Weir - The Martian [2014] read by R.C. Bray");
        let book = Book {
            title: "The Martian".to_string(),
            authors: vec!["Andy Weir".to_string()],
            year: Some(2011),
            ..Book::default()
        }
        .supplemented_with(&parsed);

        // Provider data wins where present.
        assert_eq!(book.year, Some(2011));
        assert_eq!(book.authors, vec!["Andy Weir".to_string()]);
        // Folder-only data is filled in.
        assert_eq!(book.narrators, vec!["R.C. Bray".to_string()]);
    }

    #[test]
    fn test_from_parsed_name() {
        let parsed = parse_folder_name("Pierce Brown - Red Rising Book 2 - Golden Son");
        let book = Book::from_parsed_name(&parsed);
        assert_eq!(book.title, "Golden Son");
        assert_eq!(book.author(), Some("Pierce Brown"));
        assert_eq!(book.series.as_deref(), Some("Red Rising"));
        assert_eq!(book.series_position.as_deref(), Some("2"));
    }

    #[test]
    fn test_display_format() {
        let book = Book {
            title: "Golden Son".to_string(),
            authors: vec!["Pierce Brown".to_string()],
            series: Some("Red Rising".to_string()),
            series_position: Some("2".to_string()),
            year: Some(2015),
            ..Book::default()
        };
        assert_eq!(
            book.to_string(),
            "Pierce Brown - Golden Son (Red Rising #2) [2015]"
        );
    }
}
