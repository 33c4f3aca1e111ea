// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Heuristics for parsing audiobook folder names.
//!
//! Download folders encode metadata in wildly inconsistent ways ("Author - Title (Series, Book 3)
//! [2021] [64kbps]", "Title read by Narrator", ...). The parser extracts what it can; everything
//! it finds is a starting point for the metadata lookup, not a final answer.

use regex::Regex;
use std::sync::OnceLock;

/// Metadata fields recovered from a folder name. All fields except `title` are optional;
/// `title` falls back to the cleaned folder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    /// Author name (from an "Author - Title" pattern).
    pub author: Option<String>,
    /// Book title.
    pub title: String,
    /// Narrator name (from a "read by ..." / "narrated by ..." phrase).
    pub narrator: Option<String>,
    /// Series name.
    pub series: Option<String>,
    /// Position within the series (kept as a string, e.g. "2.5").
    pub series_position: Option<String>,
    /// Publication year.
    pub year: Option<u16>,
}

/// Matches a "read by ..." or "narrated by ..." phrase.
fn narrator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:read|narrated)\s+by\s+(?P<name>[^,()\[\]{}]+)")
            .expect("narrator regex is valid")
    })
}

/// Matches a plausible publication year.
fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?P<year>(?:19|20)\d{2})\b").expect("year regex is valid"))
}

/// Matches a bracketed "(<series>, Book <n>)" marker.
fn bracketed_series_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)[(\[](?P<series>[^()\[\]]*?),?\s+(?:book|volume|vol\.?)\s*(?P<num>\d+(?:\.\d+)?)[)\]]",
        )
        .expect("bracketed series regex is valid")
    })
}

/// Matches a trailing ", Book <n>" marker.
fn trailing_series_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?P<series>.+?),?\s+(?:book|volume|vol\.?)\s+(?P<num>\d+(?:\.\d+)?)$")
            .expect("trailing series regex is valid")
    })
}

/// Matches a "<series> #<n>" marker.
fn hash_series_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<series>.+?)\s+#(?P<num>\d+(?:\.\d+)?)$")
            .expect("hash series regex is valid")
    })
}

/// Matches any bracketed segment.
fn bracket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[(\[{][^)\]}]*[)\]}]").expect("bracket regex is valid"))
}

/// Matches release junk tokens (bitrates, formats, edition markers).
fn junk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:\d{2,3}\s?kbps|\d{2,3}k|mp3|m4b|m4a|flac|aac|unabridged|abridged|retail|audiobook)\b")
            .expect("junk regex is valid")
    })
}

/// Trim separator leftovers and collapse whitespace runs.
fn tidy(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == ',' || c == '.')
        .to_string()
}

/// Extract a series marker (name, position) from a string, if it carries one.
fn series_marker(value: &str) -> Option<(String, String)> {
    trailing_series_re()
        .captures(value)
        .or_else(|| hash_series_re().captures(value))
        .map(|caps| (tidy(&caps["series"]), caps["num"].to_string()))
        .filter(|(series, _)| !series.is_empty())
}

/// Parse an audiobook folder name into its metadata fields.
#[must_use]
pub fn parse_folder_name(name: &str) -> ParsedName {
    let narrator = narrator_re()
        .captures(name)
        .map(|caps| tidy(&caps["name"]))
        .filter(|narrator| !narrator.is_empty());
    let year = year_re()
        .captures(name)
        .and_then(|caps| caps["year"].parse().ok());
    let mut series_and_position = bracketed_series_re()
        .captures(name)
        .map(|caps| (tidy(&caps["series"]), caps["num"].to_string()))
        .filter(|(series, _)| !series.is_empty());

    // Strip what has been extracted (plus the remaining junk) and split the rest.
    let cleaned = narrator_re().replace_all(name, " ");
    let cleaned = bracket_re().replace_all(&cleaned, " ");
    let cleaned = junk_re().replace_all(&cleaned, " ");
    let cleaned = year_re().replace_all(&cleaned, " ");
    let cleaned = tidy(&cleaned);

    let parts: Vec<String> = cleaned
        .split(" - ")
        .map(tidy)
        .filter(|part| !part.is_empty())
        .collect();
    let (author, mut title) = match parts.as_slice() {
        [] => (None, String::new()),
        [title] => (None, title.clone()),
        [author, rest @ ..] => (Some(author.clone()), rest.join(" - ")),
    };

    // A middle "Series Book 3" segment between author and title.
    if series_and_position.is_none() {
        let split = title
            .split_once(" - ")
            .map(|(head, tail)| (head.to_string(), tail.to_string()));
        if let Some((head, tail)) = split {
            if let Some(marker) = series_marker(&head) {
                series_and_position = Some(marker);
                title = tidy(&tail);
            }
        }
    }

    // A trailing ", Book 2" or "#2" marker on the title itself. The prefix doubles as both the
    // series name and the title ("Red Rising, Book 1").
    if series_and_position.is_none() {
        if let Some((series, position)) = series_marker(&title) {
            title = series.clone();
            series_and_position = Some((series, position));
        }
    }

    let (series, series_position) = match series_and_position {
        Some((series, position)) => (Some(series), Some(position)),
        None => (None, None),
    };
    ParsedName {
        author,
        title: if title.is_empty() { tidy(name) } else { title },
        narrator,
        series,
        series_position,
        year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_author_and_title() {
        let parsed = parse_folder_name("Andy Weir - Project Hail Mary");
        assert_eq!(parsed.author.as_deref(), Some("Andy Weir"));
        assert_eq!(parsed.title, "Project Hail Mary");
        assert_eq!(parsed.series, None);
    }

    #[test]
    fn test_parse_strips_release_junk() {
        let parsed =
            parse_folder_name("Andy Weir - Project Hail Mary (Retail) [2021] 64kbps MP3");
        assert_eq!(parsed.author.as_deref(), Some("Andy Weir"));
        assert_eq!(parsed.title, "Project Hail Mary");
        assert_eq!(parsed.year, Some(2021));
    }

    #[test]
    fn test_parse_bracketed_series() {
        let parsed = parse_folder_name(
            "Brandon Sanderson - The Way of Kings (The Stormlight Archive, Book 1)",
        );
        assert_eq!(parsed.author.as_deref(), Some("Brandon Sanderson"));
        assert_eq!(parsed.title, "The Way of Kings");
        assert_eq!(parsed.series.as_deref(), Some("The Stormlight Archive"));
        assert_eq!(parsed.series_position.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_middle_series_segment() {
        let parsed = parse_folder_name("Pierce Brown - Red Rising Book 2 - Golden Son");
        assert_eq!(parsed.author.as_deref(), Some("Pierce Brown"));
        assert_eq!(parsed.series.as_deref(), Some("Red Rising"));
        assert_eq!(parsed.series_position.as_deref(), Some("2"));
        assert_eq!(parsed.title, "Golden Son");
    }

    #[test]
    fn test_parse_trailing_series_marker() {
        let parsed = parse_folder_name("Red Rising, Book 1");
        assert_eq!(parsed.series.as_deref(), Some("Red Rising"));
        assert_eq!(parsed.series_position.as_deref(), Some("1"));
        assert_eq!(parsed.title, "Red Rising");
    }

    #[test]
    fn test_parse_hash_series_marker() {
        let parsed = parse_folder_name("Dresden Files #2.5");
        assert_eq!(parsed.series.as_deref(), Some("Dresden Files"));
        assert_eq!(parsed.series_position.as_deref(), Some("2.5"));
    }

    #[test]
    fn test_parse_narrator() {
        let parsed = parse_folder_name("The Martian read by R.C. Bray");
        assert_eq!(parsed.narrator.as_deref(), Some("R.C. Bray"));
        assert_eq!(parsed.title, "The Martian");
    }

    #[test]
    fn test_parse_narrator_in_brackets() {
        let parsed = parse_folder_name("The Martian [Narrated by R.C. Bray]");
        assert_eq!(parsed.narrator.as_deref(), Some("R.C. Bray"));
        assert_eq!(parsed.title, "The Martian");
    }

    #[test]
    fn test_parse_plain_title() {
        let parsed = parse_folder_name("Dune");
        assert_eq!(parsed.author, None);
        assert_eq!(parsed.title, "Dune");
    }

    #[test]
    fn test_parse_junk_only_name_falls_back_to_cleaned_name() {
        let parsed = parse_folder_name("MP3");
        assert_eq!(parsed.title, "MP3");
    }
}
