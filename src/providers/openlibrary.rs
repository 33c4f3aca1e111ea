// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Open Library search client.
//!
//! Uses the public search API: <https://openlibrary.org/dev/docs/api/search>

use super::{MetadataProvider, SearchQuery, USER_AGENT};
use crate::book::Book;
use crate::Config;
use serde::Deserialize;

/// Search endpoint.
const SEARCH_URL: &str = "https://openlibrary.org/search.json";

/// Base URL for cover images by cover ID.
const COVER_URL_PREFIX: &str = "https://covers.openlibrary.org/b/id/";

/// Fields requested from the search API (keeps the response payload small).
const SEARCH_FIELDS: &str = "title,subtitle,author_name,first_publish_year,cover_i,isbn,subject,publisher";

/// Response of the search endpoint.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Matching documents.
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

/// One document in a search response.
#[derive(Debug, Deserialize)]
struct SearchDoc {
    /// Work title.
    title: String,
    /// Subtitle (if any).
    #[serde(default)]
    subtitle: Option<String>,
    /// Author names.
    #[serde(default)]
    author_name: Vec<String>,
    /// Year of first publication (may predate year zero for ancient works).
    #[serde(default)]
    first_publish_year: Option<i32>,
    /// Cover image ID.
    #[serde(default)]
    cover_i: Option<i64>,
    /// Known ISBNs.
    #[serde(default)]
    isbn: Vec<String>,
    /// Subject headings.
    #[serde(default)]
    subject: Vec<String>,
    /// Publisher names.
    #[serde(default)]
    publisher: Vec<String>,
}

/// Convert a search document into a [`Book`].
fn doc_into_book(doc: SearchDoc) -> Book {
    let cover_url = doc
        .cover_i
        .map(|cover_id| format!("{COVER_URL_PREFIX}{cover_id}-L.jpg"));
    let isbn = doc
        .isbn
        .iter()
        .find(|isbn| isbn.len() == 13)
        .or_else(|| doc.isbn.first())
        .cloned();
    let mut genres = doc.subject;
    genres.truncate(3);

    Book {
        title: doc.title,
        subtitle: doc.subtitle,
        authors: doc.author_name,
        narrators: vec![],
        series: None,
        series_position: None,
        year: doc
            .first_publish_year
            .and_then(|year| u16::try_from(year).ok()),
        publisher: doc.publisher.into_iter().next(),
        description: None,
        isbn,
        genres,
        cover_url,
    }
}

/// Open Library API client.
#[derive(Debug)]
pub struct OpenLibraryClient {
    /// HTTP client.
    client: reqwest::blocking::Client,
    /// Maximum number of results to request.
    limit: u8,
}

impl OpenLibraryClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(OpenLibraryClient {
            client,
            limit: config.lookup.result_limit(),
        })
    }
}

impl MetadataProvider for OpenLibraryClient {
    fn name(&self) -> &'static str {
        "openlibrary"
    }

    fn search(&self, query: &SearchQuery) -> crate::Result<Vec<Book>> {
        let mut params = vec![
            ("title", query.title.clone()),
            ("fields", SEARCH_FIELDS.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(author) = &query.author {
            params.push(("author", author.clone()));
        }

        let response: SearchResponse = self
            .client
            .get(SEARCH_URL)
            .query(&params)
            .send()?
            .error_for_status()?
            .json()?;
        log::debug!(
            "Open Library returned {count} documents for \"{title}\"",
            count = response.docs.len(),
            title = query.title
        );

        Ok(response.docs.into_iter().map(doc_into_book).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_RESPONSE_JSON: &str = r#"{
        "numFound": 1,
        "docs": [
            {
                "title": "Project Hail Mary",
                "author_name": ["Andy Weir"],
                "first_publish_year": 2021,
                "cover_i": 12842291,
                "isbn": ["0593135202", "9780593135204"],
                "subject": ["Science fiction", "Space", "Survival", "Aliens"],
                "publisher": ["Ballantine Books"]
            }
        ]
    }"#;

    #[test]
    fn test_map_search_response() {
        let response: SearchResponse = serde_json::from_str(SEARCH_RESPONSE_JSON).unwrap();
        let books: Vec<Book> = response.docs.into_iter().map(doc_into_book).collect();

        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.title, "Project Hail Mary");
        assert_eq!(book.authors, vec!["Andy Weir".to_string()]);
        assert_eq!(book.year, Some(2021));
        assert_eq!(book.isbn.as_deref(), Some("9780593135204"));
        assert_eq!(book.publisher.as_deref(), Some("Ballantine Books"));
        assert_eq!(book.genres.len(), 3);
        assert_eq!(
            book.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/12842291-L.jpg")
        );
    }

    #[test]
    fn test_map_sparse_document() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"docs": [{"title": "Beowulf"}]}"#).unwrap();
        let book = doc_into_book(response.docs.into_iter().next().unwrap());

        assert_eq!(book.title, "Beowulf");
        assert!(book.authors.is_empty());
        assert_eq!(book.year, None);
        assert_eq!(book.cover_url, None);
    }

    #[test]
    fn test_ancient_publish_year_is_dropped() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"docs": [{"title": "The Odyssey", "first_publish_year": -700}]}"#,
        )
        .unwrap();
        let book = doc_into_book(response.docs.into_iter().next().unwrap());
        assert_eq!(book.year, None);
    }
}
