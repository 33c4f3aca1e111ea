// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Google Books volumes client.
//!
//! Uses the public volumes API: <https://developers.google.com/books/docs/v1/using>

use super::{MetadataProvider, SearchQuery, USER_AGENT};
use crate::book::Book;
use crate::Config;
use serde::Deserialize;

/// Volumes search endpoint.
const VOLUMES_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Response of the volumes endpoint.
#[derive(Debug, Deserialize)]
struct VolumesResponse {
    /// Matching volumes.
    #[serde(default)]
    items: Vec<Volume>,
}

/// One volume in a search response.
#[derive(Debug, Deserialize)]
struct Volume {
    /// Volume metadata.
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

/// Metadata of a volume.
#[derive(Debug, Deserialize)]
struct VolumeInfo {
    /// Volume title.
    title: String,
    /// Subtitle (if any).
    #[serde(default)]
    subtitle: Option<String>,
    /// Author names.
    #[serde(default)]
    authors: Vec<String>,
    /// Publisher name.
    #[serde(default)]
    publisher: Option<String>,
    /// Publication date ("YYYY" or "YYYY-MM-DD").
    #[serde(rename = "publishedDate", default)]
    published_date: Option<String>,
    /// Description text.
    #[serde(default)]
    description: Option<String>,
    /// Category names.
    #[serde(default)]
    categories: Vec<String>,
    /// Industry identifiers (ISBNs).
    #[serde(rename = "industryIdentifiers", default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    /// Image links.
    #[serde(rename = "imageLinks", default)]
    image_links: Option<ImageLinks>,
}

/// An industry identifier attached to a volume.
#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    /// Identifier type (e.g. `ISBN_13`).
    #[serde(rename = "type")]
    id_type: String,
    /// The identifier itself.
    identifier: String,
}

/// Image links of a volume.
#[derive(Debug, Deserialize)]
struct ImageLinks {
    /// Thumbnail-sized cover image.
    #[serde(default)]
    thumbnail: Option<String>,
}

/// Convert volume metadata into a [`Book`].
fn volume_into_book(info: VolumeInfo) -> Book {
    let isbn = info
        .industry_identifiers
        .iter()
        .find(|id| id.id_type == "ISBN_13")
        .or_else(|| {
            info.industry_identifiers
                .iter()
                .find(|id| id.id_type == "ISBN_10")
        })
        .map(|id| id.identifier.clone());
    let year = info
        .published_date
        .as_deref()
        .and_then(|date| date.get(..4))
        .and_then(|year| year.parse().ok());
    // Google serves image links over plain http.
    let cover_url = info
        .image_links
        .and_then(|links| links.thumbnail)
        .map(|url| url.replacen("http://", "https://", 1));

    Book {
        title: info.title,
        subtitle: info.subtitle,
        authors: info.authors,
        narrators: vec![],
        series: None,
        series_position: None,
        year,
        publisher: info.publisher,
        description: info.description,
        isbn,
        genres: info.categories,
        cover_url,
    }
}

/// Google Books API client.
#[derive(Debug)]
pub struct GoogleBooksClient {
    /// HTTP client.
    client: reqwest::blocking::Client,
    /// Maximum number of results to request.
    limit: u8,
    /// Optional API key.
    api_key: Option<String>,
}

impl GoogleBooksClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(GoogleBooksClient {
            client,
            limit: config.lookup.result_limit(),
            api_key: config.lookup.google_books_api_key.clone(),
        })
    }
}

impl MetadataProvider for GoogleBooksClient {
    fn name(&self) -> &'static str {
        "googlebooks"
    }

    fn search(&self, query: &SearchQuery) -> crate::Result<Vec<Book>> {
        let q = match &query.author {
            Some(author) => format!(
                "intitle:{title} inauthor:{author}",
                title = query.title
            ),
            None => format!("intitle:{title}", title = query.title),
        };
        let mut params = vec![("q", q), ("maxResults", self.limit.to_string())];
        if let Some(api_key) = &self.api_key {
            params.push(("key", api_key.clone()));
        }

        let response: VolumesResponse = self
            .client
            .get(VOLUMES_URL)
            .query(&params)
            .send()?
            .error_for_status()?
            .json()?;
        log::debug!(
            "Google Books returned {count} volumes for \"{title}\"",
            count = response.items.len(),
            title = query.title
        );

        Ok(response
            .items
            .into_iter()
            .map(|volume| volume_into_book(volume.volume_info))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOLUMES_RESPONSE_JSON: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 1,
        "items": [
            {
                "volumeInfo": {
                    "title": "Golden Son",
                    "subtitle": "Book 2 of the Red Rising Saga",
                    "authors": ["Pierce Brown"],
                    "publisher": "Del Rey",
                    "publishedDate": "2015-01-06",
                    "description": "A tale of vengeance among the stars.",
                    "categories": ["Fiction"],
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "034553981X"},
                        {"type": "ISBN_13", "identifier": "9780345539816"}
                    ],
                    "imageLinks": {
                        "thumbnail": "http://books.google.com/books/content?id=x"
                    }
                }
            }
        ]
    }"#;

    #[test]
    fn test_map_volumes_response() {
        let response: VolumesResponse = serde_json::from_str(VOLUMES_RESPONSE_JSON).unwrap();
        let book = volume_into_book(response.items.into_iter().next().unwrap().volume_info);

        assert_eq!(book.title, "Golden Son");
        assert_eq!(book.subtitle.as_deref(), Some("Book 2 of the Red Rising Saga"));
        assert_eq!(book.authors, vec!["Pierce Brown".to_string()]);
        assert_eq!(book.publisher.as_deref(), Some("Del Rey"));
        assert_eq!(book.year, Some(2015));
        assert_eq!(book.isbn.as_deref(), Some("9780345539816"));
        assert_eq!(
            book.cover_url.as_deref(),
            Some("https://books.google.com/books/content?id=x")
        );
    }

    #[test]
    fn test_map_sparse_volume() {
        let response: VolumesResponse =
            serde_json::from_str(r#"{"items": [{"volumeInfo": {"title": "Beowulf"}}]}"#).unwrap();
        let book = volume_into_book(response.items.into_iter().next().unwrap().volume_info);

        assert_eq!(book.title, "Beowulf");
        assert!(book.authors.is_empty());
        assert_eq!(book.isbn, None);
        assert_eq!(book.cover_url, None);
    }

    #[test]
    fn test_year_only_published_date() {
        let response: VolumesResponse = serde_json::from_str(
            r#"{"items": [{"volumeInfo": {"title": "Dune", "publishedDate": "1965"}}]}"#,
        )
        .unwrap();
        let book = volume_into_book(response.items.into_iter().next().unwrap().volume_info);
        assert_eq!(book.year, Some(1965));
    }
}
