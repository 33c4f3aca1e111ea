// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Book metadata providers.

mod googlebooks;
mod openlibrary;

pub use googlebooks::GoogleBooksClient;
pub use openlibrary::OpenLibraryClient;

use crate::book::Book;
use crate::config::ProviderKind;
use crate::folder::ParsedName;
use crate::{Cache, Config};

/// User agent sent with provider requests.
const USER_AGENT: &str = concat!("tidybooks/", env!("CARGO_PKG_VERSION"));

/// A search query against a metadata provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Book title to search for.
    pub title: String,
    /// Author to search for (if known).
    pub author: Option<String>,
}

impl SearchQuery {
    /// Build a query from a parsed folder name.
    #[must_use]
    pub fn from_parsed(parsed: &ParsedName) -> Self {
        SearchQuery {
            title: parsed.title.clone(),
            author: parsed.author.clone(),
        }
    }

    /// Stable key for caching responses to this query.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{title}|{author}",
            title = self.title,
            author = self.author.as_deref().unwrap_or_default()
        )
    }
}

/// A source of book metadata.
pub trait MetadataProvider {
    /// Short provider name (used for logging and cache keys).
    fn name(&self) -> &'static str;

    /// Search for books matching the query, best match first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the response decoding fails.
    fn search(&self, query: &SearchQuery) -> crate::Result<Vec<Book>>;
}

/// Configurable metadata lookup with caching support.
pub struct Lookup<'a> {
    /// Cache for search results and covers.
    cache: Option<&'a Cache>,
    /// The configured providers.
    providers: Vec<Box<dyn MetadataProvider>>,
    /// HTTP client for cover downloads.
    client: reqwest::blocking::Client,
    /// Per-provider result limit (part of the cache key).
    result_limit: u8,
}

impl<'a> Lookup<'a> {
    /// Create a new lookup with the providers selected in the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config, cache: Option<&'a Cache>) -> crate::Result<Self> {
        let mut providers: Vec<Box<dyn MetadataProvider>> = vec![];
        match config.lookup.provider() {
            ProviderKind::OpenLibrary => {
                providers.push(Box::new(OpenLibraryClient::new(config)?));
            }
            ProviderKind::GoogleBooks => {
                providers.push(Box::new(GoogleBooksClient::new(config)?));
            }
            ProviderKind::All => {
                providers.push(Box::new(OpenLibraryClient::new(config)?));
                providers.push(Box::new(GoogleBooksClient::new(config)?));
            }
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Lookup {
            cache,
            providers,
            client,
            result_limit: config.lookup.result_limit(),
        })
    }

    /// Search all configured providers and concatenate the results.
    ///
    /// A failing provider degrades to the others' results instead of aborting the lookup.
    #[must_use]
    pub fn search(&self, query: &SearchQuery) -> Vec<Book> {
        let mut books = vec![];
        for provider in &self.providers {
            books.extend(self.search_provider(provider.as_ref(), query));
        }
        log::info!(
            "Found {count} candidates for \"{title}\"",
            count = books.len(),
            title = query.title
        );
        books
    }

    /// Search a single provider, going through the cache.
    fn search_provider(&self, provider: &dyn MetadataProvider, query: &SearchQuery) -> Vec<Book> {
        let cache_key = query.cache_key();
        if let Some(books) = self.cache.and_then(|cache| {
            cache
                .get_search_results(provider.name(), &cache_key, self.result_limit)
                .inspect_err(|err| {
                    log::debug!(
                        "Failed to get {} search result for {cache_key:?} from cache: {err}",
                        provider.name()
                    );
                })
                .ok()
        }) {
            return books;
        }

        let books = match provider.search(query) {
            Ok(books) => books,
            Err(err) => {
                log::warn!("Lookup on {} failed: {err}", provider.name());
                return vec![];
            }
        };

        if let Some(cache) = self.cache {
            match cache.insert_search_results(provider.name(), &cache_key, self.result_limit, &books)
            {
                Ok(()) => {
                    log::debug!(
                        "Inserted {} search result for {cache_key:?} into cache",
                        provider.name()
                    );
                }
                Err(err) => {
                    log::warn!(
                        "Failed to insert {} search result for {cache_key:?} into cache: {err}",
                        provider.name()
                    );
                }
            }
        }

        books
    }

    /// Download a cover image, going through the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails.
    pub fn fetch_cover(&self, url: &str) -> crate::Result<Vec<u8>> {
        if let Some(data) = self.cache.and_then(|cache| {
            cache
                .get_cover(url)
                .inspect_err(|err| {
                    log::debug!("Failed to get cover {url} from cache: {err}");
                })
                .ok()
        }) {
            return Ok(data);
        }

        let response = self.client.get(url).send()?.error_for_status()?;
        let data = response.bytes()?.to_vec();
        if let Some(cache) = self.cache {
            if let Err(err) = cache.insert_cover(url, &data) {
                log::warn!("Failed to insert cover {url} into cache: {err}");
            }
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::parse_folder_name;

    #[test]
    fn test_query_from_parsed_name() {
        let parsed = parse_folder_name("Andy Weir - Project Hail Mary [2021]");
        let query = SearchQuery::from_parsed(&parsed);
        assert_eq!(query.title, "Project Hail Mary");
        assert_eq!(query.author.as_deref(), Some("Andy Weir"));
        assert_eq!(query.cache_key(), "Project Hail Mary|Andy Weir");
    }

    #[test]
    fn test_cache_key_without_author() {
        let query = SearchQuery {
            title: "Dune".to_string(),
            author: None,
        };
        assert_eq!(query.cache_key(), "Dune|");
    }
}
