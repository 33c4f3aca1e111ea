// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Caching for metadata provider queries, cover images and the library map.

use crate::book::Book;
use crate::library::LibraryMap;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use xdg::BaseDirectories;

/// Cache Error.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Item was not found in cache.
    #[error("Cache Miss")]
    CacheMiss,
    /// I/O Error.
    #[error("Input/Output error ({:?})", .0)]
    Io(#[from] io::Error),
    /// JSON (De-)Serialization Error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Path under which the cached provider search results are stored.
const SEARCH_RESULTS_PATH_PREFIX: &str = "search";

/// Path under which the cached cover images are stored.
const COVERS_PATH_PREFIX: &str = "covers";

/// File name under which the library map is stored.
const LIBRARY_MAP_FILE: &str = "library_map.json";

/// Maximum age of a search result cache entry after which it expires.
const MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Create the cache path for a provider search query.
fn search_query_path(provider: &str, query: &str, limit: u8) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(provider.as_bytes());
    hasher.update([b'|']);
    hasher.update(query.as_bytes());
    hasher.update([b'|', limit]);
    let hash = hasher.finalize();
    Path::new(SEARCH_RESULTS_PATH_PREFIX).join(format!("{hash:064x}.json"))
}

/// Create the cache path for a cover image URL.
fn cover_path(url: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let hash = hasher.finalize();
    Path::new(COVERS_PATH_PREFIX).join(format!("{hash:064x}.jpg"))
}

/// Convenience function to get a JSON-deserializable item with the given path from the cache.
fn get_from_cache<T: DeserializeOwned, P: AsRef<Path>>(
    path: P,
    max_age: Option<Duration>,
) -> Result<T, CacheError> {
    if let Some(max_age) = max_age {
        let cache_age = path
            .as_ref()
            .metadata()?
            .modified()
            .ok()
            .and_then(|time| time.elapsed().ok())
            .unwrap_or(Duration::MAX);
        if cache_age > max_age {
            std::fs::remove_file(path)?;
            return Err(CacheError::CacheMiss);
        }
    }

    let f = File::open(path)?;
    let reader = BufReader::new(f);
    Ok(serde_json::from_reader(reader)?)
}

/// Convenience function to insert a JSON-serializable item with the given path into cache.
fn insert_into_cache<T: Serialize, P: AsRef<Path>>(path: P, item: &T) -> Result<(), CacheError> {
    let f = File::create(path)?;
    let writer = BufWriter::new(f);
    Ok(serde_json::to_writer(writer, item)?)
}

/// Cache for provider queries (to not use their APIs more than necessary), cover images and the
/// library map.
#[derive(Debug)]
pub struct Cache {
    /// XDG base directories for this application.
    base_dirs: BaseDirectories,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    /// Create a new cache rooted in the XDG cache directory.
    #[must_use]
    pub fn new() -> Self {
        Cache {
            base_dirs: BaseDirectories::with_prefix("tidybooks"),
        }
    }

    /// Get cached search results for a provider query.
    ///
    /// # Errors
    ///
    /// Returns an error if a cache miss occurred, the entry expired or the cache file could not
    /// be read or deserialized.
    pub fn get_search_results(
        &self,
        provider: &str,
        query: &str,
        limit: u8,
    ) -> Result<Vec<Book>, CacheError> {
        let path = self
            .base_dirs
            .find_cache_file(search_query_path(provider, query, limit))
            .ok_or(CacheError::CacheMiss)?;
        get_from_cache(path, Some(MAX_AGE))
    }

    /// Insert search results for a provider query into the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file could not be written or the serialization failed.
    pub fn insert_search_results(
        &self,
        provider: &str,
        query: &str,
        limit: u8,
        results: &[Book],
    ) -> Result<(), CacheError> {
        let path = self
            .base_dirs
            .place_cache_file(search_query_path(provider, query, limit))?;
        insert_into_cache(path, &results)
    }

    /// Get a cached cover image.
    ///
    /// # Errors
    ///
    /// Returns an error if a cache miss occurred or the cache file could not be read.
    pub fn get_cover(&self, url: &str) -> Result<Vec<u8>, CacheError> {
        let path = self
            .base_dirs
            .find_cache_file(cover_path(url))
            .ok_or(CacheError::CacheMiss)?;
        Ok(std::fs::read(path)?)
    }

    /// Insert a cover image into the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file could not be written.
    pub fn insert_cover(&self, url: &str, data: &[u8]) -> Result<(), CacheError> {
        let path = self.base_dirs.place_cache_file(cover_path(url))?;
        Ok(std::fs::write(path, data)?)
    }

    /// Get the cached library map.
    ///
    /// Staleness is judged by the caller from the map's own scan timestamp, not by file age.
    ///
    /// # Errors
    ///
    /// Returns an error if a cache miss occurred or the cache file could not be read or
    /// deserialized.
    pub fn get_library_map(&self) -> Result<LibraryMap, CacheError> {
        let path = self
            .base_dirs
            .find_cache_file(LIBRARY_MAP_FILE)
            .ok_or(CacheError::CacheMiss)?;
        get_from_cache(path, None)
    }

    /// Insert the library map into the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file could not be written or the serialization failed.
    pub fn insert_library_map(&self, map: &LibraryMap) -> Result<(), CacheError> {
        let path = self.base_dirs.place_cache_file(LIBRARY_MAP_FILE)?;
        insert_into_cache(path, map)
    }

    /// Get the number of entries and total byte size of a cache kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read.
    pub fn get_stats(&self, prefix: &str) -> Result<(usize, u64), CacheError> {
        let files = self.base_dirs.list_cache_files(prefix);
        let mut size = 0;
        for file in &files {
            size += file.metadata()?.len();
        }
        Ok((files.len(), size))
    }

    /// Remove all cached items.
    ///
    /// # Errors
    ///
    /// Returns an error if a cache file cannot be removed.
    pub fn clear(&self) -> Result<(), CacheError> {
        for prefix in [SEARCH_RESULTS_PATH_PREFIX, COVERS_PATH_PREFIX] {
            for file in self.base_dirs.list_cache_files(prefix) {
                std::fs::remove_file(file)?;
            }
        }
        if let Some(path) = self.base_dirs.find_cache_file(LIBRARY_MAP_FILE) {
            std::fs::remove_file(path)?;
        }

        Ok(())
    }

    /// The search result cache prefix (for the `cache` subcommand output).
    #[must_use]
    pub fn search_prefix() -> &'static str {
        SEARCH_RESULTS_PATH_PREFIX
    }

    /// The cover cache prefix (for the `cache` subcommand output).
    #[must_use]
    pub fn covers_prefix() -> &'static str {
        COVERS_PATH_PREFIX
    }
}
