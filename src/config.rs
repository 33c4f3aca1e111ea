// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Configuration utils.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Encountered when the configuration cannot be loaded.
#[derive(Error, Debug)]
#[error("Configuration Error: {0}")]
pub struct ConfigError(#[from] toml::de::Error);

/// Default configuration TOML string.
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Represents a piece of configuration that can be merged with another one.
trait MergeableConfig {
    /// Merge this configuration object with another one, taking values not set in this object from
    /// the other one (if present).
    fn merge(&self, other: &Self) -> Self;
}

/// Path configuration.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Downloads staging directory that `scan` and `import` operate on by default.
    pub downloads_dir: Option<String>,
    /// Root of the organized audiobook library.
    pub library_dir: Option<String>,
    /// Handlebars template for the destination directory, relative to the library root.
    pub layout: Option<String>,
}

impl MergeableConfig for PathsConfig {
    fn merge(&self, other: &Self) -> Self {
        PathsConfig {
            downloads_dir: self.downloads_dir.clone().or_else(|| other.downloads_dir.clone()),
            library_dir: self.library_dir.clone().or_else(|| other.library_dir.clone()),
            layout: self.layout.clone().or_else(|| other.layout.clone()),
        }
    }
}

impl PathsConfig {
    /// The downloads directory with `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not configured or the expansion fails.
    pub fn downloads_dir(&self) -> crate::Result<PathBuf> {
        let value = self
            .downloads_dir
            .as_deref()
            .ok_or(crate::Error::MissingPath("downloads directory"))?;
        Ok(expanduser::expanduser(value)?)
    }

    /// The library directory with `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not configured or the expansion fails.
    pub fn library_dir(&self) -> crate::Result<PathBuf> {
        let value = self
            .library_dir
            .as_deref()
            .ok_or(crate::Error::MissingPath("library directory"))?;
        Ok(expanduser::expanduser(value)?)
    }

    /// The destination layout template.
    #[must_use]
    pub fn layout(&self) -> &str {
        self.layout
            .as_deref()
            .unwrap_or("{{author}}/{{#if series}}{{series}}/{{/if}}{{title}}")
    }
}

/// Configuration for fuzzy duplicate detection.
#[expect(missing_copy_implementations)]
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Minimum normalized length (in bytes) that both names need for a containment match.
    pub min_match_length: Option<usize>,
    /// Similarity above which two names count as the same book.
    pub similarity_threshold: Option<f64>,
    /// Age in days after which the cached library map is rebuilt.
    pub library_map_max_age_days: Option<u64>,
}

impl MergeableConfig for MatchingConfig {
    fn merge(&self, other: &Self) -> Self {
        MatchingConfig {
            min_match_length: self.min_match_length.or(other.min_match_length),
            similarity_threshold: self.similarity_threshold.or(other.similarity_threshold),
            library_map_max_age_days: self
                .library_map_max_age_days
                .or(other.library_map_max_age_days),
        }
    }
}

impl MatchingConfig {
    /// The minimum normalized length guard for containment matches.
    #[must_use]
    pub fn min_match_length(&self) -> usize {
        self.min_match_length.unwrap_or(8)
    }

    /// The similarity acceptance threshold.
    #[must_use]
    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold.unwrap_or(0.85)
    }

    /// The maximum age of the cached library map.
    #[must_use]
    pub fn library_map_max_age_days(&self) -> u64 {
        self.library_map_max_age_days.unwrap_or(7)
    }
}

/// Which metadata provider(s) to query.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Open Library only.
    OpenLibrary,
    /// Google Books only.
    GoogleBooks,
    /// Query all providers and concatenate the results.
    #[default]
    All,
}

/// Configuration for book metadata lookups.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// Which provider(s) to query.
    pub provider: Option<ProviderKind>,
    /// Do not fetch more than this number of result candidates per provider.
    pub result_limit: Option<u8>,
    /// Optional API key for the Google Books API.
    pub google_books_api_key: Option<String>,
}

impl MergeableConfig for LookupConfig {
    fn merge(&self, other: &Self) -> Self {
        LookupConfig {
            provider: self.provider.or(other.provider),
            result_limit: self.result_limit.or(other.result_limit),
            google_books_api_key: self
                .google_books_api_key
                .clone()
                .or_else(|| other.google_books_api_key.clone()),
        }
    }
}

impl LookupConfig {
    /// The provider(s) to query.
    #[must_use]
    pub fn provider(&self) -> ProviderKind {
        self.provider.unwrap_or_default()
    }

    /// The per-provider result limit.
    #[must_use]
    pub fn result_limit(&self) -> u8 {
        self.result_limit.unwrap_or(5)
    }
}

/// Configuration for the import step.
#[expect(missing_copy_implementations)]
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Skip candidates whose destination directory already exists.
    pub skip_existing: Option<bool>,
    /// Write tags into the copied audio files.
    pub write_tags: Option<bool>,
    /// Download the cover image and save it next to the audio files.
    pub download_covers: Option<bool>,
    /// Embed the cover image into the audio file tags.
    pub embed_covers: Option<bool>,
}

impl MergeableConfig for ImportConfig {
    fn merge(&self, other: &Self) -> Self {
        ImportConfig {
            skip_existing: self.skip_existing.or(other.skip_existing),
            write_tags: self.write_tags.or(other.write_tags),
            download_covers: self.download_covers.or(other.download_covers),
            embed_covers: self.embed_covers.or(other.embed_covers),
        }
    }
}

impl ImportConfig {
    /// Whether existing destinations are skipped instead of overwritten.
    #[must_use]
    pub fn skip_existing(&self) -> bool {
        self.skip_existing.unwrap_or(true)
    }

    /// Whether tags are written into the copied audio files.
    #[must_use]
    pub fn write_tags(&self) -> bool {
        self.write_tags.unwrap_or(true)
    }

    /// Whether covers are downloaded.
    #[must_use]
    pub fn download_covers(&self) -> bool {
        self.download_covers.unwrap_or(true)
    }

    /// Whether covers are embedded into the tags.
    #[must_use]
    pub fn embed_covers(&self) -> bool {
        self.embed_covers.unwrap_or(true)
    }
}

/// The main configuration struct.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path configuration.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Configuration for fuzzy duplicate detection.
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Configuration for book metadata lookups.
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Configuration for the import step.
    #[serde(default)]
    pub import: ImportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::load_default().expect("Failed to load default config")
    }
}

impl MergeableConfig for Config {
    /// Merge this configuration object with another one, taking values not set in this object from
    /// the other one (if present).
    fn merge(&self, other: &Self) -> Self {
        Config {
            paths: self.paths.merge(&other.paths),
            matching: self.matching.merge(&other.matching),
            lookup: self.lookup.merge(&other.lookup),
            import: self.import.merge(&other.import),
        }
    }
}

impl Config {
    /// Load the configuration from a string slice.
    fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str(text)?;
        Ok(config)
    }

    /// Load the default configuration.
    fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_str(DEFAULT_CONFIG)
    }

    /// Load the configuration from a file located at the given path.
    ///
    /// # Errors
    ///
    /// This method can fail if the file cannot be accessed or if it contains malformed
    /// configuration markup.
    pub fn load_from_path<T: AsRef<Path>>(path: T) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::load_from_str(&text)?;
        Ok(config)
    }

    /// Merge this configuration struct with the default values.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        let default = Self::default();
        self.merge(&default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::default();
        assert_eq!(config.matching.min_match_length(), 8);
        assert_eq!(config.lookup.provider(), ProviderKind::All);
        assert!(config.import.skip_existing());
    }

    #[test]
    fn test_partial_config_merges_with_defaults() {
        let config = Config::load_from_str(
            r#"
            [paths]
            library_dir = "/tmp/library"

            [matching]
            min_match_length = 12

            [lookup]

            [import]
            embed_covers = false
            "#,
        )
        .unwrap()
        .with_defaults();

        assert_eq!(config.matching.min_match_length(), 12);
        assert_eq!(config.matching.library_map_max_age_days(), 7);
        assert_eq!(config.lookup.result_limit(), 5);
        assert!(!config.import.embed_covers());
        assert!(config.import.download_covers());
        assert_eq!(
            config.paths.library_dir().unwrap(),
            std::path::PathBuf::from("/tmp/library")
        );
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let config = Config::default();
        assert!(config.paths.downloads_dir().is_err());
    }
}
