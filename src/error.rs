// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Error and result types.

use std::io;
use thiserror::Error;

/// Main error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration Error ({0})")]
    Config(#[from] crate::config::ConfigError),
    /// A required path is neither configured nor given on the command line.
    #[error("No {0} configured (pass a path on the command line or set it in the config file)")]
    MissingPath(&'static str),
    /// Cache is not available.
    #[error("Cache is not available")]
    CacheNotAvailable,
    /// Cache access failed.
    #[error("Cache access failed")]
    CacheAccessFailure(#[from] crate::cache::CacheError),
    /// I/O Error.
    #[error("Input/Output error ({:?})", .0)]
    Io(#[from] io::Error),
    /// File has an unknown file extension.
    #[error("File has unknown file type")]
    UnknownFileType,
    /// A metadata provider request failed.
    #[error("Metadata request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// JSON (de-)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Errors raised by the [`id3`] crate.
    #[cfg(feature = "id3")]
    #[error("Failed to read ID3 tag")]
    Id3(#[from] id3::Error),
    /// Errors raised by the [`metaflac`] crate.
    #[cfg(feature = "flac")]
    #[error("Failed to read FLAC tag")]
    Flac(#[from] metaflac::Error),
    /// An error from the user interface.
    #[error("Error encountered while showing UI: {0}")]
    InquireError(#[from] inquire::InquireError),
    /// An error occurred while registering the path layout template.
    #[error("Invalid path layout template: {0}")]
    Template(#[from] handlebars::TemplateError),
    /// An error occurred while formatting a template string.
    #[error("Template formatting failed: {0}")]
    TemplateFormattingFailed(#[from] handlebars::RenderError),
    /// TOML serialization failed (when printing the effective configuration).
    #[error("TOML serialization failed: {0}")]
    TomlSerialization(#[from] toml::ser::Error),
}

/// Convenience type.
pub type Result<T> = std::result::Result<T, Error>;
