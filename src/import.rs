// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! The importer: copy a candidate into the canonical library layout and write tags.
//!
//! Imports always COPY, never move or link. The source stays untouched so that seeding continues
//! uninterrupted.

use crate::book::Book;
use crate::history::{History, HistoryEntry};
use crate::pathformat::{PathFormatter, PathFormatterValues};
use crate::providers::Lookup;
use crate::scanner::Candidate;
use crate::util::copy_file;
use crate::{Config, TaggedFile};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

/// File name under which the cover image is saved in the destination folder.
const COVER_FILE_NAME: &str = "cover.jpg";

/// Result of importing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The candidate was copied into the library.
    Imported {
        /// Destination folder.
        destination: PathBuf,
        /// Number of files that were copied.
        files_copied: usize,
        /// Number of audio files that received tags.
        files_tagged: usize,
        /// Whether a cover image was saved.
        cover_saved: bool,
    },
    /// The destination already exists and overwriting is disabled.
    SkippedExisting {
        /// The already existing destination folder.
        destination: PathBuf,
    },
}

/// Imports candidates into the library.
pub struct Importer<'a> {
    /// Configuration.
    config: &'a Config,
    /// Formatter for destination paths.
    formatter: PathFormatter<'a>,
    /// Root of the organized library.
    library_dir: PathBuf,
}

impl<'a> Importer<'a> {
    /// Create a new importer.
    ///
    /// # Errors
    ///
    /// Returns an error if the library directory is not configured or the layout template is
    /// malformed.
    pub fn new(config: &'a Config) -> crate::Result<Self> {
        let library_dir = config.paths.library_dir()?;
        let formatter = PathFormatter::new(config)?;
        Ok(Importer {
            config,
            formatter,
            library_dir,
        })
    }

    /// The destination folder the given book would be imported to.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout template fails to render.
    pub fn destination_for(&self, book: &Book) -> crate::Result<PathBuf> {
        let values = PathFormatterValues::default().with_book(book);
        let relative = self.formatter.format(&values)?;
        Ok(self.library_dir.join(relative))
    }

    /// Import a candidate into the library, writing tags and recording the import in the
    /// history log.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be rendered, a file copy fails or the history
    /// log cannot be written. Tagging failures of individual files are logged, not fatal.
    pub fn import(
        &self,
        candidate: &Candidate,
        book: &Book,
        lookup: Option<&Lookup<'_>>,
        history: &mut History,
    ) -> crate::Result<ImportOutcome> {
        let destination = self.destination_for(book)?;
        if self.config.import.skip_existing() && destination.exists() {
            log::warn!(
                "Skipping {name}: {destination} already exists",
                name = candidate.name,
                destination = destination.display()
            );
            return Ok(ImportOutcome::SkippedExisting { destination });
        }

        let cover_data = self.fetch_cover(book, lookup);

        // Copy everything first, preserving the candidate's internal layout.
        let mut copied_audio_files = vec![];
        let mut files_copied = 0;
        for file in candidate.files() {
            // Loose single-file candidates strip down to an empty path; fall back to the file
            // name for those.
            let relative = file
                .strip_prefix(&candidate.path)
                .ok()
                .filter(|relative| !relative.as_os_str().is_empty())
                .map_or_else(
                    || PathBuf::from(file.file_name().unwrap_or_default()),
                    std::path::Path::to_path_buf,
                );
            let target = destination.join(relative);
            copy_file(file, &target)?;
            files_copied += 1;
            if candidate.audio_files.contains(file) {
                copied_audio_files.push(target);
            }
        }

        let files_tagged = if self.config.import.write_tags() {
            self.write_tags(book, &copied_audio_files, cover_data.as_deref())
        } else {
            0
        };

        let cover_saved = match &cover_data {
            Some(data) => {
                let cover_path = destination.join(COVER_FILE_NAME);
                fs::write(&cover_path, data)?;
                log::info!("Saved cover to {}", cover_path.display());
                true
            }
            None => false,
        };

        history.record(HistoryEntry {
            name: candidate.name.clone(),
            source: candidate.path.clone(),
            destination: destination.clone(),
            title: book.title.clone(),
            author: book.author().map(ToString::to_string),
            imported_at: Utc::now(),
        })?;

        log::info!(
            "Imported {name} to {destination}",
            name = candidate.name,
            destination = destination.display()
        );
        Ok(ImportOutcome::Imported {
            destination,
            files_copied,
            files_tagged,
            cover_saved,
        })
    }

    /// Download the cover image (if configured and available).
    fn fetch_cover(&self, book: &Book, lookup: Option<&Lookup<'_>>) -> Option<Vec<u8>> {
        if !self.config.import.download_covers() {
            return None;
        }
        let url = book.cover_url.as_deref()?;
        match lookup?.fetch_cover(url) {
            Ok(data) => Some(data),
            Err(err) => {
                log::warn!("Failed to download cover {url}: {err}");
                None
            }
        }
    }

    /// Write tags into the copied audio files. Returns the number of successfully tagged files.
    fn write_tags(&self, book: &Book, audio_files: &[PathBuf], cover: Option<&[u8]>) -> usize {
        let total = audio_files.len();
        let mut files_tagged = 0;
        for (index, path) in audio_files.iter().enumerate() {
            let mut tagged_file = match TaggedFile::read_from_path(path) {
                Ok(tagged_file) => tagged_file,
                Err(err) => {
                    log::warn!("Tags not written for {}: {err}", path.display());
                    continue;
                }
            };

            tagged_file.assign_book(book);
            tagged_file.assign_part(book, index + 1, total);
            if self.config.import.embed_covers() {
                if let Some(data) = cover {
                    tagged_file.embed_front_cover("image/jpeg", data);
                }
            }

            match tagged_file.write_tags() {
                Ok(()) => files_tagged += 1,
                Err(err) => {
                    log::warn!("Failed to write tags to {}: {err}", path.display());
                }
            }
        }

        files_tagged
    }
}
