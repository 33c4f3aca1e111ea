// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! The processed-history log.
//!
//! Every successful import is recorded here, so that re-downloaded or re-seeded folders are
//! recognized as already imported even after they were removed from the library again. Matching
//! against the log uses exact normalized names; fuzzy matching is the library map's job.

use crate::matching::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use xdg::BaseDirectories;

/// One processed candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Candidate name at import time.
    pub name: String,
    /// Source path in the downloads directory.
    pub source: PathBuf,
    /// Destination path in the library.
    pub destination: PathBuf,
    /// Book title that was applied.
    pub title: String,
    /// Primary author that was applied.
    pub author: Option<String>,
    /// When the import happened.
    pub imported_at: DateTime<Utc>,
}

/// The processed-history log, persisted as JSON in the XDG data directory.
#[derive(Debug)]
pub struct History {
    /// Entries in import order.
    entries: Vec<HistoryEntry>,
    /// File the log is persisted to.
    path: PathBuf,
}

impl History {
    /// Load the history log from the XDG data directory. A missing log yields an empty history.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file exists but cannot be read or parsed.
    pub fn load() -> crate::Result<Self> {
        let path = BaseDirectories::with_prefix("tidybooks").place_data_file("history.json")?;
        Self::load_from_path(path)
    }

    /// Load the history log from the given path. A missing file yields an empty history.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_path(path: PathBuf) -> crate::Result<Self> {
        let entries = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            serde_json::from_reader(reader)?
        } else {
            vec![]
        };
        Ok(History { entries, path })
    }

    /// The recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Check whether a candidate with this name was imported before.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let normalized = normalize(name);
        self.entries
            .iter()
            .any(|entry| normalize(&entry.name) == normalized)
    }

    /// Record an import and persist the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    pub fn record(&mut self, entry: HistoryEntry) -> crate::Result<()> {
        self.entries.push(entry);
        self.save()
    }

    /// Write the log back to disk.
    fn save(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, &self.entries)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_entry(name: &str) -> HistoryEntry {
        HistoryEntry {
            name: name.to_string(),
            source: PathBuf::from("/downloads").join(name),
            destination: PathBuf::from("/library/Author/Title"),
            title: "Title".to_string(),
            author: Some("Author".to_string()),
            imported_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_file_yields_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::load_from_path(dir.path().join("history.json")).unwrap();
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_record_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = History::load_from_path(path.clone()).unwrap();
        history
            .record(example_entry("Andy Weir - The Martian"))
            .unwrap();

        let reloaded = History::load_from_path(path).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].name, "Andy Weir - The Martian");
    }

    #[test]
    fn test_contains_uses_normalized_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load_from_path(dir.path().join("history.json")).unwrap();
        history
            .record(example_entry("Andy Weir - The Martian"))
            .unwrap();

        assert!(history.contains("Andy Weir - The Martian"));
        assert!(history.contains("andy weir - the martian!"));
        assert!(!history.contains("Andy Weir - Project Hail Mary"));
    }
}
