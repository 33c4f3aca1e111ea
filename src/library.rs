// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! The library map: a cached index of what the organized library already contains.

use crate::config::MatchingConfig;
use crate::history::History;
use crate::matching::{is_containment_match, normalize, similarity};
use crate::scanner::{is_audio_file, Candidate};
use crate::util::walk_dir;
use crate::{Cache, TaggedFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One book folder that already exists in the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// Folder name.
    pub name: String,
    /// Absolute path of the folder.
    pub path: PathBuf,
    /// Whether the folder's audio files already carry organizer tags.
    pub tagged: bool,
}

/// How a candidate name matched a library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The normalized names are identical.
    Exact,
    /// One normalized name contains the other.
    Containment,
    /// The names are similar above the configured threshold.
    Similar,
}

/// A match of a candidate name against the library map.
#[derive(Debug, Clone)]
pub struct LibraryMatch<'a> {
    /// The matched library entry.
    pub entry: &'a LibraryEntry,
    /// How the names matched.
    pub kind: MatchKind,
    /// Similarity score of the names.
    pub score: f64,
}

/// Classification of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Not in the library and never imported.
    New,
    /// A matching library folder exists, but it has not been tagged by the organizer.
    Matched,
    /// A matching library folder exists and is fully tagged.
    MatchedTagged,
    /// The processed-history log says this candidate was imported before.
    Imported,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::New => "new",
            Status::Matched => "in library (untagged)",
            Status::MatchedTagged => "in library (tagged)",
            Status::Imported => "already imported",
        };
        write!(f, "{text}")
    }
}

/// A cached list of folder names/paths already present in the organized library, used for fuzzy
/// duplicate detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryMap {
    /// Indexed book folders.
    pub entries: Vec<LibraryEntry>,
    /// When the library was scanned.
    pub scanned_at: DateTime<Utc>,
}

impl LibraryMap {
    /// Build the map by walking the library tree.
    ///
    /// Every directory that directly contains audio files becomes one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the library root cannot be read. Unreadable subdirectories are logged
    /// and skipped.
    pub fn build(library_dir: &Path) -> crate::Result<Self> {
        if !library_dir.is_dir() {
            log::info!(
                "Library directory {} does not exist yet, the map is empty",
                library_dir.display()
            );
            return Ok(LibraryMap {
                entries: vec![],
                scanned_at: Utc::now(),
            });
        }

        let mut entries = vec![];
        for item in walk_dir(library_dir.to_path_buf()) {
            let (dir, _dirs, files) = match item {
                Ok(item) => item,
                Err(err) => {
                    log::warn!(
                        "Failed to read directory below {}: {err}",
                        library_dir.display()
                    );
                    continue;
                }
            };

            let audio_files: Vec<&PathBuf> =
                files.iter().filter(|file| is_audio_file(file)).collect();
            let Some(first_audio_file) = audio_files.first() else {
                continue;
            };

            let tagged = TaggedFile::read_from_path(first_audio_file)
                .map(|file| file.has_organizer_tags())
                .unwrap_or(false);
            let name = dir
                .file_name()
                .and_then(std::ffi::OsStr::to_str)
                .unwrap_or_default()
                .to_string();
            entries.push(LibraryEntry {
                name,
                path: dir,
                tagged,
            });
        }

        entries.sort_unstable_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
        log::info!("Indexed {} library folders", entries.len());
        Ok(LibraryMap {
            entries,
            scanned_at: Utc::now(),
        })
    }

    /// Load the map from the cache, rebuilding it when it is missing or stale.
    ///
    /// # Errors
    ///
    /// Returns an error if a rebuild is necessary and fails.
    pub fn load(
        cache: Option<&Cache>,
        library_dir: &Path,
        matching: &MatchingConfig,
    ) -> crate::Result<Self> {
        if let Some(cache) = cache {
            match cache.get_library_map() {
                Ok(map) if !map.is_stale(matching.library_map_max_age_days()) => {
                    log::debug!("Using cached library map ({} entries)", map.entries.len());
                    return Ok(map);
                }
                Ok(_) => {
                    log::debug!("Cached library map is stale");
                }
                Err(err) => {
                    log::debug!("Failed to load library map from cache: {err}");
                }
            }
        }

        let map = Self::build(library_dir)?;
        if let Some(cache) = cache {
            if let Err(err) = cache.insert_library_map(&map) {
                log::warn!("Failed to cache library map: {err}");
            }
        }
        Ok(map)
    }

    /// Whether the map is older than the given age limit.
    #[must_use]
    pub fn is_stale(&self, max_age_days: u64) -> bool {
        let age = Utc::now().signed_duration_since(self.scanned_at);
        age.num_days() >= i64::try_from(max_age_days).unwrap_or(i64::MAX)
    }

    /// Find the best matching library entry for a candidate name.
    ///
    /// Exact normalized equality beats containment, which beats similarity; ties are broken by
    /// the similarity score.
    #[must_use]
    pub fn find_match(&self, name: &str, matching: &MatchingConfig) -> Option<LibraryMatch<'_>> {
        let normalized = normalize(name);
        self.entries
            .iter()
            .filter_map(|entry| {
                let kind = if normalize(&entry.name) == normalized {
                    MatchKind::Exact
                } else if is_containment_match(name, &entry.name, matching.min_match_length()) {
                    MatchKind::Containment
                } else if similarity(name, &entry.name) >= matching.similarity_threshold() {
                    MatchKind::Similar
                } else {
                    return None;
                };

                Some(LibraryMatch {
                    entry,
                    kind,
                    score: similarity(name, &entry.name),
                })
            })
            .max_by(|lhs, rhs| {
                let rank = |kind| match kind {
                    MatchKind::Exact => 2_u8,
                    MatchKind::Containment => 1,
                    MatchKind::Similar => 0,
                };
                (rank(lhs.kind), lhs.score)
                    .partial_cmp(&(rank(rhs.kind), rhs.score))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Classify a candidate against the library map and the processed-history log.
    #[must_use]
    pub fn classify(
        &self,
        candidate: &Candidate,
        history: &History,
        matching: &MatchingConfig,
    ) -> Status {
        if history.contains(&candidate.name) {
            return Status::Imported;
        }

        match self.find_match(&candidate.name, matching) {
            Some(library_match) if library_match.entry.tagged => Status::MatchedTagged,
            Some(_) => Status::Matched,
            None => Status::New,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn library_with(names: &[&str]) -> LibraryMap {
        LibraryMap {
            entries: names
                .iter()
                .map(|name| LibraryEntry {
                    name: (*name).to_string(),
                    path: PathBuf::from("/library").join(name),
                    tagged: false,
                })
                .collect(),
            scanned_at: Utc::now(),
        }
    }

    fn candidate(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            path: PathBuf::from("/downloads").join(name),
            audio_files: vec![],
            companion_files: vec![],
        }
    }

    #[test]
    fn test_build_indexes_folders_with_audio_files() {
        let root = tempfile::tempdir().unwrap();
        let book_dir = root.path().join("Andy Weir").join("The Martian");
        fs::create_dir_all(&book_dir).unwrap();
        fs::write(book_dir.join("part1.mp3"), b"not really audio").unwrap();
        fs::create_dir_all(root.path().join("Empty Author")).unwrap();

        let map = LibraryMap::build(root.path()).unwrap();
        assert_eq!(map.entries.len(), 1);
        assert_eq!(map.entries[0].name, "The Martian");
        assert!(!map.entries[0].tagged);
    }

    #[test]
    fn test_build_missing_library_dir_yields_empty_map() {
        let root = tempfile::tempdir().unwrap();
        let map = LibraryMap::build(&root.path().join("nope")).unwrap();
        assert!(map.entries.is_empty());
    }

    #[test]
    fn test_find_match_exact() {
        let map = library_with(&["Project Hail Mary", "The Martian"]);
        let config = MatchingConfig::default();
        let found = map.find_match("project hail mary!", &config).unwrap();
        assert_eq!(found.kind, MatchKind::Exact);
        assert_eq!(found.entry.name, "Project Hail Mary");
    }

    #[test]
    fn test_find_match_containment() {
        let map = library_with(&["Project Hail Mary"]);
        let config = MatchingConfig::default();
        let found = map
            .find_match("Andy Weir - Project Hail Mary [2021] [64k]", &config)
            .unwrap();
        assert_eq!(found.kind, MatchKind::Containment);
    }

    #[test]
    fn test_find_match_similar_typo() {
        let map = library_with(&["Project Hail Mary"]);
        let config = MatchingConfig::default();
        let found = map.find_match("Project Hail Marry", &config).unwrap();
        assert_eq!(found.kind, MatchKind::Similar);
    }

    #[test]
    fn test_find_match_rejects_short_and_unrelated_names() {
        let map = library_with(&["It", "Project Hail Mary"]);
        let config = MatchingConfig::default();
        // "It" is too short for containment and too distant for similarity.
        assert!(map.find_match("It Ends With Us", &config).is_none());
    }

    #[test]
    fn test_classify_prefers_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load_from_path(dir.path().join("history.json")).unwrap();
        history
            .record(crate::history::HistoryEntry {
                name: "Project Hail Mary".to_string(),
                source: PathBuf::from("/downloads/Project Hail Mary"),
                destination: PathBuf::from("/library/Andy Weir/Project Hail Mary"),
                title: "Project Hail Mary".to_string(),
                author: Some("Andy Weir".to_string()),
                imported_at: Utc::now(),
            })
            .unwrap();

        let map = library_with(&["Project Hail Mary"]);
        let config = MatchingConfig::default();
        assert_eq!(
            map.classify(&candidate("Project Hail Mary"), &history, &config),
            Status::Imported
        );
        assert_eq!(
            map.classify(&candidate("The Martian"), &history, &config),
            Status::New
        );
    }

    #[test]
    fn test_classify_tagged_vs_untagged_match() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::load_from_path(dir.path().join("history.json")).unwrap();
        let config = MatchingConfig::default();

        let mut map = library_with(&["Project Hail Mary"]);
        assert_eq!(
            map.classify(&candidate("Project Hail Mary [64k]"), &history, &config),
            Status::Matched
        );

        map.entries[0].tagged = true;
        assert_eq!(
            map.classify(&candidate("Project Hail Mary [64k]"), &history, &config),
            Status::MatchedTagged
        );
    }

    #[test]
    fn test_stale_map() {
        let mut map = library_with(&[]);
        assert!(!map.is_stale(7));
        map.scanned_at = Utc::now() - chrono::Duration::days(8);
        assert!(map.is_stale(7));
    }
}
