// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! The scanner searches the downloads staging directory for audiobook candidates.
//!
//! Every top-level entry of the downloads directory is one candidate: a folder (audio files are
//! collected recursively) or a loose audio file. Hidden entries and Synology `@eaDir` service
//! directories are skipped.

use crate::util::walk_dir;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Audio file extensions that count towards a candidate.
const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "m4b", "m4a", "flac", "ogg", "opus", "aac", "wma"];

/// Companion file extensions that ride along on import.
const COMPANION_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "pdf", "nfo", "cue", "txt", "epub"];

/// Check whether a path has one of the given extensions (case-insensitive).
fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(OsStr::to_ascii_lowercase)
        .and_then(|extension| {
            extension
                .to_str()
                .map(|extension| extensions.contains(&extension))
        })
        .unwrap_or(false)
}

/// Check whether a file is an audio file by its extension.
#[must_use]
pub fn is_audio_file(path: &Path) -> bool {
    has_extension(path, &AUDIO_EXTENSIONS)
}

/// Check whether a file is a companion file by its extension.
#[must_use]
pub fn is_companion_file(path: &Path) -> bool {
    has_extension(path, &COMPANION_EXTENSIONS)
}

/// Check whether a directory entry should be skipped entirely.
fn is_hidden_name(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| name.starts_with('.') || name == "@eaDir")
}

/// A folder or file group in the downloads directory believed to represent one audiobook.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Display name (the folder name or file stem).
    pub name: String,
    /// Path of the folder (or single file).
    pub path: PathBuf,
    /// Audio files belonging to this candidate, sorted.
    pub audio_files: Vec<PathBuf>,
    /// Companion files (covers, booklets, cue sheets) belonging to this candidate, sorted.
    pub companion_files: Vec<PathBuf>,
}

impl Candidate {
    /// Build a candidate from a directory, collecting audio files recursively.
    ///
    /// Returns `None` if the directory contains no audio files at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory itself cannot be read. Unreadable subdirectories are
    /// logged and skipped.
    pub fn from_dir(path: &Path) -> crate::Result<Option<Self>> {
        let mut audio_files = vec![];
        let mut companion_files = vec![];
        for item in walk_dir(path.to_path_buf()) {
            let (dir, _dirs, files) = match item {
                Ok(item) => item,
                Err(err) => {
                    log::warn!("Failed to read directory below {}: {err}", path.display());
                    continue;
                }
            };
            if dir
                .strip_prefix(path)
                .ok()
                .is_some_and(|rel| rel.iter().any(is_hidden_name))
            {
                continue;
            }

            for file in files {
                if file.file_name().is_some_and(is_hidden_name) {
                    continue;
                }
                if is_audio_file(&file) {
                    audio_files.push(file);
                } else if is_companion_file(&file) {
                    companion_files.push(file);
                }
            }
        }

        if audio_files.is_empty() {
            return Ok(None);
        }

        audio_files.sort_unstable();
        companion_files.sort_unstable();
        let name = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();
        Ok(Some(Candidate {
            name,
            path: path.to_path_buf(),
            audio_files,
            companion_files,
        }))
    }

    /// Build a candidate from a single loose audio file.
    ///
    /// Returns `None` if the file is not an audio file.
    #[must_use]
    pub fn from_file(path: &Path) -> Option<Self> {
        if !is_audio_file(path) {
            return None;
        }

        let name = path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();
        Some(Candidate {
            name,
            path: path.to_path_buf(),
            audio_files: vec![path.to_path_buf()],
            companion_files: vec![],
        })
    }

    /// All files belonging to this candidate (audio first, then companions).
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.audio_files.iter().chain(self.companion_files.iter())
    }
}

/// Find audiobook candidates in the downloads directory.
///
/// An empty downloads directory yields an empty list. Unreadable entries are logged and skipped.
///
/// # Errors
///
/// Returns an error if the downloads directory itself cannot be read.
pub fn scan(downloads_dir: &Path) -> crate::Result<Vec<Candidate>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(downloads_dir)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(err) => {
                log::warn!("Failed to read entry in {}: {err}", downloads_dir.display());
                None
            }
        })
        .filter(|path| path.file_name().is_none_or(|name| !is_hidden_name(name)))
        .collect();
    entries.sort_unstable();

    let mut candidates = vec![];
    for entry in entries {
        if entry.is_dir() {
            match Candidate::from_dir(&entry) {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => {
                    log::debug!("Skipping {} (no audio files)", entry.display());
                }
                Err(err) => {
                    log::warn!("Failed to scan {}: {err}", entry.display());
                }
            }
        } else if let Some(candidate) = Candidate::from_file(&entry) {
            candidates.push(candidate);
        }
    }

    log::info!("Found {} candidates", candidates.len());
    Ok(candidates)
}

/// Treat one explicit path as a single candidate (manual bundling).
///
/// # Errors
///
/// Returns an error if the path cannot be read.
pub fn scan_single(path: &Path, name_override: Option<&str>) -> crate::Result<Option<Candidate>> {
    let candidate = if path.is_dir() {
        Candidate::from_dir(path)?
    } else {
        Candidate::from_file(path)
    };

    Ok(candidate.map(|mut candidate| {
        if let Some(name) = name_override {
            candidate.name = name.to_string();
        }
        candidate
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"data").unwrap();
    }

    #[test]
    fn test_scan_groups_folders_and_loose_files() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("Book A").join("01.mp3"));
        touch(&root.path().join("Book A").join("02.mp3"));
        touch(&root.path().join("Book A").join("cover.jpg"));
        touch(&root.path().join("Book B").join("disc1").join("01.flac"));
        touch(&root.path().join("Loose Book.m4b"));
        touch(&root.path().join(".hidden").join("x.mp3"));
        touch(&root.path().join("@eaDir").join("y.mp3"));
        touch(&root.path().join("Notes").join("readme.txt"));

        let candidates = scan(root.path()).unwrap();
        let names: Vec<&str> = candidates
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect();
        assert_eq!(names, vec!["Book A", "Book B", "Loose Book"]);

        assert_eq!(candidates[0].audio_files.len(), 2);
        assert_eq!(candidates[0].companion_files.len(), 1);
        assert_eq!(candidates[1].audio_files.len(), 1);
        assert_eq!(candidates[2].audio_files.len(), 1);
    }

    #[test]
    fn test_scan_empty_directory() {
        let root = tempfile::tempdir().unwrap();
        assert!(scan(root.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_skips_hidden_files_inside_candidates() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("Book").join("01.mp3"));
        touch(&root.path().join("Book").join(".DS_Store"));
        touch(&root.path().join("Book").join("@eaDir").join("thumb.mp3"));

        let candidates = scan(root.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].audio_files.len(), 1);
    }

    #[test]
    fn test_scan_single_with_name_override() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("ripped").join("part1.mp3"));

        let candidate = scan_single(&root.path().join("ripped"), Some("Dune"))
            .unwrap()
            .unwrap();
        assert_eq!(candidate.name, "Dune");
        assert_eq!(candidate.audio_files.len(), 1);
    }
}
