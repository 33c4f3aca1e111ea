// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Filesystem-related utility functions.

use std::collections::BinaryHeap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An iterator that recursively walks through a directory structure and yields a tuple `(path,
/// dirs, files)` for each directory it visits.
///
/// This struct is created by [`walk_dir`]. See its documentation for more.
pub struct DirWalk {
    /// Queued paths that will be visited next.
    queue: BinaryHeap<PathBuf>,
}

impl Iterator for DirWalk {
    type Item = io::Result<(PathBuf, Vec<PathBuf>, Vec<PathBuf>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let queued_path = self.queue.pop();
        queued_path.map(move |path| {
            log::debug!("Queued path: {}", path.display());
            fs::read_dir(&path).and_then(move |entries| {
                let mut files = vec![];
                let mut dirs = vec![];
                for entry in entries {
                    let entry_path = entry?.path();

                    if entry_path.is_dir() {
                        dirs.push(entry_path.clone());
                    } else {
                        files.push(entry_path);
                    }
                }

                files.sort_unstable();

                for dir in dirs.clone() {
                    self.queue.push(dir);
                }

                Ok((path, dirs, files))
            })
        })
    }
}

/// Creates an iterator that walks through a directory structure recursively and yields a tuple
/// consisting of the path of current directory and the files and directories in that directory.
pub fn walk_dir(path: PathBuf) -> DirWalk {
    let mut queue = BinaryHeap::new();
    queue.push(path);
    DirWalk { queue }
}

/// Copy the file.
///
/// The data is first written to a temporary file in the destination directory, which is persisted
/// under the actual destination name once the copy succeeded. The source is left untouched.
pub fn copy_file<S: AsRef<Path>, D: AsRef<Path>>(source: S, destination: D) -> io::Result<()> {
    let dest_filename = destination
        .as_ref()
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or(io::Error::other("cannot determine destination file name"))?;
    let dest_dir = destination
        .as_ref()
        .parent()
        .ok_or(io::Error::other("cannot determine destination directory"))?;
    fs::create_dir_all(dest_dir)?;
    let mut temp_destination_file = tempfile::Builder::new()
        .prefix(format!(".tidybooks.{dest_filename}").as_str())
        .suffix(".tmp")
        .tempfile_in(dest_dir)?;
    let mut source_file = fs::File::open(&source)?;
    let _ = io::copy(&mut source_file, &mut temp_destination_file)?;

    // When copying succeeded, persist the temporary file at the actual destination.
    let temp_destination = temp_destination_file.into_temp_path();
    temp_destination.persist(&destination)?;
    log::info!(
        "Copied file {} to {}",
        source.as_ref().display(),
        destination.as_ref().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_dir_yields_sorted_files() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("b.mp3"), b"b").unwrap();
        fs::write(root.path().join("a.mp3"), b"a").unwrap();
        fs::create_dir(root.path().join("sub")).unwrap();
        fs::write(root.path().join("sub").join("c.mp3"), b"c").unwrap();

        let mut iter = walk_dir(root.path().to_path_buf());
        let (path, dirs, files) = iter.next().unwrap().unwrap();
        assert_eq!(path, root.path());
        assert_eq!(dirs, vec![root.path().join("sub")]);
        assert_eq!(
            files,
            vec![root.path().join("a.mp3"), root.path().join("b.mp3")]
        );

        let (path, dirs, files) = iter.next().unwrap().unwrap();
        assert_eq!(path, root.path().join("sub"));
        assert!(dirs.is_empty());
        assert_eq!(files, vec![root.path().join("sub").join("c.mp3")]);

        assert!(iter.next().is_none());
    }

    #[test]
    fn test_copy_file_creates_missing_directories() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("book.mp3");
        fs::write(&source, b"audio-data").unwrap();

        let destination = root.path().join("Author").join("Title").join("book.mp3");
        copy_file(&source, &destination).unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"audio-data");
        // The source must survive a copy.
        assert!(source.exists());
    }
}
