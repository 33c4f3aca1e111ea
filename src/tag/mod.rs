// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Tags and tag-related functions.

#[cfg(feature = "flac")]
mod flac;
#[cfg(feature = "id3")]
mod id3;

use std::borrow::Cow;
use std::path::Path;

/// A tag key describes the kind of information in a generic, format-independent way.
///
/// The set is the audiobook-relevant subset of what taggers usually map: the book is the album,
/// the author is the album artist, and narrator/series/position use the conventions that
/// audiobook players understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    /// Book title (album).
    Album,
    /// Author(s) of the book (album artist).
    AlbumArtist,
    /// Sort name for the book title.
    AlbumSortOrder,
    /// Track-level artist; taggers conventionally repeat the author here.
    Artist,
    /// Narrator name(s).
    Narrator,
    /// Series the book belongs to.
    Series,
    /// Position within the series.
    SeriesPosition,
    /// Genre name(s).
    Genre,
    /// Description or summary text.
    Description,
    /// Publisher name.
    Publisher,
    /// International Standard Book Number.
    Isbn,
    /// Year of first publication.
    ReleaseYear,
    /// Part number within the book (for multi-file audiobooks).
    TrackNumber,
    /// Title of the individual file.
    TrackTitle,
}

/// The tag type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    /// ID3v2.2 tag
    ID3v22,
    /// ID3v2.3 tag
    ID3v23,
    /// ID3v2.4 tag
    ID3v24,
    /// Vorbis tag from a FLAC file
    Flac,
    /// In-memory tag used in tests.
    #[cfg(test)]
    Fake,
}

/// A tag that can be used for reading and writing audiobook metadata.
pub trait Tag {
    /// Get the tag type.
    fn tag_type(&self) -> TagType;
    /// Get the string value for the tag key.
    fn get(&self, key: TagKey) -> Option<&str>;
    /// Remove the value for the tag key.
    fn clear(&mut self, key: TagKey);
    /// Set the value for the tag key.
    fn set(&mut self, key: TagKey, value: Cow<'_, str>);
    /// Set the value for the tag key, or remove it if the value is `None`.
    fn set_or_clear(&mut self, key: TagKey, value: Option<Cow<'_, str>>) {
        match value {
            Some(value) => self.set(key, value),
            None => self.clear(key),
        }
    }
    /// Embed the given image as the front cover, replacing any existing one.
    fn set_front_cover(&mut self, mime_type: &str, data: Vec<u8>);
    /// Write the tag to the file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying tag library fails to write the file.
    fn write(&mut self, path: &Path) -> crate::Result<()>;
}

/// Read the tags of the file at the given path.
///
/// Untagged mp3 files yield an empty tag so that the import can still write into them.
///
/// # Errors
///
/// Returns an error in case the file at the given path does not exist or is unsupported.
pub fn read_tags_from_path(path: &Path) -> crate::Result<Vec<Box<dyn Tag>>> {
    path.extension()
        .map(std::ffi::OsStr::to_ascii_lowercase)
        .ok_or(crate::Error::UnknownFileType)
        .and_then(|extension| {
            extension
                .to_str()
                .ok_or(crate::Error::UnknownFileType)
                .map(|ext| match ext {
                    #[cfg(feature = "id3")]
                    "mp3" => self::id3::ID3v2Tag::read_from_path(path)
                        .map(Box::new)
                        .map(|tag| Box::<dyn Tag>::from(tag))
                        .map(|tag| vec![tag]),
                    #[cfg(feature = "flac")]
                    "flac" => self::flac::FlacTag::read_from_path(path)
                        .map(Box::new)
                        .map(|tag| Box::<dyn Tag>::from(tag))
                        .map(|tag| vec![tag]),
                    ext => {
                        log::debug!("Unknown file extension {ext:?}");
                        Err(crate::Error::UnknownFileType)
                    }
                })?
        })
}
