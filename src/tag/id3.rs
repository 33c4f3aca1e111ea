// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Support for ID3 tags.

use crate::tag::{Tag, TagKey, TagType};
use id3::{
    frame::{Picture, PictureType},
    TagLike,
};
use std::borrow::Cow;
use std::path::Path;

/// ID3 frame ID.
#[derive(Debug)]
enum FrameId<'a> {
    /// Text frame.
    Text(&'a str),
    /// Extended Text frame (`TXXX`).
    ExtendedText(&'a str),
}

/// ID3 tag (version 2).
#[derive(Debug)]
pub struct ID3v2Tag {
    /// The underlying tag data.
    data: id3::Tag,
}

impl ID3v2Tag {
    #[cfg(test)]
    pub fn new() -> Self {
        ID3v2Tag {
            data: id3::Tag::new(),
        }
    }

    #[cfg(test)]
    pub fn with_version(version: id3::Version) -> Self {
        ID3v2Tag {
            data: id3::Tag::with_version(version),
        }
    }

    /// Read the ID3 tag from the path.
    ///
    /// A file without an existing tag yields an empty tag, so that the import can write into
    /// freshly copied untagged files.
    pub fn read_from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        match id3::Tag::read_from_path(path) {
            Ok(data) => Ok(ID3v2Tag { data }),
            Err(err) if matches!(err.kind, id3::ErrorKind::NoTag) => Ok(ID3v2Tag {
                data: id3::Tag::new(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Get the ID3 frame for a tag key.
    fn tag_key_to_frame(&self, key: TagKey) -> Option<FrameId<'static>> {
        match key {
            TagKey::Album => FrameId::Text("TALB").into(),
            TagKey::AlbumArtist => FrameId::Text("TPE2").into(),
            TagKey::AlbumSortOrder => FrameId::Text("TSOA").into(),
            TagKey::Artist => FrameId::Text("TPE1").into(),
            // Audiobook players read the narrator from the composer frame.
            TagKey::Narrator => FrameId::Text("TCOM").into(),
            TagKey::Series => FrameId::Text("TIT1").into(),
            TagKey::SeriesPosition => FrameId::ExtendedText("SERIES-PART").into(),
            TagKey::Genre => FrameId::Text("TCON").into(),
            TagKey::Description => FrameId::ExtendedText("DESCRIPTION").into(),
            TagKey::Publisher => FrameId::Text("TPUB").into(),
            TagKey::Isbn => FrameId::ExtendedText("ISBN").into(),
            TagKey::ReleaseYear => match self.data.version() {
                id3::Version::Id3v22 => None,
                id3::Version::Id3v23 => FrameId::Text("TYER").into(),
                id3::Version::Id3v24 => FrameId::Text("TDRC").into(),
            },
            TagKey::TrackNumber => FrameId::Text("TRCK").into(),
            TagKey::TrackTitle => FrameId::Text("TIT2").into(),
        }
    }

    /// Get the content of a text frame as string.
    fn get_frames<'a>(&'a self, frame_id: &'a str) -> impl Iterator<Item = &'a str> {
        self.data
            .get(frame_id)
            .and_then(|frame| frame.content().text_values())
            .into_iter()
            .flatten()
    }

    /// Get the content of an extended text frame as string.
    fn get_extended_texts<'a>(&'a self, description: &'a str) -> impl Iterator<Item = &'a str> {
        self.data
            .extended_texts()
            .filter(move |extended_text| extended_text.description == description)
            .map(|extended_text| extended_text.value.as_str())
    }
}

impl Tag for ID3v2Tag {
    fn tag_type(&self) -> TagType {
        match self.data.version() {
            id3::Version::Id3v22 => TagType::ID3v22,
            id3::Version::Id3v23 => TagType::ID3v23,
            id3::Version::Id3v24 => TagType::ID3v24,
        }
    }

    fn get(&self, key: TagKey) -> Option<&str> {
        self.tag_key_to_frame(key)
            .and_then(|frame_id| match frame_id {
                FrameId::Text(id) => self.get_frames(id).next(),
                FrameId::ExtendedText(id) => self.get_extended_texts(id).next(),
            })
    }

    fn clear(&mut self, key: TagKey) {
        let frame = self.tag_key_to_frame(key);
        if let Some(frame) = frame {
            match frame {
                #[expect(unused_results)]
                FrameId::Text(id) => {
                    self.data.remove(id);
                }
                FrameId::ExtendedText(description) => {
                    self.data.remove_extended_text(Some(description), None);
                }
            }
        }
    }

    fn set(&mut self, key: TagKey, value: Cow<'_, str>) {
        let frame = self.tag_key_to_frame(key);
        if let Some(frame) = frame {
            match frame {
                FrameId::Text(id) => {
                    self.data.set_text(id, value);
                }
                #[expect(unused_results)]
                FrameId::ExtendedText(description) => {
                    self.data.add_frame(id3::frame::ExtendedText {
                        description: description.to_string(),
                        value: value.into_owned(),
                    });
                }
            }
        }
    }

    fn set_front_cover(&mut self, mime_type: &str, data: Vec<u8>) {
        self.data.remove_picture_by_type(PictureType::CoverFront);
        self.data.add_frame(Picture {
            mime_type: mime_type.to_string(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data,
        });
    }

    fn write(&mut self, path: &Path) -> crate::Result<()> {
        let version = self.data.version();
        self.data.write_to_path(path, version)?;
        Ok(())
    }
}
