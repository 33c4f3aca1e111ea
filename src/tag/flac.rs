// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Support for FLAC tags.

use crate::tag::{Tag, TagKey, TagType};
use metaflac::block::PictureType;
use std::borrow::Cow;
use std::path::Path;

/// FLAC tag.
pub struct FlacTag {
    /// The underlying tag data.
    data: metaflac::Tag,
}

impl FlacTag {
    /// Read the FLAC tag from the path
    pub fn read_from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let data = metaflac::Tag::read_from_path(path)?;
        Ok(FlacTag { data })
    }

    /// Get the vorbis key name for a tag key.
    fn tag_key_to_frame(key: TagKey) -> &'static str {
        match key {
            TagKey::Album => "ALBUM",
            TagKey::AlbumArtist => "ALBUMARTIST",
            TagKey::AlbumSortOrder => "ALBUMSORT",
            TagKey::Artist => "ARTIST",
            TagKey::Narrator => "NARRATOR",
            TagKey::Series => "SERIES",
            TagKey::SeriesPosition => "SERIES-PART",
            TagKey::Genre => "GENRE",
            TagKey::Description => "DESCRIPTION",
            TagKey::Publisher => "PUBLISHER",
            TagKey::Isbn => "ISBN",
            TagKey::ReleaseYear => "DATE",
            TagKey::TrackNumber => "TRACKNUMBER",
            TagKey::TrackTitle => "TITLE",
        }
    }
}

impl Tag for FlacTag {
    fn tag_type(&self) -> TagType {
        TagType::Flac
    }

    fn get(&self, key: TagKey) -> Option<&str> {
        self.data
            .get_vorbis(Self::tag_key_to_frame(key))
            .and_then(|mut iterator| iterator.next())
    }

    fn clear(&mut self, key: TagKey) {
        self.data.remove_vorbis(Self::tag_key_to_frame(key));
    }

    fn set(&mut self, key: TagKey, value: Cow<'_, str>) {
        self.data
            .set_vorbis(Self::tag_key_to_frame(key), vec![value.into_owned()]);
    }

    fn set_front_cover(&mut self, mime_type: &str, data: Vec<u8>) {
        self.data.remove_picture_type(PictureType::CoverFront);
        self.data
            .add_picture(mime_type, PictureType::CoverFront, data);
    }

    fn write(&mut self, path: &Path) -> crate::Result<()> {
        self.data.write_to_path(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_vorbis_keys() {
        let mut tag = FlacTag {
            data: metaflac::Tag::new(),
        };
        assert!(tag.get(TagKey::Album).is_none());

        tag.set(TagKey::Album, Cow::from("Project Hail Mary"));
        tag.set(TagKey::Narrator, Cow::from("Ray Porter"));
        assert_eq!(tag.get(TagKey::Album), Some("Project Hail Mary"));
        assert_eq!(tag.get(TagKey::Narrator), Some("Ray Porter"));

        tag.clear(TagKey::Narrator);
        assert!(tag.get(TagKey::Narrator).is_none());
    }

    #[test]
    fn test_set_or_clear() {
        let mut tag = FlacTag {
            data: metaflac::Tag::new(),
        };
        tag.set_or_clear(TagKey::Series, Some(Cow::from("Bobiverse")));
        assert_eq!(tag.get(TagKey::Series), Some("Bobiverse"));

        tag.set_or_clear(TagKey::Series, None);
        assert!(tag.get(TagKey::Series).is_none());
    }
}
