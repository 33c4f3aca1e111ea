// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Utilities for testing.

use crate::tag::{Tag, TagKey, TagType};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

/// An in-memory [`Tag`] implementation for tests that do not involve real audio files.
#[derive(Debug, Default)]
pub struct FakeTag {
    /// Tag values by key.
    values: HashMap<TagKey, String>,
    /// Mime type and data of the embedded front cover (if any).
    front_cover: Option<(String, Vec<u8>)>,
}

impl FakeTag {
    /// Create an empty fake tag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the embedded front cover (if any).
    #[must_use]
    pub fn front_cover(&self) -> Option<&(String, Vec<u8>)> {
        self.front_cover.as_ref()
    }
}

impl Tag for FakeTag {
    fn tag_type(&self) -> TagType {
        TagType::Fake
    }

    fn get(&self, key: TagKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    fn clear(&mut self, key: TagKey) {
        let _ = self.values.remove(&key);
    }

    fn set(&mut self, key: TagKey, value: Cow<'_, str>) {
        let _ = self.values.insert(key, value.into_owned());
    }

    fn set_front_cover(&mut self, mime_type: &str, data: Vec<u8>) {
        self.front_cover = Some((mime_type.to_string(), data));
    }

    fn write(&mut self, _path: &Path) -> crate::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_fake_tag_roundtrip() {
        let mut tag = FakeTag::new();
        assert!(tag.get(TagKey::Album).is_none());

        tag.set(TagKey::Album, Cow::from("Dune"));
        assert_eq!(tag.get(TagKey::Album), Some("Dune"));

        tag.set_or_clear(TagKey::Album, None);
        assert!(tag.get(TagKey::Album).is_none());
    }

    #[test]
    fn test_fake_tag_front_cover() {
        let mut tag = FakeTag::new();
        assert!(tag.front_cover().is_none());

        tag.set_front_cover("image/jpeg", vec![1, 2, 3]);
        let (mime_type, data) = tag.front_cover().unwrap();
        assert_eq!(mime_type, "image/jpeg");
        assert_eq!(data, &vec![1, 2, 3]);
    }
}
