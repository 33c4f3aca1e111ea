// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! The [`TaggedFile`] struct represents a file that contains tags.

use crate::book::Book;
use crate::tag::{read_tags_from_path, Tag, TagKey};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Leading articles that move to the back of the sort title ("The Martian" -> "Martian, The").
const SORT_ARTICLES: [&str; 3] = ["The ", "A ", "An "];

/// Build the sort title for a book title, or `None` if it sorts as-is.
fn sort_title(title: &str) -> Option<String> {
    SORT_ARTICLES.iter().find_map(|article| {
        title
            .strip_prefix(article)
            .map(|rest| format!("{rest}, {article}", article = article.trim_end()))
    })
}

/// A tagged file that contains zero or more tags.
pub struct TaggedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Tags that are present in the file.
    content: Vec<Box<dyn Tag>>,
}

impl fmt::Debug for TaggedFile {
    #[expect(unused_results)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let mut s = f.debug_tuple("TaggedFile");
        for tag in self.tags() {
            s.field(&tag.tag_type());
        }
        s.finish()
    }
}

impl TaggedFile {
    /// Create a new tagged file with an empty path from the given tags.
    #[cfg(test)]
    #[must_use]
    pub fn new(content: Vec<Box<dyn Tag>>) -> Self {
        TaggedFile {
            path: PathBuf::new(),
            content,
        }
    }

    /// Creates a [`TaggedFile`] from the path.
    ///
    /// # Errors
    ///
    /// Returns an error in case the file at the given path does not exist or is unsupported.
    pub fn read_from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        read_tags_from_path(path.as_ref()).map(|content| Self {
            path: path.as_ref().to_path_buf(),
            content,
        })
    }

    /// Returns zero or more [`Tag`] objects.
    #[must_use]
    pub fn tags(&self) -> &[Box<dyn Tag>] {
        &self.content
    }

    /// Returns the first value for the given [`TagKey`].
    #[must_use]
    pub fn first_tag_value(&self, key: TagKey) -> Option<&str> {
        self.content.iter().find_map(|tag| tag.get(key))
    }

    /// Sets (or clears) the value for the given [`TagKey`] on all tags in this file.
    pub fn set_tag_value(&mut self, key: TagKey, value: Option<Cow<'_, str>>) {
        self.content
            .iter_mut()
            .for_each(|tag| tag.set_or_clear(key, value.clone()));
    }

    /// Returns `true` if this file already carries the tags the organizer writes.
    #[must_use]
    pub fn has_organizer_tags(&self) -> bool {
        self.first_tag_value(TagKey::Album).is_some()
            && self.first_tag_value(TagKey::AlbumArtist).is_some()
    }

    /// Assign metadata from a [`Book`].
    ///
    /// Fields the book does not have are cleared, so re-imports do not leave stale values behind.
    pub fn assign_book(&mut self, book: &Book) {
        self.set_tag_value(TagKey::Album, Some(Cow::from(&book.title)));
        self.set_tag_value(TagKey::AlbumArtist, book.joined_authors().map(Cow::from));
        self.set_tag_value(TagKey::Artist, book.joined_authors().map(Cow::from));
        self.set_tag_value(TagKey::AlbumSortOrder, sort_title(&book.title).map(Cow::from));
        self.set_tag_value(TagKey::Narrator, book.joined_narrators().map(Cow::from));
        self.set_tag_value(TagKey::Series, book.series.as_deref().map(Cow::from));
        self.set_tag_value(
            TagKey::SeriesPosition,
            book.series_position.as_deref().map(Cow::from),
        );
        self.set_tag_value(
            TagKey::Genre,
            (!book.genres.is_empty()).then(|| Cow::from(book.genres.join("; "))),
        );
        self.set_tag_value(
            TagKey::Description,
            book.description.as_deref().map(Cow::from),
        );
        self.set_tag_value(TagKey::Publisher, book.publisher.as_deref().map(Cow::from));
        self.set_tag_value(TagKey::Isbn, book.isbn.as_deref().map(Cow::from));
        self.set_tag_value(
            TagKey::ReleaseYear,
            book.year.map(|year| Cow::from(year.to_string())),
        );
    }

    /// Assign the part number and per-file title for multi-file audiobooks.
    pub fn assign_part(&mut self, book: &Book, index: usize, total: usize) {
        self.set_tag_value(
            TagKey::TrackNumber,
            Some(Cow::from(format!("{index}/{total}"))),
        );
        let track_title = if total > 1 {
            format!("{title}, Part {index}", title = book.title)
        } else {
            book.title.clone()
        };
        self.set_tag_value(TagKey::TrackTitle, Some(Cow::from(track_title)));
    }

    /// Embed the given image as the front cover in all tags.
    pub fn embed_front_cover(&mut self, mime_type: &str, data: &[u8]) {
        self.content
            .iter_mut()
            .for_each(|tag| tag.set_front_cover(mime_type, data.to_vec()));
    }

    /// Write tags back to the file.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying tags fail to write.
    pub fn write_tags(&mut self) -> crate::Result<()> {
        for tag in &mut self.content {
            tag.write(self.path.as_path())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::FakeTag;

    fn fake_file() -> TaggedFile {
        TaggedFile::new(vec![Box::new(FakeTag::new())])
    }

    fn example_book() -> Book {
        Book {
            title: "Project Hail Mary".to_string(),
            authors: vec!["Andy Weir".to_string()],
            narrators: vec!["Ray Porter".to_string()],
            year: Some(2021),
            genres: vec!["Science Fiction".to_string()],
            ..Book::default()
        }
    }

    #[test]
    fn test_assign_book_sets_tag_values() {
        let mut file = fake_file();
        file.assign_book(&example_book());

        assert_eq!(
            file.first_tag_value(TagKey::Album),
            Some("Project Hail Mary")
        );
        assert_eq!(file.first_tag_value(TagKey::AlbumArtist), Some("Andy Weir"));
        assert_eq!(file.first_tag_value(TagKey::Narrator), Some("Ray Porter"));
        assert_eq!(file.first_tag_value(TagKey::ReleaseYear), Some("2021"));
        assert_eq!(
            file.first_tag_value(TagKey::Genre),
            Some("Science Fiction")
        );
        assert!(file.first_tag_value(TagKey::Series).is_none());
    }

    #[test]
    fn test_assign_book_clears_stale_values() {
        let mut file = fake_file();
        file.set_tag_value(TagKey::Series, Some(Cow::from("Wrong Series")));
        file.assign_book(&example_book());
        assert!(file.first_tag_value(TagKey::Series).is_none());
    }

    #[test]
    fn test_assign_part_multi_file() {
        let mut file = fake_file();
        file.assign_part(&example_book(), 2, 10);
        assert_eq!(file.first_tag_value(TagKey::TrackNumber), Some("2/10"));
        assert_eq!(
            file.first_tag_value(TagKey::TrackTitle),
            Some("Project Hail Mary, Part 2")
        );
    }

    #[test]
    fn test_assign_part_single_file() {
        let mut file = fake_file();
        file.assign_part(&example_book(), 1, 1);
        assert_eq!(
            file.first_tag_value(TagKey::TrackTitle),
            Some("Project Hail Mary")
        );
    }

    #[test]
    fn test_sort_title_moves_leading_article() {
        assert_eq!(sort_title("The Martian").as_deref(), Some("Martian, The"));
        assert_eq!(sort_title("A Memory of Light").as_deref(), Some("Memory of Light, A"));
        assert_eq!(sort_title("Dune"), None);
        // "Andy" must not lose its "An".
        assert_eq!(sort_title("Andy"), None);
    }

    #[test]
    fn test_has_organizer_tags() {
        let mut file = fake_file();
        assert!(!file.has_organizer_tags());
        file.assign_book(&example_book());
        assert!(file.has_organizer_tags());
    }
}
