// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Interactive prompts for the import flow.

use crate::book::Book;
use inquire::{Confirm, InquireError, Select};
use std::fmt;
use std::path::Path;

/// Result of selecting a metadata match for a candidate.
#[derive(Debug)]
pub enum BookSelection {
    /// A book was selected and should be applied.
    Selected(Book),
    /// Skip importing this candidate.
    Skipped,
    /// Quit the import.
    Quit,
}

/// One entry in the selection prompt.
enum SelectItem<'a> {
    /// A metadata match.
    Book(&'a Book),
    /// Skip this candidate.
    Skip,
    /// Quit the import.
    Quit,
}

impl fmt::Display for SelectItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectItem::Book(book) => write!(f, "{book}"),
            SelectItem::Skip => write!(f, "Skip this candidate"),
            SelectItem::Quit => write!(f, "Quit import"),
        }
    }
}

/// Let the user pick the metadata match to apply to a candidate.
///
/// Pressing Escape skips the candidate, Ctrl-C quits the import.
///
/// # Errors
///
/// Returns an error if the prompt fails for another reason.
pub fn select_book(candidate_name: &str, options: &[Book]) -> crate::Result<BookSelection> {
    let items: Vec<SelectItem<'_>> = options
        .iter()
        .map(SelectItem::Book)
        .chain([SelectItem::Skip, SelectItem::Quit])
        .collect();
    let prompt = format!("Metadata for \"{candidate_name}\":");

    match Select::new(&prompt, items).prompt() {
        Ok(SelectItem::Book(book)) => Ok(BookSelection::Selected(book.clone())),
        Ok(SelectItem::Skip) | Err(InquireError::OperationCanceled) => Ok(BookSelection::Skipped),
        Ok(SelectItem::Quit) | Err(InquireError::OperationInterrupted) => Ok(BookSelection::Quit),
        Err(err) => Err(err.into()),
    }
}

/// Ask the user to confirm the destination before copying.
///
/// # Errors
///
/// Returns an error if the prompt fails.
pub fn confirm_import(destination: &Path) -> crate::Result<bool> {
    let prompt = format!("Copy to {}?", destination.display());
    match Confirm::new(&prompt).with_default(true).prompt() {
        Ok(confirmed) => Ok(confirmed),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
