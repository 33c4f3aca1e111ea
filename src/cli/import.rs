// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `import` CLI subcommand.

use super::ui;
use crate::book::Book;
use crate::folder::parse_folder_name;
use crate::history::History;
use crate::import::{ImportOutcome, Importer};
use crate::library::{LibraryMap, Status};
use crate::providers::{Lookup, SearchQuery};
use crate::scanner::{self, Candidate};
use crate::{Cache, Config};
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for the `import` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Path to import instead of the configured downloads directory.
    path: Option<PathBuf>,
    /// Treat the given path as one audiobook instead of scanning it for candidates.
    #[arg(long)]
    single: bool,
    /// Override the candidate name used for matching and lookup (implies --single).
    #[arg(long)]
    name: Option<String>,
    /// Apply the best metadata match and import without prompting.
    #[arg(short = 'y', long)]
    yes: bool,
    /// Also offer candidates that are already in the library or in the history log.
    #[arg(long)]
    all: bool,
}

/// Find the candidates the import should operate on.
fn find_candidates(config: &Config, args: &Args) -> crate::Result<Vec<Candidate>> {
    let path = match &args.path {
        Some(path) => path.clone(),
        None => config.paths.downloads_dir()?,
    };

    if args.single || args.name.is_some() {
        let candidate = scanner::scan_single(&path, args.name.as_deref())?;
        if candidate.is_none() {
            log::warn!("No audio files found in {}", path.display());
        }
        Ok(candidate.into_iter().collect())
    } else {
        scanner::scan(&path)
    }
}

/// Collect the metadata options offered for a candidate, best match first.
///
/// The parsed folder name is always offered as the last resort, so an import is possible even
/// when every provider comes up empty.
fn metadata_options(lookup: &Lookup<'_>, candidate: &Candidate) -> Vec<Book> {
    let parsed = parse_folder_name(&candidate.name);
    let query = SearchQuery::from_parsed(&parsed);
    let mut books: Vec<Book> = lookup
        .search(&query)
        .into_iter()
        .map(|book| book.supplemented_with(&parsed))
        .collect();
    books.push(Book::from_parsed_name(&parsed));
    books
}

/// Run the `import` command.
pub fn run(config: &Config, cache: Option<&Cache>, args: Args) -> crate::Result<()> {
    let candidates = find_candidates(config, &args)?;
    let library_dir = config.paths.library_dir()?;
    let library = LibraryMap::load(cache, &library_dir, &config.matching)?;
    let mut history = History::load()?;
    let lookup = Lookup::new(config, cache)?;
    let importer = Importer::new(config)?;

    let mut imported = 0_usize;
    let mut skipped = vec![];
    for candidate in &candidates {
        let status = library.classify(candidate, &history, &config.matching);
        if !args.all && status != Status::New {
            log::info!(
                "Skipping {name} ({status})",
                name = candidate.name
            );
            continue;
        }

        println!(
            "Importing: {name} ({count} audio files)",
            name = candidate.name,
            count = candidate.audio_files.len()
        );
        let books = metadata_options(&lookup, candidate);
        let book = if args.yes {
            books.into_iter().next()
        } else {
            match ui::select_book(&candidate.name, &books)? {
                ui::BookSelection::Selected(book) => Some(book),
                ui::BookSelection::Skipped => {
                    log::info!("Skipping {name}", name = candidate.name);
                    continue;
                }
                ui::BookSelection::Quit => break,
            }
        };
        let Some(book) = book else {
            continue;
        };

        let destination = importer.destination_for(&book)?;
        if !args.yes && !ui::confirm_import(&destination)? {
            log::info!("Skipping {name}", name = candidate.name);
            continue;
        }

        match importer.import(candidate, &book, Some(&lookup), &mut history)? {
            ImportOutcome::Imported {
                destination,
                files_copied,
                files_tagged,
                cover_saved,
            } => {
                println!(
                    "Imported to {destination} ({files_copied} files copied, {files_tagged} tagged{cover})",
                    destination = destination.display(),
                    cover = if cover_saved { ", cover saved" } else { "" }
                );
                imported += 1;
            }
            ImportOutcome::SkippedExisting { destination } => {
                println!(
                    "Skipped (already exists): {destination}",
                    destination = destination.display()
                );
                skipped.push(candidate.name.clone());
            }
        }
    }

    println!("\nImported {imported} of {total} candidates.", total = candidates.len());
    if !skipped.is_empty() {
        println!("Skipped (already exists): {}", skipped.join(", "));
    }

    Ok(())
}
