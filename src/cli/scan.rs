// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `scan` CLI subcommand.

use crate::history::History;
use crate::library::{LibraryMap, Status};
use crate::scanner;
use crate::{Cache, Config};
use clap::Parser;
use itertools::Itertools;

/// Command line arguments for the `scan` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Path to scan instead of the configured downloads directory.
    path: Option<std::path::PathBuf>,
}

/// Run the `scan` command.
pub fn run(config: &Config, cache: Option<&Cache>, args: Args) -> crate::Result<()> {
    let downloads_dir = args
        .path
        .map_or_else(|| config.paths.downloads_dir(), Ok)?;
    let library_dir = config.paths.library_dir()?;
    let library = LibraryMap::load(cache, &library_dir, &config.matching)?;
    let history = History::load()?;

    let candidates = scanner::scan(&downloads_dir)?;
    let mut statuses = vec![];
    for candidate in &candidates {
        let status = library.classify(candidate, &history, &config.matching);
        println!(
            "{status:<22} {name} ({count} audio files)",
            status = format!("[{status}]"),
            name = candidate.name,
            count = candidate.audio_files.len()
        );
        statuses.push(status);
    }

    let counts = statuses.iter().counts();
    println!(
        "\n{total} candidates: {new} new, {matched} in library, {imported} already imported",
        total = candidates.len(),
        new = counts.get(&Status::New).copied().unwrap_or(0),
        matched = counts.get(&Status::Matched).copied().unwrap_or(0)
            + counts.get(&Status::MatchedTagged).copied().unwrap_or(0),
        imported = counts.get(&Status::Imported).copied().unwrap_or(0),
    );

    Ok(())
}
