// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `library` CLI subcommand.

use crate::library::LibraryMap;
use crate::{Cache, Config};
use clap::Parser;

/// Command line arguments for the `library` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Rebuild the library map even if the cached copy is still fresh.
    #[arg(long)]
    refresh: bool,
}

/// Run the `library` command.
pub fn run(config: &Config, cache: Option<&Cache>, args: Args) -> crate::Result<()> {
    let library_dir = config.paths.library_dir()?;
    let library = if args.refresh {
        let map = LibraryMap::build(&library_dir)?;
        if let Some(cache) = cache {
            if let Err(err) = cache.insert_library_map(&map) {
                log::warn!("Failed to cache library map: {err}");
            }
        }
        map
    } else {
        LibraryMap::load(cache, &library_dir, &config.matching)?
    };

    for entry in &library.entries {
        println!(
            "{tagged} {name}",
            tagged = if entry.tagged { "[tagged]  " } else { "[untagged]" },
            name = entry.name
        );
    }
    println!(
        "\n{count} books in {library_dir} (scanned {scanned_at})",
        count = library.entries.len(),
        library_dir = library_dir.display(),
        scanned_at = library.scanned_at.format("%Y-%m-%d %H:%M")
    );

    Ok(())
}
