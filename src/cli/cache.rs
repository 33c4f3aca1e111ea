// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `cache` CLI subcommand.

use crate::{Cache, Config};
use clap::Parser;

/// Command line arguments for the `cache` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Remove all cached items.
    #[arg(long)]
    clear: bool,
}

/// Run the `cache` command.
pub fn run(_config: &Config, cache: Option<&Cache>, args: Args) -> crate::Result<()> {
    let Some(cache) = cache else {
        return Err(crate::Error::CacheNotAvailable);
    };

    if args.clear {
        cache.clear()?;
        println!("Cache cleared.");
        return Ok(());
    }

    let (count, size) = cache.get_stats(Cache::search_prefix())?;
    println!("Search results: {count} ({size} bytes)");

    let (count, size) = cache.get_stats(Cache::covers_prefix())?;
    println!("Covers: {count} ({size} bytes)");

    Ok(())
}
