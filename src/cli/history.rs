// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `history` CLI subcommand.

use crate::history::History;
use crate::Config;
use clap::Parser;

/// Command line arguments for the `history` CLI command.
#[derive(Parser, Debug)]
pub struct Args;

/// Run the `history` command.
#[expect(clippy::needless_pass_by_value)]
pub fn run(_config: &Config, _args: Args) -> crate::Result<()> {
    let history = History::load()?;
    if history.entries().is_empty() {
        println!("No imports recorded yet.");
        return Ok(());
    }

    for entry in history.entries() {
        println!(
            "{imported_at}  {name} -> {destination}",
            imported_at = entry.imported_at.format("%Y-%m-%d %H:%M"),
            name = entry.name,
            destination = entry.destination.display()
        );
    }

    Ok(())
}
