// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Command line interface.

mod cache;
mod config;
mod history;
mod import;
mod library;
mod scan;
mod ui;

use crate::{Cache, Config};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;

/// Command line Arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Command,
    /// Show debug information.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config_path: Option<PathBuf>,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List candidates in the downloads directory with their status.
    Scan(scan::Args),
    /// Import candidates into the library.
    Import(import::Args),
    /// Show or refresh the library map.
    Library(library::Args),
    /// Show the processed-history log.
    History(history::Args),
    /// Show cache statistics or clear the cache.
    Cache(cache::Args),
    /// Print the effective configuration.
    Config(config::Args),
}

impl Args {
    /// Get the desired log level, depending on the verbose flag passed on the command line.
    fn log_level_filter(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Get the current configuration.
    fn config(&self) -> crate::Result<Config> {
        match &self.config_path {
            Some(path) => Config::load_from_path(path).map(|config| config.with_defaults()),
            None => Ok(Config::default()),
        }
    }
}

/// Main entry point.
///
/// # Errors
///
/// Can return errors if the command line arguments are incorrect or the executed commands lead
/// to an error.
pub fn main() -> crate::Result<()> {
    let args = Args::parse();
    let config = args.config()?;

    TermLogger::init(
        args.log_level_filter(),
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Failed to initialize logger");

    let cache = Cache::new();
    match args.command {
        Command::Scan(cmd_args) => scan::run(&config, Some(&cache), cmd_args),
        Command::Import(cmd_args) => import::run(&config, Some(&cache), cmd_args),
        Command::Library(cmd_args) => library::run(&config, Some(&cache), cmd_args),
        Command::History(cmd_args) => history::run(&config, cmd_args),
        Command::Cache(cmd_args) => cache::run(&config, Some(&cache), cmd_args),
        Command::Config(cmd_args) => config::run(&config, cmd_args),
    }
}
