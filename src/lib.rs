// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Audiobook organizing library.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![warn(missing_docs)]
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(elided_lifetimes_in_paths)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(meta_variable_misuse)]
#![deny(missing_abi)]
#![deny(non_ascii_idents)]
#![deny(noop_method_call)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unstable_features)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
#![deny(unused_lifetimes)]
#![deny(unused_macro_rules)]

pub mod book;
mod cache;
pub mod cli;
pub mod config;
mod error;
pub mod folder;
pub mod history;
pub mod import;
pub mod library;
pub mod matching;
pub mod pathformat;
pub mod providers;
pub mod scanner;
mod tag;
mod taggedfile;
mod util;

pub use cache::Cache;
pub use config::Config;
pub use error::{Error, Result};
pub use taggedfile::TaggedFile;
