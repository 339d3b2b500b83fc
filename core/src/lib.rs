//! A query-cost guard for boolean full-text queries.
//!
//! Before a search engine executes a parsed boolean query, a [SearchPolicy](search::SearchPolicy) looks at the
//! document frequency of its term clauses across every segment of an index snapshot. Queries made only of very common
//! terms are logged (or, in rewrite mode, replaced by a degenerate query or refused) instead of silently running an
//! expensive evaluation.

#![warn(clippy::all)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]

mod error;

/// Policy configuration.
pub mod config;

/// Directories on the local filesystem.
pub mod fs;

/// Binary encoding and storage abstractions.
pub mod io;

/// Index snapshots, segments and term dictionaries.
pub mod index;

/// Queries and the policies that guard them.
pub mod search;

pub use error::*;
