//! # feedwatch
//!
//! Configuration core of a feed-monitoring daemon.
//!
//! ## Architecture
//!
//! ```text
//! config file → Lexer → option dispatcher → Session
//!                              ↓
//!                   pattern normalizer → ItemList
//! ```
//!
//! The daemon around this crate (feed fetching, matching, handing results
//! to the torrent client, notifications) reads everything it needs from the
//! [`Session`](session::Session) produced here.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use feedwatch::session::Session;
//!
//! let session = Session::load(Path::new("/etc/feedwatch.conf"))?;
//! for pattern in session.patterns.names() {
//!     println!("watching for {pattern}");
//! }
//! # Ok::<(), feedwatch::config::ConfigError>(())
//! ```

/// Configuration file parsing.
///
/// - [`load`](config::load): read a file and apply it to a session
/// - [`Lexer`](config::Lexer): entry scanner over a byte buffer
/// - [`apply`](config::apply): option dispatcher
/// - [`normalize`](config::normalize): canonical form of the `patterns` value
pub mod config;

/// Insertion-ordered item lists with FIFO-bounded "bucket" inserts.
pub mod list;

/// The [`Session`](session::Session) record filled in by the parser.
pub mod session;

/// URL sanity checks.
pub mod util;
