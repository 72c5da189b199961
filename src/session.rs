//! The monitoring session record populated from the configuration file.
//!
//! A [`Session`] starts from [`Session::default`] and is mutated in place by
//! [`crate::config::load`]. Options that never appear in the file keep their
//! defaults; a failed load leaves every option applied before the failure in
//! effect.
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{self, ConfigError};
use crate::list::{AppendError, Item, ItemList};

/// Polling interval used when none (or an invalid one) is configured, in minutes.
pub const DEFAULT_CHECK_INTERVAL: u32 = 10;

/// Default capacity of the seen-items bucket.
pub const DEFAULT_MAX_HISTORY: usize = 30;

/// Runtime settings of one feed-monitoring session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Feed to poll, stored exactly as written in the config file.
    pub feed_url: Option<String>,

    /// Where the daemon should write its log.
    pub log_file: Option<PathBuf>,

    /// Home directory of the external torrent client.
    pub transmission_home: Option<PathBuf>,

    /// File the seen-items list is persisted to between runs.
    pub state_file: Option<PathBuf>,

    /// Polling interval in minutes. Always greater than zero.
    pub check_interval: u32,

    /// Hand matched items to the external torrent client.
    pub use_transmission: bool,

    /// Filter patterns in the order they were configured.
    pub patterns: ItemList,

    /// Maximum number of entries kept in [`Session::downloads`].
    pub max_history: usize,

    /// Items already handled, oldest first.
    pub downloads: ItemList,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            feed_url: None,
            log_file: None,
            transmission_home: None,
            state_file: None,
            check_interval: DEFAULT_CHECK_INTERVAL,
            use_transmission: true,
            patterns: ItemList::new(),
            max_history: DEFAULT_MAX_HISTORY,
            downloads: ItemList::new(),
        }
    }
}

impl Session {
    /// Builds a session from defaults plus the options in the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut session = Self::default();
        config::load(&mut session, path)?;
        Ok(session)
    }

    /// Returns true if an item with this URL was already recorded.
    pub fn has_seen(&self, url: &str) -> bool {
        self.downloads.contains_url(url)
    }

    /// Records `item` as handled, evicting the oldest entry once
    /// `max_history` is reached. Returns the evicted item, if any.
    pub fn mark_seen(&mut self, item: Item) -> Result<Option<Item>, AppendError> {
        self.downloads.add_to_bucket(item, self.max_history)
    }

    /// Changes the seen-items capacity, dropping the oldest entries that no
    /// longer fit.
    pub fn set_max_history(&mut self, max_items: usize) {
        self.max_history = max_items;
        let dropped = self.downloads.truncate_oldest(max_items);
        if dropped > 0 {
            tracing::debug!(dropped, max_items, "Trimmed seen-items list to new capacity");
        }
    }
}
