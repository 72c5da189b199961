//! Ordered item lists and bounded "buckets".
//!
//! An [`ItemList`] holds named items in insertion order. The same type backs
//! the filter-pattern list built by the config parser and the seen-items
//! bucket that feed processing uses to avoid handling an item twice.
//!
//! A bucket is just an [`ItemList`] filled through
//! [`ItemList::add_to_bucket`], which evicts the oldest entries (FIFO) so the
//! list never grows past its configured maximum.
use serde::Serialize;
use std::collections::{TryReserveError, VecDeque};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Inserting into a list failed because memory could not be reserved.
///
/// The rejected item is handed back so ownership is never lost; the list
/// itself is left exactly as it was.
#[derive(Debug, Error)]
#[error("Failed to allocate list entry for '{}': {source}", .item.name)]
pub struct AppendError {
    pub item: Item,
    #[source]
    pub source: TryReserveError,
}

// ============================================================================
// Item
// ============================================================================

/// A named entry with an optional URL or identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Display name (for patterns: the pattern text itself).
    pub name: String,
    /// URL or other unique identifier, used for dedup lookups.
    pub url: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }

    /// An item with a name and no URL.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{} <{}>", self.name, url),
            None => f.write_str(&self.name),
        }
    }
}

// ============================================================================
// ItemList
// ============================================================================

/// Insertion-ordered list that exclusively owns its items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemList {
    items: VecDeque<Item>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if some item's URL is exactly `url`.
    pub fn contains_url(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.url.as_deref() == Some(url))
    }

    /// Appends `item` at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`AppendError`] carrying the item back if space for it could
    /// not be reserved. The list is unchanged in that case.
    pub fn append(&mut self, item: Item) -> Result<(), AppendError> {
        if let Err(source) = self.items.try_reserve(1) {
            return Err(AppendError { item, source });
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Appends `item` while keeping the list at no more than `max_items`
    /// entries.
    ///
    /// When the list is full the oldest entries are evicted first. Returns the
    /// last evicted item, if any. With `max_items == 0` nothing can be stored,
    /// so `item` itself comes back as the evicted value.
    ///
    /// # Errors
    ///
    /// Returns [`AppendError`] if the insert could not allocate. Evictions
    /// already performed to make room are not undone.
    pub fn add_to_bucket(
        &mut self,
        item: Item,
        max_items: usize,
    ) -> Result<Option<Item>, AppendError> {
        if max_items == 0 {
            return Ok(Some(item));
        }

        let mut evicted = None;
        while self.items.len() >= max_items {
            evicted = self.items.pop_front();
        }
        if let Some(old) = &evicted {
            tracing::debug!(name = %old.name, max_items, "Evicted oldest bucket entry");
        }

        self.append(item)?;
        Ok(evicted)
    }

    /// Drops the oldest items until at most `max_items` remain.
    ///
    /// Returns how many items were removed.
    pub fn truncate_oldest(&mut self, max_items: usize) -> usize {
        let excess = self.items.len().saturating_sub(max_items);
        self.items.drain(..excess);
        excess
    }

    /// Removes every item. Calling this on an empty list is a no-op.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Item names in list order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = std::collections::vec_deque::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(n: usize) -> Item {
        Item::new(format!("item {n}"), Some(format!("https://example.com/{n}")))
    }

    #[test]
    fn test_new_list_is_empty() {
        let list = ItemList::new();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert!(!list.contains_url("https://example.com/0"));
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut list = ItemList::new();
        list.append(Item::named("first")).unwrap();
        list.append(Item::named("second")).unwrap();
        list.append(Item::named("third")).unwrap();

        assert_eq!(list.len(), 3);
        let names: Vec<_> = list.names().collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_contains_url_exact_match_only() {
        let mut list = ItemList::new();
        list.append(seen(1)).unwrap();
        list.append(Item::named("no url")).unwrap();

        assert!(list.contains_url("https://example.com/1"));
        assert!(!list.contains_url("https://example.com/"));
        assert!(!list.contains_url("https://example.com/10"));
        assert!(!list.contains_url("no url"));
    }

    #[test]
    fn test_bucket_evicts_oldest_when_full() {
        let mut list = ItemList::new();
        for n in 0..3 {
            assert!(list.add_to_bucket(seen(n), 3).unwrap().is_none());
        }

        let evicted = list.add_to_bucket(seen(3), 3).unwrap();
        assert_eq!(evicted, Some(seen(0)));
        assert_eq!(list.len(), 3);
        assert!(!list.contains_url("https://example.com/0"));
        assert!(list.contains_url("https://example.com/3"));
    }

    #[test]
    fn test_bucket_shrinks_overfull_list() {
        let mut list = ItemList::new();
        for n in 0..5 {
            list.append(seen(n)).unwrap();
        }

        let evicted = list.add_to_bucket(seen(5), 2).unwrap();
        assert_eq!(evicted, Some(seen(3)));
        let names: Vec<_> = list.names().collect();
        assert_eq!(names, vec!["item 4", "item 5"]);
    }

    #[test]
    fn test_bucket_with_zero_capacity_stores_nothing() {
        let mut list = ItemList::new();
        let evicted = list.add_to_bucket(seen(7), 0).unwrap();
        assert_eq!(evicted, Some(seen(7)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_truncate_oldest() {
        let mut list = ItemList::new();
        for n in 0..4 {
            list.append(seen(n)).unwrap();
        }
        assert_eq!(list.truncate_oldest(10), 0);
        assert_eq!(list.truncate_oldest(1), 3);
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["item 3"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut list = ItemList::new();
        list.append(seen(1)).unwrap();
        list.clear();
        assert_eq!(list.len(), 0);
        assert!(!list.contains_url("https://example.com/1"));
        list.clear();
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_item_display() {
        assert_eq!(Item::named("ubuntu.*iso").to_string(), "ubuntu.*iso");
        assert_eq!(seen(2).to_string(), "item 2 <https://example.com/2>");
    }

    #[test]
    fn test_serializes_as_sequence() {
        let mut list = ItemList::new();
        list.append(Item::named("a")).unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"[{"name":"a","url":null}]"#);
    }
}
