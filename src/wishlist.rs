//! Wishlist
//!
//! Saved products, each recorded once with the time it was saved. The in-memory list is
//! authoritative; every mutation writes it through to the [`DocumentStore`].

use jiff::{Timestamp, Unit};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    products::ProductId,
    storage::{Document, DocumentStore},
};

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    /// Saved product
    pub product_id: ProductId,

    /// When the product was saved
    #[serde(with = "iso_millis")]
    pub added_at: Timestamp,
}

impl WishlistEntry {
    /// Create an entry saved at `added_at`.
    pub fn new(product_id: impl Into<ProductId>, added_at: Timestamp) -> Self {
        Self {
            product_id: product_id.into(),
            added_at,
        }
    }
}

/// Timestamps as UTC ISO-8601 strings with millisecond precision (`2024-01-15T10:30:00.000Z`).
mod iso_millis {
    use jiff::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&format_args!("{ts:.3}"))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(de::Error::custom)
    }
}

/// Wishlist aggregate
#[derive(Debug)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
    store: DocumentStore,
}

impl Wishlist {
    /// Restore the wishlist from its persisted document.
    #[must_use]
    pub fn load(store: DocumentStore) -> Self {
        let entries = store.load(Document::Wishlist);

        Self { entries, store }
    }

    /// Replace the in-memory entries with the persisted document.
    pub fn reload(&mut self) {
        self.entries = self.store.load(Document::Wishlist);
    }

    /// Save a product now. Does nothing if it is already saved.
    pub fn add(&mut self, product_id: &ProductId) -> &[WishlistEntry] {
        let now = Timestamp::now();

        self.add_at(product_id, now.round(Unit::Millisecond).unwrap_or(now))
    }

    /// Save a product with an explicit timestamp. Does nothing if it is already saved.
    pub fn add_at(&mut self, product_id: &ProductId, added_at: Timestamp) -> &[WishlistEntry] {
        if self.contains(product_id) {
            return &self.entries;
        }

        debug!(%product_id, %added_at, "added wishlist entry");

        self.entries.push(WishlistEntry::new(product_id.clone(), added_at));

        self.persist()
    }

    /// Forget a saved product.
    pub fn remove(&mut self, product_id: &ProductId) -> &[WishlistEntry] {
        self.entries.retain(|entry| entry.product_id != *product_id);

        debug!(%product_id, "removed wishlist entry");

        self.persist()
    }

    /// Save the product if absent, forget it if present.
    ///
    /// Returns `true` when the product is saved afterwards.
    pub fn toggle(&mut self, product_id: &ProductId) -> bool {
        if self.contains(product_id) {
            self.remove(product_id);

            false
        } else {
            self.add(product_id);

            true
        }
    }

    /// Check whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.product_id == *product_id)
    }

    /// Saved entries, oldest first.
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Iterate over saved entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &WishlistEntry> {
        self.entries.iter()
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> &[WishlistEntry] {
        self.store.save(Document::Wishlist, &self.entries);

        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use testresult::TestResult;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, StorageKeys};

    fn id(value: &str) -> ProductId {
        ProductId::from(value)
    }

    #[test]
    fn add_is_idempotent() -> TestResult {
        let mut wishlist = Wishlist::load(DocumentStore::in_memory());
        let first: Timestamp = "2024-01-15T10:30:00Z".parse()?;
        let later: Timestamp = "2024-02-01T08:00:00Z".parse()?;

        wishlist.add_at(&id("1"), first);
        let entries = wishlist.add_at(&id("1"), later);

        assert_eq!(entries, &[WishlistEntry::new("1", first)]);

        Ok(())
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut wishlist = Wishlist::load(DocumentStore::in_memory());
        wishlist.add(&id("2"));

        assert!(wishlist.toggle(&id("1")));
        assert!(wishlist.contains(&id("1")));
        assert!(!wishlist.toggle(&id("1")));
        assert!(!wishlist.contains(&id("1")));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn remove_missing_product_is_noop() {
        let mut wishlist = Wishlist::load(DocumentStore::in_memory());
        wishlist.add(&id("1"));

        wishlist.remove(&id("9"));

        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn document_uses_iso_millisecond_timestamps() -> TestResult {
        let memory = Rc::new(MemoryStore::default());
        let store = DocumentStore::from_shared(memory.clone(), StorageKeys::default());
        let mut wishlist = Wishlist::load(store);

        wishlist.add_at(&id("1"), "2024-01-15T10:30:00Z".parse()?);

        assert_eq!(
            memory.get_item("balaji_sweets_wishlist")?.as_deref(),
            Some(r#"[{"productId":"1","addedAt":"2024-01-15T10:30:00.000Z"}]"#)
        );

        Ok(())
    }

    #[test]
    fn stored_document_reloads_unchanged() -> TestResult {
        let raw = r#"[{"productId":"5","addedAt":"2024-03-02T18:45:12.250Z"}]"#;
        let memory = Rc::new(MemoryStore::default());
        memory.set_item("balaji_sweets_wishlist", raw)?;
        let store = DocumentStore::from_shared(memory.clone(), StorageKeys::default());

        let mut wishlist = Wishlist::load(store);
        wishlist.add(&id("5"));

        assert_eq!(wishlist.len(), 1);
        assert_eq!(serde_json::to_string(wishlist.entries())?, raw);

        Ok(())
    }

    #[test]
    fn reload_reads_external_changes() -> TestResult {
        let memory = Rc::new(MemoryStore::default());
        let store = DocumentStore::from_shared(memory.clone(), StorageKeys::default());
        let mut wishlist = Wishlist::load(store);
        wishlist.add(&id("1"));

        memory.set_item("balaji_sweets_wishlist", "[]")?;
        assert!(wishlist.contains(&id("1")));

        wishlist.reload();
        assert!(wishlist.is_empty());

        Ok(())
    }

    #[test]
    fn added_timestamps_survive_persistence() {
        let store = DocumentStore::in_memory();
        let mut wishlist = Wishlist::load(store.clone());
        wishlist.add(&id("1"));

        let restored = Wishlist::load(store);

        assert_eq!(restored.entries(), wishlist.entries());
    }
}
