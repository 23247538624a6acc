//! Preferences
//!
//! Browsing history kept for the storefront: recently viewed products and recent searches,
//! most recent first, each capped at [`MAX_HISTORY`] entries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    products::ProductId,
    storage::{Document, DocumentStore},
};

/// Maximum number of entries kept in each history list.
pub const MAX_HISTORY: usize = 10;

/// Persisted user preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Recently viewed products, most recent first
    pub recently_viewed: Vec<ProductId>,

    /// Recent search queries, most recent first
    pub search_history: Vec<String>,
}

impl UserPreferences {
    /// Move a product to the front of the recently viewed list.
    pub fn record_view(&mut self, product_id: &ProductId) {
        push_front_unique(&mut self.recently_viewed, product_id.clone());
    }

    /// Move a search query to the front of the history. Queries are trimmed; blank queries
    /// are ignored.
    ///
    /// Returns `false` when the query was ignored.
    pub fn record_search(&mut self, query: &str) -> bool {
        let query = query.trim();

        if query.is_empty() {
            return false;
        }

        push_front_unique(&mut self.search_history, query.to_string());

        true
    }
}

fn push_front_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    list.retain(|existing| *existing != value);
    list.insert(0, value);
    list.truncate(MAX_HISTORY);
}

/// Preferences aggregate
#[derive(Debug)]
pub struct Preferences {
    prefs: UserPreferences,
    store: DocumentStore,
}

impl Preferences {
    /// Restore preferences from their persisted document.
    #[must_use]
    pub fn load(store: DocumentStore) -> Self {
        let prefs = store.load(Document::Preferences);

        Self { prefs, store }
    }

    /// Replace the in-memory preferences with the persisted document.
    pub fn reload(&mut self) {
        self.prefs = self.store.load(Document::Preferences);
    }

    /// Current preferences.
    #[must_use]
    pub fn get(&self) -> &UserPreferences {
        &self.prefs
    }

    /// Record a product page view.
    pub fn view_product(&mut self, product_id: &ProductId) -> &UserPreferences {
        self.prefs.record_view(product_id);

        debug!(%product_id, "recorded product view");

        self.persist()
    }

    /// Record a submitted search.
    pub fn submit_search(&mut self, query: &str) -> &UserPreferences {
        if self.prefs.record_search(query) {
            debug!(query = query.trim(), "recorded search");

            return self.persist();
        }

        &self.prefs
    }

    fn persist(&self) -> &UserPreferences {
        self.store.save(Document::Preferences, &self.prefs);

        &self.prefs
    }
}
