//! Product Tags
//!
//! A small, ordered, de-duplicated set of free-form product tags ("premium", "festive", ...).

use std::string::ToString;

use smallvec::SmallVec;

/// Product tags, kept in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductTags {
    tags: SmallVec<[String; 5]>,
}

impl ProductTags {
    /// Create a tag collection, dropping repeated tags but keeping declaration order.
    #[must_use]
    pub fn new(tags: impl IntoIterator<Item = String>) -> Self {
        let mut collection = Self::default();

        for tag in tags {
            collection.add(&tag);
        }

        collection
    }

    /// Create a tag collection from string slices.
    pub fn from_strs(tags: &[&str]) -> Self {
        Self::new(tags.iter().map(ToString::to_string))
    }

    /// Add a tag unless it is already present.
    pub fn add(&mut self, tag: &str) {
        if !self.contains(tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Check if the collection contains a tag exactly.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Check whether any tag contains `fragment`, ignoring case.
    ///
    /// `fragment` must already be lowercase.
    pub fn any_contains_lowercase(&self, fragment: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(fragment))
    }

    /// Iterate over the tags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ProductTags {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(ToString::to_string))
    }
}
