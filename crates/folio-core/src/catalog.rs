//! Book metadata keyed by title. Built once from the catalog artifact and only read afterwards.
//!
//! Titles are matched case-insensitively. Several editions may share a title; the first one
//! seen in the source data is the representative used for display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fragments shorter than this (in characters) are too broad to search for.
pub const MIN_SEARCH_CHARS: usize = 2;

/// One row of the catalog: a single edition of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author", default)]
    pub author: String,
    /// Kept as text: the source mixes integers with values like "0" or "DK Publishing Inc".
    #[serde(rename = "Year-Of-Publication", default)]
    pub publication_year: String,
    #[serde(rename = "Publisher", default)]
    pub publisher: String,
    #[serde(rename = "Image-URL-S", default)]
    pub thumbnail_url: String,
    #[serde(rename = "Image-URL-M", default)]
    pub medium_image_url: String,
    #[serde(rename = "Image-URL-L", default)]
    pub large_image_url: String,
}

/// Lower-cases and trims a title so lookups ignore casing and surrounding whitespace.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Case-insensitive index from title to the editions carrying it.
#[derive(Debug, Default, Clone)]
pub struct CatalogIndex {
    by_title: HashMap<String, Vec<CatalogEntry>>,
    /// Normalized titles in first-seen order, so substring scans are deterministic.
    order: Vec<String>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups `entries` by normalized title, keeping source order within each group.
    pub fn build(entries: &[CatalogEntry]) -> Self {
        let mut index = Self::new();
        for entry in entries {
            let key = normalize_title(&entry.title);
            match index.by_title.get_mut(&key) {
                Some(editions) => editions.push(entry.clone()),
                None => {
                    index.order.push(key.clone());
                    index.by_title.insert(key, vec![entry.clone()]);
                }
            }
        }
        index
    }

    /// Representative entry for `title` (its first occurrence), or `None` if the catalog has
    /// no such title.
    pub fn lookup(&self, title: &str) -> Option<&CatalogEntry> {
        self.editions(title).first()
    }

    /// Every entry sharing `title`, in source order. Empty if unknown.
    pub fn editions(&self, title: &str) -> &[CatalogEntry] {
        self.by_title
            .get(&normalize_title(title))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Representatives of every title containing `fragment`, in first-seen order, up to `limit`.
    pub fn search(&self, fragment: &str, limit: usize) -> Vec<&CatalogEntry> {
        let needle = normalize_title(fragment);
        if needle.chars().count() < MIN_SEARCH_CHARS {
            return Vec::new();
        }
        self.order
            .iter()
            .filter(|key| key.contains(&needle))
            .filter_map(|key| self.by_title.get(key).and_then(|e| e.first()))
            .take(limit)
            .collect()
    }

    /// Number of distinct (normalized) titles.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of entries across all titles.
    pub fn entry_count(&self) -> usize {
        self.by_title.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
pub(crate) fn entry(isbn: &str, title: &str, author: &str) -> CatalogEntry {
    CatalogEntry {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        publication_year: "1999".to_string(),
        publisher: String::new(),
        thumbnail_url: format!("http://img/{isbn}-s.jpg"),
        medium_image_url: format!("http://img/{isbn}-m.jpg"),
        large_image_url: format!("http://img/{isbn}-l.jpg"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_builds_empty_index() {
        let index = CatalogIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.lookup("dune"), None);
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let index = CatalogIndex::build(&[entry("1", "Dune", "Frank Herbert")]);
        let found = index.lookup("  dUNE ").unwrap();
        assert_eq!(found.author, "Frank Herbert");
    }

    #[test]
    fn catalog_titles_are_trimmed() {
        let index = CatalogIndex::build(&[entry("1", " Dune  ", "Frank Herbert")]);
        assert_eq!(index.lookup("dune").unwrap().isbn, "1");
        assert_eq!(index.search("un", 5).len(), 1);
    }

    #[test]
    fn first_edition_wins() {
        let raw = vec![
            entry("1", "Dune", "Frank Herbert"),
            entry("2", "Dune", "F. Herbert"),
            entry("3", "DUNE", "Herbert"),
        ];
        let index = CatalogIndex::build(&raw);
        assert_eq!(index.lookup("dune").unwrap().isbn, "1");
        let isbns: Vec<_> = index.editions("dune").iter().map(|e| e.isbn.as_str()).collect();
        assert_eq!(isbns, ["1", "2", "3"]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.entry_count(), 3);
        // Input untouched.
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn search_is_ordered_and_bounded() {
        let index = CatalogIndex::build(&[
            entry("1", "The Hobbit", "Tolkien"),
            entry("2", "Dune", "Herbert"),
            entry("3", "The Hobbit", "Tolkien"),
            entry("4", "The Two Towers", "Tolkien"),
            entry("5", "The Road", "McCarthy"),
        ]);
        let titles: Vec<_> = index.search("THE ", 2).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["The Hobbit", "The Two Towers"]);
        assert!(index.search("t", 10).is_empty());
    }
}
