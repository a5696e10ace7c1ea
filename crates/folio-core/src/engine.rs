//! Similarity lookup: resolves a title to its matrix row, ranks neighbours, and enriches
//! them from the catalog. Holds no mutable state; every query is a pure read.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::{normalize_title, CatalogIndex, MIN_SEARCH_CHARS};
use crate::matrix::SimilarityMatrix;

/// Neighbours returned by [`SimilarityEngine::recommend`] when the caller has no preference.
pub const DEFAULT_RECOMMENDATIONS: usize = 7;
/// Upper bound on autocomplete suggestions.
pub const DEFAULT_SUGGESTIONS: usize = 10;

/// A similar book, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub author: String,
    pub year: String,
    /// Medium-size cover image URL.
    pub image: String,
    /// Similarity as a percentage, rounded to two decimals.
    pub similarity: f64,
}

/// Ranked titles aligned 1:1 with the rows and columns of a similarity matrix.
#[derive(Debug, Default)]
pub struct SimilarityEngine {
    titles: Vec<String>,
    /// Normalized title -> first row carrying it.
    rows: HashMap<String, usize>,
    matrix: SimilarityMatrix,
    catalog: CatalogIndex,
}

impl SimilarityEngine {
    /// Engine with nothing loaded. Every query returns an empty result.
    pub fn unready() -> Self {
        Self::default()
    }

    /// Pairs `titles` with `matrix`. Titles are normalized; the matrix must have one row per title.
    pub fn new(
        titles: Vec<String>,
        matrix: SimilarityMatrix,
        catalog: CatalogIndex,
    ) -> Result<Self, EngineError> {
        if titles.len() != matrix.dim() {
            return Err(EngineError::DimensionMismatch {
                titles: titles.len(),
                matrix: matrix.dim(),
            });
        }
        let titles: Vec<String> = titles.iter().map(|t| normalize_title(t)).collect();
        let mut rows = HashMap::with_capacity(titles.len());
        for (i, title) in titles.iter().enumerate() {
            rows.entry(title.clone()).or_insert(i);
        }
        Ok(Self {
            titles,
            rows,
            matrix,
            catalog,
        })
    }

    /// True when both the ranked titles and the matrix are non-empty.
    pub fn is_ready(&self) -> bool {
        !self.titles.is_empty() && !self.matrix.is_empty()
    }

    /// Up to `k` books most similar to `query`, best first. The query itself is never included.
    /// Empty when the engine is not ready or the title is unknown.
    pub fn recommend(&self, query: &str, k: usize) -> Vec<Recommendation> {
        if !self.is_ready() {
            tracing::warn!("recommend called before data was loaded");
            return Vec::new();
        }
        let Some(&row_index) = self.rows.get(&normalize_title(query)) else {
            return Vec::new();
        };
        let Some(row) = self.matrix.row(row_index) else {
            return Vec::new();
        };

        let mut scored: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(col, score)| col != row_index && score.is_finite())
            .collect();
        // Stable: equal scores keep ascending column order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut out = Vec::with_capacity(k.min(scored.len()));
        for (col, score) in scored.into_iter().take(k) {
            let title = &self.titles[col];
            let Some(entry) = self.catalog.lookup(title) else {
                tracing::debug!(%title, "no catalog entry for similar title, skipping");
                continue;
            };
            out.push(Recommendation {
                title: entry.title.clone(),
                author: entry.author.clone(),
                year: entry.publication_year.clone(),
                image: entry.medium_image_url.clone(),
                similarity: as_percent(score),
            });
        }
        out
    }

    /// Title-cased ranked titles containing `prefix`, in row order, at most `limit`.
    /// Prefixes shorter than two characters match nothing.
    pub fn suggest_titles(&self, prefix: &str, limit: usize) -> Vec<String> {
        let needle = normalize_title(prefix);
        if needle.chars().count() < MIN_SEARCH_CHARS {
            return Vec::new();
        }
        self.titles
            .iter()
            .filter(|t| t.contains(&needle))
            .take(limit)
            .map(|t| title_case(t))
            .collect()
    }

    /// The first `n` ranked titles as stored (lower-cased).
    pub fn first_n(&self, n: usize) -> Vec<String> {
        self.titles.iter().take(n).cloned().collect()
    }

    /// Number of ranked titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn matrix_dim(&self) -> usize {
        self.matrix.dim()
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }
}

fn as_percent(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}

/// Upper-cases the first letter of each word and lower-cases the rest.
/// A letter after an apostrophe continues its word: "ender's game" becomes "Ender's Game",
/// where Python's `str.title` would give "Ender'S Game".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = in_word && (c == '\'' || c == '\u{2019}');
        }
    }
    out
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("similarity matrix is {matrix}x{matrix} but there are {titles} ranked titles")]
    DimensionMismatch { titles: usize, matrix: usize },
}
