//! The loaded, read-only bundle a front end serves requests from.
//!
//! Built once (see [`crate::loader::load_library`]) and shared by reference, e.g. in an
//! `Arc<Library>`; nothing in it changes afterwards, so no locking is needed.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{Config, DEFAULT_FALLBACK_SUGGESTIONS};
use crate::engine::{Recommendation, SimilarityEngine, DEFAULT_RECOMMENDATIONS};
use crate::loader::list_data_files;
use crate::popular::PopularBook;

#[derive(Debug, Default)]
pub struct Library {
    engine: SimilarityEngine,
    popular: Vec<PopularBook>,
    root: Option<PathBuf>,
}

/// Knobs for [`Library::query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySettings {
    pub recommendations: usize,
    pub fallback_suggestions: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            recommendations: DEFAULT_RECOMMENDATIONS,
            fallback_suggestions: DEFAULT_FALLBACK_SUGGESTIONS,
        }
    }
}

impl From<&Config> for QuerySettings {
    fn from(config: &Config) -> Self {
        Self {
            recommendations: config.recommendations,
            fallback_suggestions: config.fallback_suggestions,
        }
    }
}

/// What a recommendation request resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Nothing but whitespace was entered.
    EmptyQuery,
    Found {
        recommendations: Vec<Recommendation>,
    },
    /// No recommendations; `suggestions` are titles the caller can offer instead.
    NotFound {
        query: String,
        suggestions: Vec<String>,
    },
}

/// Readiness plus the size of every dataset, for health and debug output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataStatus {
    pub ready: bool,
    pub data_root: Option<PathBuf>,
    pub files: Vec<String>,
    pub popular_rows: usize,
    pub catalog_entries: usize,
    pub catalog_titles: usize,
    pub ranked_titles: usize,
    pub similarity_dim: usize,
}

impl Library {
    pub fn new(engine: SimilarityEngine, popular: Vec<PopularBook>, root: Option<PathBuf>) -> Self {
        Self {
            engine,
            popular,
            root,
        }
    }

    /// A library with nothing loaded. Queries return empty results.
    pub fn unready() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_ready()
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    pub fn popular(&self) -> &[PopularBook] {
        &self.popular
    }

    /// Recommendations for a raw user query, or fallback suggestions when there are none.
    pub fn query(&self, raw: &str, settings: &QuerySettings) -> QueryOutcome {
        let query = raw.trim();
        if query.is_empty() {
            return QueryOutcome::EmptyQuery;
        }
        let recommendations = self.engine.recommend(query, settings.recommendations);
        if recommendations.is_empty() {
            return QueryOutcome::NotFound {
                query: query.to_string(),
                suggestions: self.engine.first_n(settings.fallback_suggestions),
            };
        }
        QueryOutcome::Found { recommendations }
    }

    pub fn status(&self) -> DataStatus {
        DataStatus {
            ready: self.is_ready(),
            data_root: self.root.clone(),
            files: self.root.as_deref().map(list_data_files).unwrap_or_default(),
            popular_rows: self.popular.len(),
            catalog_entries: self.engine.catalog().entry_count(),
            catalog_titles: self.engine.catalog().len(),
            ranked_titles: self.engine.len(),
            similarity_dim: self.engine.matrix_dim(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::tests::sample_engine;

    fn library() -> Library {
        Library::new(sample_engine(), Vec::new(), None)
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(library().query("   ", &QuerySettings::default()), QueryOutcome::EmptyQuery);
    }

    #[test]
    fn unknown_title_offers_first_titles() {
        let settings = QuerySettings {
            recommendations: 7,
            fallback_suggestions: 2,
        };
        assert_eq!(
            library().query(" Nonexistent Book ", &settings),
            QueryOutcome::NotFound {
                query: "Nonexistent Book".to_string(),
                suggestions: vec!["the hobbit".to_string(), "dune".to_string()],
            }
        );
    }

    #[test]
    fn known_title_is_found() {
        let recommendations = match library().query("the hobbit", &QuerySettings::default()) {
            QueryOutcome::Found { recommendations } => recommendations,
            other => panic!("expected recommendations, got {other:?}"),
        };
        assert_eq!(recommendations.len(), 3);
        assert_eq!(recommendations[0].title, "Dune");
    }

    #[test]
    fn unready_library_degrades() {
        let library = Library::unready();
        let status = library.status();
        assert!(!status.ready);
        assert_eq!(status.similarity_dim, 0);
        assert!(status.files.is_empty());
        assert_eq!(
            library.query("dune", &QuerySettings::default()),
            QueryOutcome::NotFound {
                query: "dune".to_string(),
                suggestions: Vec::new(),
            }
        );
    }

    #[test]
    fn status_counts_datasets() {
        let status = library().status();
        assert!(status.ready);
        assert_eq!(status.ranked_titles, 4);
        assert_eq!(status.similarity_dim, 4);
        assert_eq!(status.catalog_titles, 4);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["ready"], true);
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_value(QueryOutcome::EmptyQuery).unwrap();
        assert_eq!(json["outcome"], "empty_query");
    }

    #[test]
    fn shared_across_threads() {
        let library = Arc::new(library());
        let expected = library.engine().recommend("dune", 3);
        std::thread::scope(|s| {
            for _ in 0..4 {
                let library = Arc::clone(&library);
                let expected = &expected;
                s.spawn(move || {
                    assert_eq!(&library.engine().recommend(" DUNE", 3), expected);
                    assert_eq!(library.engine().suggest_titles("du", 10), ["Dune"]);
                });
            }
        });
    }
}
