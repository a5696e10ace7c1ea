//! All backend logic independent of how recommendations are served (CLI or web).
//!
//! The offline pipeline writes four artifacts into a data root directory; [loader] reads them
//! once into an immutable [Library], and every query after that is a pure in-memory read.

pub mod app_data;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod library;
pub mod loader;
pub mod matrix;
pub mod popular;

pub use app_data::app_data_dir;
pub use catalog::{normalize_title, CatalogEntry, CatalogIndex};
pub use config::{
    get_data_root, load_config, load_config_in, save_config, save_config_in, set_data_root,
    ArtifactNames, Config, ConfigError,
};
pub use engine::{
    EngineError, Recommendation, SimilarityEngine, DEFAULT_RECOMMENDATIONS, DEFAULT_SUGGESTIONS,
};
pub use library::{DataStatus, Library, QueryOutcome, QuerySettings};
pub use loader::{load_library, DataPaths, LoadError};
pub use matrix::{MatrixError, SimilarityMatrix};
pub use popular::PopularBook;
