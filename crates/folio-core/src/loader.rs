//! Reading the artifacts written by the offline pipeline from a data root directory.
//!
//! Everything here runs once at startup. Any problem is a load error: the caller gets
//! either a fully consistent [`Library`] or a reason why there is none.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::config::ArtifactNames;
use crate::engine::{EngineError, SimilarityEngine};
use crate::library::Library;
use crate::matrix::{MatrixError, SimilarityMatrix};
use crate::popular::PopularBook;

/// Resolved locations of the four artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
    pub popular: PathBuf,
    pub catalog: PathBuf,
    pub ratings: PathBuf,
    pub similarity: PathBuf,
}

impl DataPaths {
    pub fn in_dir(root: &Path, names: &ArtifactNames) -> Self {
        Self {
            root: root.to_path_buf(),
            popular: root.join(&names.popular),
            catalog: root.join(&names.catalog),
            ratings: root.join(&names.ratings),
            similarity: root.join(&names.similarity),
        }
    }

    /// Artifact files that do not exist.
    pub fn missing(&self) -> Vec<PathBuf> {
        [&self.popular, &self.catalog, &self.ratings, &self.similarity]
            .into_iter()
            .filter(|p| !p.is_file())
            .cloned()
            .collect()
    }
}

/// Loads and validates every artifact and assembles a ready [`Library`].
pub fn load_library(paths: &DataPaths) -> Result<Library, LoadError> {
    let missing = paths.missing();
    if !missing.is_empty() {
        return Err(LoadError::MissingFiles(missing));
    }

    let popular = load_popular(&paths.popular)?;
    tracing::info!(rows = popular.len(), "loaded popular books");

    let entries = load_catalog(&paths.catalog)?;
    let catalog = CatalogIndex::build(&entries);
    tracing::info!(rows = entries.len(), titles = catalog.len(), "loaded catalog");

    let titles = load_ranked_titles(&paths.ratings)?;
    tracing::info!(titles = titles.len(), "loaded ratings table index");

    let matrix = load_similarity(&paths.similarity)?;
    tracing::info!(dim = matrix.dim(), "loaded similarity matrix");

    let engine = SimilarityEngine::new(titles, matrix, catalog)?;
    Ok(Library::new(engine, popular, Some(paths.root.clone())))
}

pub fn load_popular(path: &Path) -> Result<Vec<PopularBook>, LoadError> {
    let file = open(path)?;
    popular_from_reader(file).map_err(|e| LoadError::Parse(path.to_path_buf(), e))
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>, LoadError> {
    let file = open(path)?;
    catalog_from_reader(file).map_err(|e| LoadError::Parse(path.to_path_buf(), e))
}

pub fn load_ranked_titles(path: &Path) -> Result<Vec<String>, LoadError> {
    let file = open(path)?;
    ranked_titles_from_reader(file).map_err(|e| LoadError::Parse(path.to_path_buf(), e))
}

pub fn load_similarity(path: &Path) -> Result<SimilarityMatrix, LoadError> {
    let file = open(path)?;
    similarity_from_reader(file).map_err(|e| LoadError::Parse(path.to_path_buf(), e))
}

pub fn popular_from_reader<R: io::Read>(reader: R) -> Result<Vec<PopularBook>, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let books = rdr.deserialize().collect::<Result<Vec<PopularBook>, _>>()?;
    Ok(books)
}

pub fn catalog_from_reader<R: io::Read>(reader: R) -> Result<Vec<CatalogEntry>, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let entries = rdr.deserialize().collect::<Result<Vec<CatalogEntry>, _>>()?;
    Ok(entries)
}

/// Row labels of the ratings table: the first column of every record after the header.
/// Every record is kept so that row `i` stays aligned with row `i` of the matrix.
pub fn ranked_titles_from_reader<R: io::Read>(reader: R) -> Result<Vec<String>, ParseError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut titles = Vec::new();
    for record in rdr.records() {
        let record = record?;
        titles.push(record.get(0).unwrap_or("").trim().to_lowercase());
    }
    Ok(titles)
}

/// Headerless CSV of N rows with N scores each.
pub fn similarity_from_reader<R: io::Read>(reader: R) -> Result<SimilarityMatrix, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let mut scores = Vec::with_capacity(record.len());
        for (col, field) in record.iter().enumerate() {
            let score = field.trim().parse::<f64>().map_err(|_| ParseError::BadScore {
                row,
                col,
                value: field.to_string(),
            })?;
            scores.push(score);
        }
        rows.push(scores);
    }
    Ok(SimilarityMatrix::from_rows(rows)?)
}

/// Names of the regular files directly inside `root`, sorted. Empty if unreadable.
pub fn list_data_files(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|e| LoadError::Read(path.to_path_buf(), e))
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}, column {col}: {value:?} is not a number")]
    BadScore {
        row: usize,
        col: usize,
        value: String,
    },
    #[error("{0}")]
    Matrix(#[from] MatrixError),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("required data files not found: {}", display_paths(.0))]
    MissingFiles(Vec<PathBuf>),
    #[error("read error for {0}: {1}")]
    Read(PathBuf, io::Error),
    #[error("invalid data in {0}: {1}")]
    Parse(PathBuf, ParseError),
    #[error("inconsistent data: {0}")]
    Engine(#[from] EngineError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
