//! Square similarity matrix, stored row-major. Produced offline; read-only here.

/// N×N similarity scores (cosine semantics, roughly in [-1, 1]).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a matrix from rows. Fails if any row length differs from the row count.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let dim = rows.len();
        let mut scores = Vec::with_capacity(dim * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(MatrixError::NotSquare {
                    row: i,
                    expected: dim,
                    found: row.len(),
                });
            }
            scores.extend(row);
        }
        Ok(Self { dim, scores })
    }

    /// Number of rows (and columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Row `i`, or `None` if out of range.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.dim {
            return None;
        }
        Some(&self.scores[i * self.dim..(i + 1) * self.dim])
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("similarity matrix is not square: row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
}
