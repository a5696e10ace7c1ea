//! Precomputed "popular books" listing shown on the landing page. Unrelated to similarity.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularBook {
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author", default)]
    pub author: String,
    #[serde(rename = "Year-Of-Publication", default)]
    pub year: String,
    #[serde(rename = "Image-URL-M", default)]
    pub image: String,
    pub num_ratings: u64,
    pub avg_rating: f64,
}

impl PopularBook {
    /// Average rating rounded to two decimals, for display.
    pub fn rounded_rating(&self) -> f64 {
        (self.avg_rating * 100.0).round() / 100.0
    }
}
