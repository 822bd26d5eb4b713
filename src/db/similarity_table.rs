//! Precomputed film-to-film similarity table
//!
//! The matrix is built offline and loaded once at startup. Rows and columns share a
//! single label vector; row `i` holds the scores of film `titles[i]` against every
//! column in label order. Labels may repeat, so lookups always work on positions and
//! deduplicate by label on the way out.

use crate::{
    error::{AppError, AppResult},
    models::ScoredTitle,
};
use serde::Deserialize;
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    path::Path,
};

#[derive(Debug)]
pub struct SimilarityTable {
    titles: Vec<String>,
    scores: Vec<Vec<f64>>,
    /// Title → index of the first row carrying that label
    row_index: HashMap<String, usize>,
}

/// On-disk JSON layout
#[derive(Debug, Deserialize)]
struct JsonTable {
    titles: Vec<String>,
    scores: Vec<Vec<f64>>,
}

impl SimilarityTable {
    /// Builds a table from labels and a square score matrix, validating its shape
    pub fn from_parts(titles: Vec<String>, scores: Vec<Vec<f64>>) -> AppResult<Self> {
        if titles.is_empty() {
            return Err(AppError::TableLoad("table has no titles".to_string()));
        }

        if scores.len() != titles.len() {
            return Err(AppError::TableLoad(format!(
                "expected {} rows, found {}",
                titles.len(),
                scores.len()
            )));
        }

        for (row, cells) in scores.iter().enumerate() {
            if cells.len() != titles.len() {
                return Err(AppError::TableLoad(format!(
                    "row {} ('{}') has {} cells, expected {}",
                    row,
                    titles[row],
                    cells.len(),
                    titles.len()
                )));
            }
            if let Some(col) = cells.iter().position(|score| !score.is_finite()) {
                return Err(AppError::TableLoad(format!(
                    "non-finite score at row {} column {}",
                    row, col
                )));
            }
        }

        let mut row_index = HashMap::with_capacity(titles.len());
        for (row, title) in titles.iter().enumerate() {
            row_index.entry(title.clone()).or_insert(row);
        }

        Ok(Self {
            titles,
            scores,
            row_index,
        })
    }

    /// Loads a table from disk, choosing the parser by file extension
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let table = match extension.as_deref() {
            Some("csv") => Self::load_csv(path)?,
            Some("json") => Self::load_json(path)?,
            _ => {
                return Err(AppError::TableLoad(format!(
                    "unsupported table format: {}",
                    path.display()
                )))
            }
        };

        tracing::info!(
            path = %path.display(),
            titles = table.len(),
            unique_titles = table.row_index.len(),
            "Similarity table loaded"
        );

        Ok(table)
    }

    /// Parses the `DataFrame.to_csv` layout: a corner cell plus column labels, then
    /// one record per row led by its label
    fn load_csv(path: &Path) -> AppResult<Self> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| AppError::TableLoad(format!("{}: {}", path.display(), e)))?;

        let titles: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::TableLoad(format!("invalid header: {}", e)))?
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();

        let mut row_titles = Vec::with_capacity(titles.len());
        let mut scores = Vec::with_capacity(titles.len());

        for (line, record) in reader.records().enumerate() {
            let record =
                record.map_err(|e| AppError::TableLoad(format!("record {}: {}", line + 1, e)))?;
            let mut fields = record.iter();
            let label = fields.next().unwrap_or_default().to_string();

            let cells = fields
                .map(|cell| {
                    cell.trim().parse::<f64>().map_err(|e| {
                        AppError::TableLoad(format!("row '{}': bad score '{}': {}", label, cell, e))
                    })
                })
                .collect::<AppResult<Vec<f64>>>()?;

            row_titles.push(label);
            scores.push(cells);
        }

        if row_titles != titles {
            return Err(AppError::TableLoad(
                "row labels do not match column labels".to_string(),
            ));
        }

        Self::from_parts(titles, scores)
    }

    fn load_json(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::TableLoad(format!("{}: {}", path.display(), e)))?;
        let table: JsonTable = serde_json::from_str(&contents)
            .map_err(|e| AppError::TableLoad(format!("invalid JSON table: {}", e)))?;
        Self::from_parts(table.titles, table.scores)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// All labels in row order, duplicates included
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn contains(&self, title: &str) -> bool {
        self.row_index.contains_key(title)
    }

    /// Returns the `n` most similar distinct titles to `title`, highest score first.
    ///
    /// Columns labelled with the query itself are never returned. Equal scores keep
    /// their column order from the artifact. Returns `None` if `title` has no row.
    pub fn top_n(&self, title: &str, n: usize) -> Option<Vec<ScoredTitle>> {
        let row = *self.row_index.get(title)?;
        if n == 0 {
            return Some(Vec::new());
        }

        let mut candidates: Vec<(usize, f64)> = self.scores[row]
            .iter()
            .copied()
            .enumerate()
            .filter(|(col, _)| self.titles[*col] != title)
            .collect();

        // Stable: ties stay in column order
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let mut seen = HashSet::new();
        let results = candidates
            .into_iter()
            .filter(|(col, _)| seen.insert(self.titles[*col].as_str()))
            .take(n)
            .map(|(col, score)| ScoredTitle {
                title: self.titles[col].clone(),
                score,
            })
            .collect();

        Some(results)
    }
}
