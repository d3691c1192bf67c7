//! Transaction data loading and the boolean transaction matrix using Polars

use std::path::Path;

use anyhow::Context;
use ndarray::Array2;
use polars::prelude::*;

use crate::mine::ItemId;

/// Boolean transaction matrix: rows are transactions, columns are items.
///
/// Column labels are resolved once at load time; an [`ItemId`] is an index
/// into the label table and is the only item representation the mining and
/// rule stages work with. The matrix is read-only after construction.
#[derive(Debug, Clone)]
pub struct TransactionMatrix {
    presence: Array2<bool>,
    labels: Vec<String>,
}

impl TransactionMatrix {
    /// Build a matrix from a presence array and column labels
    pub fn new(presence: Array2<bool>, labels: Vec<String>) -> crate::Result<Self> {
        if presence.nrows() == 0 {
            anyhow::bail!("transaction matrix must contain at least one transaction");
        }
        if presence.ncols() != labels.len() {
            anyhow::bail!(
                "column count ({}) does not match label count ({})",
                presence.ncols(),
                labels.len()
            );
        }

        Ok(Self { presence, labels })
    }

    /// Number of transactions (rows)
    pub fn n_transactions(&self) -> usize {
        self.presence.nrows()
    }

    /// Number of distinct items (columns)
    pub fn n_items(&self) -> usize {
        self.presence.ncols()
    }

    /// Human-readable label for an item
    pub fn label(&self, item: ItemId) -> &str {
        &self.labels[item as usize]
    }

    /// All column labels in canonical (column) order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Superset test: does the given transaction contain every item?
    pub fn contains_all(&self, row: usize, items: &[ItemId]) -> bool {
        items
            .iter()
            .all(|&item| self.presence[[row, item as usize]])
    }

    /// Fraction of transactions containing every item in `items`
    pub fn support(&self, items: &[ItemId]) -> f64 {
        let hits = (0..self.n_transactions())
            .filter(|&row| self.contains_all(row, items))
            .count();
        hits as f64 / self.n_transactions() as f64
    }
}

/// Load a semicolon-separated CSV of boolean item columns into a [`TransactionMatrix`]
///
/// # Arguments
/// * `file_path` - Path to the CSV file; the header row names the items
///
/// # Returns
/// * A validated `TransactionMatrix` with one row per transaction
///
/// Missing files, empty frames, and null cells are all hard errors: the
/// mining stage never sees a silently empty matrix.
pub fn load_transactions(file_path: &str) -> crate::Result<TransactionMatrix> {
    if !Path::new(file_path).exists() {
        anyhow::bail!("no data file found at '{}'", file_path);
    }

    // Load data using a Polars lazy frame for efficiency
    let df = LazyCsvReader::new(file_path)
        .with_separator(b';')
        .has_header(true)
        .finish()?
        .collect()
        .with_context(|| format!("failed to read CSV from '{}'", file_path))?;

    if df.height() == 0 || df.width() == 0 {
        anyhow::bail!("no transaction data found in '{}'", file_path);
    }

    let labels: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut presence = Array2::from_elem((df.height(), df.width()), false);

    for (col_idx, series) in df.get_columns().iter().enumerate() {
        if series.null_count() > 0 {
            anyhow::bail!(
                "column '{}' contains missing values; the input must be fully boolean",
                series.name()
            );
        }

        let flags = series
            .cast(&DataType::Boolean)
            .with_context(|| format!("column '{}' is not boolean-coercible", series.name()))?;

        for (row_idx, value) in flags.bool()?.into_iter().enumerate() {
            presence[[row_idx, col_idx]] = value.unwrap_or(false);
        }
    }

    TransactionMatrix::new(presence, labels)
}
