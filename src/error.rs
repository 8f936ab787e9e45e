//! Error types for transition table conversion.

use std::path::PathBuf;

/// Errors that can occur while converting a transition table to MSP
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// I/O error reading the input table
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A canonical column is absent from the input table
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A numeric or boolean cell could not be parsed
    #[error("Invalid value {value:?} in column {column} (row {row})")]
    InvalidValue {
        /// 0-based data row index
        row: usize,
        /// Column header
        column: &'static str,
        /// Raw cell content
        value: String,
    },

    /// A data row has fewer cells than the header
    #[error("Row {row} has {found} cells but the header has {expected} (missing {column})")]
    TruncatedRow {
        /// 0-based data row index
        row: usize,
        /// First header column without a cell
        column: String,
        /// Cells in the row
        found: usize,
        /// Columns in the header
        expected: usize,
    },

    /// The adduct does not end in a charge sign or is too short to split
    #[error("Malformed adduct {adduct:?} in transition group {group_id} (row {row})")]
    MalformedAdduct {
        /// 0-based data row index
        row: usize,
        /// Owning transition group
        group_id: String,
        /// Adduct as found in the input
        adduct: String,
    },

    /// The output library cannot be opened or written
    #[error("Cannot write to {}: {source}", .path.display())]
    DestinationWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A spectral entry violates the serialization invariants
    #[error("Invalid spectral entry: {0}")]
    InvalidEntry(String),
}

impl ConvertError {
    pub(crate) fn destination(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DestinationWrite {
            path: path.into(),
            source,
        }
    }
}
