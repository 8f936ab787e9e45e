//! Transition table to MSP conversion pipeline
//!
//! Wires the stages together: read table → drop decoys → normalize fields →
//! group into entries → append to the library.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, GroupingMode};
use crate::entry::SpectralEntry;
use crate::error::ConvertError;
use crate::filter::filter_decoys;
use crate::msp::append_entries;
use crate::normalize::normalize_records;
use crate::record::{TransitionRecord, TransitionTableReader};

/// Configuration for the conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Drop decoy transitions before grouping
    pub remove_decoys: bool,
    /// Group boundary handling
    pub grouping: GroupingMode,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            remove_decoys: true,
            grouping: GroupingMode::Adjacent,
        }
    }
}

/// Statistics from a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Transitions read from the input table
    pub rows_read: usize,
    /// Decoy transitions dropped
    pub decoys_removed: usize,
    /// Spectral entries appended
    pub entries_written: usize,
    /// Fragment peaks appended
    pub peaks_written: usize,
    /// The output library already existed
    pub appended_to_existing: bool,
}

/// Converter from transition tables to MSP libraries
#[derive(Debug, Clone, Default)]
pub struct LibraryConverter {
    config: ConverterConfig,
}

impl LibraryConverter {
    /// Create a new converter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new converter with custom configuration
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Enable or disable decoy removal
    pub fn with_remove_decoys(mut self, remove_decoys: bool) -> Self {
        self.config.remove_decoys = remove_decoys;
        self
    }

    /// Set the grouping mode
    pub fn with_grouping(mut self, grouping: GroupingMode) -> Self {
        self.config.grouping = grouping;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Run filter, normalization and grouping over in-memory records
    pub fn convert_records(
        &self,
        records: Vec<TransitionRecord>,
    ) -> Result<Vec<SpectralEntry>, ConvertError> {
        self.convert_with_stats(records).map(|(entries, _)| entries)
    }

    fn convert_with_stats(
        &self,
        records: Vec<TransitionRecord>,
    ) -> Result<(Vec<SpectralEntry>, ConversionStats), ConvertError> {
        let rows_read = records.len();
        let filtered = filter_decoys(records, self.config.remove_decoys);
        let normalized = normalize_records(&filtered.records)?;
        let entries = aggregate(&normalized, self.config.grouping);
        info!(
            "Grouped {} transitions into {} spectral entries",
            normalized.len(),
            entries.len()
        );

        let stats = ConversionStats {
            rows_read,
            decoys_removed: filtered.decoys_removed,
            ..Default::default()
        };
        Ok((entries, stats))
    }

    /// Convert a transition table file and append the result to an MSP library
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ConversionStats, ConvertError> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!("Converting {} to {}", input_path.display(), output_path.display());

        let records = TransitionTableReader::for_path(input_path).read_path(input_path)?;
        let (entries, mut stats) = self.convert_with_stats(records)?;

        let outcome = append_entries(output_path, &entries)?;
        stats.entries_written = outcome.entries_written;
        stats.peaks_written = outcome.peaks_written;
        stats.appended_to_existing = outcome.appended_to_existing;

        info!(
            "Wrote {} entries ({} peaks) to {}",
            stats.entries_written,
            stats.peaks_written,
            output_path.display()
        );
        Ok(stats)
    }
}
