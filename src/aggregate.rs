//! # Grouping of transitions into spectral entries
//!
//! Transition tables list one fragment per row, with all rows of a compound
//! adjacent to each other. This module folds that flat sequence into one
//! [`SpectralEntry`] per transition group in a single forward pass. It relies
//! on adjacency only; rows are never sorted or hashed by group id.
//!
//! The fold state is an explicit [`Accumulator`] together with the group id of
//! the previous row. Each row is classified as a [`RowKind`] and fed to
//! [`Accumulator::step`], which returns the next state and at most one
//! finished entry.
//!
//! ## Grouping modes
//!
//! [`GroupingMode::Adjacent`] reproduces the behavior of the established
//! assay-library converters, including two quirks:
//!
//! - the last row of the table always lands in the entry in progress, even
//!   when it starts a new transition group;
//! - an entry opened at a group boundary only receives its name, precursor and
//!   retention time from a following, non-final row of the same group.
//!
//! [`GroupingMode::Strict`] starts a new entry for every group and fills the
//! precursor fields from every row.

use log::{debug, warn};
use serde::Deserialize;

use crate::entry::SpectralEntry;
use crate::normalize::NormalizedRecord;

/// How group boundaries near the end of the table are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    /// Adjacency rules of the established converters
    #[default]
    Adjacent,
    /// One entry per contiguous group run
    Strict,
}

/// Position of a row relative to the previous row's group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// No previous row
    First,
    /// Same group id as the previous row
    SameGroup,
    /// Group id differs from the previous row
    NewGroup,
}

impl RowKind {
    /// Classify `current` against the previous row's group id
    pub fn classify(previous: Option<&str>, current: &str) -> Self {
        match previous {
            None => RowKind::First,
            Some(id) if id == current => RowKind::SameGroup,
            Some(_) => RowKind::NewGroup,
        }
    }
}

/// In-progress entry of the grouping fold
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Accumulator {
    /// Nothing accumulated
    #[default]
    Empty,
    /// An entry is being built
    Accumulating(SpectralEntry),
}

impl Accumulator {
    fn into_entry(self) -> SpectralEntry {
        match self {
            Accumulator::Empty => SpectralEntry::new(),
            Accumulator::Accumulating(entry) => entry,
        }
    }

    /// Apply one row
    pub fn step(
        self,
        record: &NormalizedRecord,
        kind: RowKind,
        is_last: bool,
        mode: GroupingMode,
    ) -> (Accumulator, Option<SpectralEntry>) {
        match mode {
            GroupingMode::Adjacent => self.step_adjacent(record, kind, is_last),
            GroupingMode::Strict => self.step_strict(record, kind),
        }
    }

    fn step_adjacent(
        self,
        record: &NormalizedRecord,
        kind: RowKind,
        is_last: bool,
    ) -> (Accumulator, Option<SpectralEntry>) {
        let continues = kind == RowKind::First || (kind == RowKind::SameGroup && !is_last);

        if continues {
            let mut entry = self.into_entry();
            entry.set_precursor(record);
            entry.push_fragment(record);
            // A lone row is both the first and the last one.
            if is_last {
                return (Accumulator::Empty, emit(entry));
            }
            return (Accumulator::Accumulating(entry), None);
        }

        if is_last {
            let mut entry = self.into_entry();
            entry.push_fragment(record);
            return (Accumulator::Empty, emit(entry));
        }

        let finished = self.into_entry();
        let mut next = SpectralEntry::new();
        next.push_fragment(record);
        (Accumulator::Accumulating(next), emit(finished))
    }

    fn step_strict(
        self,
        record: &NormalizedRecord,
        kind: RowKind,
    ) -> (Accumulator, Option<SpectralEntry>) {
        match (self, kind) {
            (Accumulator::Accumulating(mut entry), RowKind::SameGroup) => {
                entry.set_precursor(record);
                entry.push_fragment(record);
                (Accumulator::Accumulating(entry), None)
            }
            (previous, _) => {
                let mut next = SpectralEntry::new();
                next.set_precursor(record);
                next.push_fragment(record);
                (Accumulator::Accumulating(next), emit(previous.into_entry()))
            }
        }
    }

    /// Flush the entry in progress once the input is exhausted
    pub fn finish(self) -> Option<SpectralEntry> {
        emit(self.into_entry())
    }
}

fn emit(entry: SpectralEntry) -> Option<SpectralEntry> {
    if entry.fragments.is_empty() {
        return None;
    }
    let entry = entry.finalize();
    if entry.name.is_empty() {
        warn!(
            "Emitting spectral entry without compound name ({} peaks)",
            entry.num_peaks
        );
    } else {
        debug!("Emitting {} ({} peaks)", entry.name, entry.num_peaks);
    }
    Some(entry)
}

/// Fold normalized records, contiguous by transition group, into spectral
/// entries in first-encounter order
pub fn aggregate(records: &[NormalizedRecord], mode: GroupingMode) -> Vec<SpectralEntry> {
    let last = records.len().saturating_sub(1);

    let (accumulator, mut entries, _) = records.iter().enumerate().fold(
        (Accumulator::Empty, Vec::<SpectralEntry>::new(), None::<&str>),
        |(accumulator, mut entries, previous), (i, record)| {
            let kind = RowKind::classify(previous, &record.transition_group_id);
            let (next, emitted) = accumulator.step(record, kind, i == last, mode);
            entries.extend(emitted);
            (next, entries, Some(record.transition_group_id.as_str()))
        },
    );
    entries.extend(accumulator.finish());
    entries
}
