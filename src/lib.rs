//! # mspconvert - Assay Libraries to MSP Spectral Libraries
//!
//! `mspconvert` turns targeted metabolomics assay libraries, exported as one
//! transition (precursor/fragment pair) per row, into the text-based MSP
//! spectral library format understood by spectral matching tools.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mspconvert::aggregate::GroupingMode;
//! use mspconvert::converter::LibraryConverter;
//!
//! let stats = LibraryConverter::new()
//!     .with_remove_decoys(true)
//!     .with_grouping(GroupingMode::Adjacent)
//!     .convert("assay_library.tsv", "library.msp")?;
//!
//! println!("Wrote {} entries", stats.entries_written);
//! # Ok::<(), mspconvert::error::ConvertError>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. [`record`]: read the canonical transition table, keeping only the
//!    columns the conversion needs
//! 2. [`filter`]: drop decoy transitions
//! 3. [`normalize`]: bracket adducts (`M+H+` → `[M+H]+`), infer ion mode,
//!    convert retention times to minutes
//! 4. [`aggregate`]: fold adjacent transitions of a group into one
//!    [`entry::SpectralEntry`]
//! 5. [`msp`]: append entries to the library file
//!
//! The whole table is held in memory; processing is single-threaded and
//! either completes or fails without writing partial entries for bad input.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod aggregate;
pub mod converter;
pub mod entry;
pub mod error;
pub mod filter;
pub mod msp;
pub mod normalize;
pub mod record;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::aggregate::{aggregate, Accumulator, GroupingMode, RowKind};
    pub use crate::converter::{ConversionStats, ConverterConfig, LibraryConverter};
    pub use crate::entry::{EntryMetadata, FragmentPeak, SpectralEntry};
    pub use crate::error::ConvertError;
    pub use crate::filter::{filter_decoys, FilterOutcome};
    pub use crate::msp::{append_entries, AppendOutcome, MspWriter};
    pub use crate::normalize::{
        normalize_record, normalize_records, reformat_adduct, seconds_to_minutes, IonMode,
        NormalizedRecord, PRODUCT_CHARGE,
    };
    pub use crate::record::{columns, TransitionRecord, TransitionTableReader};
}
