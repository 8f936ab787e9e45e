//! Per-record field normalization.
//!
//! The assay generator writes adducts as `M+H+`, while MSP consumers expect
//! the bracketed `[M+H]+` form. Retention times arrive in seconds and are
//! stored in minutes. All functions here are pure and look at one record at a
//! time.

use std::fmt;

use crate::error::ConvertError;
use crate::record::TransitionRecord;

/// Charge assigned to every product ion. Only singly-charged fragments are
/// modeled.
pub const PRODUCT_CHARGE: i16 = 1;

/// Ion polarity of a spectral entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IonMode {
    /// Positive ion mode
    Positive,
    /// Negative ion mode
    Negative,
}

impl IonMode {
    /// Infer the polarity from a normalized precursor type. A trailing `+` is
    /// positive; any other terminator, including malformed input, is negative.
    pub fn from_precursor_type(precursor_type: &str) -> Self {
        if precursor_type.ends_with('+') {
            IonMode::Positive
        } else {
            IonMode::Negative
        }
    }

    /// Label written to the `IONMODE` field
    pub fn as_str(&self) -> &'static str {
        match self {
            IonMode::Positive => "Positive",
            IonMode::Negative => "Negative",
        }
    }
}

impl fmt::Display for IonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite `<body><sign>` as `[<body>]<sign>`.
///
/// Returns `None` when the adduct is shorter than two characters or does not
/// end in `+` or `-`.
pub fn reformat_adduct(adduct: &str) -> Option<String> {
    let sign = adduct.chars().last()?;
    if sign != '+' && sign != '-' {
        return None;
    }
    let body = &adduct[..adduct.len() - sign.len_utf8()];
    if body.is_empty() {
        return None;
    }
    Some(format!("[{body}]{sign}"))
}

/// Convert a retention time in seconds to minutes
pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / 60.0
}

/// A transition with its fields converted to MSP conventions
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// 0-based data row index in the input table
    pub row: usize,
    /// Identifier of the owning transition group
    pub transition_group_id: String,
    /// Compound name
    pub compound_name: String,
    /// Precursor m/z
    pub precursor_mz: f64,
    /// Bracketed adduct, shared by precursor and product ions
    pub precursor_type: String,
    /// Polarity derived from `precursor_type`
    pub ion_mode: IonMode,
    /// Sum formula
    pub sum_formula: String,
    /// Retention time in minutes
    pub retention_time: f64,
    /// Fragment m/z
    pub product_mz: f64,
    /// Product ion charge, always [`PRODUCT_CHARGE`]
    pub product_charge: i16,
    /// Fragment intensity
    pub library_intensity: f64,
    /// Fragment annotation
    pub annotation: String,
}

/// Normalize a single transition
pub fn normalize_record(record: &TransitionRecord) -> Result<NormalizedRecord, ConvertError> {
    let precursor_type =
        reformat_adduct(&record.adduct).ok_or_else(|| ConvertError::MalformedAdduct {
            row: record.row,
            group_id: record.transition_group_id.clone(),
            adduct: record.adduct.clone(),
        })?;
    let ion_mode = IonMode::from_precursor_type(&precursor_type);

    Ok(NormalizedRecord {
        row: record.row,
        transition_group_id: record.transition_group_id.clone(),
        compound_name: record.compound_name.clone(),
        precursor_mz: record.precursor_mz,
        precursor_type,
        ion_mode,
        sum_formula: record.sum_formula.clone(),
        retention_time: seconds_to_minutes(record.normalized_retention_time),
        product_mz: record.product_mz,
        product_charge: PRODUCT_CHARGE,
        library_intensity: record.library_intensity,
        annotation: record.annotation.clone(),
    })
}

/// Normalize every transition, aborting on the first malformed record
pub fn normalize_records(records: &[TransitionRecord]) -> Result<Vec<NormalizedRecord>, ConvertError> {
    records.iter().map(normalize_record).collect()
}
