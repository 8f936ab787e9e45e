//! Compound-level spectral library entries.

use crate::normalize::{IonMode, NormalizedRecord};

/// A single fragment peak of a spectral entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentPeak {
    /// Fragment m/z
    pub mz: f64,
    /// Library intensity
    pub intensity: f64,
}

impl FragmentPeak {
    /// Create a new peak
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// Optional MSP metadata that transition tables never provide.
///
/// Kept so that richer sources can fill them without changing the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMetadata {
    /// `INSTRUMENTTYPE`
    pub instrument_type: String,
    /// `INSTRUMENT`
    pub instrument: String,
    /// `Authors`
    pub authors: String,
    /// `License`
    pub license: String,
    /// `SMILES`
    pub smiles: String,
    /// `INCHI`
    pub inchi: String,
    /// `INCHIKEY`
    pub inchikey: String,
    /// `COLLISIONENERGY`
    pub collision_energy: String,
    /// `MASSBANKACCESSION`
    pub massbank_accession: String,
    /// `Links`
    pub links: String,
}

impl EntryMetadata {
    /// All fields empty
    pub const EMPTY: EntryMetadata = EntryMetadata {
        instrument_type: String::new(),
        instrument: String::new(),
        authors: String::new(),
        license: String::new(),
        smiles: String::new(),
        inchi: String::new(),
        inchikey: String::new(),
        collision_energy: String::new(),
        massbank_accession: String::new(),
        links: String::new(),
    };
}

impl Default for EntryMetadata {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One compound-level record of an MSP library
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralEntry {
    /// Compound name
    pub name: String,
    /// Precursor m/z
    pub precursor_mz: f64,
    /// Bracketed adduct, e.g. `[M+H]+`
    pub precursor_type: String,
    /// Polarity, unset until a row has provided the precursor fields
    pub ion_mode: Option<IonMode>,
    /// Sum formula
    pub formula: String,
    /// Retention time in minutes
    pub retention_time: f64,
    /// Metadata fields not populated from transition tables
    pub metadata: EntryMetadata,
    /// Annotations of all fragments, each followed by a space
    pub comment: String,
    /// Peak count recorded at finalization
    pub num_peaks: usize,
    /// Fragments in input order
    pub fragments: Vec<FragmentPeak>,
}

impl Default for SpectralEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            precursor_mz: 0.0,
            precursor_type: String::new(),
            ion_mode: None,
            formula: String::new(),
            retention_time: 0.0,
            metadata: EntryMetadata::EMPTY,
            comment: String::new(),
            num_peaks: 0,
            fragments: Vec::new(),
        }
    }
}

impl SpectralEntry {
    /// Create an empty entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the precursor-level fields from a record
    pub fn set_precursor(&mut self, record: &NormalizedRecord) {
        self.name.clone_from(&record.compound_name);
        self.precursor_mz = record.precursor_mz;
        self.precursor_type.clone_from(&record.precursor_type);
        self.formula.clone_from(&record.sum_formula);
        self.retention_time = record.retention_time;
        self.ion_mode = Some(record.ion_mode);
    }

    /// Append the record's fragment and annotation
    pub fn push_fragment(&mut self, record: &NormalizedRecord) {
        self.fragments
            .push(FragmentPeak::new(record.product_mz, record.library_intensity));
        self.comment.push_str(&record.annotation);
        self.comment.push(' ');
    }

    /// Record the final peak count
    pub fn finalize(mut self) -> Self {
        self.num_peaks = self.fragments.len();
        self
    }

    /// Number of fragments accumulated so far
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NormalizedRecord {
        NormalizedRecord {
            row: 0,
            transition_group_id: "1".to_string(),
            compound_name: "Glycine".to_string(),
            precursor_mz: 76.04,
            precursor_type: "[M+H]+".to_string(),
            ion_mode: IonMode::Positive,
            sum_formula: "C2H5NO2".to_string(),
            retention_time: 1.25,
            product_mz: 30.03,
            product_charge: 1,
            library_intensity: 100.0,
            annotation: "CH4N+".to_string(),
        }
    }

    #[test]
    fn test_default_entry_is_empty() {
        let entry = SpectralEntry::new();
        assert_eq!(entry.metadata, EntryMetadata::EMPTY);
        assert!(entry.ion_mode.is_none());
        assert_eq!(entry.fragment_count(), 0);
    }

    #[test]
    fn test_push_and_finalize() {
        let mut entry = SpectralEntry::new();
        let rec = record();
        entry.set_precursor(&rec);
        entry.push_fragment(&rec);
        entry.push_fragment(&rec);
        let entry = entry.finalize();

        assert_eq!(entry.name, "Glycine");
        assert_eq!(entry.ion_mode, Some(IonMode::Positive));
        assert_eq!(entry.num_peaks, 2);
        assert_eq!(entry.comment, "CH4N+ CH4N+ ");
    }
}
