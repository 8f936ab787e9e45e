//! MSP spectral library writer.
//!
//! Each [`SpectralEntry`] becomes one block of `KEY: value` lines followed by
//! its peak list and a blank separator line:
//!
//! ```text
//! NAME: Glucose
//! PRECURSORMZ: 181.0707
//! PRECURSORTYPE: [M+H]+
//! ...
//! Comment: C6H11O5+ C6H9O4+
//! Num Peaks: 2
//! 163.06 100
//! 145.05 50.5
//!
//! ```
//!
//! Libraries are only ever appended to. Existing content is neither
//! overwritten nor checked for duplicate compounds.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::entry::SpectralEntry;
use crate::error::ConvertError;

/// Streaming MSP writer over any [`Write`] sink
pub struct MspWriter<W: Write> {
    handle: BufWriter<W>,
    entries_written: usize,
    peaks_written: usize,
}

impl<W: Write> MspWriter<W> {
    /// Wrap a sink in a buffered MSP writer
    pub fn new(inner: W) -> Self {
        Self {
            handle: BufWriter::new(inner),
            entries_written: 0,
            peaks_written: 0,
        }
    }

    /// Write a `KEY: value` line
    pub fn write_kv(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.handle.write_all(key.as_bytes())?;
        self.handle.write_all(b": ")?;
        self.handle.write_all(value.as_bytes())?;
        self.handle.write_all(b"\n")?;
        Ok(())
    }

    fn write_header(&mut self, entry: &SpectralEntry) -> io::Result<()> {
        let meta = &entry.metadata;
        let ion_mode = entry.ion_mode.map(|m| m.as_str()).unwrap_or("");

        self.write_kv("NAME", &entry.name)?;
        self.write_kv("PRECURSORMZ", &entry.precursor_mz.to_string())?;
        self.write_kv("PRECURSORTYPE", &entry.precursor_type)?;
        self.write_kv("INSTRUMENTTYPE", &meta.instrument_type)?;
        self.write_kv("INSTRUMENT", &meta.instrument)?;
        self.write_kv("Authors", &meta.authors)?;
        self.write_kv("License", &meta.license)?;
        self.write_kv("SMILES", &meta.smiles)?;
        self.write_kv("INCHI", &meta.inchi)?;
        self.write_kv("INCHIKEY", &meta.inchikey)?;
        self.write_kv("COLLISIONENERGY", &meta.collision_energy)?;
        self.write_kv("FORMULA", &entry.formula)?;
        self.write_kv("RETENTIONTIME", &entry.retention_time.to_string())?;
        self.write_kv("IONMODE", ion_mode)?;
        self.write_kv("MASSBANKACCESSION", &meta.massbank_accession)?;
        self.write_kv("Links", &meta.links)?;
        self.write_kv("Comment", &entry.comment)?;
        self.write_kv("Num Peaks", &entry.num_peaks.to_string())?;
        Ok(())
    }

    fn write_peaks(&mut self, entry: &SpectralEntry) -> io::Result<()> {
        for peak in &entry.fragments {
            self.handle.write_all(peak.mz.to_string().as_bytes())?;
            self.handle.write_all(b" ")?;
            self.handle.write_all(peak.intensity.to_string().as_bytes())?;
            self.handle.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Write one entry after checking its peak bookkeeping
    pub fn write_entry(&mut self, entry: &SpectralEntry) -> Result<(), ConvertError> {
        validate_entry(entry)?;
        self.write_header(entry)?;
        self.write_peaks(entry)?;
        self.handle.write_all(b"\n")?;
        self.entries_written += 1;
        self.peaks_written += entry.num_peaks;
        Ok(())
    }

    /// Write all entries in order
    pub fn write_entries(&mut self, entries: &[SpectralEntry]) -> Result<(), ConvertError> {
        for entry in entries {
            self.write_entry(entry)?;
        }
        Ok(())
    }

    /// Number of entries written so far
    pub fn entries_written(&self) -> usize {
        self.entries_written
    }

    /// Number of peaks written so far
    pub fn peaks_written(&self) -> usize {
        self.peaks_written
    }

    /// Flush and return the underlying sink
    pub fn finish(self) -> io::Result<W> {
        self.handle.into_inner().map_err(|e| e.into_error())
    }
}

/// Check that `num_peaks` matches the peak list and is non-zero
pub fn validate_entry(entry: &SpectralEntry) -> Result<(), ConvertError> {
    if entry.num_peaks != entry.fragments.len() {
        return Err(ConvertError::InvalidEntry(format!(
            "{:?} declares {} peaks but has {}",
            entry.name,
            entry.num_peaks,
            entry.fragments.len()
        )));
    }
    if entry.num_peaks == 0 {
        return Err(ConvertError::InvalidEntry(format!(
            "{:?} has no peaks",
            entry.name
        )));
    }
    Ok(())
}

/// Result of appending entries to a library file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// The library existed before this run
    pub appended_to_existing: bool,
    /// Entries written
    pub entries_written: usize,
    /// Peaks written
    pub peaks_written: usize,
}

/// User-facing notice describing what happened to `path` after a successful append
pub fn destination_notice(path: &Path, appended_to_existing: bool) -> String {
    if appended_to_existing {
        format!(
            "File {} already existed, new spectral library entries were added to the end",
            path.display()
        )
    } else {
        format!("New file created: {}", path.display())
    }
}

/// Append entries to the MSP library at `path`, creating it if missing.
///
/// Every entry is validated before the destination is opened, so an invalid
/// entry leaves an existing library untouched and does not create a new one.
/// An empty slice still creates the file and is not an error.
pub fn append_entries<P: AsRef<Path>>(
    path: P,
    entries: &[SpectralEntry],
) -> Result<AppendOutcome, ConvertError> {
    let path = path.as_ref();
    entries.iter().try_for_each(validate_entry)?;

    let exists = path.exists();
    debug!(
        "Appending {} entries to {} (existing: {})",
        entries.len(),
        path.display(),
        exists
    );

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ConvertError::destination(path, e))?;

    let mut writer = MspWriter::new(file);
    match writer.write_entries(entries) {
        Err(ConvertError::IoError(e)) => return Err(ConvertError::destination(path, e)),
        other => other?,
    }
    let outcome = AppendOutcome {
        appended_to_existing: exists,
        entries_written: writer.entries_written(),
        peaks_written: writer.peaks_written(),
    };
    writer
        .finish()
        .map_err(|e| ConvertError::destination(path, e))?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FragmentPeak;
    use crate::normalize::IonMode;

    fn entry() -> SpectralEntry {
        SpectralEntry {
            name: "Glucose".to_string(),
            precursor_mz: 181.0707,
            precursor_type: "[M+H]+".to_string(),
            ion_mode: Some(IonMode::Positive),
            formula: "C6H12O6".to_string(),
            retention_time: 2.5,
            comment: "C6H11O5+ C6H9O4+ ".to_string(),
            num_peaks: 2,
            fragments: vec![FragmentPeak::new(163.06, 100.0), FragmentPeak::new(145.05, 50.5)],
            ..Default::default()
        }
    }

    fn render(entries: &[SpectralEntry]) -> String {
        let mut writer = MspWriter::new(Vec::new());
        writer.write_entries(entries).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_entry_layout() {
        let text = render(&[entry()]);
        let expected = "NAME: Glucose\n\
                        PRECURSORMZ: 181.0707\n\
                        PRECURSORTYPE: [M+H]+\n\
                        INSTRUMENTTYPE: \n\
                        INSTRUMENT: \n\
                        Authors: \n\
                        License: \n\
                        SMILES: \n\
                        INCHI: \n\
                        INCHIKEY: \n\
                        COLLISIONENERGY: \n\
                        FORMULA: C6H12O6\n\
                        RETENTIONTIME: 2.5\n\
                        IONMODE: Positive\n\
                        MASSBANKACCESSION: \n\
                        Links: \n\
                        Comment: C6H11O5+ C6H9O4+ \n\
                        Num Peaks: 2\n\
                        163.06 100\n\
                        145.05 50.5\n\
                        \n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_unset_ion_mode_is_blank() {
        let mut e = entry();
        e.ion_mode = None;
        let text = render(&[e]);
        assert!(text.contains("\nIONMODE: \n"));
    }

    #[test]
    fn test_peak_count_mismatch_is_rejected() {
        let mut e = entry();
        e.num_peaks = 3;
        let mut writer = MspWriter::new(Vec::new());
        let err = writer.write_entry(&e).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidEntry(_)));
        assert_eq!(writer.entries_written(), 0);
    }

    #[test]
    fn test_empty_entry_is_rejected() {
        let e = SpectralEntry::new();
        assert!(matches!(validate_entry(&e), Err(ConvertError::InvalidEntry(_))));
    }

    #[test]
    fn test_counters() {
        let mut writer = MspWriter::new(Vec::new());
        writer.write_entries(&[entry(), entry()]).unwrap();
        assert_eq!(writer.entries_written(), 2);
        assert_eq!(writer.peaks_written(), 4);
    }

    #[test]
    fn test_destination_notice() {
        let path = Path::new("lib.msp");
        assert!(destination_notice(path, true).contains("were added to the end"));
        assert_eq!(destination_notice(path, false), "New file created: lib.msp");
    }

    #[test]
    fn test_invalid_entry_leaves_library_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.msp");
        append_entries(&path, &[entry()]).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = append_entries(&path, &[entry(), SpectralEntry::new()]).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidEntry(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_invalid_entry_does_not_create_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.msp");

        let err = append_entries(&path, &[SpectralEntry::new()]).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidEntry(_)));
        assert!(!path.exists());
    }
}
