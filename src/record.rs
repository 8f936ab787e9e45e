//! Canonical transition table schema and reader.
//!
//! The upstream assay generator exports one row per transition. Only the
//! columns listed in [`columns::REQUIRED`] are read; everything else in the
//! table (peptide and protein metadata, transition role flags, product charge)
//! is ignored, so its absence is never an error.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};

use crate::error::ConvertError;

/// Canonical column names of the transition table
pub mod columns {
    /// Identifier of the owning compound/adduct group
    pub const TRANSITION_GROUP_ID: &str = "TransitionGroupId";
    /// Compound name
    pub const COMPOUND_NAME: &str = "CompoundName";
    /// Precursor m/z
    pub const PRECURSOR_MZ: &str = "PrecursorMz";
    /// Adduct in source notation, e.g. `M+H+`
    pub const ADDUCTS: &str = "Adducts";
    /// Sum formula
    pub const SUM_FORMULA: &str = "SumFormula";
    /// Retention time in seconds
    pub const NORMALIZED_RETENTION_TIME: &str = "NormalizedRetentionTime";
    /// Fragment m/z
    pub const PRODUCT_MZ: &str = "ProductMz";
    /// Fragment intensity
    pub const LIBRARY_INTENSITY: &str = "LibraryIntensity";
    /// Fragment annotation
    pub const ANNOTATION: &str = "Annotation";
    /// Decoy flag (0/1)
    pub const DECOY: &str = "Decoy";

    /// All columns the converter needs, in table order of the assay generator
    pub const REQUIRED: [&str; 10] = [
        TRANSITION_GROUP_ID,
        COMPOUND_NAME,
        PRECURSOR_MZ,
        ADDUCTS,
        SUM_FORMULA,
        NORMALIZED_RETENTION_TIME,
        PRODUCT_MZ,
        LIBRARY_INTENSITY,
        ANNOTATION,
        DECOY,
    ];
}

/// One row of the canonical transition table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionRecord {
    /// 0-based data row index in the input table
    pub row: usize,
    /// Identifier of the owning transition group
    pub transition_group_id: String,
    /// Compound name
    pub compound_name: String,
    /// Precursor m/z
    pub precursor_mz: f64,
    /// Adduct in source notation (`M+H+`)
    pub adduct: String,
    /// Sum formula
    pub sum_formula: String,
    /// Retention time in seconds
    pub normalized_retention_time: f64,
    /// Fragment m/z
    pub product_mz: f64,
    /// Fragment intensity
    pub library_intensity: f64,
    /// Fragment annotation
    pub annotation: String,
    /// Whether the transition is a decoy
    pub decoy: bool,
}

/// Column positions of the canonical fields within one input header
#[derive(Debug, Clone)]
struct ColumnIndex {
    transition_group_id: usize,
    compound_name: usize,
    precursor_mz: usize,
    adducts: usize,
    sum_formula: usize,
    normalized_retention_time: usize,
    product_mz: usize,
    library_intensity: usize,
    annotation: usize,
    decoy: usize,
    headers: Vec<String>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, ConvertError> {
        let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ConvertError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            transition_group_id: find(columns::TRANSITION_GROUP_ID)?,
            compound_name: find(columns::COMPOUND_NAME)?,
            precursor_mz: find(columns::PRECURSOR_MZ)?,
            adducts: find(columns::ADDUCTS)?,
            sum_formula: find(columns::SUM_FORMULA)?,
            normalized_retention_time: find(columns::NORMALIZED_RETENTION_TIME)?,
            product_mz: find(columns::PRODUCT_MZ)?,
            library_intensity: find(columns::LIBRARY_INTENSITY)?,
            annotation: find(columns::ANNOTATION)?,
            decoy: find(columns::DECOY)?,
            headers,
        })
    }

    /// Rows must be at least as wide as the header
    fn check_width(&self, record: &csv::StringRecord, row: usize) -> Result<(), ConvertError> {
        let found = record.len();
        if found < self.headers.len() {
            return Err(ConvertError::TruncatedRow {
                row,
                column: self.headers[found].clone(),
                found,
                expected: self.headers.len(),
            });
        }
        Ok(())
    }

    fn parse(&self, record: &csv::StringRecord, row: usize) -> Result<TransitionRecord, ConvertError> {
        self.check_width(record, row)?;
        let cell = |i: usize| record[i].trim();

        Ok(TransitionRecord {
            row,
            transition_group_id: cell(self.transition_group_id).to_string(),
            compound_name: cell(self.compound_name).to_string(),
            precursor_mz: parse_cell(cell(self.precursor_mz), row, columns::PRECURSOR_MZ)?,
            adduct: cell(self.adducts).to_string(),
            sum_formula: cell(self.sum_formula).to_string(),
            normalized_retention_time: parse_cell(
                cell(self.normalized_retention_time),
                row,
                columns::NORMALIZED_RETENTION_TIME,
            )?,
            product_mz: parse_cell(cell(self.product_mz), row, columns::PRODUCT_MZ)?,
            library_intensity: parse_cell(
                cell(self.library_intensity),
                row,
                columns::LIBRARY_INTENSITY,
            )?,
            annotation: cell(self.annotation).to_string(),
            decoy: parse_decoy(cell(self.decoy), row)?,
        })
    }
}

fn parse_cell<T: FromStr>(value: &str, row: usize, column: &'static str) -> Result<T, ConvertError> {
    value.parse().map_err(|_| ConvertError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    })
}

fn parse_decoy(value: &str, row: usize) -> Result<bool, ConvertError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(ConvertError::InvalidValue {
            row,
            column: columns::DECOY,
            value: value.to_string(),
        }),
    }
}

/// Reader for canonical transition tables
#[derive(Debug, Clone, Copy)]
pub struct TransitionTableReader {
    delimiter: u8,
}

impl Default for TransitionTableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionTableReader {
    /// Reader for tab-separated tables
    pub fn new() -> Self {
        Self { delimiter: b'\t' }
    }

    /// Pick the delimiter from the file extension: `.csv` is comma-separated,
    /// everything else is treated as TSV
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        let is_csv = path
            .as_ref()
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            Self::new().with_delimiter(b',')
        } else {
            Self::new()
        }
    }

    /// Override the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read every transition from a table file
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<TransitionRecord>, ConvertError> {
        let path = path.as_ref();
        info!("Reading transition table {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read every transition from a reader, projecting onto the canonical schema
    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<TransitionRecord>, ConvertError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let index = ColumnIndex::from_headers(csv_reader.headers()?)?;

        let mut records = Vec::new();
        for (row, result) in csv_reader.records().enumerate() {
            records.push(index.parse(&result?, row)?);
        }

        debug!("Read {} transitions", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "PrecursorMz\tProductMz\tLibraryIntensity\tNormalizedRetentionTime\tPeptideSequence\tTransitionGroupId\tCompoundName\tSumFormula\tAdducts\tAnnotation\tDecoy\tProductCharge";

    #[test]
    fn test_read_projects_canonical_columns() {
        let table = format!(
            "{HEADER}\n\
             181.07\t163.06\t100\t120\t\t1\tGlucose\tC6H12O6\tM+H+\tC6H11O5+\t0\t1\n\
             181.07\t145.05\t50.5\t120\t\t1\tGlucose\tC6H12O6\tM+H+\tC6H9O4+\t1\t1\n"
        );

        let records = TransitionTableReader::new().read(table.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row, 0);
        assert_eq!(records[0].transition_group_id, "1");
        assert_eq!(records[0].compound_name, "Glucose");
        assert_eq!(records[0].adduct, "M+H+");
        assert_eq!(records[0].precursor_mz, 181.07);
        assert_eq!(records[1].library_intensity, 50.5);
        assert!(!records[0].decoy);
        assert!(records[1].decoy);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = "TransitionGroupId\tCompoundName\n1\tGlucose\n";
        let err = TransitionTableReader::new().read(table.as_bytes()).unwrap_err();
        match err {
            ConvertError::MissingColumn(name) => assert_eq!(name, columns::PRECURSOR_MZ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_number_reports_row() {
        let table = format!("{HEADER}\n181.07\tabc\t100\t120\t\t1\tGlucose\tC6H12O6\tM+H+\tx\t0\t1\n");
        let err = TransitionTableReader::new().read(table.as_bytes()).unwrap_err();
        match err {
            ConvertError::InvalidValue { row, column, value } => {
                assert_eq!(row, 0);
                assert_eq!(column, columns::PRODUCT_MZ);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_is_rejected() {
        let table = "TransitionGroupId\tCompoundName\tPrecursorMz\tAdducts\tSumFormula\tNormalizedRetentionTime\tProductMz\tLibraryIntensity\tAnnotation\tDecoy\n\
                     1\tX\t100\tM+H+\tC\t60\t50\t1\n";
        let err = TransitionTableReader::new().read(table.as_bytes()).unwrap_err();
        match err {
            ConvertError::TruncatedRow { row, column, found, expected } => {
                assert_eq!(row, 0);
                assert_eq!(column, columns::ANNOTATION);
                assert_eq!(found, 8);
                assert_eq!(expected, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_missing_ignored_column_is_rejected() {
        let table = format!("{HEADER}\n181.07\t163.06\t100\t120\t\t1\tGlucose\tC6H12O6\tM+H+\tx\t1\n");
        let err = TransitionTableReader::new().read(table.as_bytes()).unwrap_err();
        assert!(matches!(err, ConvertError::TruncatedRow { ref column, .. } if column == "ProductCharge"));
    }

    #[test]
    fn test_csv_delimiter_from_extension() {
        let table = "TransitionGroupId,CompoundName,PrecursorMz,Adducts,SumFormula,NormalizedRetentionTime,ProductMz,LibraryIntensity,Annotation,Decoy\n\
                     7,Alanine,90.05,M+H+,C3H7NO2,60,44.05,10,frag,false\n";
        let reader = TransitionTableReader::for_path("library.CSV");
        let records = reader.read(table.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transition_group_id, "7");
        assert!(!records[0].decoy);
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let records = TransitionTableReader::new().read(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(records.is_empty());
    }
}
