//! Barcode list loading and the barcode → cell identifier left join

use crate::core::error::{Result, SoloError};
use crate::core::io::get_reader;
use log::debug;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

const BARCODE_COLUMN: &str = "barcode";
const CELL_ID_COLUMN: &str = "cell_id";

/// Read the one-column `barcodes.tsv`, preserving file order and surrounding whitespace.
pub fn read_barcodes<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let mut reader = get_reader(path.as_ref(), b'\t', false)?;
    let mut barcodes = Vec::with_capacity(1024);
    for record in reader.records() {
        let record = record?;
        barcodes.push(record.get(0).unwrap_or("").to_string());
    }
    barcodes.shrink_to_fit();
    Ok(barcodes)
}

#[derive(Debug, Deserialize)]
struct MappingRecord {
    barcode: String,
    cell_id: Option<String>,
}

/// Mapping from raw barcodes to external cell identifiers.
///
/// A barcode may map to a null identifier when its `cell_id` cell is empty.
#[derive(Debug, Clone, Default)]
pub struct BarcodeMapping {
    cell_ids: FxHashMap<String, Option<String>>,
}

impl BarcodeMapping {
    /// Load a comma-separated mapping with at least `barcode` and `cell_id` columns.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = get_reader(path.as_ref(), b',', true)?;
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        for required in [BARCODE_COLUMN, CELL_ID_COLUMN] {
            if !headers.iter().any(|h| h == required) {
                return Err(SoloError::InvalidInput(format!(
                    "barcode mapping is missing the '{}' column (found: {})",
                    required,
                    headers.iter().collect::<Vec<_>>().join(", ")
                )));
            }
        }

        let mut cell_ids = FxHashMap::default();
        for record in reader.deserialize::<MappingRecord>() {
            let MappingRecord { barcode, cell_id } = record?;
            if cell_ids.contains_key(&barcode) {
                return Err(SoloError::InvalidInput(format!(
                    "barcode '{}' appears more than once in the mapping",
                    barcode
                )));
            }
            cell_ids.insert(barcode, cell_id);
        }

        debug!("Loaded {} barcode mappings", cell_ids.len());
        Ok(Self { cell_ids })
    }

    pub fn len(&self) -> usize {
        self.cell_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_ids.is_empty()
    }

    /// Identifier mapped to `barcode`; `None` when unmapped or mapped to an empty id.
    #[inline]
    pub fn cell_id(&self, barcode: &str) -> Option<&str> {
        self.cell_ids.get(barcode).and_then(|id| id.as_deref())
    }

    /// Left join `barcodes` onto the mapping.
    ///
    /// The result has one entry per barcode, in the same order; unmatched barcodes keep their
    /// slot as `None`.
    pub fn left_join(&self, barcodes: &[String]) -> Vec<Option<String>> {
        barcodes
            .iter()
            .map(|barcode| self.cell_id(barcode).map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn mapping(text: &str) -> Result<BarcodeMapping> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        BarcodeMapping::from_csv_reader(reader)
    }

    #[test]
    fn left_join_preserves_order_and_unmatched_rows() {
        let mapping = mapping("sample,barcode,cell_id\ns1,AAAC,cell_7\ns1,GGGT,cell_2\n").unwrap();
        let barcodes = vec![
            "GGGT".to_string(),
            "TTTT".to_string(),
            "AAAC".to_string(),
        ];

        let joined = mapping.left_join(&barcodes);
        assert_eq!(
            joined,
            vec![Some("cell_2".to_string()), None, Some("cell_7".to_string())]
        );
    }

    #[test]
    fn empty_cell_id_is_null() {
        let mapping = mapping("barcode,cell_id\nAAAC,\n").unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.cell_id("AAAC"), None);
        assert_eq!(mapping.left_join(&["AAAC".to_string()]), vec![None]);
    }

    #[test]
    fn missing_columns_are_rejected() {
        let err = mapping("barcode,cell\nAAAC,x\n").unwrap_err();
        assert!(matches!(err, SoloError::InvalidInput(msg) if msg.contains("cell_id")));
    }

    #[test]
    fn duplicate_barcodes_are_rejected() {
        let err = mapping("barcode,cell_id\nAAAC,a\nAAAC,b\n").unwrap_err();
        assert!(matches!(err, SoloError::InvalidInput(_)));
    }

    #[test]
    fn reads_barcodes_in_file_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcodes.tsv");
        fs::write(&path, "TTTG\nAAAC\nGGGT\n").unwrap();
        assert_eq!(read_barcodes(&path).unwrap(), vec!["TTTG", "AAAC", "GGGT"]);

        let padded = dir.path().join("padded.tsv");
        fs::write(&padded, "AAAC \nGGGT\n").unwrap();
        let barcodes = read_barcodes(&padded).unwrap();
        assert_eq!(barcodes, vec!["AAAC ", "GGGT"]);

        let csv_path = dir.path().join("map.csv");
        fs::write(&csv_path, "barcode,cell_id\nAAAC,c1\n").unwrap();
        let mapping = BarcodeMapping::from_csv(&csv_path).unwrap();
        assert_eq!(mapping.cell_id("AAAC"), Some("c1"));
        assert_eq!(mapping.left_join(&barcodes), vec![None, None]);
    }
}
