use crate::core::error::{Result, SoloError};
use crate::core::io::get_reader;
use std::path::Path;

/// Gene annotations from STARSolo `features.tsv`, in column order of the count matrices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureTable {
    /// Stable gene identifiers (first column), written as the `ensemble_id` var column.
    pub gene_ids: Vec<String>,
    /// Display names (second column), used as var names.
    pub gene_names: Vec<String>,
}

impl FeatureTable {
    /// Read a headerless `id<TAB>name<TAB>category` table.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = get_reader(path, b'\t', false)?;
        let mut table = FeatureTable::default();

        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(id), Some(name)) => {
                    table.gene_ids.push(id.to_string());
                    table.gene_names.push(name.to_string());
                }
                _ => {
                    return Err(SoloError::Parse(format!(
                        "{}: record {} has {} column(s), expected id and name",
                        path.display(),
                        idx + 1,
                        record.len()
                    )))
                }
            }
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.gene_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gene_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn splits_ids_and_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("features.tsv");
        fs::write(
            &path,
            "ENSG01\tTP53\tGene Expression\nENSG02\tMYC\tGene Expression\n",
        )
        .unwrap();

        let table = FeatureTable::from_tsv(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.gene_ids, vec!["ENSG01", "ENSG02"]);
        assert_eq!(table.gene_names, vec!["TP53", "MYC"]);
    }

    #[test]
    fn single_column_rows_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("features.tsv");
        fs::write(&path, "ENSG01\tTP53\tGene Expression\nENSG02\n").unwrap();
        assert!(matches!(
            FeatureTable::from_tsv(&path),
            Err(SoloError::Parse(_))
        ));
    }
}
