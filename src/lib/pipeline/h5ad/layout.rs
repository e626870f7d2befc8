use crate::core::error::Result;
use crate::core::fs::resolve_input;
use std::path::{Path, PathBuf};

const GENE_DIR: &str = "Gene/filtered";
const VELOCYTO_DIR: &str = "Velocyto/filtered";

/// Locations of the STARSolo outputs consumed by `make-h5ad`, relative to a `Solo.out` directory.
#[derive(Debug, Clone)]
pub struct SoloLayout {
    root: PathBuf,
}

impl SoloLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn gene_matrix(&self) -> PathBuf {
        self.root.join(GENE_DIR).join("matrix.mtx")
    }

    pub fn spliced_matrix(&self) -> PathBuf {
        self.root.join(VELOCYTO_DIR).join("spliced.mtx")
    }

    pub fn unspliced_matrix(&self) -> PathBuf {
        self.root.join(VELOCYTO_DIR).join("unspliced.mtx")
    }

    pub fn features(&self) -> PathBuf {
        self.root.join(VELOCYTO_DIR).join("features.tsv")
    }

    pub fn barcodes(&self) -> PathBuf {
        self.root.join(VELOCYTO_DIR).join("barcodes.tsv")
    }

    /// Resolve every input up front so a missing file fails before any parsing starts.
    pub fn resolve(&self) -> Result<ResolvedLayout> {
        Ok(ResolvedLayout {
            gene_matrix: resolve_input(self.gene_matrix())?,
            spliced_matrix: resolve_input(self.spliced_matrix())?,
            unspliced_matrix: resolve_input(self.unspliced_matrix())?,
            features: resolve_input(self.features())?,
            barcodes: resolve_input(self.barcodes())?,
        })
    }
}

/// Concrete input paths after `.gz` fallback.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    pub gene_matrix: PathBuf,
    pub spliced_matrix: PathBuf,
    pub unspliced_matrix: PathBuf,
    pub features: PathBuf,
    pub barcodes: PathBuf,
}
