//! Matrix Market coordinate reader for STARSolo count matrices.
//!
//! STARSolo writes `%%MatrixMarket matrix coordinate integer general` files laid out
//! feature-major (rows are genes, columns are barcodes) with 1-based indices.
//! `real` (whole values only) and `pattern` fields are read as counts, and `symmetric`
//! matrices are expanded to both triangles. `array` layouts and the `skew-symmetric` and
//! `hermitian` symmetries are rejected.

use crate::core::error::{Result, SoloError};
use crate::core::io::open_text_reader;
use crate::core::sparse::SparseOps;
use log::debug;
use nalgebra_sparse::CsrMatrix;
use std::io::BufRead;
use std::path::Path;

const BANNER: &str = "%%MatrixMarket";

/// Value field declared in the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtxField {
    Integer,
    /// Accepted as long as every value is a non-negative whole number.
    Real,
    /// Coordinates only; every entry counts as 1.
    Pattern,
}

/// Symmetry declared in the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtxSymmetry {
    General,
    /// Only one triangle is stored; off-diagonal entries are mirrored.
    Symmetric,
}

/// Dimensions declared on the size line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MtxShape {
    pub nrows: usize,
    pub ncols: usize,
    pub nnz: usize,
}

/// Read a (possibly gzipped) coordinate matrix into CSR, keeping the on-disk orientation.
pub fn read_mtx<P: AsRef<Path>>(path: P) -> Result<CsrMatrix<u32>> {
    let path = path.as_ref();
    let reader = open_text_reader(path)?;
    let matrix = parse_mtx(reader).map_err(|err| annotate(err, path))?;
    debug!(
        "Loaded {:?}: {}×{} with {} non-zeros",
        path,
        matrix.nrows(),
        matrix.ncols(),
        matrix.nnz()
    );
    Ok(matrix)
}

fn annotate(err: SoloError, path: &Path) -> SoloError {
    match err {
        SoloError::Parse(msg) => SoloError::Parse(format!("{}: {}", path.display(), msg)),
        SoloError::InvalidInput(msg) => {
            SoloError::InvalidInput(format!("{}: {}", path.display(), msg))
        }
        other => other,
    }
}

/// Parse a coordinate matrix from any buffered reader.
pub fn parse_mtx<R: BufRead>(reader: R) -> Result<CsrMatrix<u32>> {
    let mut lines = reader.lines().enumerate();

    let (field, symmetry) = match lines.next() {
        Some((_, line)) => parse_banner(&line?)?,
        None => return Err(SoloError::Parse("empty matrix file".to_string())),
    };

    let mut shape: Option<MtxShape> = None;
    let mut triplets: Vec<(usize, usize, u32)> = Vec::new();
    let mut stored = 0usize;

    for (idx, line) in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let line_no = idx + 1;

        match shape {
            None => {
                let parsed = parse_shape(trimmed, line_no)?;
                if symmetry == MtxSymmetry::Symmetric && parsed.nrows != parsed.ncols {
                    return Err(SoloError::InvalidInput(format!(
                        "line {}: symmetric matrix must be square, found {}×{}",
                        line_no, parsed.nrows, parsed.ncols
                    )));
                }
                triplets.reserve(parsed.nnz);
                shape = Some(parsed);
            }
            Some(dims) => {
                let (row, col, value) = parse_entry(trimmed, line_no, &dims, field)?;
                triplets.push((row, col, value));
                if symmetry == MtxSymmetry::Symmetric && row != col {
                    triplets.push((col, row, value));
                }
                stored += 1;
            }
        }
    }

    let shape = shape.ok_or_else(|| SoloError::Parse("missing size line".to_string()))?;
    if stored != shape.nnz {
        return Err(SoloError::InvalidInput(format!(
            "size line declares {} entries but {} were read",
            shape.nnz, stored
        )));
    }

    SparseOps::from_triplets_u32(shape.nrows, shape.ncols, triplets)
}

fn parse_banner(line: &str) -> Result<(MtxField, MtxSymmetry)> {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();

    if tokens.len() != 5 || !tokens[0].eq_ignore_ascii_case(BANNER) {
        return Err(SoloError::Parse(format!(
            "expected a {} banner, found {:?}",
            BANNER, line
        )));
    }

    if tokens[1] != "matrix" || tokens[2] != "coordinate" {
        return Err(SoloError::Parse(format!(
            "only 'matrix coordinate' files are supported, found '{} {}'",
            tokens[1], tokens[2]
        )));
    }

    let field = match tokens[3].as_str() {
        "integer" => MtxField::Integer,
        "real" => MtxField::Real,
        "pattern" => MtxField::Pattern,
        other => {
            return Err(SoloError::Parse(format!(
                "unsupported value field '{}'",
                other
            )))
        }
    };

    let symmetry = match tokens[4].as_str() {
        "general" => MtxSymmetry::General,
        "symmetric" => MtxSymmetry::Symmetric,
        other => {
            return Err(SoloError::Parse(format!(
                "unsupported symmetry '{}'",
                other
            )))
        }
    };

    Ok((field, symmetry))
}

fn parse_shape(line: &str, line_no: usize) -> Result<MtxShape> {
    let values: Vec<usize> = line
        .split_whitespace()
        .map(|t| t.parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| SoloError::Parse(format!("line {}: invalid size line: {}", line_no, e)))?;

    match values.as_slice() {
        &[nrows, ncols, nnz] => Ok(MtxShape { nrows, ncols, nnz }),
        _ => Err(SoloError::Parse(format!(
            "line {}: size line needs 3 values, found {}",
            line_no,
            values.len()
        ))),
    }
}

fn parse_entry(
    line: &str,
    line_no: usize,
    shape: &MtxShape,
    field: MtxField,
) -> Result<(usize, usize, u32)> {
    let mut columns = line.split_whitespace();
    let (row, col, value) = match (columns.next(), columns.next(), columns.next(), field) {
        (Some(row), Some(col), _, MtxField::Pattern) => (row, col, None),
        (Some(row), Some(col), Some(value), _) => (row, col, Some(value)),
        _ => {
            return Err(SoloError::Parse(format!(
                "line {}: expected 'row col value'",
                line_no
            )))
        }
    };

    let row = parse_index(row, line_no, shape.nrows, "row")?;
    let col = parse_index(col, line_no, shape.ncols, "column")?;
    let value = match value {
        Some(token) => parse_value(token, line_no, field)?,
        None => 1,
    };
    Ok((row, col, value))
}

fn parse_index(token: &str, line_no: usize, bound: usize, axis: &str) -> Result<usize> {
    let one_based = token
        .parse::<usize>()
        .map_err(|e| SoloError::Parse(format!("line {}: invalid {} index: {}", line_no, axis, e)))?;
    if one_based == 0 || one_based > bound {
        return Err(SoloError::InvalidInput(format!(
            "line {}: {} index {} outside 1..={}",
            line_no, axis, one_based, bound
        )));
    }
    Ok(one_based - 1)
}

fn parse_value(token: &str, line_no: usize, field: MtxField) -> Result<u32> {
    let value = match field {
        MtxField::Integer | MtxField::Pattern => token.parse::<i64>().map_err(|e| {
            SoloError::Parse(format!("line {}: invalid count '{}': {}", line_no, token, e))
        })?,
        MtxField::Real => {
            let real = token.parse::<f64>().map_err(|e| {
                SoloError::Parse(format!("line {}: invalid count '{}': {}", line_no, token, e))
            })?;
            if !real.is_finite() || real.fract() != 0.0 {
                return Err(SoloError::InvalidInput(format!(
                    "line {}: count '{}' is not a whole number",
                    line_no, token
                )));
            }
            real as i64
        }
    };

    u32::try_from(value).map_err(|_| {
        SoloError::InvalidInput(format!(
            "line {}: count {} outside 0..={}",
            line_no,
            value,
            u32::MAX
        ))
    })
}
