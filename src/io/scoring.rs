//! Loading substitution matrices from text tables.
//!
//! The format is the one used by the NCBI BLOSUM/PAM files: lines starting with `#` are
//! comments, the first remaining line lists the column symbols, and every following line holds
//! a row symbol followed by one integer per column.
//!
//! ```text
//! # toy matrix
//!    A  T  *
//! A  1 -1 -2
//! T -1  1 -2
//! * -2 -2  1
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashSet;
use tracing::info;

use crate::errors::GuideTreeError;
use crate::scoring::ScoringMatrix;

pub fn load_scoring_matrix(path: &Path, gap_symbol: u8) -> Result<ScoringMatrix, GuideTreeError> {
    let file = File::open(path)
        .map_err(|source| GuideTreeError::FileReadError { path: path.to_owned(), source })?;

    let matrix = read_scoring_matrix(BufReader::new(file), gap_symbol)?;
    info!("Loaded {}x{} scoring matrix from {}", matrix.alphabet().len(), matrix.alphabet().len(), path.display());

    Ok(matrix)
}

pub fn read_scoring_matrix<R>(reader: R, gap_symbol: u8) -> Result<ScoringMatrix, GuideTreeError>
where
    R: BufRead,
{
    let mut header: Option<Vec<u8>> = None;
    let mut rows: Vec<(u8, Vec<i32>)> = Vec::new();
    let mut seen_rows = FxHashSet::default();

    for (line_ix, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_ix + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();

        let Some(columns) = &header else {
            header = Some(parse_header(tokens, line_no)?);
            continue;
        };

        // Never empty, the line was not blank
        let row_symbol = parse_symbol(tokens.next().unwrap_or_default(), line_no)?;
        if !seen_rows.insert(row_symbol) {
            return Err(GuideTreeError::ScoringMatrixFormat {
                line: line_no,
                reason: format!("duplicate row for symbol '{}'", char::from(row_symbol)),
            });
        }

        let costs = tokens
            .map(|t| t.parse::<i32>().map_err(|_| GuideTreeError::ScoringMatrixFormat {
                line: line_no,
                reason: format!("'{t}' is not an integer"),
            }))
            .collect::<Result<Vec<_>, _>>()?;

        if costs.len() > columns.len() {
            return Err(GuideTreeError::ScoringMatrixFormat {
                line: line_no,
                reason: format!("{} values for {} columns", costs.len(), columns.len()),
            });
        }

        rows.push((row_symbol, costs));
    }

    let Some(columns) = header else {
        return Err(GuideTreeError::ScoringMatrixFormat {
            line: 0,
            reason: "no header line with column symbols".to_string(),
        });
    };

    let alphabet: Vec<u8> = columns.iter()
        .copied()
        .chain(rows.iter().map(|(symbol, _)| *symbol))
        .collect();

    let mut matrix = ScoringMatrix::new(&alphabet, gap_symbol)?;
    for (row_symbol, costs) in rows {
        for (&col_symbol, cost) in columns.iter().zip(costs) {
            matrix.set(row_symbol, col_symbol, cost);
        }
    }

    Ok(matrix)
}

fn parse_header<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec<u8>, GuideTreeError> {
    let mut seen = FxHashSet::default();
    let mut columns = Vec::new();

    for token in tokens {
        let symbol = parse_symbol(token, line)?;
        if !seen.insert(symbol) {
            return Err(GuideTreeError::ScoringMatrixFormat {
                line,
                reason: format!("duplicate column for symbol '{token}'"),
            });
        }

        columns.push(symbol);
    }

    Ok(columns)
}

/// Symbols are single bytes, anything longer would silently alias another symbol.
fn parse_symbol(token: &str, line: usize) -> Result<u8, GuideTreeError> {
    match token.as_bytes() {
        &[symbol] => Ok(symbol),
        _ => Err(GuideTreeError::ScoringMatrixFormat {
            line,
            reason: format!("'{token}' is not a single byte symbol"),
        }),
    }
}
