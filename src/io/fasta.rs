//! Loading sequences from (optionally gzipped) FASTA files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use tracing::info;

use crate::errors::GuideTreeError;

/// Sequences and their names, in file order. Sequence `i` is leaf `i` of the guide tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceRecords {
    names: Vec<String>,
    sequences: Vec<Vec<u8>>,
}

impl SequenceRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, sequence: impl Into<Vec<u8>>) {
        self.names.push(name.into());
        self.sequences.push(sequence.into());
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn sequences(&self) -> &[Vec<u8>] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Read all records from a FASTA file. Files ending in `.gz` are decompressed on the fly.
pub fn load_sequences(path: &Path) -> Result<SequenceRecords, GuideTreeError> {
    let is_gzipped = path.file_name()
        .map(|v| v.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false);

    let file = File::open(path)
        .map_err(|source| GuideTreeError::FileReadError { path: path.to_owned(), source })?;

    let reader: Box<dyn BufRead> = if is_gzipped {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let records = read_sequences(reader)?;
    info!("Loaded {} sequences from {}", records.len(), path.display());

    Ok(records)
}

/// Read all FASTA records from the given reader.
pub fn read_sequences<R>(reader: R) -> Result<SequenceRecords, GuideTreeError>
where
    R: BufRead,
{
    let mut reader = fasta::io::Reader::new(reader);
    let mut records = SequenceRecords::new();

    for result in reader.records() {
        let record = result?;
        let name = String::from_utf8_lossy(record.name()).into_owned();

        records.push(name, record.sequence().as_ref().to_vec());
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::read_sequences;

    #[test]
    fn test_read_multiline_records() {
        let data = b">seq1 first sequence\nACGT\nAC\n>seq2\nTTTT\n\n>seq3\nG\nGG\n\n";
        let records = read_sequences(&data[..]).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records.names(), &["seq1", "seq2", "seq3"]);
        assert_eq!(records.sequences()[0], b"ACGTAC");
        assert_eq!(records.sequences()[1], b"TTTT");
        assert_eq!(records.sequences()[2], b"GGG");
    }

    #[test]
    fn test_read_empty() {
        let records = read_sequences(&b""[..]).unwrap();
        assert!(records.is_empty());
    }
}
