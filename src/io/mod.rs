pub mod fasta;
pub mod scoring;
pub mod output;

pub use fasta::{load_sequences, read_sequences, SequenceRecords};
pub use scoring::{load_scoring_matrix, read_scoring_matrix};
