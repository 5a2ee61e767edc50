use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

use crate::guide_tree::ClusterId;

#[derive(Debug)]
pub enum GuideTreeError {
    /// The scoring model has no cost for the given (row, column) symbol pair
    MissingScoreEntry { row: u8, col: u8 },

    /// The merge queue ran out of valid candidates before a single root cluster was formed
    QueueExhaustion {
        active: usize,
        merges: usize,
        last_merge: Option<(ClusterId, ClusterId)>,
    },

    /// Tree construction was cancelled between two merge steps
    Cancelled { merges: usize },

    /// A scoring matrix can hold at most `max` distinct symbols
    AlphabetTooLarge { max: usize },

    /// The scoring table could not be parsed
    ScoringMatrixFormat { line: usize, reason: String },

    /// Error variant when we couldn't read from a file
    FileReadError { path: PathBuf, source: io::Error },

    /// Other IO errors
    IOError(io::Error),
}

impl Error for GuideTreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Self::FileReadError { ref source, .. } => Some(source),
            Self::IOError(ref source) => Some(source),
            _ => None
        }
    }
}

impl From<io::Error> for GuideTreeError {
    fn from(value: io::Error) -> Self {
        Self::IOError(value)
    }
}

impl Display for GuideTreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::MissingScoreEntry { row, col } =>
                write!(f, "The scoring model has no entry for symbol pair ('{}', '{}')!",
                       char::from(row).escape_default(), char::from(col).escape_default()),
            Self::QueueExhaustion { active, merges, last_merge: Some((a, b)) } =>
                write!(f, "Merge queue exhausted with {active} active clusters left after {merges} merges (last merge: {a} + {b})!"),
            Self::QueueExhaustion { active, merges, last_merge: None } =>
                write!(f, "Merge queue exhausted with {active} active clusters left after {merges} merges!"),
            Self::Cancelled { merges } =>
                write!(f, "Guide tree construction cancelled after {merges} merges."),
            Self::AlphabetTooLarge { max } =>
                write!(f, "Scoring matrix alphabet too large, at most {max} symbols are supported!"),
            Self::ScoringMatrixFormat { line, ref reason } =>
                write!(f, "Invalid scoring matrix (line {line}): {reason}"),
            Self::FileReadError { ref path, source: _ } =>
                write!(f, "Could not read from file {}!", path.display()),
            Self::IOError(ref err) =>
                err.fmt(f),
        }
    }
}
