use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// The various guide tree output formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputType {
    /// Newick tree with sequence names as leaf labels
    Newick,

    /// Merge events as a JSON array
    Json,

    /// One tab separated line per merge event
    Merges,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Set verbosity level. Use multiple times to increase the verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads used for pairwise alignments. Defaults to all available cores.
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub command: Option<CliSubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliSubcommand {
    /// Build a guide tree from all-pairs global alignment scores
    Tree(TreeArgs),

    /// Print the all-pairs similarity matrix
    Similarity(SimilarityArgs),

    /// Globally align the first two sequences and print the score
    Align(AlignArgs),
}

#[derive(Args, Debug)]
pub struct ScoringArgs {
    /// Substitution matrix file (e.g., BLOSUM62 including a gap column). If not given, uses
    /// uniform match/mismatch/gap costs.
    #[arg(short = 's', long)]
    #[clap(help_heading = "Scoring")]
    pub scoring_matrix: Option<PathBuf>,

    /// Score for matching symbols when no substitution matrix is given
    #[arg(long = "match", default_value = "1", allow_negative_numbers = true)]
    #[clap(help_heading = "Scoring")]
    pub match_score: i32,

    /// Score for mismatching symbols when no substitution matrix is given
    #[arg(long, default_value = "-1", allow_negative_numbers = true)]
    #[clap(help_heading = "Scoring")]
    pub mismatch: i32,

    /// Score for aligning a symbol against a gap when no substitution matrix is given
    #[arg(long, default_value = "-2", allow_negative_numbers = true)]
    #[clap(help_heading = "Scoring")]
    pub gap: i32,

    /// Symbol representing a gap in the substitution matrix
    #[arg(long, default_value = "*")]
    #[clap(help_heading = "Scoring")]
    pub gap_symbol: char,

    /// Print the loaded substitution matrix to stderr
    #[arg(long, requires = "scoring_matrix")]
    #[clap(help_heading = "Scoring")]
    pub print_scoring_matrix: bool,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Sequences in FASTA format, optionally gzipped.
    #[clap(help_heading = "Inputs")]
    pub sequences: PathBuf,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Output filename. If not given, defaults to stdout
    #[arg(short, long)]
    #[clap(help_heading = "Outputs")]
    pub output: Option<PathBuf>,

    /// Output file type.
    #[arg(value_enum, short = 'O', long, default_value = "newick")]
    #[clap(help_heading = "Outputs")]
    pub output_type: OutputType,

    /// Also print the similarity matrix to stderr
    #[arg(long)]
    #[clap(help_heading = "Outputs")]
    pub print_similarity: bool,
}

#[derive(Args, Debug)]
pub struct SimilarityArgs {
    /// Sequences in FASTA format, optionally gzipped.
    #[clap(help_heading = "Inputs")]
    pub sequences: PathBuf,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Output filename. If not given, defaults to stdout
    #[arg(short, long)]
    #[clap(help_heading = "Outputs")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// FASTA file; the first two records are aligned.
    #[clap(help_heading = "Inputs")]
    pub sequences: PathBuf,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Print the full dynamic programming table
    #[arg(long)]
    #[clap(help_heading = "Outputs")]
    pub print_matrix: bool,
}
