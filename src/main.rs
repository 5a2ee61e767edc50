use std::fs::{self, File};
use std::io::{self, stdout, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, span, Level};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

use guidetree::aligner::GlobalAligner;
use guidetree::guide_tree::GuideTreeBuilder;
use guidetree::io::output::{write_merge_events, write_merge_json, write_similarity_table};
use guidetree::io::{load_scoring_matrix, load_sequences, SequenceRecords};
use guidetree::scoring::{ScoringMatrix, SubstitutionModel, UniformCosts};
use guidetree::similarity::SimilarityMatrix;

mod cli;

use cli::{AlignArgs, CliArgs, CliSubcommand, OutputType, ScoringArgs, SimilarityArgs, TreeArgs};

/// The substitution model selected on the command line
enum CostModel {
    Matrix(ScoringMatrix),
    Uniform(UniformCosts),
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(filter_layer);

    Registry::default().with(stderr_log).init();

    Ok(())
}

fn load_cost_model(args: &ScoringArgs) -> Result<CostModel> {
    if !args.gap_symbol.is_ascii() {
        bail!("Gap symbol '{}' is not an ASCII character.", args.gap_symbol);
    }
    let gap_symbol = args.gap_symbol as u8;

    let model = if let Some(path) = &args.scoring_matrix {
        let matrix = load_scoring_matrix(path, gap_symbol)
            .with_context(|| format!("Could not load scoring matrix {}", path.display()))?;

        if args.print_scoring_matrix {
            eprint!("{matrix}");
        }

        CostModel::Matrix(matrix)
    } else {
        CostModel::Uniform(
            UniformCosts::new(args.match_score, args.mismatch, args.gap)
                .with_gap_symbol(gap_symbol)
        )
    };

    Ok(model)
}

fn load_records(path: &Path) -> Result<SequenceRecords> {
    load_sequences(path)
        .with_context(|| format!("Could not read sequences from {}", path.display()))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if let Some(path) = path {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?
        }

        let file = File::create(path)
            .with_context(|| format!("Could not create output file {}", path.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(stdout())
    };

    Ok(writer)
}

fn compute_similarity<M>(model: &M, records: &SequenceRecords) -> Result<SimilarityMatrix>
where
    M: SubstitutionModel,
{
    let aligner = GlobalAligner::new(model);
    let (similarity, _) = SimilarityMatrix::compute(&aligner, records.sequences())?;

    Ok(similarity)
}

fn build_tree<M>(model: &M, records: &SequenceRecords, tree_args: &TreeArgs) -> Result<()>
where
    M: SubstitutionModel,
{
    let aligner = GlobalAligner::new(model);
    let (similarity, queue) = SimilarityMatrix::compute(&aligner, records.sequences())?;

    if tree_args.print_similarity {
        write_similarity_table(io::stderr(), &similarity, records.names())?;
    }

    let tree = GuideTreeBuilder::new(&similarity, queue).build()?;

    let mut writer = open_output(tree_args.output.as_deref())?;
    match tree_args.output_type {
        OutputType::Newick => writeln!(writer, "{}", tree.to_newick(records.names()))?,
        OutputType::Json => write_merge_json(&mut writer, tree.events(), records.names())?,
        OutputType::Merges => write_merge_events(&mut writer, tree.events(), records.names())?,
    }
    writer.flush()?;

    Ok(())
}

fn tree_subcommand(tree_args: &TreeArgs) -> Result<()> {
    let span = span!(Level::INFO, "tree_subcommand");
    let _enter = span.enter();

    let records = load_records(&tree_args.sequences)?;

    match load_cost_model(&tree_args.scoring)? {
        CostModel::Matrix(ref m) => build_tree(m, &records, tree_args)?,
        CostModel::Uniform(ref m) => build_tree(m, &records, tree_args)?,
    }

    Ok(())
}

fn similarity_subcommand(sim_args: &SimilarityArgs) -> Result<()> {
    let records = load_records(&sim_args.sequences)?;

    let similarity = match load_cost_model(&sim_args.scoring)? {
        CostModel::Matrix(ref m) => compute_similarity(m, &records)?,
        CostModel::Uniform(ref m) => compute_similarity(m, &records)?,
    };

    let mut writer = open_output(sim_args.output.as_deref())?;
    write_similarity_table(&mut writer, &similarity, records.names())?;
    writer.flush()?;

    Ok(())
}

fn align_pair<M>(model: &M, seq1: &[u8], seq2: &[u8], print_matrix: bool) -> Result<()>
where
    M: SubstitutionModel,
{
    let aligner = GlobalAligner::new(model);
    let mut out = stdout().lock();

    if print_matrix {
        let matrix = aligner.alignment_matrix(seq1, seq2)?;
        writeln!(out, "{}", matrix)?;
        writeln!(out, "{}", matrix.score())?;
    } else {
        writeln!(out, "{}", aligner.score(seq1, seq2)?)?;
    }

    Ok(())
}

fn align_subcommand(align_args: &AlignArgs) -> Result<()> {
    let records = load_records(&align_args.sequences)?;
    let [seq1, seq2, ..] = records.sequences() else {
        bail!("Need at least two sequences to align, found {}.", records.len());
    };

    info!("Aligning {} against {}", records.names()[0], records.names()[1]);
    match load_cost_model(&align_args.scoring)? {
        CostModel::Matrix(ref m) => align_pair(m, seq1, seq2, align_args.print_matrix)?,
        CostModel::Uniform(ref m) => align_pair(m, seq1, seq2, align_args.print_matrix)?,
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose)?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Could not initialize thread pool")?;
    }

    match &args.command {
        Some(CliSubcommand::Tree(v)) => tree_subcommand(v)?,
        Some(CliSubcommand::Similarity(v)) => similarity_subcommand(v)?,
        Some(CliSubcommand::Align(v)) => align_subcommand(v)?,
        None => bail!("No subcommand given."),
    };

    Ok(())
}
