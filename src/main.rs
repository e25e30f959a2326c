use clap::Parser;
use log::info;
use rayon::ThreadPoolBuilder;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;

use ratrap::compare::{compare_genomes, CallParams};
use ratrap::error::RatError;
use ratrap::faidx;
use ratrap::genome::{Annotation, TiledGenome};
use ratrap::gff;
use ratrap::stats;

/// Finds the timing differences between two replication-timing segmentation profiles.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
struct Args {
    /// First segmentation profile (GFF3, optionally BGZF-compressed)
    #[clap(short = 'a', long, value_parser)]
    profile_a: String,

    /// Second segmentation profile (GFF3, optionally BGZF-compressed)
    #[clap(short = 'b', long, value_parser)]
    profile_b: String,

    /// Reference FASTA; chromosome lengths are read from its .fai index
    #[clap(short = 'f', long, value_parser)]
    fasta: String,

    /// Tile size in bp
    #[clap(short = 'S', long, value_parser, default_value_t = 1000)]
    tile_size: u64,

    /// Minimum displacement magnitude for a region to be called a RAT
    #[clap(short = 'd', long, value_parser, default_value_t = 2)]
    min_distance: i64,

    /// Output bedgraph file (stdout if omitted)
    #[clap(short = 'o', long, value_parser)]
    output: Option<String>,

    /// Print size-distribution and composition summaries to stdout
    #[clap(long, action)]
    stats: bool,

    /// Number of threads for parallel processing.
    #[clap(short = 't', long, value_parser, default_value_t = NonZeroUsize::new(4).unwrap())]
    threads: NonZeroUsize,

    /// Verbosity level (0 = error, 1 = info, 2 = debug)
    #[clap(short, long, default_value = "0")]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    ThreadPoolBuilder::new()
        .num_threads(args.threads.into())
        .build_global()
        .unwrap();

    if args.stats && args.output.is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--stats prints tables to stdout; use --output for the bedgraph records",
        ));
    }

    let params = CallParams::new(args.tile_size, args.min_distance)?;

    let fai = faidx::fai_path(&args.fasta)?;
    let chrom_lengths = faidx::read_fai(&fai)?;
    info!("Read {} chromosome lengths from {}", chrom_lengths.len(), fai);
    info!(
        "Total sequence length: {} bp",
        chrom_lengths.values().sum::<u64>()
    );

    let (profile_a, profile_b) = rayon::join(
        || load_profile(&args.profile_a, &chrom_lengths, params.tile_size, args.threads),
        || load_profile(&args.profile_b, &chrom_lengths, params.tile_size, args.threads),
    );
    let (annotations_a, genome_a) = profile_a?;
    let (annotations_b, genome_b) = profile_b?;

    let mut writer: BufWriter<Box<dyn Write>> = BufWriter::new(match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    });

    let mut rat_sizes: FxHashMap<String, Vec<f64>> = FxHashMap::default();
    let mut num_calls = 0u64;
    for call in compare_genomes(&genome_a, &genome_b, &chrom_lengths, params) {
        if args.stats {
            rat_sizes
                .entry(call.chrom.clone())
                .or_default()
                .push((call.end - call.start) as f64);
        }
        writeln!(writer, "{}", call)?;
        num_calls += 1;
    }
    writer.flush()?;
    info!("Called {} RATs", num_calls);

    if args.stats {
        stats::print_size_distribution("Profile A", &annotations_a, params.tile_size);
        stats::print_composition("Profile A", &annotations_a, params.tile_size, &chrom_lengths);
        stats::print_size_distribution("Profile B", &annotations_b, params.tile_size);
        stats::print_composition("Profile B", &annotations_b, params.tile_size, &chrom_lengths);
        stats::print_rat_sizes(&rat_sizes);
    }

    Ok(())
}

/// Parse one profile and populate a tiled genome from it.
fn load_profile(
    path: &str,
    chrom_lengths: &FxHashMap<String, u64>,
    tile_size: u64,
    threads: NonZeroUsize,
) -> Result<(Vec<Annotation>, TiledGenome), RatError> {
    let annotations = gff::read_annotations(path, threads)?;
    info!("Parsed {} annotations from {}", annotations.len(), path);
    let mut genome = TiledGenome::build(chrom_lengths, tile_size);
    genome.populate(&annotations)?;
    Ok((annotations, genome))
}
