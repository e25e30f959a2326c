//! Text summaries printed with --stats: per-profile segment size
//! distributions, chromosome composition, and called RAT sizes.

use crate::genome::{tile_range, Annotation};
use crate::timing::TIMING_LABELS;
use rustc_hash::FxHashMap;

/// Tukey's five number summary (min, 1st-Q, median, 3rd-Q, max).
/// Percentiles use linear interpolation between order statistics.
pub fn fivenum(values: &[f64]) -> Option<(f64, f64, f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    Some((
        sorted[0],
        percentile(&sorted, 25.0),
        percentile(&sorted, 50.0),
        percentile(&sorted, 75.0),
        sorted[sorted.len() - 1],
    ))
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

fn print_fivenum_table<'a>(rows: impl Iterator<Item = (&'a str, &'a [f64])>) {
    println!(
        "{:<6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "", "min", "1st-Q", "median", "3rd-Q", "max", "count"
    );
    for (name, values) in rows {
        let Some((min, q1, median, q3, max)) = fivenum(values) else {
            continue;
        };
        println!(
            "{:<6} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10}",
            name,
            min,
            q1,
            median,
            q3,
            max,
            values.len()
        );
    }
}

/// Per-label distribution of segment sizes (bp, tile-quantized) for
/// one profile.
pub fn print_size_distribution(title: &str, annotations: &[Annotation], tile_size: u64) {
    let mut sizes: FxHashMap<&str, Vec<f64>> = FxHashMap::default();
    for ann in annotations {
        let (start_tile, end_tile) = tile_range(ann.start, ann.end, tile_size);
        sizes
            .entry(ann.label.as_str())
            .or_default()
            .push(((end_tile - start_tile) * tile_size) as f64);
    }
    println!("{} Size Distribution", title);
    print_fivenum_table(
        TIMING_LABELS
            .iter()
            .filter_map(|&label| sizes.get(label).map(|values| (label, values.as_slice()))),
    );
}

/// Fraction of each chromosome covered by each timing label
/// (tile-quantized, so fractions need not sum to 1).
pub fn print_composition(
    title: &str,
    annotations: &[Annotation],
    tile_size: u64,
    chrom_lengths: &FxHashMap<String, u64>,
) {
    let mut covered: FxHashMap<&str, [u64; TIMING_LABELS.len()]> = FxHashMap::default();
    for ann in annotations {
        let Some(label_idx) = TIMING_LABELS.iter().position(|&l| l == ann.label) else {
            continue;
        };
        let (start_tile, end_tile) = tile_range(ann.start, ann.end, tile_size);
        covered.entry(ann.chrom.as_str()).or_default()[label_idx] +=
            (end_tile - start_tile) * tile_size;
    }

    let mut chroms: Vec<&String> = chrom_lengths.keys().collect();
    chroms.sort_by(|a, b| natord::compare(a, b));

    println!("{} Chromosome Composition", title);
    print!("{:<12}", "chrom");
    for label in TIMING_LABELS {
        print!(" {:>8}", label);
    }
    println!();
    for chrom in chroms {
        let bp = covered.get(chrom.as_str()).copied().unwrap_or_default();
        let chrom_len = chrom_lengths[chrom] as f64;
        print!("{:<12}", chrom);
        for label_bp in bp {
            print!(" {:>8.3}", label_bp as f64 / chrom_len);
        }
        println!();
    }
}

/// Per-chromosome distribution of called RAT sizes (bp).
pub fn print_rat_sizes(sizes: &FxHashMap<String, Vec<f64>>) {
    let mut chroms: Vec<&String> = sizes.keys().collect();
    chroms.sort_by(|a, b| natord::compare(a, b));
    println!("RAT Size Distribution");
    print_fivenum_table(
        chroms
            .into_iter()
            .map(|chrom| (chrom.as_str(), sizes[chrom].as_slice())),
    );
}
