//! Genome comparison: per-tile displacement sequences and the run
//! merger that turns them into called RAT intervals.

use crate::error::RatError;
use crate::genome::TiledGenome;
use crate::timing::{displacement, TimingVec};
use rustc_hash::FxHashMap;
use std::fmt;

/// Tile size and magnitude threshold for a comparison run.
#[derive(Debug, Clone, Copy)]
pub struct CallParams {
    pub tile_size: u64,
    pub min_distance: f64,
}

impl CallParams {
    pub fn new(tile_size: u64, min_distance: i64) -> Result<CallParams, RatError> {
        if tile_size == 0 {
            return Err(RatError::Config("tile size must be positive".to_string()));
        }
        if min_distance < 0 {
            return Err(RatError::Config(format!(
                "minimum distance must be non-negative, got {}",
                min_distance
            )));
        }
        Ok(CallParams {
            tile_size,
            min_distance: min_distance as f64,
        })
    }
}

/// One called Region of Asynchronous Timing: a maximal run of
/// contiguous tiles with constant, threshold-exceeding displacement.
#[derive(Debug, Clone, PartialEq)]
pub struct RatCall {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub displacement: f64,
}

impl fmt::Display for RatCall {
    /// Renders the 4-field bedgraph record. Whole-valued displacements
    /// print without a decimal point; half-integers keep theirs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t", self.chrom, self.start, self.end)?;
        if self.displacement == self.displacement.trunc() {
            write!(f, "{}", self.displacement as i64)
        } else {
            write!(f, "{}", self.displacement)
        }
    }
}

/// Per-tile signed displacement between two chromosomes' tile arrays.
pub fn displacements<'a>(
    a: &'a [TimingVec],
    b: &'a [TimingVec],
) -> impl Iterator<Item = f64> + 'a {
    a.iter().zip(b).map(|(&va, &vb)| displacement(va, vb))
}

struct OpenRun {
    start_tile: u64,
    next_tile: u64,
    value: f64,
}

/// Single-pass run merger over one chromosome's displacement sequence.
///
/// Tiles below the magnitude threshold neither extend nor close a run;
/// an open run closes only when a qualifying tile breaks contiguity or
/// carries a different value (exact equality; centroid means are exact
/// in binary). The trailing open run, if any, is emitted at the end of
/// the sequence, with its end clipped to the chromosome length.
pub struct RunScanner<I> {
    chrom: String,
    disps: I,
    tile: u64,
    min_distance: f64,
    tile_size: u64,
    chrom_len: u64,
    open: Option<OpenRun>,
    done: bool,
}

impl<I: Iterator<Item = f64>> RunScanner<I> {
    pub fn new(chrom: String, disps: I, params: CallParams, chrom_len: u64) -> RunScanner<I> {
        RunScanner {
            chrom,
            disps,
            tile: 0,
            min_distance: params.min_distance,
            tile_size: params.tile_size,
            chrom_len,
            open: None,
            done: false,
        }
    }

    fn emit(&self, run: OpenRun) -> RatCall {
        RatCall {
            chrom: self.chrom.clone(),
            start: run.start_tile * self.tile_size,
            end: (run.next_tile * self.tile_size).min(self.chrom_len),
            displacement: run.value,
        }
    }
}

impl<I: Iterator<Item = f64>> Iterator for RunScanner<I> {
    type Item = RatCall;

    fn next(&mut self) -> Option<RatCall> {
        if self.done {
            return None;
        }
        loop {
            let Some(d) = self.disps.next() else {
                self.done = true;
                return self.open.take().map(|run| self.emit(run));
            };
            let tile = self.tile;
            self.tile += 1;
            if d.abs() < self.min_distance {
                continue;
            }
            if let Some(run) = &mut self.open {
                if tile == run.next_tile && d == run.value {
                    run.next_tile = tile + 1;
                    continue;
                }
            }
            let fresh = OpenRun {
                start_tile: tile,
                next_tile: tile + 1,
                value: d,
            };
            if let Some(closed) = self.open.replace(fresh) {
                return Some(self.emit(closed));
            }
        }
    }
}

/// Lazily compare two populated genomes, chromosome by chromosome in
/// natural-sort order, yielding called intervals in tile order.
///
/// Both genomes are expected to have been built from `chrom_lengths`
/// with the tile size in `params`; a chromosome absent from either
/// genome is skipped.
pub fn compare_genomes<'a>(
    a: &'a TiledGenome,
    b: &'a TiledGenome,
    chrom_lengths: &'a FxHashMap<String, u64>,
    params: CallParams,
) -> impl Iterator<Item = RatCall> + 'a {
    let mut chroms: Vec<&'a String> = chrom_lengths.keys().collect();
    chroms.sort_by(|x, y| natord::compare(x, y));
    chroms
        .into_iter()
        .filter_map(move |chrom| {
            let tiles_a = a.chrom_tiles(chrom)?;
            let tiles_b = b.chrom_tiles(chrom)?;
            Some(RunScanner::new(
                chrom.clone(),
                displacements(tiles_a, tiles_b),
                params,
                chrom_lengths[chrom],
            ))
        })
        .flatten()
}
