//! Tiled genome structure: per-chromosome arrays of per-tile timing
//! presence vectors, populated from segmentation annotations.

use crate::error::RatError;
use crate::timing::{encode, TimingVec};
use rustc_hash::FxHashMap;

/// One segmentation record: 0-based half-open interval tagged with a
/// timing label such as "ESMS".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub label: String,
}

/// Tile indices covered by the half-open interval `[start, end)`.
///
/// The start tile is the floor of `start / tile_size` and the end tile
/// the ceiling of `end / tile_size`: a segment starting exactly on a
/// tile boundary begins at that tile, and one ending exactly on a
/// boundary does not spill into the next tile.
pub fn tile_range(start: u64, end: u64, tile_size: u64) -> (u64, u64) {
    (start / tile_size, end.div_ceil(tile_size))
}

/// Chromosome name -> ordered tile array. Built once per profile,
/// mutated only during population, then read-only.
pub struct TiledGenome {
    tile_size: u64,
    tiles: FxHashMap<String, Vec<TimingVec>>,
}

impl TiledGenome {
    /// Allocate `ceil(length / tile_size)` unassigned tiles per chromosome.
    pub fn build(chrom_lengths: &FxHashMap<String, u64>, tile_size: u64) -> TiledGenome {
        let tiles = chrom_lengths
            .iter()
            .map(|(chrom, &len)| {
                let num_tiles = len.div_ceil(tile_size) as usize;
                (chrom.clone(), vec![TimingVec::UNASSIGNED; num_tiles])
            })
            .collect();
        TiledGenome { tile_size, tiles }
    }

    /// Overwrite the tile span of each annotation with its encoded
    /// label. Later annotations overwrite earlier ones in overlapping
    /// spans; nothing is merged.
    pub fn populate(&mut self, annotations: &[Annotation]) -> Result<(), RatError> {
        for ann in annotations {
            let vec = encode(&ann.label)?;
            if ann.end < ann.start {
                return Err(RatError::Range(format!(
                    "annotation {}:{}-{} is inverted",
                    ann.chrom, ann.start, ann.end
                )));
            }
            let tiles = self.tiles.get_mut(&ann.chrom).ok_or_else(|| {
                RatError::Range(format!(
                    "annotation chromosome '{}' is not in the reference index",
                    ann.chrom
                ))
            })?;
            let (start_tile, end_tile) = tile_range(ann.start, ann.end, self.tile_size);
            if end_tile as usize > tiles.len() {
                return Err(RatError::Range(format!(
                    "annotation {}:{}-{} ends at tile {} but the chromosome has {} tiles",
                    ann.chrom,
                    ann.start,
                    ann.end,
                    end_tile,
                    tiles.len()
                )));
            }
            tiles[start_tile as usize..end_tile as usize].fill(vec);
        }
        Ok(())
    }

    pub fn tile_size(&self) -> u64 {
        self.tile_size
    }

    pub fn chrom_tiles(&self, chrom: &str) -> Option<&[TimingVec]> {
        self.tiles.get(chrom).map(|tiles| tiles.as_slice())
    }
}
