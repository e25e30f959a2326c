//! Chromosome lengths from a FASTA `.fai` index.

use rustc_hash::FxHashMap;
use std::io;

/// Derive the `.fai` path for a reference FASTA.
pub fn fai_path(fasta: &str) -> io::Result<String> {
    if [".fa", ".fasta"].iter().any(|e| fasta.ends_with(e)) {
        Ok(format!("{}.fai", fasta))
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' does not look like a FASTA file (.fa/.fasta)", fasta),
        ))
    }
}

/// Parse chromosome name -> length in bp from a `.fai` file. Only the
/// first two columns are used.
pub fn read_fai(path: &str) -> io::Result<FxHashMap<String, u64>> {
    let content = std::fs::read_to_string(path)?;
    let mut lengths = FxHashMap::default();
    for line in content.lines() {
        let mut fields = line.split('\t');
        let (Some(name), Some(len)) = (fields.next(), fields.next()) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let len = len.parse::<u64>().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid length for '{}' in {}: {}", name, path, e),
            )
        })?;
        lengths.insert(name.to_string(), len);
    }
    Ok(lengths)
}
