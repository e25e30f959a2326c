//! GFF3 segmentation-profile reading.
//!
//! Supports plain and BGZF-compressed files. Only the coordinates and
//! the `Name=` timing label are extracted; everything else in the
//! record is ignored.

use crate::error::RatError;
use crate::genome::Annotation;
use log::debug;
use noodles::bgzf;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::num::NonZeroUsize;
use std::sync::OnceLock;

fn timing_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Name=(([EML]S){1,3})").unwrap())
}

const BGZF_HEADER_SIZE: usize = 18;

/// Check whether a file starts with a valid BGZF header.
/// Returns `Ok(false)` for regular gzip, too-small files, or plain text.
fn is_bgzf<R: Read + Seek>(reader: &mut R) -> std::io::Result<bool> {
    let mut header = [0u8; BGZF_HEADER_SIZE];
    let result = match reader.read_exact(&mut header) {
        Ok(()) => {
            Ok(header[0..2] == [0x1f, 0x8b]      // gzip magic
                && header[3] == 0x04              // FEXTRA
                && header[12..14] == [b'B', b'C']) // BC subfield
        }
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    };
    reader.seek(SeekFrom::Start(0))?;
    result
}

fn parse_gff3_line(line: &str) -> Result<Annotation, RatError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 {
        return Err(RatError::Format(format!(
            "GFF3 record has {} fields, expected 9",
            fields.len()
        )));
    }
    let start = fields[3].parse::<u64>().map_err(|e| {
        RatError::Format(format!("invalid GFF3 start '{}': {}", fields[3], e))
    })?;
    let end = fields[4].parse::<u64>().map_err(|e| {
        RatError::Format(format!("invalid GFF3 end '{}': {}", fields[4], e))
    })?;
    if start == 0 {
        return Err(RatError::Format(
            "GFF3 coordinates are 1-based; start of 0 is invalid".to_string(),
        ));
    }
    if end < start {
        return Err(RatError::Format(format!(
            "GFF3 record end {} is before start {}",
            end, start
        )));
    }
    let label = timing_label_re()
        .captures(fields[8])
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| {
            RatError::Format(format!(
                "no timing label (Name=<classes>) in attributes '{}'",
                fields[8]
            ))
        })?;

    // GFF3 is 1-based inclusive; annotations are 0-based half-open.
    Ok(Annotation {
        chrom: fields[0].to_string(),
        start: start - 1,
        end,
        label,
    })
}

/// Parse GFF3 records from a reader, skipping comment and empty lines.
pub fn parse_gff3<R: BufRead>(reader: R) -> Result<Vec<Annotation>, RatError> {
    let mut annotations = Vec::new();
    for line_result in reader.lines() {
        let line = line_result.map_err(RatError::Io)?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        annotations.push(parse_gff3_line(&line)?);
    }
    Ok(annotations)
}

/// Read a segmentation profile from a `.gff3` path, transparently
/// handling BGZF-compressed `.gz`/`.bgz` files.
pub fn read_annotations(path: &str, threads: NonZeroUsize) -> Result<Vec<Annotation>, RatError> {
    let stem = path.trim_end_matches(".gz").trim_end_matches(".bgz");
    if !stem.ends_with(".gff3") {
        return Err(RatError::Format(format!("'{}' is not a gff3 file", path)));
    }

    let mut file = File::open(path).map_err(RatError::Io)?;
    let reader: Box<dyn Read> = if [".gz", ".bgz"].iter().any(|e| path.ends_with(e)) {
        if !is_bgzf(&mut file).map_err(RatError::Io)? {
            return Err(RatError::Format(format!(
                "'{}' is regular gzip, not BGZF. Convert with: zcat '{}' | bgzip > {}.gz",
                path, path, stem
            )));
        }
        Box::new(bgzf::io::MultithreadedReader::with_worker_count(
            threads, file,
        ))
    } else {
        Box::new(file)
    };

    let annotations = parse_gff3(BufReader::new(reader))?;
    debug!("Parsed {} annotations from {}", annotations.len(), path);
    Ok(annotations)
}
