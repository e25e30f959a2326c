//! Integration test for the full calling pipeline: fai -> two GFF3
//! profiles -> bedgraph records, exercising the built binary.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn get_ratrap_binary() -> PathBuf {
    // CARGO_BIN_EXE_ratrap is set by cargo test for the binary crate
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_ratrap") {
        return PathBuf::from(path);
    }

    // Get manifest dir and look for binary relative to it
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let candidates = [
        manifest_dir.join("target/release/ratrap"),
        manifest_dir.join("target/debug/ratrap"),
    ];

    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    // Fall back to PATH
    PathBuf::from("ratrap")
}

fn run_ratrap(work_dir: &PathBuf, args: &[&str]) -> std::io::Result<std::process::Output> {
    let ratrap = get_ratrap_binary();
    Command::new(&ratrap)
        .current_dir(work_dir)
        .args(args)
        .output()
}

fn gff3_line(chrom: &str, start_1based: u64, end: u64, label: &str) -> String {
    format!(
        "{}\tsegmenter\tsegment\t{}\t{}\t.\t.\t.\tID=seg;Name={}\n",
        chrom, start_1based, end, label
    )
}

/// Write a reference FASTA stub plus its .fai for the given chromosomes.
fn write_reference(work_dir: &PathBuf, chroms: &[(&str, u64)]) -> std::io::Result<()> {
    let mut fasta = String::new();
    let mut fai = String::new();
    for (name, len) in chroms {
        fasta.push_str(&format!(">{}\n", name));
        fai.push_str(&format!("{}\t{}\t0\t60\t61\n", name, len));
    }
    fs::write(work_dir.join("ref.fa"), fasta)?;
    fs::write(work_dir.join("ref.fa.fai"), fai)?;
    Ok(())
}

#[test]
fn test_five_tile_scenario() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();

    write_reference(&work_dir, &[("chr1", 5000)])?;

    // Profile A: uniform Early-Mid across the chromosome.
    fs::write(work_dir.join("a.gff3"), gff3_line("chr1", 1, 5000, "ESMS"))?;

    // Profile B: Mid-Late over the third and fourth tile.
    let mut b = String::new();
    b.push_str("##gff-version 3\n");
    b.push_str(&gff3_line("chr1", 1, 2000, "ESMS"));
    b.push_str(&gff3_line("chr1", 2001, 4000, "MSLS"));
    b.push_str(&gff3_line("chr1", 4001, 5000, "ESMS"));
    fs::write(work_dir.join("b.gff3"), b)?;

    let output = run_ratrap(
        &work_dir,
        &[
            "-a", "a.gff3", "-b", "b.gff3", "-f", "ref.fa", "-d", "1", "-o", "out.bedgraph",
        ],
    )?;
    assert!(
        output.status.success(),
        "ratrap failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let records = fs::read_to_string(work_dir.join("out.bedgraph"))?;
    assert_eq!(records, "chr1\t2000\t4000\t1\n");
    Ok(())
}

#[test]
fn test_default_threshold_suppresses_small_shifts() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();

    write_reference(&work_dir, &[("chr1", 5000)])?;
    fs::write(work_dir.join("a.gff3"), gff3_line("chr1", 1, 5000, "ESMS"))?;
    fs::write(work_dir.join("b.gff3"), gff3_line("chr1", 1, 5000, "MSLS"))?;

    // Displacement is 1 everywhere; the default minimum distance of 2
    // calls nothing.
    let output = run_ratrap(&work_dir, &["-a", "a.gff3", "-b", "b.gff3", "-f", "ref.fa"])?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn test_clipping_and_chromosome_order() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();

    write_reference(&work_dir, &[("chr10", 2500), ("chr2", 2500)])?;

    let mut a = String::new();
    let mut b = String::new();
    for chrom in ["chr2", "chr10"] {
        a.push_str(&gff3_line(chrom, 1, 2500, "ES"));
        b.push_str(&gff3_line(chrom, 1, 2500, "LS"));
    }
    fs::write(work_dir.join("a.gff3"), a)?;
    fs::write(work_dir.join("b.gff3"), b)?;

    let output = run_ratrap(&work_dir, &["-a", "a.gff3", "-b", "b.gff3", "-f", "ref.fa"])?;
    assert!(output.status.success());

    // Ends clip to 2500 rather than the 3000 bp tile grid, and chr2
    // sorts before chr10.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "chr2\t0\t2500\t2\nchr10\t0\t2500\t2\n");
    Ok(())
}

#[test]
fn test_bad_label_aborts_the_run() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();

    write_reference(&work_dir, &[("chr1", 5000)])?;
    fs::write(work_dir.join("a.gff3"), gff3_line("chr1", 1, 5000, "ESMS"))?;
    // No Name=<timing label> attribute at all.
    fs::write(
        work_dir.join("b.gff3"),
        "chr1\tsegmenter\tsegment\t1\t5000\t.\t.\t.\tID=seg\n",
    )?;

    let output = run_ratrap(&work_dir, &["-a", "a.gff3", "-b", "b.gff3", "-f", "ref.fa"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_stats_tables_with_output_file() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();

    write_reference(&work_dir, &[("chr1", 5000)])?;
    fs::write(work_dir.join("a.gff3"), gff3_line("chr1", 1, 5000, "ESMS"))?;
    let mut b = String::new();
    b.push_str(&gff3_line("chr1", 1, 2000, "ESMS"));
    b.push_str(&gff3_line("chr1", 2001, 4000, "MSLS"));
    b.push_str(&gff3_line("chr1", 4001, 5000, "ESMS"));
    fs::write(work_dir.join("b.gff3"), b)?;

    let output = run_ratrap(
        &work_dir,
        &[
            "-a", "a.gff3", "-b", "b.gff3", "-f", "ref.fa", "-d", "1", "--stats", "-o",
            "out.bedgraph",
        ],
    )?;
    assert!(
        output.status.success(),
        "ratrap failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Tables go to stdout, records to the output file.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Profile A Size Distribution"));
    assert!(stdout.contains("Profile B Size Distribution"));
    assert!(stdout.contains("Profile A Chromosome Composition"));
    assert!(stdout.contains("RAT Size Distribution"));
    let records = fs::read_to_string(work_dir.join("out.bedgraph"))?;
    assert_eq!(records, "chr1\t2000\t4000\t1\n");
    Ok(())
}

#[test]
fn test_stats_requires_output_file() -> std::io::Result<()> {
    let temp_dir = TempDir::new()?;
    let work_dir = temp_dir.path().to_path_buf();

    write_reference(&work_dir, &[("chr1", 5000)])?;
    fs::write(work_dir.join("a.gff3"), gff3_line("chr1", 1, 5000, "ESMS"))?;
    fs::write(work_dir.join("b.gff3"), gff3_line("chr1", 1, 5000, "MSLS"))?;

    let output = run_ratrap(
        &work_dir,
        &["-a", "a.gff3", "-b", "b.gff3", "-f", "ref.fa", "--stats"],
    )?;
    assert!(!output.status.success());
    Ok(())
}
