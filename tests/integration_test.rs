use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn isograft() -> Command {
    Command::new(env!("CARGO_BIN_EXE_isograft"))
}

/// Compare two files line by line, then by size.
fn assert_same_file(output_path: &Path, golden_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let output_reader = BufReader::new(File::open(output_path)?);
    let golden_reader = BufReader::new(File::open(golden_path)?);

    let mut line_num = 0;
    for (out_line, gold_line) in output_reader.lines().zip(golden_reader.lines()) {
        line_num += 1;
        let out_line = out_line?;
        let gold_line = gold_line?;

        if out_line != gold_line {
            panic!(
                "Mismatch at line {} ({}): \nExpected: {}\nActual:   {}",
                line_num,
                golden_path.display(),
                gold_line,
                out_line
            );
        }
    }

    let out_len = fs::metadata(output_path)?.len();
    let gold_len = fs::metadata(golden_path)?.len();
    if out_len != gold_len {
        panic!(
            "File sizes differ for {}: Output: {} bytes, Golden: {} bytes",
            golden_path.display(),
            out_len,
            gold_len
        );
    }

    Ok(())
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_golden_output() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = data_dir();
    let output_file = NamedTempFile::new()?;
    let pairs_file = NamedTempFile::new()?;

    isograft()
        .arg("-g")
        .arg(data_dir.join("annotation.gtf"))
        .arg("-e")
        .arg(data_dir.join("events.tsv"))
        .arg("-j")
        .arg(data_dir.join("junctions.tsv"))
        .arg("-o")
        .arg(output_file.path())
        .arg("-p")
        .arg(pairs_file.path())
        .assert()
        .success();

    assert_same_file(output_file.path(), &data_dir.join("golden_output.gtf"))?;
    assert_same_file(pairs_file.path(), &data_dir.join("golden_pairs.tsv"))?;
    Ok(())
}

#[test]
fn test_no_collapse_keeps_structural_duplicates() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = data_dir();
    let output_file = NamedTempFile::new()?;

    isograft()
        .arg("-g")
        .arg(data_dir.join("annotation.gtf"))
        .arg("-e")
        .arg(data_dir.join("events.tsv"))
        .arg("-j")
        .arg(data_dir.join("junctions.tsv"))
        .arg("-o")
        .arg(output_file.path())
        .arg("--no-collapse")
        .arg("--threads")
        .arg("1")
        .assert()
        .success();

    let output = fs::read_to_string(output_file.path())?;
    let transcripts: Vec<&str> = output
        .lines()
        .filter(|l| l.split('\t').nth(2) == Some("transcript"))
        .collect();
    assert_eq!(transcripts.len(), 4);
    assert!(output.contains("transcript_id \"T2+AltAcceptor+Y+E1\";"));
    Ok(())
}

#[test]
fn test_star_junction_format() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let data_dir = data_dir();
    // Intron 901-999 and 901-1049 in STAR coordinates.
    let junctions = write_file(
        &dir,
        "SJ.out.tab",
        "chr1\t901\t999\t1\t1\t1\t20\t0\t40\nchr1\t901\t1049\t1\t1\t0\t5\t0\t38\n",
    );
    let output = dir.path().join("out.gtf");

    isograft()
        .arg("-g")
        .arg(data_dir.join("annotation.gtf"))
        .arg("-e")
        .arg(data_dir.join("events.tsv"))
        .arg("-j")
        .arg(&junctions)
        .arg("-f")
        .arg("star")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(&output)?;
    assert!(text.contains("chr1\tisograft\texon\t1050\t1100\t"));
    assert!(text.contains("transcript_id \"T1+AltAcceptor+X+E1\";"));
    Ok(())
}

#[test]
fn test_empty_event_table_fails() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir();
    let events = write_file(&dir, "events.tsv", "event_id\tclass\tchrom\tstart\tend\tstrand\n");

    isograft()
        .arg("-g")
        .arg(data_dir.join("annotation.gtf"))
        .arg("-e")
        .arg(&events)
        .arg("-j")
        .arg(data_dir.join("junctions.tsv"))
        .arg("-o")
        .arg(dir.path().join("out.gtf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No events found"));
}

#[test]
fn test_empty_annotation_fails() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir();
    let gtf = write_file(&dir, "empty.gtf", "##no exons\n");

    isograft()
        .arg("-g")
        .arg(&gtf)
        .arg("-e")
        .arg(data_dir.join("events.tsv"))
        .arg("-j")
        .arg(data_dir.join("junctions.tsv"))
        .arg("-o")
        .arg(dir.path().join("out.gtf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No exons found"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir();

    isograft()
        .arg("-g")
        .arg(data_dir.join("annotation.gtf"))
        .arg("-e")
        .arg(dir.path().join("missing.tsv"))
        .arg("-j")
        .arg(data_dir.join("junctions.tsv"))
        .arg("-o")
        .arg(dir.path().join("out.gtf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Event file not found"));
}

#[test]
fn test_invalid_junction_format_fails() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir();

    isograft()
        .arg("-g")
        .arg(data_dir.join("annotation.gtf"))
        .arg("-e")
        .arg(data_dir.join("events.tsv"))
        .arg("-j")
        .arg(data_dir.join("junctions.tsv"))
        .arg("-f")
        .arg("bed")
        .arg("-o")
        .arg(dir.path().join("out.gtf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Junction format"));
}
