//! GTF annotation parser with gzip support.
//!
//! Reads the `exon` features of a GTF file into flat exon records. Grouping
//! into transcripts and exon renumbering happen in `Annotation::new`.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;

use crate::parser::util::{is_skippable, open_input};
use crate::types::{ExonRecord, GenomicInterval, Strand};

/// Parse a GTF file into exon records.
///
/// Supports both plain text and gzip-compressed GTF files.
pub fn parse_annotation(path: &Path, gene_id_tag: &str, transcript_id_tag: &str) -> Result<Vec<ExonRecord>> {
    let reader = open_input(path, "GTF")?;
    parse_annotation_reader(reader, gene_id_tag, transcript_id_tag)
}

/// Parse GTF data from a reader.
pub fn parse_annotation_reader<R: BufRead>(
    reader: R,
    gene_id_tag: &str,
    transcript_id_tag: &str,
) -> Result<Vec<ExonRecord>> {
    let mut exons = Vec::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result.context("Failed to read GTF line")?;
        if is_skippable(&line) {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 || fields[2] != "exon" {
            continue;
        }

        let chrom = fields[0];
        let start: i64 = fields[3]
            .parse()
            .with_context(|| format!("Failed to parse start coordinate on line {}", line_no + 1))?;
        let end: i64 = fields[4]
            .parse()
            .with_context(|| format!("Failed to parse end coordinate on line {}", line_no + 1))?;
        let strand = match fields[6].parse::<Strand>() {
            Ok(s) => s,
            Err(_) => continue, // Skip entries without valid strand
        };
        let attributes = fields[8];

        let gene_id = extract_attribute(attributes, gene_id_tag)
            .with_context(|| format!("Missing {} on exon at line {}", gene_id_tag, line_no + 1))?;
        let transcript_id = extract_attribute(attributes, transcript_id_tag)
            .with_context(|| format!("Missing {} on exon at line {}", transcript_id_tag, line_no + 1))?;
        // Unnumbered exons are numbered from their strand when the
        // annotation is built.
        let exon_number = extract_attribute(attributes, "exon_number")
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(0);
        let transcript_type = extract_attribute(attributes, "transcript_type")
            .or_else(|| extract_attribute(attributes, "transcript_biotype"))
            .unwrap_or_else(|| ".".to_string());

        let interval = GenomicInterval::new(chrom, start, end, strand);
        let exon_id = extract_attribute(attributes, "exon_id").unwrap_or_else(|| interval.id());

        exons.push(ExonRecord::new(
            interval,
            gene_id,
            transcript_id,
            exon_number,
            transcript_type,
            exon_id,
        ));
    }

    Ok(exons)
}

/// Extract an attribute value from the GTF attributes string.
///
/// GTF attributes are in the format: key "value"; key value; ...
/// Quotes around the value are optional.
fn extract_attribute(attributes: &str, key: &str) -> Option<String> {
    attributes
        .split(';')
        .filter_map(|attr| attr.trim().split_once(char::is_whitespace))
        .find(|(k, _)| *k == key)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}
