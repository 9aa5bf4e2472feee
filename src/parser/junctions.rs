//! Junction table parser.
//!
//! Two layouts are read. The simple layout is
//! `chrom start end strand [junction_id [gene_id]]` with coordinates on the
//! flanking exon bases. STAR `SJ.out.tab` gives the first and last intron
//! base and a numeric strand (0 undefined, 1 plus, 2 minus); its coordinates
//! are widened by one base on each side.

use anyhow::{bail, Context, Result};
use std::io::BufRead;
use std::path::Path;

use crate::parser::util::{is_skippable, open_input};
use crate::types::{GenomicInterval, Junction, JunctionFormat, Strand};

const NO_GENE: &str = ".";

/// Parse a junction table (supports .gz).
pub fn parse_junctions(path: &Path, format: JunctionFormat) -> Result<Vec<Junction>> {
    let reader = open_input(path, "junction")?;
    parse_junctions_reader(reader, format)
}

/// Parse junctions from a reader, keeping file order.
pub fn parse_junctions_reader<R: BufRead>(reader: R, format: JunctionFormat) -> Result<Vec<Junction>> {
    let mut junctions = Vec::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result.context("Failed to read junction line")?;
        if is_skippable(&line) {
            continue;
        }

        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() < 4 {
            continue;
        }

        // Header lines
        let (start, end) = match (fields[1].parse::<i64>(), fields[2].parse::<i64>()) {
            (Ok(start), Ok(end)) => (start, end),
            _ => continue,
        };

        let junction = match format {
            JunctionFormat::Simple => {
                let strand: Strand = fields[3]
                    .parse()
                    .with_context(|| format!("Line {}: invalid strand '{}'", line_no + 1, fields[3]))?;
                let interval = GenomicInterval::new(fields[0], start, end, strand);
                let id = fields
                    .get(4)
                    .filter(|id| !id.is_empty())
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| interval.id());
                let gene_id = fields.get(5).filter(|g| !g.is_empty()).copied().unwrap_or(NO_GENE);
                Junction::new(id, interval, gene_id)
            }
            JunctionFormat::Star => {
                let strand = match fields[3] {
                    "0" => Strand::Unknown,
                    "1" => Strand::Positive,
                    "2" => Strand::Negative,
                    other => bail!("Line {}: invalid STAR strand code '{}'", line_no + 1, other),
                };
                let interval = GenomicInterval::new(fields[0], start - 1, end + 1, strand);
                Junction::new(interval.id(), interval, NO_GENE)
            }
        };
        junctions.push(junction);
    }

    Ok(junctions)
}
