//! Output formatting for isograft results.
//!
//! Grafted transcripts are written as GTF (one `transcript` line followed by
//! its `exon` lines); junction pairs go to an optional tab-separated table.

use anyhow::Result;

use std::io::Write;

use crate::types::{ExonRecord, JunctionPair, TranscriptModel};

/// GTF source column.
pub const GTF_SOURCE: &str = "isograft";

/// Write every transcript as GTF.
pub fn write_gtf<W: Write>(writer: &mut W, transcripts: &[TranscriptModel]) -> Result<()> {
    for transcript in transcripts {
        let Some(line) = format_transcript_line(transcript) else {
            continue;
        };
        writeln!(writer, "{}", line)?;
        for exon in &transcript.exons {
            writeln!(writer, "{}", format_exon_line(transcript, exon))?;
        }
    }
    Ok(())
}

/// Format the `transcript` line of a model, or `None` for a model without
/// exons.
pub fn format_transcript_line(transcript: &TranscriptModel) -> Option<String> {
    let first = transcript.exons.first()?;
    let start = transcript.start()?;
    let end = transcript.end()?;

    Some(format!(
        "{}\t{}\ttranscript\t{}\t{}\t.\t{}\t.\t{}",
        first.interval.chrom(),
        GTF_SOURCE,
        start,
        end,
        first.interval.strand(),
        transcript_attributes(transcript, first)
    ))
}

/// Format one `exon` line.
pub fn format_exon_line(transcript: &TranscriptModel, exon: &ExonRecord) -> String {
    format!(
        "{}\t{}\texon\t{}\t{}\t.\t{}\t.\t{} exon_number \"{}\"; exon_id \"{}\";",
        exon.interval.chrom(),
        GTF_SOURCE,
        exon.interval.start(),
        exon.interval.end(),
        exon.interval.strand(),
        transcript_attributes(transcript, exon),
        exon.exon_number,
        exon.exon_id
    )
}

fn transcript_attributes(transcript: &TranscriptModel, exon: &ExonRecord) -> String {
    let mut attrs = format!(
        "gene_id \"{}\"; transcript_id \"{}\"; transcript_type \"{}\";",
        exon.gene_id, transcript.transcript_id, exon.transcript_type
    );
    if let Some(origin) = &transcript.origin {
        attrs.push_str(&format!(
            " event_id \"{}\"; event_class \"{}\"; side \"{}\"; base_transcript_id \"{}\";",
            origin.event_id, origin.event_class, origin.side, origin.base_id
        ));
    }
    attrs
}

/// Write the junction pair table header.
pub fn write_pairs_header<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "event_id\tclass\tside\tdirection\tjunction_id\tchrom\tstart\tend\tgene_id"
    )?;
    Ok(())
}

/// Format a single junction pair row.
pub fn format_pair_line(pair: &JunctionPair) -> String {
    let junction = &pair.junction;
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        pair.event_id,
        pair.event_class,
        pair.side,
        pair.search_direction,
        junction.id,
        junction.interval.chrom(),
        junction.interval.start(),
        junction.interval.end(),
        junction.gene_id
    )
}
