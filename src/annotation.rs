//! Read-only exon annotation.
//!
//! Groups exon records into transcript models and keeps a per-chromosome,
//! start-sorted exon index so break points can be resolved with a binary
//! search plus a lookback bounded by the longest exon.

use ahash::AHashMap;
use indexmap::IndexMap;
use log::debug;

use crate::types::{ExonRecord, TranscriptModel};

/// Position of one exon inside the transcript table.
#[derive(Debug, Clone, Copy)]
struct ExonSlot {
    start: i64,
    end: i64,
    transcript: usize,
    exon: usize,
}

/// Exon annotation shared by reference across every grafting stage.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    transcripts: IndexMap<String, TranscriptModel>,
    exons_by_chrom: AHashMap<String, Vec<ExonSlot>>,
    /// Longest exon per chromosome, bounds the lookback in `exons_at`.
    max_lengths: AHashMap<String, i64>,
}

impl Annotation {
    /// Build the annotation from flat exon records.
    ///
    /// Transcripts keep the order in which their first exon was seen. Exons
    /// are sorted by start and renumbered when the supplied numbers are not a
    /// contiguous run in transcription order.
    pub fn new(records: Vec<ExonRecord>) -> Self {
        let mut transcripts: IndexMap<String, TranscriptModel> = IndexMap::new();
        for record in records {
            transcripts
                .entry(record.transcript_id.clone())
                .or_insert_with(|| TranscriptModel::new(record.transcript_id.clone()))
                .add_exon(record);
        }

        for transcript in transcripts.values_mut() {
            if transcript.has_contiguous_numbering() {
                transcript.sort_exons();
            } else {
                debug!(
                    "Renumbering exons of {} (irregular exon numbers)",
                    transcript.transcript_id
                );
                transcript.renumber_exons();
            }
        }

        let mut exons_by_chrom: AHashMap<String, Vec<ExonSlot>> = AHashMap::new();
        let mut max_lengths: AHashMap<String, i64> = AHashMap::new();
        for (t_idx, transcript) in transcripts.values().enumerate() {
            for (e_idx, exon) in transcript.exons.iter().enumerate() {
                let chrom = exon.interval.chrom();
                exons_by_chrom
                    .entry(chrom.to_string())
                    .or_default()
                    .push(ExonSlot {
                        start: exon.interval.start(),
                        end: exon.interval.end(),
                        transcript: t_idx,
                        exon: e_idx,
                    });
                let max_len = max_lengths.entry(chrom.to_string()).or_insert(0);
                *max_len = (*max_len).max(exon.length());
            }
        }
        for slots in exons_by_chrom.values_mut() {
            slots.sort_by_key(|s| (s.start, s.end, s.transcript));
        }

        Annotation {
            transcripts,
            exons_by_chrom,
            max_lengths,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Number of transcripts.
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn transcript(&self, transcript_id: &str) -> Option<&TranscriptModel> {
        self.transcripts.get(transcript_id)
    }

    /// Transcripts in annotation order.
    pub fn transcripts(&self) -> impl Iterator<Item = &TranscriptModel> {
        self.transcripts.values()
    }

    /// All exons on `chrom` that contain `pos`, ordered by start.
    pub fn exons_at<'a>(&'a self, chrom: &str, pos: i64) -> impl Iterator<Item = &'a ExonRecord> + 'a {
        let slots: &[ExonSlot] = self
            .exons_by_chrom
            .get(chrom)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let max_len = self.max_lengths.get(chrom).copied().unwrap_or(0);
        let first = find_search_start_index(slots, pos - max_len);

        slots[first..]
            .iter()
            .take_while(move |s| s.start <= pos)
            .filter(move |s| s.end >= pos)
            .map(move |s| &self.transcripts[s.transcript].exons[s.exon])
    }
}

/// Find the first slot whose start is at or after `search_start`.
fn find_search_start_index(slots: &[ExonSlot], search_start: i64) -> usize {
    slots.partition_point(|s| s.start < search_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenomicInterval, Strand};

    fn exon(tid: &str, chrom: &str, start: i64, end: i64, number: u32) -> ExonRecord {
        ExonRecord::new(
            GenomicInterval::new(chrom, start, end, Strand::Positive),
            "G1",
            tid,
            number,
            "protein_coding",
            format!("{}:{}", tid, number),
        )
    }

    #[test]
    fn test_groups_records_by_transcript() {
        let annotation = Annotation::new(vec![
            exon("T1", "chr1", 100, 200, 1),
            exon("T2", "chr1", 150, 250, 1),
            exon("T1", "chr1", 300, 400, 2),
        ]);
        assert_eq!(annotation.len(), 2);
        let ids: Vec<&str> = annotation.transcripts().map(|t| t.transcript_id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2"]);
        assert_eq!(annotation.transcript("T1").unwrap().exons.len(), 2);
    }

    #[test]
    fn test_exons_at_finds_long_exon_behind_short_ones() {
        let annotation = Annotation::new(vec![
            exon("T1", "chr1", 100, 5000, 1),
            exon("T2", "chr1", 4000, 4100, 1),
            exon("T3", "chr1", 4500, 4600, 1),
        ]);
        let hits: Vec<&str> = annotation
            .exons_at("chr1", 4550)
            .map(|e| e.transcript_id.as_str())
            .collect();
        assert_eq!(hits, vec!["T1", "T3"]);
        assert_eq!(annotation.exons_at("chr2", 4550).count(), 0);
    }

    #[test]
    fn test_exons_at_boundaries_are_inclusive() {
        let annotation = Annotation::new(vec![exon("T1", "chr1", 100, 200, 1)]);
        assert_eq!(annotation.exons_at("chr1", 100).count(), 1);
        assert_eq!(annotation.exons_at("chr1", 200).count(), 1);
        assert_eq!(annotation.exons_at("chr1", 201).count(), 0);
    }

    #[test]
    fn test_irregular_numbers_are_repaired() {
        let annotation = Annotation::new(vec![
            exon("T1", "chr1", 300, 400, 5),
            exon("T1", "chr1", 100, 200, 5),
        ]);
        let t1 = annotation.transcript("T1").unwrap();
        assert_eq!(t1.exons[0].exon_number, 1);
        assert_eq!(t1.exons[1].exon_number, 2);
    }
}
