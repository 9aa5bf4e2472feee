//! Duplicate transcript collapsing.
//!
//! Grafting different base transcripts at the same locus often yields the
//! same exon chain under different composite ids. Only one id per exon
//! structure is kept: the lexicographically smallest. The structure key is
//! the chromosome, strand and (start, end) signature.

use ahash::{AHashMap, AHashSet};
use log::debug;

use crate::error::GraftError;
use crate::types::{Strand, TranscriptModel};

type StructureKey<'a> = (&'a str, Strand, &'a [(i64, i64)]);

/// Remove transcripts whose exon structure repeats that of a transcript
/// with a smaller id.
///
/// Retained transcripts keep their input order. A transcript id seen more
/// than once is kept at its first occurrence. Applying the function to its
/// own output changes nothing.
pub fn collapse_duplicates(transcripts: Vec<TranscriptModel>) -> Vec<TranscriptModel> {
    let signatures: Vec<Vec<(i64, i64)>> = transcripts.iter().map(|t| t.signature()).collect();
    let keys: Vec<StructureKey<'_>> = transcripts
        .iter()
        .zip(&signatures)
        .map(|(t, signature)| (t.chrom().unwrap_or(""), t.strand(), signature.as_slice()))
        .collect();

    let mut keepers: AHashMap<StructureKey<'_>, &str> = AHashMap::new();
    for (transcript, key) in transcripts.iter().zip(&keys) {
        keepers
            .entry(*key)
            .and_modify(|kept| {
                if transcript.transcript_id.as_str() < *kept {
                    *kept = transcript.transcript_id.as_str();
                }
            })
            .or_insert(transcript.transcript_id.as_str());
    }

    let keep: Vec<bool> = transcripts
        .iter()
        .zip(&keys)
        .map(|(transcript, key)| {
            let kept = keepers[key];
            if kept != transcript.transcript_id {
                debug!(
                    "{}",
                    GraftError::StructuralDuplicate {
                        dropped: transcript.transcript_id.clone(),
                        kept: kept.to_string(),
                    }
                );
            }
            kept == transcript.transcript_id
        })
        .collect();

    let mut emitted: AHashSet<String> = AHashSet::new();
    transcripts
        .into_iter()
        .zip(keep)
        .filter_map(|(transcript, keep)| {
            (keep && emitted.insert(transcript.transcript_id.clone())).then_some(transcript)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExonRecord, GenomicInterval, Strand};

    fn transcript(id: &str, spans: &[(i64, i64)]) -> TranscriptModel {
        transcript_on(id, "chr1", Strand::Positive, spans)
    }

    fn transcript_on(id: &str, chrom: &str, strand: Strand, spans: &[(i64, i64)]) -> TranscriptModel {
        let mut t = TranscriptModel::new(id);
        for (i, &(start, end)) in spans.iter().enumerate() {
            t.add_exon(ExonRecord::new(
                GenomicInterval::new(chrom, start, end, strand),
                "G1",
                id,
                i as u32 + 1,
                "protein_coding",
                format!("{}.{}", id, i + 1),
            ));
        }
        t
    }

    fn ids(transcripts: &[TranscriptModel]) -> Vec<&str> {
        transcripts.iter().map(|t| t.transcript_id.as_str()).collect()
    }

    #[test]
    fn test_smallest_id_wins() {
        let input = vec![
            transcript("T2+AltAcceptor+Y+E1", &[(100, 200), (300, 400)]),
            transcript("T1+AltAcceptor+Y+E1", &[(100, 200), (300, 400)]),
            transcript("T3+AltAcceptor+Y+E1", &[(100, 200), (350, 400)]),
        ];

        let out = collapse_duplicates(input);

        assert_eq!(ids(&out), vec!["T1+AltAcceptor+Y+E1", "T3+AltAcceptor+Y+E1"]);
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let input = vec![
            transcript("B", &[(1, 10), (20, 30)]),
            transcript("A", &[(1, 10), (20, 30)]),
            transcript("C", &[(1, 10)]),
        ];

        let once = collapse_duplicates(input);
        let twice = collapse_duplicates(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_same_id_kept_once() {
        let input = vec![
            transcript("A", &[(1, 10)]),
            transcript("A", &[(1, 10)]),
        ];
        assert_eq!(collapse_duplicates(input).len(), 1);
    }

    #[test]
    fn test_other_chromosome_or_strand_is_not_a_duplicate() {
        let input = vec![
            transcript_on("A", "chr1", Strand::Positive, &[(1, 10), (20, 30)]),
            transcript_on("B", "chr2", Strand::Positive, &[(1, 10), (20, 30)]),
            transcript_on("C", "chr1", Strand::Negative, &[(1, 10), (20, 30)]),
            transcript_on("D", "chr2", Strand::Positive, &[(1, 10), (20, 30)]),
        ];

        assert_eq!(ids(&collapse_duplicates(input)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(collapse_duplicates(Vec::new()).is_empty());
    }
}
