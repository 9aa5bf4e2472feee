//! Alternative first/last exon grafting.
//!
//! The junction connects a terminal exon to an internal exon shared by the
//! competing isoforms. The terminal exon is synthesized from the junction and
//! a retained flank coordinate, the internal exon is cut at the junction, and
//! every original exon beyond the splice point on the terminal side goes.

use ahash::AHashSet;

use crate::annotation::Annotation;
use crate::error::GraftError;
use crate::graft::pairs::JunctionEnd;
use crate::graft::splice::{duplicate_chain, exon_containing, reshape, Breakpoint, Composite, GraftStrategy};
use crate::types::{EventClass, ExonRecord, GenomicInterval, JunctionPair, SearchDirection, Side, TranscriptModel};

/// Strategy for AltFirstExon and AltLastExon events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalExonEvent;

/// Junction end touching the terminal exon. Right-searching events are
/// anchored on the junction start, so their terminal exon lies to the left.
fn terminal_end(pair: &JunctionPair) -> JunctionEnd {
    JunctionEnd::for_direction(pair.search_direction)
}

impl GraftStrategy for TerminalExonEvent {
    /// The internal side of each junction: where the shared exon starts or
    /// ends.
    fn compute_breakpoints(&self, pairs: &[&JunctionPair]) -> Vec<Breakpoint> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| Breakpoint {
                pair: i,
                position: terminal_end(pair).opposite().coordinate(&pair.junction.interval),
            })
            .collect()
    }

    fn splice_transcript(
        &self,
        composite: &Composite<'_>,
        base: &TranscriptModel,
        annotation: &Annotation,
    ) -> Result<Vec<ExonRecord>, GraftError> {
        let pair = composite.pair;
        let junction = &pair.junction.interval;
        let chrom = junction.chrom();
        let terminal_on_left = pair.search_direction == SearchDirection::Right;

        let inner = terminal_end(pair).coordinate(junction);
        let internal_bp = terminal_end(pair).opposite().coordinate(junction);
        let flank = retained_flank(pair, inner, terminal_on_left, annotation);

        let (start, end) = if terminal_on_left {
            (flank.coordinate, inner)
        } else {
            (inner, flank.coordinate)
        };
        // An alternative exon borrowing the event flank would swallow the
        // reference terminal exon.
        let swallows_reference = pair.side == Side::Y
            && !flank.annotated
            && start <= pair.event_interval.end()
            && pair.event_interval.start() <= end;
        if start > end || swallows_reference {
            return Err(GraftError::InvalidTerminalExon {
                composite_id: composite.id.clone(),
                start,
                end,
            });
        }

        let chain = duplicate_chain(base, &composite.id);
        let missing = || GraftError::MissingTruncation {
            composite_id: composite.id.clone(),
            position: internal_bp,
        };

        let internal_idx = exon_containing(&chain, chrom, internal_bp).ok_or_else(missing)?;
        let internal = &chain[internal_idx];
        let piece_interval = if terminal_on_left {
            internal.interval.with_start(internal_bp)
        } else {
            internal.interval.with_end(internal_bp)
        }
        .ok_or_else(missing)?;
        let piece = reshape(internal, piece_interval);

        let synthesized = ExonRecord::new(
            GenomicInterval::new(chrom, start, end, internal.interval.strand()),
            internal.gene_id.clone(),
            composite.id.clone(),
            0,
            internal.transcript_type.clone(),
            format!("{}:{}-{}:{}", chrom, junction.start(), junction.end(), flank.coordinate),
        );

        // Walk exon numbers outward from the splice point toward the
        // replaced terminal exon.
        let mut stripped: AHashSet<u32> = AHashSet::new();
        stripped.insert(internal.exon_number);
        let mut number = internal.exon_number;
        loop {
            let next = match pair.event_class {
                EventClass::AltFirstExon => number.checked_sub(1),
                _ => number.checked_add(1),
            };
            match next {
                Some(n) if chain.iter().any(|e| e.exon_number == n) => {
                    stripped.insert(n);
                    number = n;
                }
                _ => break,
            }
        }

        // Irregular numbering can leave exons the walk never reached.
        let replaced = synthesized.interval.hull(&piece.interval);
        let mut exons: Vec<ExonRecord> = chain
            .into_iter()
            .filter(|e| !stripped.contains(&e.exon_number) && !e.interval.overlaps(&replaced))
            .collect();
        exons.push(synthesized);
        exons.push(piece);

        Ok(exons)
    }
}

/// Outer coordinate of the synthesized terminal exon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Flank {
    coordinate: i64,
    /// Taken from an annotated exon rather than the event boundary.
    annotated: bool,
}

/// The reference side keeps the event's own outer boundary. The alternative
/// side takes the widest annotated exon ending (or starting) at the junction,
/// falling back to the event boundary.
fn retained_flank(pair: &JunctionPair, inner: i64, terminal_on_left: bool, annotation: &Annotation) -> Flank {
    let event_flank = Flank {
        coordinate: if terminal_on_left {
            pair.event_interval.start()
        } else {
            pair.event_interval.end()
        },
        annotated: false,
    };
    if pair.side == Side::X {
        return event_flank;
    }

    let junction = &pair.junction.interval;
    let candidates = annotation
        .exons_at(junction.chrom(), inner)
        .filter(|e| e.interval.strand().is_compatible_with(junction.strand()));

    let annotated = if terminal_on_left {
        candidates
            .filter(|e| e.interval.end() == inner)
            .map(|e| e.interval.start())
            .min()
    } else {
        candidates
            .filter(|e| e.interval.start() == inner)
            .map(|e| e.interval.end())
            .max()
    };

    annotated
        .map(|coordinate| Flank {
            coordinate,
            annotated: true,
        })
        .unwrap_or(event_flank)
}
