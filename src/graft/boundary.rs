//! Alternative acceptor/donor grafting.
//!
//! The junction moves one internal splice site. The exon holding the
//! junction start is cut back to end there, the exon holding the junction
//! end is cut to start there, and the two pieces replace every original exon
//! they span.

use crate::annotation::Annotation;
use crate::error::GraftError;
use crate::graft::pairs::JunctionEnd;
use crate::graft::splice::{duplicate_chain, exon_containing, reshape, Breakpoint, Composite, GraftStrategy};
use crate::types::{ExonRecord, JunctionPair, TranscriptModel};

/// Strategy for AltAcceptor and AltDonor events.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryEvent;

impl GraftStrategy for BoundaryEvent {
    /// The alternative splice site: junction end for left-searching events,
    /// junction start for right-searching ones.
    fn compute_breakpoints(&self, pairs: &[&JunctionPair]) -> Vec<Breakpoint> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| Breakpoint {
                pair: i,
                position: JunctionEnd::for_direction(pair.search_direction)
                    .coordinate(&pair.junction.interval),
            })
            .collect()
    }

    fn splice_transcript(
        &self,
        composite: &Composite<'_>,
        base: &TranscriptModel,
        _annotation: &Annotation,
    ) -> Result<Vec<ExonRecord>, GraftError> {
        let junction = &composite.pair.junction.interval;
        let chrom = junction.chrom();
        let chain = duplicate_chain(base, &composite.id);

        let missing = |position: i64| GraftError::MissingTruncation {
            composite_id: composite.id.clone(),
            position,
        };

        let left_idx = exon_containing(&chain, chrom, junction.start()).ok_or_else(|| missing(junction.start()))?;
        let right_idx = exon_containing(&chain, chrom, junction.end()).ok_or_else(|| missing(junction.end()))?;

        let left_interval = chain[left_idx]
            .interval
            .with_end(junction.start())
            .ok_or_else(|| missing(junction.start()))?;
        let right_interval = chain[right_idx]
            .interval
            .with_start(junction.end())
            .ok_or_else(|| missing(junction.end()))?;

        let left = reshape(&chain[left_idx], left_interval);
        let right = reshape(&chain[right_idx], right_interval);

        // Everything between the two pieces is skipped by the new junction.
        let superseded = left.interval.hull(&right.interval);
        let mut exons: Vec<ExonRecord> = chain
            .into_iter()
            .filter(|e| !e.interval.overlaps(&superseded))
            .collect();
        exons.push(left);
        exons.push(right);

        Ok(exons)
    }
}
