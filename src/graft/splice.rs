//! Transcript junction splicing: machinery shared by both event families.
//!
//! Each junction pair is collapsed to a break point, the break point is
//! resolved against the annotation to find compatible base transcripts, the
//! exact set of composite transcripts is planned in one grouping pass, and
//! each composite is materialized once by the strategy of its event family.

use ahash::AHashSet;
use indexmap::IndexMap;
use log::debug;
use rayon::prelude::*;

use crate::annotation::Annotation;
use crate::config::Config;
use crate::error::GraftError;
use crate::graft::boundary::BoundaryEvent;
use crate::graft::terminal::TerminalExonEvent;
use crate::types::{EventClass, ExonRecord, GenomicInterval, JunctionPair, Origin, Side, TranscriptModel};

/// The coordinate at which compatible transcripts are looked up for one
/// junction pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// Index of the pair in the slice handed to `compute_breakpoints`.
    pub pair: usize,
    pub position: i64,
}

/// A base transcript scheduled to carry one junction pair.
#[derive(Debug, Clone)]
pub struct Composite<'a> {
    pub id: String,
    pub base_id: &'a str,
    pub pair: &'a JunctionPair,
}

/// How one family of events grafts its junctions into a transcript.
pub trait GraftStrategy: Sync {
    /// Break point of every pair, in pair order.
    fn compute_breakpoints(&self, pairs: &[&JunctionPair]) -> Vec<Breakpoint>;

    /// Build the exon chain of `composite` from its base transcript.
    ///
    /// The returned records carry the composite id; numbering and ordering
    /// are fixed afterwards by the caller.
    fn splice_transcript(
        &self,
        composite: &Composite<'_>,
        base: &TranscriptModel,
        annotation: &Annotation,
    ) -> Result<Vec<ExonRecord>, GraftError>;
}

/// Strategy for an event class.
pub fn strategy_for(class: EventClass) -> &'static dyn GraftStrategy {
    static BOUNDARY: BoundaryEvent = BoundaryEvent;
    static TERMINAL: TerminalExonEvent = TerminalExonEvent;

    if class.is_terminal() {
        &TERMINAL
    } else {
        &BOUNDARY
    }
}

/// Splice all junction pairs into the annotation.
///
/// Events are processed in parallel; the result is sorted by transcript id
/// (exons within a transcript are already ordered by start).
pub fn splice_junction_pairs(
    pairs: &[JunctionPair],
    annotation: &Annotation,
    config: &Config,
) -> Vec<TranscriptModel> {
    let mut by_event: IndexMap<(&str, EventClass), Vec<&JunctionPair>> = IndexMap::new();
    for pair in pairs {
        by_event
            .entry((pair.event_id.as_str(), pair.event_class))
            .or_default()
            .push(pair);
    }
    let events: Vec<(EventClass, Vec<&JunctionPair>)> = by_event
        .into_iter()
        .map(|((_, class), event_pairs)| (class, event_pairs))
        .collect();

    let mut transcripts: Vec<TranscriptModel> = events
        .par_iter()
        .flat_map_iter(|(class, event_pairs)| {
            splice_event(strategy_for(*class), event_pairs, annotation, config)
        })
        .collect();

    transcripts.sort_by(|a, b| a.transcript_id.cmp(&b.transcript_id));
    transcripts
}

/// Splice the pairs of a single event with one strategy.
pub fn splice_event(
    strategy: &dyn GraftStrategy,
    pairs: &[&JunctionPair],
    annotation: &Annotation,
    config: &Config,
) -> Vec<TranscriptModel> {
    let breakpoints = strategy.compute_breakpoints(pairs);
    let compatible = find_compatible(pairs, &breakpoints, annotation);
    let composites = plan_composites(pairs, &compatible, config);

    let mut transcripts = Vec::with_capacity(composites.len());
    for composite in &composites {
        match materialize(strategy, composite, annotation) {
            Ok(transcript) => transcripts.push(transcript),
            Err(err) => debug!("{}", err),
        }
    }
    transcripts
}

/// (pair index, base transcript id) for every annotated exon overlapping a
/// break point. Each combination appears once, in break point order.
pub fn find_compatible<'a>(
    pairs: &[&JunctionPair],
    breakpoints: &[Breakpoint],
    annotation: &'a Annotation,
) -> Vec<(usize, &'a str)> {
    let mut seen: AHashSet<(usize, &str)> = AHashSet::new();
    let mut compatible = Vec::new();

    for bp in breakpoints {
        let pair = pairs[bp.pair];
        let junction = &pair.junction.interval;
        let before = compatible.len();

        for exon in annotation.exons_at(junction.chrom(), bp.position) {
            if !exon.interval.strand().is_compatible_with(junction.strand()) {
                continue;
            }
            let key = (bp.pair, exon.transcript_id.as_str());
            if seen.insert(key) {
                compatible.push(key);
            }
        }

        if compatible.len() == before {
            debug!(
                "{}",
                GraftError::NoCompatibleTranscript {
                    event_id: pair.event_id.clone(),
                    side: pair.side,
                    breakpoint: bp.position,
                }
            );
        }
    }

    compatible
}

/// Plan every composite transcript up front.
///
/// Compatibility pairs are grouped by (side, base transcript). A base that
/// must carry several competing junctions on the same side gets one
/// composite per junction, told apart by the junction id.
pub fn plan_composites<'a>(
    pairs: &[&'a JunctionPair],
    compatible: &[(usize, &'a str)],
    config: &Config,
) -> Vec<Composite<'a>> {
    let mut groups: IndexMap<(Side, &'a str), Vec<usize>> = IndexMap::new();
    for &(pair_idx, base_id) in compatible {
        let indices = groups.entry((pairs[pair_idx].side, base_id)).or_default();
        if !indices.contains(&pair_idx) {
            indices.push(pair_idx);
        }
    }

    let mut composites = Vec::new();
    for ((side, base_id), indices) in groups {
        let competing = indices.len() > 1;
        for pair_idx in indices {
            let pair = pairs[pair_idx];
            let junction_id = competing.then_some(pair.junction.id.as_str());
            composites.push(Composite {
                id: config.composite_id(base_id, pair.event_class, side, &pair.event_id, junction_id),
                base_id,
                pair,
            });
        }
    }
    composites
}

/// Copy a base transcript's exons under a new transcript id.
pub fn duplicate_chain(base: &TranscriptModel, composite_id: &str) -> Vec<ExonRecord> {
    base.exons
        .iter()
        .map(|exon| ExonRecord {
            transcript_id: composite_id.to_string(),
            ..exon.clone()
        })
        .collect()
}

/// Same exon with a new interval. A changed exon gets a location-based id.
pub fn reshape(exon: &ExonRecord, interval: GenomicInterval) -> ExonRecord {
    let exon_id = if interval.same_span(&exon.interval) {
        exon.exon_id.clone()
    } else {
        interval.id()
    };
    ExonRecord {
        interval,
        exon_id,
        ..exon.clone()
    }
}

/// Index of the exon in `chain` containing `pos` on the junction chromosome.
pub fn exon_containing(chain: &[ExonRecord], chrom: &str, pos: i64) -> Option<usize> {
    chain
        .iter()
        .position(|e| e.interval.chrom() == chrom && e.interval.contains_pos(pos))
}

fn materialize(
    strategy: &dyn GraftStrategy,
    composite: &Composite<'_>,
    annotation: &Annotation,
) -> Result<TranscriptModel, GraftError> {
    let base = annotation
        .transcript(composite.base_id)
        .ok_or_else(|| GraftError::UnknownTranscript {
            composite_id: composite.id.clone(),
            base_id: composite.base_id.to_string(),
        })?;

    let exons = strategy.splice_transcript(composite, base, annotation)?;

    let pair = composite.pair;
    let mut transcript = TranscriptModel {
        transcript_id: composite.id.clone(),
        exons,
        origin: Some(Origin {
            base_id: composite.base_id.to_string(),
            event_id: pair.event_id.clone(),
            event_class: pair.event_class,
            side: pair.side,
            junction_id: pair.junction.id.clone(),
        }),
    };

    if transcript.has_overlapping_exons() {
        return Err(GraftError::OverlappingExons {
            composite_id: composite.id.clone(),
        });
    }
    transcript.renumber_exons();

    Ok(transcript)
}
