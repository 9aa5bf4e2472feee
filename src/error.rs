//! Per-item grafting failures.
//!
//! None of these abort a batch. The stage that hits one logs it at debug
//! level and leaves the affected event, side or composite out of its result.

use thiserror::Error;

use crate::types::Side;

/// Reason an event, side or composite transcript was left out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraftError {
    /// An event boundary matched no junction endpoint.
    #[error("event {event_id}: anchor {anchor} matches no junction endpoint")]
    UnmatchedAnchor { event_id: String, anchor: i64 },

    /// A break point lies in no annotated exon.
    #[error("event {event_id} side {side}: break point {breakpoint} overlaps no annotated exon")]
    NoCompatibleTranscript {
        event_id: String,
        side: Side,
        breakpoint: i64,
    },

    /// Several junctions compete for one side. Informational only: each
    /// competitor gets its own composite transcript.
    #[error("event {event_id} side {side}: {count} competing junctions")]
    CompetingAlternatives {
        event_id: String,
        side: Side,
        count: usize,
    },

    #[error("event {event_id}: junction {junction_id} of width {width} is not a real intron")]
    DegenerateJunction {
        event_id: String,
        junction_id: String,
        width: i64,
    },

    #[error("transcript {dropped} repeats the exon structure of {kept}")]
    StructuralDuplicate { dropped: String, kept: String },

    /// No exon of the base transcript spans one end of the junction.
    #[error("composite {composite_id}: no exon spans junction boundary {position}")]
    MissingTruncation { composite_id: String, position: i64 },

    /// The synthesized terminal exon is inverted, or is an alternative exon
    /// without annotated support that overlaps the reference terminal exon.
    #[error("composite {composite_id}: synthesized terminal exon {start}-{end} is not a valid alternative")]
    InvalidTerminalExon {
        composite_id: String,
        start: i64,
        end: i64,
    },

    #[error("composite {composite_id}: grafted exon chain has overlapping exons")]
    OverlappingExons { composite_id: String },

    #[error("composite {composite_id}: base transcript {base_id} is not in the annotation")]
    UnknownTranscript {
        composite_id: String,
        base_id: String,
    },
}
