//! Grafting of alternative junctions into annotated transcripts.
//!
//! Stages, each producing new collections from the previous one:
//! direction classification, junction pairing, splicing, and duplicate
//! collapsing.

pub mod boundary;
pub mod collapse;
pub mod direction;
pub mod pairs;
pub mod splice;
pub mod terminal;

use log::info;
use rayon::prelude::*;

use crate::annotation::Annotation;
use crate::config::Config;
use crate::types::{Event, EventClass, Junction, JunctionPair, TranscriptModel};

pub use boundary::BoundaryEvent;
pub use collapse::collapse_duplicates;
pub use direction::search_direction;
pub use pairs::find_junction_pairs;
pub use splice::{splice_junction_pairs, GraftStrategy};
pub use terminal::TerminalExonEvent;

/// Result of grafting a batch of events.
#[derive(Debug, Clone, Default)]
pub struct GraftOutput {
    pub pairs: Vec<JunctionPair>,
    pub transcripts: Vec<TranscriptModel>,
}

/// Pair and splice the events of one class.
pub fn graft_class(
    class: EventClass,
    events: &[Event],
    junctions: &[Junction],
    annotation: &Annotation,
    config: &Config,
) -> GraftOutput {
    let pairs = find_junction_pairs(events.iter().filter(|e| e.class == class), junctions, config);
    let transcripts = splice_junction_pairs(&pairs, annotation, config);
    GraftOutput { pairs, transcripts }
}

/// Run the full chain over a batch of events.
///
/// Classes are processed in parallel and concatenated in `EventClass::ALL`
/// order; duplicates are collapsed across the whole batch when enabled.
pub fn graft_events(
    events: &[Event],
    junctions: &[Junction],
    annotation: &Annotation,
    config: &Config,
) -> GraftOutput {
    let per_class: Vec<GraftOutput> = EventClass::ALL
        .par_iter()
        .map(|&class| graft_class(class, events, junctions, annotation, config))
        .collect();

    let mut output = GraftOutput::default();
    for (class, class_output) in EventClass::ALL.iter().zip(per_class) {
        info!(
            "{}: {} junction pairs, {} transcripts",
            class,
            class_output.pairs.len(),
            class_output.transcripts.len()
        );
        output.pairs.extend(class_output.pairs);
        output.transcripts.extend(class_output.transcripts);
    }

    if config.collapse_duplicates {
        let before = output.transcripts.len();
        output.transcripts = collapse_duplicates(output.transcripts);
        info!(
            "Collapsed {} structurally identical transcripts",
            before - output.transcripts.len()
        );
    }

    output
}
