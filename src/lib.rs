//! isograft - Alternative-splicing isoform reconstruction library.
//!
//! This library grafts alternative splice junctions detected for splicing
//! events into annotated transcripts, producing one composite transcript per
//! (base transcript, event, side) and collapsing structural duplicates.
//!
//! # Features
//!
//! - Parse GTF annotations, event tables and junction tables (with gzip support)
//! - Classify events into left/right junction search directions
//! - Pair every event with its reference (X) and alternative (Y) junctions
//! - Splice junctions into compatible transcripts for alternative
//!   acceptor/donor and first/last exon events
//! - Collapse transcripts with identical exon structures
//!
//! # Example
//!
//! ```ignore
//! use isograft::annotation::Annotation;
//! use isograft::config::Config;
//! use isograft::graft::graft_events;
//! use isograft::parser::{parse_annotation, parse_events, parse_junctions};
//! use isograft::types::JunctionFormat;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let annotation = Annotation::new(parse_annotation(
//!     Path::new("annotation.gtf"),
//!     &config.gene_id_tag,
//!     &config.transcript_id_tag,
//! )?);
//! let events = parse_events(Path::new("events.tsv"))?;
//! let junctions = parse_junctions(Path::new("junctions.tsv"), JunctionFormat::Simple)?;
//!
//! let output = graft_events(&events, &junctions, &annotation, &config);
//! ```

pub mod annotation;
pub mod config;
pub mod error;
pub mod graft;
pub mod output;
pub mod parser;
pub mod types;

pub use annotation::Annotation;
pub use config::Config;
pub use error::GraftError;
pub use graft::{graft_events, GraftOutput};
pub use types::{
    Event, EventClass, ExonRecord, GenomicInterval, Junction, JunctionPair, SearchDirection, Side,
    Strand, TranscriptModel,
};
