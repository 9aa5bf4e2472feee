//! Parsers for annotation, event and junction tables.

pub mod events;
pub mod gtf;
pub mod junctions;
pub mod util;

pub use events::{parse_events, parse_events_reader};
pub use gtf::{parse_annotation, parse_annotation_reader};
pub use junctions::{parse_junctions, parse_junctions_reader};
