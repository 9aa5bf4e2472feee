//! Configuration and defaults for isograft.
//!
//! This module contains the configuration structure and default values
//! that control junction pairing and transcript grafting.

use crate::types::{EventClass, Side};

/// Junctions at or below this width are treated as coordinate noise.
pub const DEFAULT_MIN_JUNCTION_WIDTH: i64 = 2;

/// Separator placed between the parts of a composite transcript id.
pub const DEFAULT_ID_SEPARATOR: &str = "+";

/// Configuration for the grafting process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Junctions must be strictly wider than this.
    pub min_junction_width: i64,
    /// Separator for composite transcript ids.
    pub id_separator: String,
    /// Remove grafted transcripts that repeat another's exon structure.
    pub collapse_duplicates: bool,
    /// GTF tag for gene ID.
    pub gene_id_tag: String,
    /// GTF tag for transcript ID.
    pub transcript_id_tag: String,
    /// Worker threads, 0 = one per CPU.
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_junction_width: DEFAULT_MIN_JUNCTION_WIDTH,
            id_separator: DEFAULT_ID_SEPARATOR.to_string(),
            collapse_duplicates: true,
            gene_id_tag: "gene_id".to_string(),
            transcript_id_tag: "transcript_id".to_string(),
            threads: 0,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum junction width. Negative values are ignored.
    pub fn set_min_junction_width(&mut self, width: i64) {
        if width >= 0 {
            self.min_junction_width = width;
        }
    }

    /// Resolved worker thread count.
    pub fn num_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    /// Build a composite transcript id: base, class, side and event joined
    /// by the separator, plus the junction id when one base transcript has to
    /// carry several competing junctions for the same event side.
    pub fn composite_id(
        &self,
        base_id: &str,
        class: EventClass,
        side: Side,
        event_id: &str,
        junction_id: Option<&str>,
    ) -> String {
        let sep = &self.id_separator;
        let mut id = format!(
            "{base_id}{sep}{}{sep}{}{sep}{event_id}",
            class.as_str(),
            side.as_str()
        );
        if let Some(junction_id) = junction_id {
            id.push_str(sep);
            id.push_str(junction_id);
        }
        id
    }
}
