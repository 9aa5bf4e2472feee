//! Splicing event table parser.
//!
//! Columns: event_id, class, chrom, start, end, strand. Lines whose
//! coordinates do not parse are taken as headers and skipped.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;

use crate::parser::util::{is_skippable, open_input};
use crate::types::{Event, EventClass, GenomicInterval, Strand};

/// Parse an event table (supports .gz).
pub fn parse_events(path: &Path) -> Result<Vec<Event>> {
    let reader = open_input(path, "event")?;
    parse_events_reader(reader)
}

/// Parse events from a reader, keeping file order.
pub fn parse_events_reader<R: BufRead>(reader: R) -> Result<Vec<Event>> {
    let mut events = Vec::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result.context("Failed to read event line")?;
        if is_skippable(&line) {
            continue;
        }

        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() < 6 {
            continue;
        }

        // Header lines
        let (start, end) = match (fields[3].parse::<i64>(), fields[4].parse::<i64>()) {
            (Ok(start), Ok(end)) => (start, end),
            _ => continue,
        };

        let class: EventClass = fields[1]
            .parse()
            .with_context(|| format!("Line {}: unknown event class '{}'", line_no + 1, fields[1]))?;
        let strand: Strand = fields[5]
            .parse()
            .with_context(|| format!("Line {}: invalid strand '{}'", line_no + 1, fields[5]))?;

        events.push(Event::new(
            fields[0],
            class,
            GenomicInterval::new(fields[2], start, end, strand),
        ));
    }

    Ok(events)
}
