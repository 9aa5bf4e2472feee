//! Junction pair finding.
//!
//! Collapses each event to anchor coordinates and matches them against the
//! junction set by exact endpoint equality, producing the reference (`X`)
//! and alternative (`Y`) junctions of every event.

use ahash::AHashMap;
use log::debug;

use crate::config::Config;
use crate::error::GraftError;
use crate::graft::direction::split_by_direction;
use crate::types::{Event, GenomicInterval, Junction, JunctionPair, SearchDirection, Side, Strand};

/// One end of a junction interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionEnd {
    /// Last base of the exon on the left.
    Start,
    /// First base of the exon on the right.
    End,
}

impl JunctionEnd {
    /// The end an event with this search direction is anchored on.
    pub fn for_direction(direction: SearchDirection) -> Self {
        match direction {
            SearchDirection::Right => JunctionEnd::Start,
            SearchDirection::Left => JunctionEnd::End,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            JunctionEnd::Start => JunctionEnd::End,
            JunctionEnd::End => JunctionEnd::Start,
        }
    }

    pub fn coordinate(self, interval: &GenomicInterval) -> i64 {
        match self {
            JunctionEnd::Start => interval.start(),
            JunctionEnd::End => interval.end(),
        }
    }
}

type PositionTable = AHashMap<String, AHashMap<i64, Vec<usize>>>;

/// Junctions indexed by chromosome and by each endpoint coordinate.
struct JunctionIndex<'a> {
    junctions: &'a [Junction],
    by_start: PositionTable,
    by_end: PositionTable,
}

impl<'a> JunctionIndex<'a> {
    fn new(junctions: &'a [Junction]) -> Self {
        let mut by_start: PositionTable = AHashMap::new();
        let mut by_end: PositionTable = AHashMap::new();

        for (i, junction) in junctions.iter().enumerate() {
            let chrom = junction.interval.chrom();
            by_start
                .entry(chrom.to_string())
                .or_default()
                .entry(junction.interval.start())
                .or_default()
                .push(i);
            by_end
                .entry(chrom.to_string())
                .or_default()
                .entry(junction.interval.end())
                .or_default()
                .push(i);
        }

        JunctionIndex {
            junctions,
            by_start,
            by_end,
        }
    }

    /// Junctions whose `end` lies exactly at `pos`, strand compatible.
    fn at(&self, chrom: &str, pos: i64, end: JunctionEnd, strand: Strand) -> Vec<&'a Junction> {
        let junctions = self.junctions;
        let table = match end {
            JunctionEnd::Start => &self.by_start,
            JunctionEnd::End => &self.by_end,
        };

        table
            .get(chrom)
            .and_then(|positions| positions.get(&pos))
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &junctions[i])
                    .filter(|j| j.interval.strand().is_compatible_with(strand))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Anchor coordinate of an event: the boundary of its variable region on the
/// side its search direction points to.
pub fn anchor_coordinate(event: &Event) -> i64 {
    match event.search_direction {
        SearchDirection::Right => event.interval.end(),
        SearchDirection::Left => event.interval.start(),
    }
}

/// The fixed boundary just outside the other end of the variable region.
/// Only meaningful for alternative acceptor/donor events.
pub fn opposite_anchor_coordinate(event: &Event) -> i64 {
    match event.search_direction {
        SearchDirection::Right => event.interval.start() - 1,
        SearchDirection::Left => event.interval.end() + 1,
    }
}

/// Find the X/Y junction pairs for a batch of events.
///
/// Right-searching events are processed before left-searching ones. Events
/// that cannot be paired are logged and left out.
pub fn find_junction_pairs<'a, I>(events: I, junctions: &[Junction], config: &Config) -> Vec<JunctionPair>
where
    I: IntoIterator<Item = &'a Event>,
{
    let index = JunctionIndex::new(junctions);
    let (right, left) = split_by_direction(events);

    let mut pairs = Vec::new();
    for event in right.into_iter().chain(left) {
        match pairs_for_event(event, &index, config) {
            Ok(found) => pairs.extend(found),
            Err(err) => debug!("{}", err),
        }
    }
    pairs
}

fn pairs_for_event(
    event: &Event,
    index: &JunctionIndex<'_>,
    config: &Config,
) -> Result<Vec<JunctionPair>, GraftError> {
    let chrom = event.interval.chrom();
    let strand = event.strand();
    let end = JunctionEnd::for_direction(event.search_direction);

    let anchor = anchor_coordinate(event);
    let set_a = index.at(chrom, anchor, end, strand);
    if set_a.is_empty() {
        return Err(GraftError::UnmatchedAnchor {
            event_id: event.id.clone(),
            anchor,
        });
    }

    let (x, y) = if event.class.is_terminal() {
        let set_c = alternative_terminal_junctions(&set_a, index, end, strand);
        if set_c.is_empty() {
            return Err(GraftError::UnmatchedAnchor {
                event_id: event.id.clone(),
                anchor: end.opposite().coordinate(&set_a[0].interval),
            });
        }
        (set_a, set_c)
    } else {
        let opposite = opposite_anchor_coordinate(event);
        let set_b = index.at(chrom, opposite, end, strand);
        if set_b.is_empty() {
            return Err(GraftError::UnmatchedAnchor {
                event_id: event.id.clone(),
                anchor: opposite,
            });
        }
        if strand == Strand::Negative {
            (set_b, set_a)
        } else {
            (set_a, set_b)
        }
    };

    let x = eligible_junctions(event, x, config);
    let y = eligible_junctions(event, y, config);
    if x.is_empty() || y.is_empty() {
        debug!("Event {} has no eligible junction on one side", event.id);
        return Ok(Vec::new());
    }

    for (side, found) in [(Side::X, &x), (Side::Y, &y)] {
        if found.len() > 1 {
            debug!(
                "{}",
                GraftError::CompetingAlternatives {
                    event_id: event.id.clone(),
                    side,
                    count: found.len(),
                }
            );
        }
    }

    let pairs = x
        .into_iter()
        .map(|j| (j, Side::X))
        .chain(y.into_iter().map(|j| (j, Side::Y)))
        .map(|(junction, side)| JunctionPair {
            event_id: event.id.clone(),
            event_class: event.class,
            event_interval: event.interval.clone(),
            junction: junction.clone(),
            side,
            search_direction: event.search_direction,
        })
        .collect();

    Ok(pairs)
}

/// Junctions sharing the internal-exon endpoint of a set-A junction: the
/// ones leading to the competing terminal exons.
fn alternative_terminal_junctions<'a>(
    set_a: &[&'a Junction],
    index: &JunctionIndex<'a>,
    anchored: JunctionEnd,
    strand: Strand,
) -> Vec<&'a Junction> {
    let shared_end = anchored.opposite();
    let mut set_c: Vec<&'a Junction> = Vec::new();

    for reference in set_a {
        let shared = shared_end.coordinate(&reference.interval);
        for candidate in index.at(reference.interval.chrom(), shared, shared_end, strand) {
            if !same_gene(reference, candidate) {
                continue;
            }
            let already_known = set_a
                .iter()
                .chain(set_c.iter())
                .any(|known| known.interval.same_span(&candidate.interval));
            if !already_known {
                set_c.push(candidate);
            }
        }
    }

    set_c
}

fn same_gene(a: &Junction, b: &Junction) -> bool {
    let unknown = |g: &str| g.is_empty() || g == ".";
    unknown(&a.gene_id) || unknown(&b.gene_id) || a.gene_id == b.gene_id
}

/// Drop degenerate junctions and structural repeats (first occurrence wins).
fn eligible_junctions<'a>(event: &Event, junctions: Vec<&'a Junction>, config: &Config) -> Vec<&'a Junction> {
    let mut kept: Vec<&'a Junction> = Vec::with_capacity(junctions.len());

    for junction in junctions {
        if !junction.is_eligible(config.min_junction_width) {
            debug!(
                "{}",
                GraftError::DegenerateJunction {
                    event_id: event.id.clone(),
                    junction_id: junction.id.clone(),
                    width: junction.width(),
                }
            );
            continue;
        }
        if kept.iter().any(|k| k.interval.same_span(&junction.interval)) {
            continue;
        }
        kept.push(junction);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventClass;

    fn junction(id: &str, start: i64, end: i64, strand: Strand) -> Junction {
        Junction::new(id, GenomicInterval::new("chr1", start, end, strand), "G1")
    }

    fn event(id: &str, class: EventClass, start: i64, end: i64, strand: Strand) -> Event {
        Event::new(id, class, GenomicInterval::new("chr1", start, end, strand))
    }

    fn sides(pairs: &[JunctionPair]) -> Vec<(&str, Side)> {
        pairs.iter().map(|p| (p.junction.id.as_str(), p.side)).collect()
    }

    #[test]
    fn test_acceptor_positive_strand() {
        let junctions = vec![
            junction("J1", 900, 1000, Strand::Positive),
            junction("J2", 900, 1050, Strand::Positive),
        ];
        let events = vec![event("E1", EventClass::AltAcceptor, 1000, 1049, Strand::Positive)];

        let pairs = find_junction_pairs(&events, &junctions, &Config::default());

        assert_eq!(sides(&pairs), vec![("J1", Side::X), ("J2", Side::Y)]);
        assert!(pairs.iter().all(|p| p.search_direction == SearchDirection::Left));
    }

    #[test]
    fn test_acceptor_negative_strand_swaps_labels() {
        // Acceptor on minus strand sits at the junction start.
        let junctions = vec![
            junction("Jlong", 1049, 1200, Strand::Negative),
            junction("Jshort", 999, 1200, Strand::Negative),
        ];
        let events = vec![event("E1", EventClass::AltAcceptor, 1000, 1049, Strand::Negative)];

        let pairs = find_junction_pairs(&events, &junctions, &Config::default());

        // Set A (anchor at 1049) is Y on the minus strand, set B is X.
        assert_eq!(sides(&pairs), vec![("Jshort", Side::X), ("Jlong", Side::Y)]);
    }

    #[test]
    fn test_donor_positive_strand() {
        let junctions = vec![
            junction("Jlong", 250, 500, Strand::Positive),
            junction("Jshort", 200, 500, Strand::Positive),
        ];
        let events = vec![event("E1", EventClass::AltDonor, 201, 250, Strand::Positive)];

        let pairs = find_junction_pairs(&events, &junctions, &Config::default());

        assert_eq!(sides(&pairs), vec![("Jlong", Side::X), ("Jshort", Side::Y)]);
        assert!(pairs.iter().all(|p| p.search_direction == SearchDirection::Right));
    }

    #[test]
    fn test_competing_junctions_are_not_collapsed() {
        let junctions = vec![
            junction("J1", 900, 1000, Strand::Positive),
            junction("J2", 800, 1000, Strand::Positive),
            junction("J3", 900, 1050, Strand::Positive),
        ];
        let events = vec![event("E1", EventClass::AltAcceptor, 1000, 1049, Strand::Positive)];

        let pairs = find_junction_pairs(&events, &junctions, &Config::default());

        let x: Vec<&str> = pairs
            .iter()
            .filter(|p| p.side == Side::X)
            .map(|p| p.junction.id.as_str())
            .collect();
        assert_eq!(x, vec!["J1", "J2"]);
    }

    #[test]
    fn test_structural_repeats_yield_one_pair() {
        let junctions = vec![
            junction("J1", 900, 1000, Strand::Positive),
            junction("J1dup", 900, 1000, Strand::Unknown),
            junction("J2", 900, 1050, Strand::Positive),
        ];
        let events = vec![event("E1", EventClass::AltAcceptor, 1000, 1049, Strand::Positive)];

        let pairs = find_junction_pairs(&events, &junctions, &Config::default());
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_degenerate_junctions_are_discarded() {
        let junctions = vec![
            junction("J1", 900, 1000, Strand::Positive),
            junction("Jnoise", 1049, 1050, Strand::Positive),
        ];
        let events = vec![event("E1", EventClass::AltAcceptor, 1000, 1049, Strand::Positive)];

        let pairs = find_junction_pairs(&events, &junctions, &Config::default());
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_unmatched_anchor_produces_nothing() {
        let junctions = vec![junction("J1", 900, 1000, Strand::Positive)];
        let events = vec![event("E1", EventClass::AltAcceptor, 2000, 2049, Strand::Positive)];

        assert!(find_junction_pairs(&events, &junctions, &Config::default()).is_empty());
    }

    #[test]
    fn test_strand_mismatch_is_ignored() {
        let junctions = vec![
            junction("J1", 900, 1000, Strand::Negative),
            junction("J2", 900, 1050, Strand::Negative),
        ];
        let events = vec![event("E1", EventClass::AltAcceptor, 1000, 1049, Strand::Positive)];

        assert!(find_junction_pairs(&events, &junctions, &Config::default()).is_empty());
    }

    #[test]
    fn test_first_exon_finds_competing_first_exons() {
        let junctions = vec![
            junction("Jref", 200, 500, Strand::Positive),
            junction("Jalt", 350, 500, Strand::Positive),
            junction("Jother", 600, 800, Strand::Positive),
        ];
        let events = vec![event("E1", EventClass::AltFirstExon, 100, 200, Strand::Positive)];

        let pairs = find_junction_pairs(&events, &junctions, &Config::default());

        assert_eq!(sides(&pairs), vec![("Jref", Side::X), ("Jalt", Side::Y)]);
    }

    #[test]
    fn test_last_exon_minus_strand() {
        // Last exon on minus strand is the leftmost one, anchored at its end.
        let junctions = vec![
            junction("Jref", 200, 500, Strand::Negative),
            junction("Jalt", 300, 500, Strand::Negative),
        ];
        let events = vec![event("E1", EventClass::AltLastExon, 100, 200, Strand::Negative)];

        let pairs = find_junction_pairs(&events, &junctions, &Config::default());

        assert_eq!(sides(&pairs), vec![("Jref", Side::X), ("Jalt", Side::Y)]);
        assert!(pairs.iter().all(|p| p.search_direction == SearchDirection::Right));
    }

    #[test]
    fn test_terminal_alternatives_stay_within_gene() {
        let junctions = vec![
            Junction::new("Jref", GenomicInterval::new("chr1", 200, 500, Strand::Positive), "G1"),
            Junction::new("Jalt", GenomicInterval::new("chr1", 350, 500, Strand::Positive), "G2"),
        ];
        let events = vec![event("E1", EventClass::AltFirstExon, 100, 200, Strand::Positive)];

        assert!(find_junction_pairs(&events, &junctions, &Config::default()).is_empty());
    }
}
