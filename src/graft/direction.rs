//! Event coordinate classification.
//!
//! Decides, per event, which end of a junction carries the alternative
//! splice site. Later stages use the direction to pick the anchor coordinate
//! of the event and the break point of each junction.

use crate::types::{Event, EventClass, SearchDirection, Strand};

/// Search direction for an event class on a strand.
///
/// `Left` for acceptor/+, donor/-, first exon/- and last exon/+; `Right`
/// otherwise, including every class on an unknown strand. `Event::new`
/// stores the same value on every event.
pub fn search_direction(class: EventClass, strand: Strand) -> SearchDirection {
    SearchDirection::for_event(class, strand)
}

/// Split events into (right-searching, left-searching) groups, keeping input
/// order inside each group.
pub fn split_by_direction<'a, I>(events: I) -> (Vec<&'a Event>, Vec<&'a Event>)
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .partition(|e| e.search_direction == SearchDirection::Right)
}
