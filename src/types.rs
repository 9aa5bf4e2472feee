//! Core data structures for isograft.
//!
//! This module contains the value types shared by every grafting stage:
//! genomic intervals, splicing events, junctions and the exon/transcript
//! records that are read from the annotation and produced by the splicer.
//!
//! Coordinates are 1-based and inclusive throughout.

use std::fmt;
use std::str::FromStr;

/// Strand orientation for genomic features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Positive,
    Negative,
    Unknown,
}

/// Error type for parsing strand from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrandError;

impl fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid strand: expected '+', '-' or '.'")
    }
}

impl std::error::Error for ParseStrandError {}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Positive),
            "-" => Ok(Strand::Negative),
            "." => Ok(Strand::Unknown),
            _ => Err(ParseStrandError),
        }
    }
}

impl Strand {
    /// Convert strand to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
            Strand::Unknown => ".",
        }
    }

    /// Unknown is compatible with either orientation.
    pub fn is_compatible_with(self, other: Strand) -> bool {
        self == Strand::Unknown || other == Strand::Unknown || self == other
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable genomic interval.
///
/// Fields are private so an interval can only change by building a new one;
/// `with_start`, `with_end` and `hull` all return fresh values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicInterval {
    chrom: String,
    start: i64,
    end: i64,
    strand: Strand,
}

impl GenomicInterval {
    /// Create a new interval. Coordinates may be given in either order.
    pub fn new(chrom: impl Into<String>, start: i64, end: i64, strand: Strand) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        GenomicInterval {
            chrom: chrom.into(),
            start,
            end,
            strand,
        }
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Number of bases covered (end - start + 1).
    pub fn width(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Structural equality: same chromosome and same coordinates.
    ///
    /// Strand is ignored, which lets an unstranded junction table match a
    /// stranded annotation.
    pub fn same_span(&self, other: &GenomicInterval) -> bool {
        self.chrom == other.chrom && self.start == other.start && self.end == other.end
    }

    /// Check whether two intervals share at least one base.
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.chrom == other.chrom
            && self.strand.is_compatible_with(other.strand)
            && self.start <= other.end
            && other.start <= self.end
    }

    /// Check whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &GenomicInterval) -> bool {
        self.chrom == other.chrom
            && self.strand.is_compatible_with(other.strand)
            && self.start <= other.start
            && other.end <= self.end
    }

    pub fn contains_pos(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Same interval with a new start, or `None` if it would invert.
    pub fn with_start(&self, start: i64) -> Option<Self> {
        (start <= self.end).then(|| GenomicInterval {
            start,
            ..self.clone()
        })
    }

    /// Same interval with a new end, or `None` if it would invert.
    pub fn with_end(&self, end: i64) -> Option<Self> {
        (self.start <= end).then(|| GenomicInterval {
            end,
            ..self.clone()
        })
    }

    /// Smallest interval covering both `self` and `other`.
    pub fn hull(&self, other: &GenomicInterval) -> Self {
        GenomicInterval::new(
            self.chrom.clone(),
            self.start.min(other.start),
            self.end.max(other.end),
            self.strand,
        )
    }

    /// Location string (chrom:start-end).
    pub fn id(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.start, self.end)
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}({})", self.chrom, self.start, self.end, self.strand)
    }
}

/// Alternative-splicing event classes handled by the grafting stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventClass {
    AltAcceptor,
    AltDonor,
    AltFirstExon,
    AltLastExon,
}

/// Error type for parsing an event class from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventClassError;

impl fmt::Display for ParseEventClassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid event class: expected AltAcceptor (A3), AltDonor (A5), AltFirstExon (AF) or AltLastExon (AL)"
        )
    }
}

impl std::error::Error for ParseEventClassError {}

impl FromStr for EventClass {
    type Err = ParseEventClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AltAcceptor" | "A3" | "A3SS" => Ok(EventClass::AltAcceptor),
            "AltDonor" | "A5" | "A5SS" => Ok(EventClass::AltDonor),
            "AltFirstExon" | "AF" => Ok(EventClass::AltFirstExon),
            "AltLastExon" | "AL" => Ok(EventClass::AltLastExon),
            _ => Err(ParseEventClassError),
        }
    }
}

impl EventClass {
    /// Every class, in the order their results are concatenated.
    pub const ALL: [EventClass; 4] = [
        EventClass::AltAcceptor,
        EventClass::AltDonor,
        EventClass::AltFirstExon,
        EventClass::AltLastExon,
    ];

    /// Convert event class to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventClass::AltAcceptor => "AltAcceptor",
            EventClass::AltDonor => "AltDonor",
            EventClass::AltFirstExon => "AltFirstExon",
            EventClass::AltLastExon => "AltLastExon",
        }
    }

    /// First/last exon events replace a terminal exon; the others move an
    /// internal splice site.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventClass::AltFirstExon | EventClass::AltLastExon)
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which end of a junction carries the alternative boundary of an event.
///
/// `Left` matches against the junction end (first base of the exon on the
/// right), `Right` against the junction start (last base of the exon on the
/// left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchDirection {
    Left,
    Right,
}

impl SearchDirection {
    /// Direction for an event class on a strand.
    ///
    /// `Left` for acceptor/+, donor/-, first exon/- and last exon/+; `Right`
    /// otherwise, including every class on an unknown strand.
    pub fn for_event(class: EventClass, strand: Strand) -> Self {
        match (class, strand) {
            (EventClass::AltAcceptor, Strand::Positive)
            | (EventClass::AltDonor, Strand::Negative)
            | (EventClass::AltFirstExon, Strand::Negative)
            | (EventClass::AltLastExon, Strand::Positive) => SearchDirection::Left,
            _ => SearchDirection::Right,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDirection::Left => "left",
            SearchDirection::Right => "right",
        }
    }
}

impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Side of an event: `X` is the reference junction/exon, `Y` the alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    X,
    Y,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::X => "X",
            Side::Y => "Y",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A detected alternative-splicing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub class: EventClass,
    /// Variable region of the event; carries the event strand.
    pub interval: GenomicInterval,
    pub search_direction: SearchDirection,
}

impl Event {
    /// Create an event, deriving its search direction from class and strand.
    pub fn new(id: impl Into<String>, class: EventClass, interval: GenomicInterval) -> Self {
        let search_direction = SearchDirection::for_event(class, interval.strand());
        Event {
            id: id.into(),
            class,
            interval,
            search_direction,
        }
    }

    pub fn strand(&self) -> Strand {
        self.interval.strand()
    }
}

/// A splice junction.
///
/// The interval runs from the last base of the left exon to the first base of
/// the right exon, so its width is the intron length plus two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junction {
    pub id: String,
    pub interval: GenomicInterval,
    pub gene_id: String,
}

impl Junction {
    pub fn new(id: impl Into<String>, interval: GenomicInterval, gene_id: impl Into<String>) -> Self {
        Junction {
            id: id.into(),
            interval,
            gene_id: gene_id.into(),
        }
    }

    pub fn width(&self) -> i64 {
        self.interval.width()
    }

    /// Narrower junctions are coordinate noise rather than real introns.
    pub fn is_eligible(&self, min_width: i64) -> bool {
        self.width() > min_width
    }
}

/// An event matched to one of its junctions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunctionPair {
    pub event_id: String,
    pub event_class: EventClass,
    /// Variable region of the originating event.
    pub event_interval: GenomicInterval,
    pub junction: Junction,
    pub side: Side,
    pub search_direction: SearchDirection,
}

/// One exon of an annotated or grafted transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonRecord {
    pub interval: GenomicInterval,
    pub gene_id: String,
    pub transcript_id: String,
    /// Position in transcription order, starting at 1.
    pub exon_number: u32,
    pub transcript_type: String,
    pub exon_id: String,
}

impl ExonRecord {
    /// Create a new exon record.
    pub fn new(
        interval: GenomicInterval,
        gene_id: impl Into<String>,
        transcript_id: impl Into<String>,
        exon_number: u32,
        transcript_type: impl Into<String>,
        exon_id: impl Into<String>,
    ) -> Self {
        ExonRecord {
            interval,
            gene_id: gene_id.into(),
            transcript_id: transcript_id.into(),
            exon_number,
            transcript_type: transcript_type.into(),
            exon_id: exon_id.into(),
        }
    }

    /// Get exon length.
    pub fn length(&self) -> i64 {
        self.interval.width()
    }
}

/// Provenance of a grafted transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub base_id: String,
    pub event_id: String,
    pub event_class: EventClass,
    pub side: Side,
    pub junction_id: String,
}

/// A transcript: exon records sharing a transcript id, ordered by start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptModel {
    pub transcript_id: String,
    pub exons: Vec<ExonRecord>,
    /// Set on transcripts produced by the splicer.
    pub origin: Option<Origin>,
}

impl TranscriptModel {
    /// Create a new transcript with the given ID.
    pub fn new(transcript_id: impl Into<String>) -> Self {
        TranscriptModel {
            transcript_id: transcript_id.into(),
            exons: Vec::new(),
            origin: None,
        }
    }

    /// Add an exon to this transcript.
    pub fn add_exon(&mut self, exon: ExonRecord) {
        self.exons.push(exon);
    }

    /// Strand of the first exon, `Unknown` for an empty transcript.
    pub fn strand(&self) -> Strand {
        self.exons
            .first()
            .map(|e| e.interval.strand())
            .unwrap_or(Strand::Unknown)
    }

    pub fn chrom(&self) -> Option<&str> {
        self.exons.first().map(|e| e.interval.chrom())
    }

    /// Minimum exon start.
    pub fn start(&self) -> Option<i64> {
        self.exons.iter().map(|e| e.interval.start()).min()
    }

    /// Maximum exon end.
    pub fn end(&self) -> Option<i64> {
        self.exons.iter().map(|e| e.interval.end()).max()
    }

    /// Sort exons by genomic start.
    pub fn sort_exons(&mut self) {
        self.exons.sort_by_key(|e| (e.interval.start(), e.interval.end()));
    }

    /// Renumber exons based on strand orientation.
    ///
    /// Sorts exons by position and assigns exon numbers.
    /// For positive (and unknown) strand: ascending order (1, 2, 3...).
    /// For negative strand: descending order (N, N-1, ...).
    pub fn renumber_exons(&mut self) {
        self.sort_exons();

        let n_exons = self.exons.len() as u32;
        let strand = self.strand();

        for (i, exon) in self.exons.iter_mut().enumerate() {
            let i = i as u32;
            exon.exon_number = match strand {
                Strand::Negative => n_exons - i,
                Strand::Positive | Strand::Unknown => i + 1,
            };
        }
    }

    /// True when the exon numbers (in start order) run 1..k in transcription
    /// order without gaps or repeats.
    pub fn has_contiguous_numbering(&self) -> bool {
        let n = self.exons.len() as u32;
        let mut sorted: Vec<&ExonRecord> = self.exons.iter().collect();
        sorted.sort_by_key(|e| e.interval.start());
        match self.strand() {
            Strand::Negative => sorted
                .iter()
                .enumerate()
                .all(|(i, e)| e.exon_number == n - i as u32),
            Strand::Positive | Strand::Unknown => sorted
                .iter()
                .enumerate()
                .all(|(i, e)| e.exon_number == i as u32 + 1),
        }
    }

    /// True if any two exons share a base.
    pub fn has_overlapping_exons(&self) -> bool {
        let mut spans: Vec<(i64, i64)> = self
            .exons
            .iter()
            .map(|e| (e.interval.start(), e.interval.end()))
            .collect();
        spans.sort_unstable();
        spans.windows(2).any(|w| w[1].0 <= w[0].1)
    }

    /// Ordered (start, end) pairs of the exons: the structural signature.
    pub fn signature(&self) -> Vec<(i64, i64)> {
        let mut spans: Vec<(i64, i64)> = self
            .exons
            .iter()
            .map(|e| (e.interval.start(), e.interval.end()))
            .collect();
        spans.sort_unstable();
        spans
    }
}

/// Input layout of a junction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionFormat {
    /// chrom, start, end, strand, [id, [gene]] in this crate's convention.
    Simple,
    /// STAR `SJ.out.tab`: intron first/last base and numeric strand.
    Star,
}

/// Error type for parsing a junction format from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJunctionFormatError;

impl fmt::Display for ParseJunctionFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid junction format: expected 'simple' or 'star'")
    }
}

impl std::error::Error for ParseJunctionFormatError {}

impl FromStr for JunctionFormat {
    type Err = ParseJunctionFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(JunctionFormat::Simple),
            "star" => Ok(JunctionFormat::Star),
            _ => Err(ParseJunctionFormatError),
        }
    }
}
