//! CLI entry point for isograft.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use isograft::annotation::Annotation;
use isograft::config::{Config, DEFAULT_ID_SEPARATOR, DEFAULT_MIN_JUNCTION_WIDTH};
use isograft::graft::graft_events;
use isograft::output::{format_pair_line, write_gtf, write_pairs_header};
use isograft::parser::{parse_annotation, parse_events, parse_junctions};
use isograft::types::JunctionFormat;

/// Alternative-splicing isoform reconstruction.
///
/// Grafts the reference and alternative junctions of each splicing event into
/// compatible annotated transcripts and writes the resulting models as GTF.
#[derive(Parser, Debug)]
#[command(name = "isograft")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GTF annotation file (required)
    #[arg(short = 'g', long = "gtf")]
    gtf: PathBuf,

    /// Splicing event table (required)
    #[arg(short = 'e', long = "events")]
    events: PathBuf,

    /// Junction table (required)
    #[arg(short = 'j', long = "junctions")]
    junctions: PathBuf,

    /// Output GTF file (required)
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Optional table of event/junction pairs
    #[arg(short = 'p', long = "pairs")]
    pairs: Option<PathBuf>,

    /// Junction table layout: simple or star
    #[arg(short = 'f', long = "junction-format", default_value = "simple")]
    junction_format: String,

    /// Junctions must be wider than this (bp, counting both flanking exon bases)
    #[arg(short = 'm', long = "min-junction-width", default_value_t = DEFAULT_MIN_JUNCTION_WIDTH)]
    min_junction_width: i64,

    /// Separator for composite transcript ids
    #[arg(long = "separator", default_value = DEFAULT_ID_SEPARATOR)]
    separator: String,

    /// Keep grafted transcripts that repeat another's exon structure
    #[arg(long = "no-collapse")]
    no_collapse: bool,

    /// GTF tag for gene ID
    #[arg(short = 'G', long = "gene", default_value = "gene_id")]
    gene_tag: String,

    /// GTF tag for transcript ID
    #[arg(short = 'T', long = "transcript", default_value = "transcript_id")]
    transcript_tag: String,

    /// Number of worker threads (0 = auto-detect)
    #[arg(long = "threads", short = 't', default_value = "0")]
    threads: usize,

    /// Verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
        .init();

    // Validate inputs
    if !args.gtf.exists() {
        bail!("GTF file not found: {}", args.gtf.display());
    }
    if !args.events.exists() {
        bail!("Event file not found: {}", args.events.display());
    }
    if !args.junctions.exists() {
        bail!("Junction file not found: {}", args.junctions.display());
    }

    let junction_format: JunctionFormat = args
        .junction_format
        .parse()
        .context("Junction format can only be one of the following: simple or star")?;

    if args.min_junction_width < 0 {
        bail!("The minimum junction width cannot be lower than 0 bps.");
    }
    if args.separator.is_empty() {
        bail!("The transcript id separator cannot be empty.");
    }

    // Build configuration
    let mut config = Config::new();
    config.set_min_junction_width(args.min_junction_width);
    config.id_separator = args.separator.clone();
    config.collapse_duplicates = !args.no_collapse;
    config.gene_id_tag = args.gene_tag.clone();
    config.transcript_id_tag = args.transcript_tag.clone();
    config.threads = args.threads;

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads())
        .build_global()
        .context("Failed to build worker thread pool")?;

    let start_time = Instant::now();

    info!("Parsing GTF file: {}", args.gtf.display());
    let annotation = Annotation::new(parse_annotation(
        &args.gtf,
        &config.gene_id_tag,
        &config.transcript_id_tag,
    )?);
    if annotation.is_empty() {
        bail!("No exons found in GTF file: {}", args.gtf.display());
    }
    info!("Loaded {} transcripts", annotation.len());

    info!("Parsing event file: {}", args.events.display());
    let events = parse_events(&args.events)?;
    if events.is_empty() {
        bail!("No events found in event file: {}", args.events.display());
    }
    info!("Loaded {} events", events.len());

    info!("Parsing junction file: {}", args.junctions.display());
    let junctions = parse_junctions(&args.junctions, junction_format)?;
    info!("Loaded {} junctions", junctions.len());

    let output = graft_events(&events, &junctions, &annotation, &config);

    info!("Writing output to: {}", args.output.display());
    let file = File::create(&args.output).context("Failed to create output file")?;
    let mut writer = BufWriter::new(file);
    write_gtf(&mut writer, &output.transcripts)?;
    writer.flush().context("Failed to flush output file")?;

    if let Some(pairs_path) = &args.pairs {
        info!("Writing junction pairs to: {}", pairs_path.display());
        let file = File::create(pairs_path).context("Failed to create pairs file")?;
        let mut writer = BufWriter::new(file);
        write_pairs_header(&mut writer)?;
        for pair in &output.pairs {
            writeln!(writer, "{}", format_pair_line(pair))?;
        }
        writer.flush().context("Failed to flush pairs file")?;
    }

    info!(
        "Grafted {} transcripts from {} junction pairs in {:.2?}",
        output.transcripts.len(),
        output.pairs.len(),
        start_time.elapsed()
    );

    Ok(())
}
