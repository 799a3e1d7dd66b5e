use std::fs::File;
use std::io::BufRead;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use log::debug;
use log::error;
use log::info;
use log::warn;
use rayon::prelude::*;
use thiserror::Error;

use seqsignal::abc::Alphabet;
use seqsignal::abc::Dna;
use seqsignal::abc::DEFAULT_NULL_PROBABILITY;
use seqsignal::abc::DEFAULT_PSEUDOCOUNT;
use seqsignal::dense::DenseMatrix;
use seqsignal::err::InvalidInput;
use seqsignal::markov::MarkovModelBuilder;
use seqsignal::markov::TransitionCounts;
use seqsignal::markov::DEFAULT_FLOOR;
use seqsignal::peaks::PeakDetector;
use seqsignal::pwm::CountMatrix;
use seqsignal::pwm::ScoringMatrixBuilder;
use seqsignal::scan::Scan;
use seqsignal::scores::ScoreProfile;
use seqsignal::seq::EncodedSequence;
use seqsignal::seq::MaskedSequence;

// --- Error -------------------------------------------------------------------

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Input(#[from] InvalidInput),
    #[error("failed to start thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

// --- Parameters --------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Parameters {
    /// number of threads to use in parallel
    #[arg(short = 'j', long, default_value_t = 1, global = true)]
    jobs: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan sequences with a position weight matrix built from motifs.
    Pwm(PwmParameters),
    /// Scan sequences with a first-order Markov log-odds model.
    Markov(MarkovParameters),
}

#[derive(Args, Debug, Clone)]
struct OutputParameters {
    /// output file to write to, defaults to the standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// report the N best positions instead of thresholding
    #[arg(long)]
    top: Option<usize>,
    /// print the intermediate matrices to the standard error
    #[arg(long, default_value_t = false)]
    show_matrices: bool,
}

#[derive(Args, Debug)]
struct PwmParameters {
    /// motif file to load, with one motif per line
    #[arg(short, long, required = true)]
    motifs: PathBuf,
    /// sequence file to scan, in FASTA format
    #[arg(short, long, required = true)]
    sequences: PathBuf,
    /// pseudocount added to every symbol count
    #[arg(long, default_value_t = DEFAULT_PSEUDOCOUNT)]
    pseudocount: f64,
    /// background probability of every symbol
    #[arg(long, default_value_t = DEFAULT_NULL_PROBABILITY)]
    null_probability: f64,

    #[command(flatten)]
    output: OutputParameters,
}

#[derive(Args, Debug)]
struct MarkovParameters {
    /// training sequences of the positive class, in FASTA format
    #[arg(short, long, required = true)]
    positive: PathBuf,
    /// training sequences of the negative class, in FASTA format
    #[arg(short, long, required = true)]
    negative: PathBuf,
    /// sequence file to score, in FASTA format
    #[arg(short, long, required = true)]
    sequences: PathBuf,
    /// lowest probability used when computing log-odds
    #[arg(long, default_value_t = DEFAULT_FLOOR)]
    floor: f64,
    /// score sliding windows of this width instead of whole sequences
    #[arg(short, long)]
    window: Option<usize>,

    #[command(flatten)]
    output: OutputParameters,
}

impl OutputParameters {
    fn detector(&self) -> PeakDetector {
        match self.top {
            Some(n) => PeakDetector::Top(n),
            None => PeakDetector::Threshold,
        }
    }

    fn writer(&self) -> Result<Box<dyn Write>, std::io::Error> {
        match &self.output {
            Some(path) => Ok(Box::new(File::create(path).map(BufWriter::new)?)),
            None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
        }
    }
}

// --- Input -------------------------------------------------------------------

struct SeqRecord {
    name: String,
    text: Vec<u8>,
}

impl SeqRecord {
    fn masked(&self) -> MaskedSequence<Dna> {
        MaskedSequence::encode_bytes(&self.text)
    }
}

fn open_compressed<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, std::io::Error> {
    let mut file = File::open(path).map(std::io::BufReader::new)?;
    match file.fill_buf()? {
        &[0x1f, 0x8b, ..] => Ok(flate2::read::MultiGzDecoder::new(file))
            .map(std::io::BufReader::new)
            .map(|r| Box::new(r) as Box<dyn BufRead>),
        _ => Ok(Box::new(file)),
    }
}

fn read_motifs<P: AsRef<Path>>(path: P) -> Result<Vec<String>, Error> {
    let mut motifs = Vec::new();
    for line in open_compressed(path)?.lines() {
        let line = line?;
        let motif = line.trim();
        if motif.is_empty() || motif.starts_with('#') || motif.starts_with('>') {
            continue;
        }
        motifs.push(motif.to_ascii_uppercase());
    }
    Ok(motifs)
}

fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<SeqRecord>, Error> {
    let path = path.as_ref();
    let mut records = Vec::new();
    for result in open_compressed(path)
        .map(noodles_fasta::io::Reader::new)?
        .records()
    {
        let record = result?;
        let raw: &[u8] = record.sequence().as_ref();
        records.push(SeqRecord {
            name: String::from_utf8_lossy(record.name()).into_owned(),
            text: raw.to_ascii_uppercase(),
        });
    }
    debug!("loaded {} sequences from {:?}", records.len(), path);
    Ok(records)
}

fn count_transitions<P: AsRef<Path>>(path: P) -> Result<TransitionCounts<Dna>, Error> {
    let mut counts = TransitionCounts::new();
    for record in read_fasta(path)? {
        counts.add_sequence(&EncodedSequence::encode(String::from_utf8_lossy(&record.text))?);
    }
    if counts.total() == 0 {
        warn!("no transition found in training sequences");
    }
    Ok(counts)
}

// --- Output ------------------------------------------------------------------

/// Print a position-major matrix with one line per symbol.
fn print_positions<T, A>(title: &str, matrix: &DenseMatrix<T, A::K>) -> Result<(), std::io::Error>
where
    T: Default + Copy + std::fmt::Display,
    A: Alphabet,
{
    let mut out = std::io::stderr().lock();
    writeln!(out, "{}", title)?;
    for (j, c) in A::as_str().chars().enumerate() {
        write!(out, "{}", c)?;
        for x in matrix.column(j) {
            write!(out, "\t{:.3}", x)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print a transition matrix with one line per current symbol.
fn print_transitions<T, A>(title: &str, matrix: &DenseMatrix<T, A::K>) -> Result<(), std::io::Error>
where
    T: Default + Copy + std::fmt::Display,
    A: Alphabet,
{
    let mut out = std::io::stderr().lock();
    writeln!(out, "{}", title)?;
    for c in A::as_str().chars() {
        write!(out, "\t{}", c)?;
    }
    writeln!(out)?;
    for (c, row) in A::as_str().chars().zip(matrix.iter()) {
        write!(out, "{}", c)?;
        for x in row {
            write!(out, "\t{:.3}", x)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_peaks<W: Write>(
    out: &mut W,
    records: &[SeqRecord],
    profiles: Vec<Result<ScoreProfile, InvalidInput>>,
    detector: PeakDetector,
    width: usize,
) -> Result<(), Error> {
    writeln!(out, "seq_index\tseq_name\tpos\twindow\tscore")?;
    for (i, (record, profile)) in records.iter().zip(profiles).enumerate() {
        let profile = match profile {
            Ok(profile) => profile,
            Err(e @ InvalidInput::SequenceTooShort { .. }) => {
                warn!("skipping {:?}: {}", record.name, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let peaks = detector.detect(&profile)?;
        if peaks.is_empty() {
            info!("no signal detected in {:?}", record.name);
        }
        for hit in &peaks {
            let pos = hit.position();
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{:.6}",
                i + 1,
                record.name,
                pos,
                String::from_utf8_lossy(&record.text[pos..pos + width]),
                hit.score(),
            )?;
        }
    }
    Ok(())
}

// --- Commands ----------------------------------------------------------------

fn run_pwm(params: &PwmParameters, pool: &rayon::ThreadPool) -> Result<(), Error> {
    info!("Loading motifs from {:?}", params.motifs);
    let motifs = read_motifs(&params.motifs)?;
    let pssm = ScoringMatrixBuilder::new()
        .pseudocount(params.pseudocount)
        .null_probability(params.null_probability)
        .build::<Dna, _>(&motifs)?;
    info!(
        "Built matrix of length {} from {} motifs (score range {:.3}..{:.3})",
        pssm.len(),
        motifs.len(),
        pssm.min_score(),
        pssm.max_score()
    );

    if params.output.show_matrices {
        let counts = CountMatrix::<Dna>::from_motifs(&motifs)?;
        let freqs = counts.to_freq(params.pseudocount)?;
        print_positions::<_, Dna>("counts", counts.matrix())?;
        print_positions::<_, Dna>(
            "pseudocounts",
            &counts.pseudocounted(params.pseudocount)?,
        )?;
        print_positions::<_, Dna>("frequencies", freqs.matrix())?;
        print_positions::<_, Dna>("log-likelihoods", pssm.matrix())?;
    }

    info!("Loading sequences from {:?}", params.sequences);
    let records = read_fasta(&params.sequences)?;
    let sequences = records.iter().map(SeqRecord::masked).collect::<Vec<_>>();
    let profiles = pool.install(|| pssm.scan_all(sequences.as_slice()));

    let mut out = params.output.writer()?;
    write_peaks(
        &mut out,
        &records,
        profiles,
        params.output.detector(),
        pssm.len(),
    )?;
    out.flush()?;
    Ok(())
}

fn run_markov(params: &MarkovParameters, pool: &rayon::ThreadPool) -> Result<(), Error> {
    info!("Training positive model from {:?}", params.positive);
    let positive = count_transitions(&params.positive)?;
    info!("Training negative model from {:?}", params.negative);
    let negative = count_transitions(&params.negative)?;
    let lom = MarkovModelBuilder::new()
        .floor(params.floor)
        .build_from_counts(&positive, &negative)?;

    if params.output.show_matrices {
        print_transitions::<_, Dna>("positive transitions", positive.to_probabilities().matrix())?;
        print_transitions::<_, Dna>("negative transitions", negative.to_probabilities().matrix())?;
        print_transitions::<_, Dna>("log-odds", lom.matrix())?;
    }

    info!("Loading sequences from {:?}", params.sequences);
    let records = read_fasta(&params.sequences)?;
    let sequences = records.iter().map(SeqRecord::masked).collect::<Vec<_>>();
    let mut out = params.output.writer()?;

    match params.window {
        Some(width) => {
            let windows = lom.windows(width)?;
            let profiles = pool.install(|| windows.scan_all(sequences.as_slice()));
            write_peaks(
                &mut out,
                &records,
                profiles,
                params.output.detector(),
                width,
            )?;
        }
        None => {
            let scores = pool.install(|| {
                sequences
                    .par_iter()
                    .map(|seq| lom.score(seq))
                    .collect::<Vec<f64>>()
            });
            writeln!(out, "seq_index\tseq_name\tlength\tscore")?;
            for (i, (record, score)) in records.iter().zip(scores).enumerate() {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{:.6}",
                    i + 1,
                    record.name,
                    record.text.len(),
                    score
                )?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

// --- Main --------------------------------------------------------------------

fn run(params: Parameters) -> Result<(), Error> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.jobs)
        .build()?;
    debug!("started thread pool with {} threads", pool.current_num_threads());
    match &params.command {
        Command::Pwm(p) => run_pwm(p, &pool),
        Command::Markov(p) => run_markov(p, &pool),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Parameters::parse()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
