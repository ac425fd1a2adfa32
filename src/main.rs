use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, ensure, Context, Result};
use clap::{Parser, Subcommand};
use seqlane::{ActiveSequence, Aggregator, BlockingQueue, IntStep, QueueConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seqlane", about = "Streaming statistics over number-per-line files")]
struct Cli {
    /// Log pipeline events at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Bound the reader queue to this many pending values (default: unbounded).
    #[arg(long, global = true)]
    capacity: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count, minimum, maximum, sum and average.
    Stats {
        /// Input file, one number per line.
        input: PathBuf,
    },
    /// Sort the values and split them at the given percentiles.
    Percentiles {
        /// Input file, one number per line.
        input: PathBuf,
        /// Percentile boundary in [0, 100]; repeatable.
        #[arg(long = "cut", required = true, num_args = 1..)]
        cuts: Vec<f64>,
    },
    /// Count integers per residue class, in first-seen order.
    Group {
        /// Input file, one integer per line.
        input: PathBuf,
        /// Modulus for the residue classes.
        #[arg(long)]
        modulo: i64,
    },
    /// Snap integers onto the grid `start + k * step`.
    Snap {
        /// Input file, one integer per line.
        input: PathBuf,
        /// Grid spacing (> 0).
        #[arg(long)]
        step: i32,
        /// Grid offset.
        #[arg(long, default_value_t = 0)]
        start: i32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.capacity {
        Some(capacity) => QueueConfig::bounded(capacity).context("invalid --capacity")?,
        None => QueueConfig::unbounded(),
    };

    match cli.command {
        Commands::Stats { input } => run_stats(&input, config)?,
        Commands::Percentiles { input, cuts } => run_percentiles(&input, config, &cuts)?,
        Commands::Group { input, modulo } => run_group(&input, config, modulo)?,
        Commands::Snap { input, step, start } => run_snap(&input, config, step, start)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_stats(input: &Path, config: QueueConfig) -> Result<()> {
    let (values, reader) = spawn_reader(input, config, parse_number::<f64>)?;
    let summary = values.non_null().map_to_double(|v| v).summary();
    let summary = join_reader(summary, reader)?;

    println!("count\t{}", summary.count());
    let extremes = (summary.min(), summary.max(), summary.average());
    if let (Some(min), Some(max), Some(average)) = extremes {
        println!("min\t{min}");
        println!("max\t{max}");
        println!("sum\t{}", summary.sum());
        println!("average\t{average:.6}");
    }
    Ok(())
}

fn run_percentiles(input: &Path, config: QueueConfig, cuts: &[f64]) -> Result<()> {
    let (values, reader) = spawn_reader(input, config, parse_number::<f64>)?;
    let buckets = values
        .non_null()
        .sorted_by(f64::total_cmp)
        .segment_by_percentiles(cuts);
    let buckets = join_reader(buckets, reader)?;

    for (index, bucket) in buckets.iter().enumerate() {
        match (bucket.first(), bucket.last()) {
            (Some(low), Some(high)) => {
                println!("bucket {index}\tsize={}\trange=[{low}, {high}]", bucket.len())
            }
            _ => println!("bucket {index}\tsize=0"),
        }
    }
    Ok(())
}

fn run_group(input: &Path, config: QueueConfig, modulo: i64) -> Result<()> {
    ensure!(modulo > 0, "--modulo must be > 0, got {modulo}");
    let (values, reader) = spawn_reader(input, config, parse_number::<i64>)?;
    let counts = values
        .non_null()
        .group_by_aggregate(|v| v.rem_euclid(modulo), &Aggregator::counting());
    let counts = join_reader(counts, reader)?;

    for (residue, count) in counts {
        println!("{residue}\t{count}");
    }
    Ok(())
}

fn run_snap(input: &Path, config: QueueConfig, step: i32, start: i32) -> Result<()> {
    let step = IntStep::of(step).context("invalid --step")?.with_start(start);
    let (values, reader) = spawn_reader(input, config, parse_number::<i32>)?;
    let snapped = values
        .non_null()
        .map(move |v| (v, step.apply_as_int(v)))
        .for_each(|(raw, snapped)| println!("{raw}\t{snapped}"));
    join_reader(snapped, reader)
}

type Reader = JoinHandle<Result<()>>;

/// Stream parsed lines through a blocking queue fed by a reader thread.
///
/// The queue carries `Some(value)` per line and `None` as the end sentinel.
fn spawn_reader<T, F>(
    path: &Path,
    config: QueueConfig,
    parse: F,
) -> Result<(ActiveSequence<Option<T>>, Reader)>
where
    T: PartialEq + Send + 'static,
    F: Fn(&str) -> Result<T> + Send + 'static,
{
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let display = path.display().to_string();
    let queue = BlockingQueue::with_config(config);
    let producer = queue.producer();

    let reader = thread::spawn(move || -> Result<()> {
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("failed to read {display}"))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value = parse(line)
                .with_context(|| format!("{display}: bad value on line {}", line_no + 1))?;
            producer.push(Some(value))?;
        }
        producer.finish(None)?;
        Ok(())
    });

    Ok((ActiveSequence::from_queue(queue.into_source(None)), reader))
}

/// Join the reader thread. A reader failure takes precedence over the pipeline result.
fn join_reader<R>(outcome: seqlane::Result<R>, reader: Reader) -> Result<R> {
    reader
        .join()
        .map_err(|_| anyhow!("reader thread panicked"))??;
    Ok(outcome?)
}

fn parse_number<T>(text: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse::<T>()
        .with_context(|| format!("'{text}' is not a number"))
}
