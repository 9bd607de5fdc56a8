use clap::{Args, Parser, Subcommand};
use feistel_perm::utils::stats::{fisher_yates_histogram, permutation_histogram};
use feistel_perm::{
    chi_square, EngineConfig, MixerKind, Permutation, PermutationError, PermutedSequence,
    UniformityReport,
};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_TARGET: &str = "feistel_perm::cli";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, about = "Pseudo-random permutations of [0, n) without materializing them", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct EngineArgs {
    /// Domain size n; the permutation covers [0, n)
    #[arg(short = 'n', long)]
    len: u128,
    /// Seed; drawn at random (and printed) when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// TOML file with engine parameters
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the Feistel round count
    #[arg(long)]
    rounds: Option<u8>,
    /// Override the round function (multiply-xor, blake3, sha3)
    #[arg(long)]
    mixer: Option<MixerKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the permuted sequence forward(0), forward(1), ...
    Generate {
        #[command(flatten)]
        engine: EngineArgs,
        /// Stop after this many values
        #[arg(long)]
        limit: Option<u128>,
    },
    /// Map an index to its permuted value
    Forward {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(short, long, allow_negative_numbers = true)]
        index: i128,
    },
    /// Map a permuted value back to its index
    Backward {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(short, long, allow_negative_numbers = true)]
        value: i128,
    },
    /// Show the derived bit layout, round count and round keys
    Describe {
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Draw distinct indices from [0, n)
    Sample {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(short = 'k', long)]
        count: u128,
    },
    /// Chi-square test of permutation frequencies over many seeds
    Uniformity {
        #[arg(short = 'n', long, default_value_t = 4)]
        len: u32,
        #[arg(long, default_value_t = 100_000)]
        samples: u64,
        #[arg(long, default_value_t = 0)]
        start_seed: u64,
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Override the Feistel round count
        #[arg(long)]
        rounds: Option<u8>,
        #[arg(long)]
        mixer: Option<MixerKind>,
        /// Skip the Fisher-Yates comparison run
        #[arg(long)]
        no_baseline: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.log_json) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) -> CliResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feistel_perm=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder
            .json()
            .try_init()
            .map_err(|err| format!("failed to initialize tracing subscriber: {err}"))?;
    } else {
        builder
            .try_init()
            .map_err(|err| format!("failed to initialize tracing subscriber: {err}"))?;
    }
    Ok(())
}

fn run(command: Commands) -> CliResult<()> {
    match command {
        Commands::Generate { engine, limit } => run_generate(engine, limit)?,
        Commands::Forward { engine, index } => run_forward(engine, index)?,
        Commands::Backward { engine, value } => run_backward(engine, value)?,
        Commands::Describe { engine } => run_describe(engine)?,
        Commands::Sample { engine, count } => run_sample(engine, count)?,
        Commands::Uniformity {
            len,
            samples,
            start_seed,
            config,
            rounds,
            mixer,
            no_baseline,
            json,
        } => {
            let config = resolve_config(config.as_ref(), rounds, mixer)?;
            run_uniformity(len, samples, start_seed, &config, no_baseline, json)?
        }
    }
    Ok(())
}

fn resolve_config(
    path: Option<&PathBuf>,
    rounds: Option<u8>,
    mixer: Option<MixerKind>,
) -> CliResult<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(rounds) = rounds {
        config.rounds = Some(rounds);
    }
    if let Some(mixer) = mixer {
        config.mixer = mixer;
    }
    config.validate()?;
    Ok(config)
}

fn build_sequence(args: &EngineArgs) -> CliResult<PermutedSequence> {
    let config = resolve_config(args.config.as_ref(), args.rounds, args.mixer)?;
    let seed = match args.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            tracing::info!(target: LOG_TARGET, seed, "no seed given, drew one at random");
            seed
        }
    };
    let permutation = Permutation::with_config(args.len, seed, &config)?;
    Ok(PermutedSequence::from_permutation(permutation))
}

fn run_generate(args: EngineArgs, limit: Option<u128>) -> CliResult<()> {
    let sequence = build_sequence(&args)?;
    let limit = limit.unwrap_or(sequence.len()).min(sequence.len());
    let mut cursor = sequence.iter();
    let mut emitted = 0u128;
    while emitted < limit {
        match cursor.next() {
            Some(value) => println!("{}", value?),
            None => break,
        }
        emitted += 1;
    }
    Ok(())
}

fn run_forward(args: EngineArgs, index: i128) -> CliResult<()> {
    let sequence = build_sequence(&args)?;
    println!("{}", sequence.get_one(index)?);
    Ok(())
}

fn run_backward(args: EngineArgs, value: i128) -> CliResult<()> {
    let sequence = build_sequence(&args)?;
    println!("{}", sequence.backward(value)?);
    Ok(())
}

fn run_describe(args: EngineArgs) -> CliResult<()> {
    let sequence = build_sequence(&args)?;
    let permutation = sequence.permutation();
    let bits = permutation.bits();
    println!("len:         {}", permutation.len());
    println!("seed:        {}", permutation.seed());
    println!("mixer:       {}", permutation.mixer().kind());
    println!("bits:        {} (left {}, right {})", bits.total, bits.left, bits.right);
    match bits.capacity() {
        Some(capacity) => println!("walk domain: [0, {capacity})"),
        None => println!("walk domain: [0, 2^128)"),
    }
    println!("rounds:      {}", permutation.rounds());
    println!("walk limit:  {}", permutation.walk_limit());
    for (round, key) in permutation.round_keys().iter().enumerate() {
        println!("  key[{round:02}]   {}", hex::encode(key.to_be_bytes()));
    }
    Ok(())
}

fn run_sample(args: EngineArgs, count: u128) -> CliResult<()> {
    let sequence = build_sequence(&args)?;
    if count > sequence.len() {
        return Err(PermutationError::SampleTooLarge {
            requested: count,
            len: sequence.len(),
        }
        .into());
    }
    for index in 0..count {
        println!("{}", sequence.forward(index)?);
    }
    Ok(())
}

fn run_uniformity(
    len: u32,
    samples: u64,
    start_seed: u64,
    config: &EngineConfig,
    no_baseline: bool,
    json: bool,
) -> CliResult<()> {
    if !(1..=8).contains(&len) {
        return Err("uniformity checks enumerate n! permutations; pick n in 1..=8".into());
    }
    let end_seed = start_seed
        .checked_add(samples)
        .ok_or("start seed plus samples overflows u64")?;

    let progress = if json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(samples);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} seeds")
                .map_err(|err| format!("progress template: {err}"))?,
        );
        bar
    };

    let histogram = permutation_histogram(start_seed..end_seed, |seed| {
        progress.inc(1);
        Permutation::with_config(len as u128, seed, config)
    })?;
    progress.finish_and_clear();

    let engine = chi_square(&histogram, len as usize);
    let baseline = if no_baseline {
        None
    } else {
        let mut rng = StdRng::seed_from_u64(start_seed);
        let baseline = fisher_yates_histogram(len as usize, samples, &mut rng);
        Some(chi_square(&baseline, len as usize))
    };

    let report = UniformityReport {
        len,
        samples,
        distinct_permutations: histogram.len(),
        engine,
        baseline,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Uniformity over {} seeds, n = {} ({}) ===", samples, len, config.mixer);
    println!("  distinct permutations seen: {}", report.distinct_permutations);
    println!(
        "  Feistel engine: chi-square {:.3} (dof {}), p = {:.4}",
        engine.statistic, engine.degrees_of_freedom, engine.p_value
    );
    if let Some(baseline) = baseline {
        println!(
            "  Fisher-Yates:   chi-square {:.3} (dof {}), p = {:.4}",
            baseline.statistic, baseline.degrees_of_freedom, baseline.p_value
        );
    }
    Ok(())
}
