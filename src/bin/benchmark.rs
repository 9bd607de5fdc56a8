use clap::Parser;
use feistel_perm::{EngineConfig, MixerKind, Permutation};
use std::hint::black_box;
use std::time::Instant;

struct BenchmarkResult {
    len: u128,
    mixer: MixerKind,
    rounds: usize,
    operations: u64,
    forward_ns: f64,
    backward_ns: f64,
    iterate_ns: f64,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Throughput benchmark for the Feistel permutation engine"
)]
struct BenchmarkCli {
    /// Comma-separated list of domain sizes (e.g. 1000,1048577)
    #[arg(long, value_delimiter = ',')]
    lens: Option<Vec<u128>>,
    /// Comma-separated list of mixers (multiply-xor,blake3,sha3)
    #[arg(long, value_delimiter = ',')]
    mixers: Option<Vec<MixerKind>>,
    /// Lookups per measurement (default: 200000)
    #[arg(long)]
    operations: Option<u64>,
    /// Seed shared by every engine
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    let cli = BenchmarkCli::parse();
    println!("=== Feistel Permutation Benchmark Suite ===\n");

    let lens = cli.lens.unwrap_or_else(|| {
        vec![
            1_000,
            (1 << 20) + 1,
            u32::MAX as u128,
            (1u128 << 64) + 1,
            u128::MAX,
        ]
    });
    let mixers = cli
        .mixers
        .unwrap_or_else(|| vec![MixerKind::MultiplyXor, MixerKind::Blake3, MixerKind::Sha3]);
    let operations = cli.operations.unwrap_or(200_000).max(1);

    let mut all_results = Vec::new();
    for &len in &lens {
        for &mixer in &mixers {
            println!("Benchmarking n={len}, mixer: {mixer}");
            match run_benchmark(len, mixer, operations, cli.seed) {
                Ok(result) => {
                    print_result(&result);
                    all_results.push(result);
                }
                Err(e) => {
                    eprintln!("  ✗ Benchmark failed: {}", e);
                }
            }
            println!();
        }
    }

    println!("\n=== Summary Report ===\n");
    print_summary_table(&all_results);
}

fn run_benchmark(
    len: u128,
    mixer: MixerKind,
    operations: u64,
    seed: u64,
) -> Result<BenchmarkResult, Box<dyn std::error::Error>> {
    let config = EngineConfig::default().with_mixer(mixer);
    let permutation = Permutation::with_config(len, seed, &config)?;
    let operations = (operations as u128).min(len) as u64;
    // spread probes across the whole domain rather than its first few values
    let stride = (len / operations as u128).max(1);

    let forward_start = Instant::now();
    let mut values = Vec::with_capacity(operations as usize);
    for i in 0..operations as u128 {
        values.push(black_box(permutation.forward(i * stride)?));
    }
    let forward_time = forward_start.elapsed();

    let backward_start = Instant::now();
    for (i, &value) in values.iter().enumerate() {
        let index = black_box(permutation.backward(value)?);
        if index != i as u128 * stride {
            return Err(format!("backward({value}) returned {index}").into());
        }
    }
    let backward_time = backward_start.elapsed();

    let iterate_start = Instant::now();
    for value in permutation.iter().take(operations as usize) {
        black_box(value?);
    }
    let iterate_time = iterate_start.elapsed();

    let per_op = |elapsed: std::time::Duration| elapsed.as_secs_f64() * 1e9 / operations as f64;
    Ok(BenchmarkResult {
        len,
        mixer,
        rounds: permutation.rounds(),
        operations,
        forward_ns: per_op(forward_time),
        backward_ns: per_op(backward_time),
        iterate_ns: per_op(iterate_time),
    })
}

fn print_result(result: &BenchmarkResult) {
    println!("  ✓ Rounds:           {}", result.rounds);
    println!("  ✓ Operations:       {}", result.operations);
    println!("  ✓ Forward:          {:.1} ns/op", result.forward_ns);
    println!("  ✓ Backward:         {:.1} ns/op", result.backward_ns);
    println!("  ✓ Iterate:          {:.1} ns/op", result.iterate_ns);
}

fn print_summary_table(results: &[BenchmarkResult]) {
    println!(
        "{:<40} {:<14} {:<7} {:<14} {:<14} {:<14}",
        "Len", "Mixer", "Rounds", "Forward(ns)", "Backward(ns)", "Iterate(ns)"
    );
    println!("{}", "-".repeat(108));

    for result in results {
        println!(
            "{:<40} {:<14} {:<7} {:<14.1} {:<14.1} {:<14.1}",
            result.len,
            result.mixer.to_string(),
            result.rounds,
            result.forward_ns,
            result.backward_ns,
            result.iterate_ns,
        );
    }
}
