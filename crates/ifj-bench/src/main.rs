use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use serde::Serialize;

use ifj_compiler::Compiler;
use ifj_lexer::Scanner;
use ifj_syntax::error::{Error, ErrorKind, Result};
use ifj_syntax::token::TokenList;
use ifj_vm::Vm;

#[derive(Parser, Debug)]
#[command(name = "ifj-bench", about = "Time the IFJ18 scanner, compiler and VM on sample scripts")]
struct Cli {
    /// Specific script(s) to run by name, e.g. arithmetic. Runs every discovered script when omitted.
    #[arg(short = 't', long = "test", action = ArgAction::Append)]
    tests: Vec<String>,

    /// Iterations per script (measured)
    #[arg(short = 'n', long = "iterations", default_value_t = 10)]
    iterations: u32,

    /// Warmup iterations (not measured)
    #[arg(short = 'w', long = "warmup", default_value_t = 2)]
    warmup: u32,

    /// Output JSON file path; default: bench/results/<timestamp>.json
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Also time the scripts under demos/
    #[arg(long = "include-demos", default_value_t = false)]
    include_demos: bool,

    /// List discovered scripts and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct BenchResult {
    name: String,
    iterations: u32,
    avg_total_ms: f64,
    min_total_ms: f64,
    max_total_ms: f64,
    avg_scan_ms: f64,
    avg_compile_ms: f64,
    avg_run_ms: f64,
    tokens: usize,
    instructions: usize,
}

#[derive(Debug, Serialize)]
struct OutputDoc {
    timestamp: String,
    ifjc_version: String,
    benchmarks: Vec<BenchResult>,
}

#[derive(Debug, Clone)]
struct ScriptCase {
    name: String,
    path: PathBuf,
}

#[derive(Debug, Default)]
struct Samples {
    totals: Vec<f64>,
    scans: Vec<f64>,
    compiles: Vec<f64>,
    runs: Vec<f64>,
    tokens: usize,
    instructions: usize,
}

fn workspace_root() -> PathBuf {
    // crates/ifj-bench -> crates -> root
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .unwrap_or(manifest)
}

fn discover_scripts(include_demos: bool) -> Vec<ScriptCase> {
    let root = workspace_root();
    let mut out = Vec::new();

    let mut candidates = vec![root.join("bench/scripts")];
    if include_demos {
        candidates.push(root.join("demos"));
    }

    for dir in candidates {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for e in entries.flatten() {
            let p = e.path();
            if p.extension().and_then(|s| s.to_str()) == Some("ifj") {
                let name = p.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
                out.push(ScriptCase { name, path: p });
            }
        }
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

fn scan(src: &str) -> Result<TokenList> {
    Scanner::new(src)
        .tokenize()
        .map_err(|errors| errors.into_iter().next().unwrap_or_else(|| Error::new(ErrorKind::Lexical, "Scanning failed")))
}

fn measure_script(src: &str, iterations: u32, warmup: u32) -> Result<Samples> {
    for _ in 0..warmup {
        let tokens = scan(src)?;
        let program = Compiler::new().compile(&tokens)?;
        Vm::new(io::sink()).run(&program)?;
    }

    let mut samples = Samples::default();
    for _ in 0..iterations {
        let t0 = Instant::now();
        let mut t = Instant::now();

        let tokens = scan(src)?;
        let t_scan = t.elapsed();

        t = Instant::now();
        let program = Compiler::new().compile(&tokens)?;
        let t_compile = t.elapsed();

        t = Instant::now();
        Vm::new(io::sink()).run(&program)?;
        let t_run = t.elapsed();

        let total = t0.elapsed();

        samples.tokens = tokens.len();
        samples.instructions = program.len();
        samples.scans.push(dur_ms(t_scan));
        samples.compiles.push(dur_ms(t_compile));
        samples.runs.push(dur_ms(t_run));
        samples.totals.push(dur_ms(total));
    }
    Ok(samples)
}

fn dur_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn stats(vals: &[f64]) -> (f64, f64, f64) {
    if vals.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = vals.iter().sum::<f64>() / (vals.len() as f64);
    (avg, min, max)
}

fn bench(case: &ScriptCase, cli: &Cli) -> Result<BenchResult> {
    let src = fs::read_to_string(&case.path)
        .map_err(|e| Error::new(ErrorKind::Io, format!("Failed to read {}: {}", case.path.display(), e)))?;
    let samples = measure_script(&src, cli.iterations, cli.warmup)
        .map_err(|e| Error { msg: format!("{}: {}", case.name, e.msg), ..e })?;
    let (avg_t, min_t, max_t) = stats(&samples.totals);
    let (avg_s, _, _) = stats(&samples.scans);
    let (avg_c, _, _) = stats(&samples.compiles);
    let (avg_r, _, _) = stats(&samples.runs);

    println!(
        "{:>12}: total avg={:.3}ms min={:.3}ms max={:.3}ms | scan={:.3}ms compile={:.3}ms run={:.3}ms | {} tokens, {} instructions",
        case.name, avg_t, min_t, max_t, avg_s, avg_c, avg_r, samples.tokens, samples.instructions
    );

    Ok(BenchResult {
        name: case.name.clone(),
        iterations: cli.iterations,
        avg_total_ms: avg_t,
        min_total_ms: min_t,
        max_total_ms: max_t,
        avg_scan_ms: avg_s,
        avg_compile_ms: avg_c,
        avg_run_ms: avg_r,
        tokens: samples.tokens,
        instructions: samples.instructions,
    })
}

fn write_report(cli: &Cli, results: Vec<BenchResult>) -> Result<PathBuf> {
    let out_path = match cli.output.clone() {
        Some(p) => p,
        None => {
            let ts_file = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%SZ").to_string();
            workspace_root().join("bench/results").join(format!("{}.json", ts_file))
        }
    };

    let doc = OutputDoc {
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        ifjc_version: env!("CARGO_PKG_VERSION").to_string(),
        benchmarks: results,
    };

    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| Error::new(ErrorKind::Internal, format!("Failed to serialize results: {}", e)))?;
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, json)?;
    Ok(out_path)
}

fn run(cli: &Cli) -> Result<()> {
    let mut scripts = discover_scripts(cli.include_demos);

    if cli.list {
        println!("Discovered scripts:");
        for s in &scripts {
            println!("- {} ({})", s.name, s.path.display());
        }
        return Ok(());
    }

    if !cli.tests.is_empty() {
        let wanted: std::collections::HashSet<_> = cli.tests.iter().map(|s| s.to_lowercase()).collect();
        scripts.retain(|s| wanted.contains(&s.name.to_lowercase()));
        if scripts.is_empty() {
            return Err(Error::new(ErrorKind::Io, "No matching scripts. Use --list to see available."));
        }
    }

    if scripts.is_empty() {
        return Err(Error::new(ErrorKind::Io, "No .ifj scripts found in bench/scripts or demos."));
    }

    let results = scripts
        .iter()
        .map(|case| bench(case, cli))
        .collect::<Result<Vec<_>>>()?;

    let out_path = write_report(cli, results)?;
    println!("\nSaved results to {}", out_path.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", e.kind.label(), e);
        std::process::exit(e.code());
    }
}
