//! Reference CLI driver for the pipeline simulation core.
//!
//! This is one concrete driver, kept deliberately thin: it assembles a source file, loads
//! it, steps the engine, and prints the final snapshot as pretty JSON.
//! It is not a requirement on transport — a server driving a browser
//! client is equally valid and would call the same `pipeline_sim::core`
//! API.

use std::{fs, process};

use clap::Parser;

extern crate pipeline_sim;

use pipeline_sim::config::EngineConfig;
use pipeline_sim::core::Engine;
use pipeline_sim::stats::SimStats;

/// Command-line arguments for the pipeline simulator CLI.
#[derive(Parser, Debug)]
#[command(author, version, about = "16-bit 5-stage pipeline simulator")]
struct Args {
    /// Assembly source file to assemble and run.
    #[arg(short, long)]
    file: String,

    /// Optional TOML configuration file (trace flag, tick-rate hint).
    #[arg(short, long, default_value = "pipesim.toml")]
    config: String,

    /// Maximum number of cycles to simulate.
    #[arg(long, default_value_t = 1000)]
    cycles: u64,

    /// Force tracing regardless of the config file.
    #[arg(long, default_value_t = false)]
    trace: bool,
}

/// Number of consecutive cycles the `halt` idiom must occupy the
/// pipeline before the run loop gives up early, letting the pipeline
/// fully drain twice over before declaring convergence.
const HALT_CONVERGENCE_CYCLES: u32 = 6;

fn main() {
    let args = Args::parse();

    let config = match fs::read_to_string(&args.config) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            eprintln!("[!] failed to parse {}: {e}", args.config);
            process::exit(1);
        }),
        Err(_) => EngineConfig::default(),
    };

    let source = fs::read_to_string(&args.file).unwrap_or_else(|e| {
        eprintln!("[!] failed to read {}: {e}", args.file);
        process::exit(1);
    });

    let mut engine = Engine::new();
    engine.trace = args.trace || config.trace_instructions;

    if let Err(e) = pipeline_sim::core::engine::assemble_and_load(&mut engine, &source) {
        eprintln!("[!] assembly failed: {e}");
        process::exit(1);
    }

    println!("[*] Loaded {}", args.file);
    println!("[*] Trace:              {}", engine.trace);
    println!("[*] Tick-rate hint:     {} Hz", config.default_hz());
    println!("[*] Max cycles:         {}", args.cycles);

    let mut stats = SimStats::new();
    let mut halt_streak: u32 = 0;

    for _ in 0..args.cycles {
        engine.tick();
        let snapshot = engine.snapshot();
        stats.observe(&snapshot);

        let occupancy = &snapshot.pipeline_occupancy;
        let at_halt = occupancy.if_stage == "halt"
            || occupancy.id_stage == "halt"
            || occupancy.ex_stage == "halt"
            || occupancy.mem_stage == "halt"
            || occupancy.wb_stage == "halt";
        halt_streak = if at_halt { halt_streak + 1 } else { 0 };

        if halt_streak >= HALT_CONVERGENCE_CYCLES {
            println!(
                "[*] Converged on `halt` after {} cycles",
                snapshot.cycle
            );
            break;
        }
    }

    let snapshot = engine.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).unwrap_or_else(|e| {
        eprintln!("[!] failed to serialize snapshot: {e}");
        process::exit(1);
    });
    println!("{json}");

    stats.print();
}
