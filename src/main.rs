mod build;
mod card;
mod combos;
mod rng;
mod state;

use build::{full_build, reroll, BuildConstraints, BuildRequest, BuildResult, RerollMode};
use card::CandidatePool;
use clap::{Parser, Subcommand};
use combos::{ComboList, SynergyList};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rng::SeedInput;
use std::collections::HashSet;

#[derive(Parser)]
#[command(name = "deckforge")]
#[command(about = "Deterministic commander deck builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Candidate pool file
    #[arg(long, default_value = "pool.json")]
    pool: String,

    /// Combo table file
    #[arg(long, default_value = "combos.json")]
    combos: String,

    /// Synergy table file
    #[arg(long, default_value = "synergies.json")]
    synergies: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a deck from a seed and optional theme
    Build {
        /// Seed: an integer or any string
        #[arg(short, long)]
        seed: Option<String>,

        /// Theme filter, e.g. "Tokens"
        #[arg(short, long)]
        theme: Option<String>,

        /// Minimum commander candidates after filtering
        #[arg(long)]
        min_candidates: Option<usize>,

        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Reroll a prior build: seed+1, optionally keeping the commander
    Reroll {
        /// Permalink token of the prior build
        #[arg(long, conflicts_with = "seed")]
        token: Option<String>,

        /// Prior seed (alternative to --token)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Keep the prior commander and only redraw the decklist
        #[arg(long)]
        keep_commander: bool,

        /// Commander to pin (defaults to the token's commander)
        #[arg(long)]
        commander: Option<String>,

        /// Theme filter
        #[arg(short, long)]
        theme: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Decode a permalink token and pretty-print its state
    Decode {
        token: String,
    },

    /// Run many builds over consecutive seeds and report spread
    Batch {
        /// Number of builds
        #[arg(short, long, default_value = "1000")]
        num_builds: usize,

        /// First seed
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Theme filter
        #[arg(short, long)]
        theme: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let pool = match CandidatePool::from_file(&cli.pool) {
        Ok(pool) => {
            eprintln!("✓ Loaded {} cards from {}", pool.card_count(), cli.pool);
            pool
        }
        Err(e) => {
            eprintln!("✗ Failed to load pool: {}", e);
            std::process::exit(1);
        }
    };
    let combo_table = match ComboList::from_file(&cli.combos) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("✗ Failed to load combo table: {}", e);
            std::process::exit(1);
        }
    };
    let synergy_table = match SynergyList::from_file(&cli.synergies) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("✗ Failed to load synergy table: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Build {
            seed,
            theme,
            min_candidates,
            json,
        } => {
            let request = BuildRequest {
                seed: seed.map(parse_seed),
                theme,
                constraints: min_candidates.map(|n| BuildConstraints {
                    require_min_candidates: Some(n),
                    ..Default::default()
                }),
            };
            match full_build(&request, &pool, &combo_table, &synergy_table) {
                Ok(result) => print_result(&result, json),
                Err(e) => fail(e),
            }
        }

        Commands::Reroll {
            token,
            seed,
            keep_commander,
            commander,
            theme,
            json,
        } => {
            let (prior_seed, token_commander, token_theme, token_constraints) = match token {
                Some(t) => match state::decode(&t) {
                    Ok(decoded) => {
                        let random = decoded.random.unwrap_or_default();
                        (random.seed, decoded.commander, random.theme, random.constraints)
                    }
                    Err(e) => {
                        eprintln!("✗ Invalid token: {}", e);
                        std::process::exit(1);
                    }
                },
                None => match seed {
                    Some(s) => (s, None, None, None),
                    None => {
                        eprintln!("✗ Reroll needs --token or --seed");
                        std::process::exit(1);
                    }
                },
            };

            let mode = if keep_commander {
                RerollMode::KeepCommander
            } else {
                RerollMode::NewCommander
            };
            let pinned = commander.or(token_commander);
            let theme = theme.or(token_theme);

            match reroll(
                prior_seed,
                pinned.as_deref(),
                mode,
                theme.as_deref(),
                token_constraints.as_ref(),
                &pool,
                &combo_table,
                &synergy_table,
            ) {
                Ok(result) => print_result(&result, json),
                Err(e) => fail(e),
            }
        }

        Commands::Decode { token } => match state::decode(&token) {
            Ok(decoded) => match serde_json::to_string_pretty(&decoded) {
                Ok(body) => println!("{}", body),
                Err(e) => {
                    eprintln!("✗ {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("✗ Invalid token: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Batch {
            num_builds,
            seed,
            theme,
        } => run_batch(&pool, &combo_table, &synergy_table, num_builds, seed, theme),
    }
}

fn parse_seed(raw: String) -> SeedInput {
    match raw.parse::<i64>() {
        Ok(n) => SeedInput::Int(n),
        Err(_) => SeedInput::Text(raw),
    }
}

fn fail(e: build::BuildError) -> ! {
    eprintln!("✗ Build failed: {}", e);
    if let Ok(body) = serde_json::to_string_pretty(&e.detail()) {
        eprintln!("{}", body);
    }
    std::process::exit(1);
}

fn print_result(result: &BuildResult, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("\n=== Deck Forge ===\n");
    println!("Seed: {}", result.seed);
    println!("Commander: {}", result.commander);
    match &result.theme {
        Some(theme) => println!("Theme: {}", theme),
        None if result.fallback => match &result.original_theme {
            Some(original) => println!("Theme: (fallback, requested '{}')", original),
            None => println!("Theme: (rejected)"),
        },
        None => println!("Theme: none"),
    }
    println!(
        "Cards: {} | attempts: {} | retries exhausted: {} | timeout: {}",
        result.decklist.len() + 1,
        result.diagnostics.attempts,
        result.diagnostics.retries_exhausted,
        result.diagnostics.timeout_hit
    );
    println!(
        "Compliance: {} combos, {} synergies (score {})",
        result.artifacts.compliance.combos.len(),
        result.artifacts.compliance.synergies.len(),
        result.artifacts.compliance.score
    );
    println!("Permalink: {}", result.permalink);
    println!("\n{}", result.artifacts.decklist_text);
}

fn run_batch(
    pool: &CandidatePool,
    combo_table: &ComboList,
    synergy_table: &SynergyList,
    num_builds: usize,
    base_seed: u64,
    theme: Option<String>,
) {
    println!("\n=== Batch Build ===\n");
    println!("Builds: {} starting at seed {}", num_builds, base_seed);
    if let Some(t) = &theme {
        println!("Theme: {}", t);
    }
    println!();

    let bar = ProgressBar::new(num_builds as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {eta}") {
        bar.set_style(style);
    }

    let start = std::time::Instant::now();
    let results: Vec<_> = (0..num_builds)
        .into_par_iter()
        .map(|i| {
            let request = BuildRequest {
                seed: Some(SeedInput::from(base_seed + i as u64)),
                theme: theme.clone(),
                constraints: None,
            };
            let result = full_build(&request, pool, combo_table, synergy_table);
            bar.inc(1);
            result
        })
        .collect();
    bar.finish_and_clear();
    let elapsed = start.elapsed();

    let ok: Vec<&BuildResult> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let failed = results.len() - ok.len();
    let fallbacks = ok.iter().filter(|r| r.fallback).count();
    let exhausted = ok.iter().filter(|r| r.diagnostics.retries_exhausted).count();
    let commanders: HashSet<&str> = ok.iter().map(|r| r.commander.as_str()).collect();

    println!("=== Results ===\n");
    println!("Succeeded: {}/{}", ok.len(), results.len());
    if failed > 0 {
        println!("Failed: {}", failed);
    }
    println!("Distinct commanders: {}", commanders.len());
    println!(
        "Theme fallbacks: {:.1}% ({})",
        fallbacks as f64 / ok.len().max(1) as f64 * 100.0,
        fallbacks
    );
    println!(
        "Retries exhausted: {:.1}% ({})",
        exhausted as f64 / ok.len().max(1) as f64 * 100.0,
        exhausted
    );
    println!(
        "\nCompleted in {:.2?} ({:.0} builds/sec)",
        elapsed,
        num_builds as f64 / elapsed.as_secs_f64()
    );
}
