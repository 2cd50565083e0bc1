// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{bail, Context, Result};
use scale_drill::config::{Settings, SettingsEvent, SettingsWatcher};
use scale_drill::drill::{GuessOutcome, Round, ScoreBoard};
use scale_drill::generators::ScaleGenerator;
use scale_drill::music::{render_glyphs, Clef, LedgerLimits, Scale, ScaleFamily, ScaleRegistry};
use std::env;
use std::io::{self, BufRead, Write};
use tracing::Level;

fn print_usage() {
    println!("Scale Drill - Scale spelling and sight-reading quiz");
    println!();
    println!("Usage: scale-drill [-v] [--config <FILE>] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  --list-scales                       List scale types and their patterns");
    println!("  --list-clefs                        List clefs and their lowest notes");
    println!("  --playable <CLEF> [LOW HIGH]        List starting notes a clef can show");
    println!("  --generate [COUNT] [--seed N]       Generate random scales (default 1)");
    println!("  --verify <SCALE> <START> <CLEF> <PATTERN>");
    println!("                                      Check a pattern guess against a scale");
    println!("  --drill [ROUNDS] [--seed N]         Play a quiz on stdin (default 5 rounds)");
    println!("  --watch <FILE>                      Watch a settings file and report reloads");
    println!("  --help                              Show this help message");
    println!();
    println!("Options:");
    println!("  --config <FILE>   Settings file (.yaml or .toml)");
    println!("  -v                Verbose logging");
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid {}: {}", what, value))
}

/// Pull `--seed N` out of the argument list
fn take_seed(args: &mut Vec<String>) -> Result<Option<u64>> {
    match args.iter().position(|a| a == "--seed") {
        Some(index) => {
            if index + 1 >= args.len() {
                bail!("--seed requires a value");
            }
            let seed = parse_number(&args[index + 1], "seed")?;
            args.drain(index..=index + 1);
            Ok(Some(seed))
        }
        None => Ok(None),
    }
}

fn generator(registry: ScaleRegistry, seed: Option<u64>) -> ScaleGenerator {
    match seed {
        Some(seed) => ScaleGenerator::with_seed(registry, seed),
        None => ScaleGenerator::new(registry),
    }
}

fn print_scale(scale: &Scale) {
    println!(
        "{} on {} clef: {}",
        scale.name(),
        scale.clef().name(),
        scale.labels(true).join(" ")
    );
    println!("  staff: {}", render_glyphs(&scale.glyphs()));
}

fn list_scales(registry: &ScaleRegistry) {
    for family in [ScaleFamily::Standard, ScaleFamily::ChurchMode, ScaleFamily::Custom] {
        let mut scales = registry.family(family).peekable();
        if scales.peek().is_none() {
            continue;
        }
        println!("{}:", family);
        for info in scales {
            let starts: Vec<_> = info.valid_starts().iter().map(|p| p.to_string()).collect();
            println!("  {:<16} {:<9} {}", info.name(), info.pattern_string(), starts.join(" "));
        }
    }
}

fn list_clefs() {
    for clef in Clef::all() {
        println!("  {:<14} lowest {}", clef.name(), clef.lowest_note());
    }
}

fn list_playable(clef: &str, limits: LedgerLimits) -> Result<()> {
    let clef = Clef::lookup(clef)?;
    let notes: Vec<_> = clef
        .all_playable_notes(limits)
        .iter()
        .map(|n| n.to_string())
        .collect();
    println!(
        "{} clef, {} low / {} high ledger positions:",
        clef.name(),
        limits.low(),
        limits.high()
    );
    println!("  {}", notes.join(" "));
    Ok(())
}

fn generate(settings: &Settings, count: usize, seed: Option<u64>) -> Result<()> {
    let mut generator = generator(settings.registry()?, seed);
    let constraints = settings.constraints();
    for _ in 0..count {
        let scale = generator.generate(&constraints)?;
        print_scale(&scale);
    }
    Ok(())
}

fn verify(settings: &Settings, args: &[String]) -> Result<()> {
    let registry = settings.registry()?;
    let scale = Scale::parse(&registry, &args[0], &args[1], &args[2])?;
    if scale.verify(&args[3]) {
        println!("Correct: {} is {}", scale.name(), scale.pattern_string());
    } else {
        println!("Incorrect: {} is not {}", scale.name(), args[3]);
    }
    Ok(())
}

fn drill(settings: &Settings, rounds: usize, seed: Option<u64>) -> Result<()> {
    let mut generator = generator(settings.registry()?, seed);
    let constraints = settings.constraints();
    let mut board = ScoreBoard::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Name each scale's pattern (e.g. WWHWWWH) or type its name.");
    println!("An empty line skips the round.");

    'rounds: for number in 1..=rounds {
        let mut round = Round::new(generator.generate(&constraints)?);
        println!();
        println!("Round {} of {}", number, rounds);
        println!(
            "  {} clef: {}",
            round.scale().clef().name(),
            round.scale().labels(true).join(" ")
        );

        loop {
            print!("  guess ({:.2} points)> ", round.value());
            io::stdout().flush()?;

            let line = match lines.next() {
                Some(line) => line.context("Failed to read guess")?,
                None => {
                    board.record_failure();
                    break 'rounds;
                }
            };
            let guess = line.trim();
            if guess.is_empty() {
                println!("  It was {} ({})", round.scale().name(), round.scale().pattern_string());
                board.record_failure();
                break;
            }

            let outcome = if guess.chars().all(|c| matches!(c, 'H' | 'W' | '3')) {
                round.guess(guess)
            } else {
                match round.guess_scale_type(generator.registry(), guess) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        println!("  {}", e);
                        continue;
                    }
                }
            };
            board.record(outcome);

            match outcome {
                GuessOutcome::Correct { awarded } => {
                    println!("  Correct, {} (+{:.2})", round.scale().name(), awarded);
                    break;
                }
                GuessOutcome::Incorrect { remaining } => {
                    println!("  Not quite, now worth {:.2}", remaining);
                }
            }
        }
    }

    println!();
    println!(
        "Score {:.2} ({} solved, {} missed)",
        board.score(),
        board.solved(),
        board.failed()
    );
    Ok(())
}

fn watch(path: &str) -> Result<()> {
    let settings = Settings::load(path)?;
    println!("Watching {} (press Ctrl+C to stop)", path);
    println!("  clefs: {}", settings.clefs.join(", "));

    let watcher = SettingsWatcher::new(path, None)?;
    while let Some(event) = watcher.recv() {
        match event {
            SettingsEvent::Reloaded(settings) => {
                println!("Reloaded settings");
                println!("  scale types: {}", settings.scale_types.join(", "));
                println!("  clefs: {}", settings.clefs.join(", "));
                println!("  ledger: {:?}", settings.ledger_limits());
            }
            SettingsEvent::Error(message) => println!("Error: {}", message),
            SettingsEvent::FileCreated(p) => println!("Created {:?}", p),
            SettingsEvent::FileDeleted(p) => println!("Deleted {:?}", p),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let verbose = args.iter().any(|a| a == "-v");
    args.retain(|a| a != "-v");
    init_logging(verbose);

    let settings = match args.iter().position(|a| a == "--config") {
        Some(index) => {
            if index + 1 >= args.len() {
                bail!("--config requires a file");
            }
            let path = args.remove(index + 1);
            args.remove(index);
            Settings::load_or_default(&path)?
        }
        None => Settings::default(),
    };

    if args.is_empty() {
        println!("Scale Drill - Scale spelling and sight-reading quiz");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[0].as_str() {
        "--list-scales" => {
            list_scales(&settings.registry()?);
        }
        "--list-clefs" => {
            list_clefs();
        }
        "--playable" => {
            if args.len() < 2 {
                eprintln!("Error: --playable requires a clef name");
                return Ok(());
            }
            let limits = if args.len() >= 4 {
                LedgerLimits::new(
                    parse_number(&args[2], "ledger limit")?,
                    parse_number(&args[3], "ledger limit")?,
                )
            } else {
                settings.ledger_limits()
            };
            list_playable(&args[1], limits)?;
        }
        "--generate" => {
            let seed = take_seed(&mut args)?;
            let count = match args.get(1) {
                Some(n) => parse_number(n, "count")?,
                None => 1,
            };
            generate(&settings, count, seed)?;
        }
        "--verify" => {
            if args.len() < 5 {
                eprintln!("Error: --verify requires a scale, start note, clef and pattern");
                return Ok(());
            }
            verify(&settings, &args[1..5])?;
        }
        "--drill" => {
            let seed = take_seed(&mut args)?;
            let rounds = match args.get(1) {
                Some(n) => parse_number(n, "round count")?,
                None => 5,
            };
            drill(&settings, rounds, seed)?;
        }
        "--watch" => {
            if args.len() < 2 {
                eprintln!("Error: --watch requires a file");
                return Ok(());
            }
            watch(&args[1])?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[0]);
            print_usage();
        }
    }

    Ok(())
}
