mod cli;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gamesnd_engine::{load_config, LoadSummary, RecordingDevice, RegistryConfig, SoundRegistry};
use gamesnd_formats::Severity;
use serde::Serialize;

fn main() -> Result<()> {
    env_logger::init();
    let args = cli::parse()?;

    let mut config = match args.config.as_deref() {
        Some(path) => load_config(path)?,
        None => RegistryConfig::default(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }

    let mut registry = SoundRegistry::new(RecordingDevice::new(), config);
    let tables = registry.load_tables(&args.table, args.modular)?;
    for table in &tables {
        println!("table: {}", table.display());
    }
    let defaulted = registry.finish_loading()?;
    registry.open()?;
    println!(
        "sounds: {} game, {} interface, {} flyby species ({defaulted} took retail defaults)",
        registry.gameplay().len(),
        registry.interface().len(),
        registry.flyby_sounds().len()
    );

    let mut loads = LoadSummary::default();
    if args.preload {
        loads.merge(registry.preload_all()?);
    }
    if args.gameplay {
        loads.merge(registry.load_gameplay_set()?);
    }
    if args.interface {
        loads.merge(registry.load_interface_set()?);
    }
    if loads != LoadSummary::default() {
        println!(
            "loads: {} attempted, {} loaded, {} failed, {} skipped",
            loads.attempted, loads.loaded, loads.failed, loads.skipped
        );
    }

    for name in &args.resolve {
        let handle = registry.resolve_gameplay(name);
        println!("resolve game {name:?} -> {handle:?}");
    }
    for name in &args.resolve_interface {
        let handle = registry.resolve_interface(name);
        println!("resolve interface {name:?} -> {handle:?}");
    }

    for name in &args.play {
        let handle = registry.resolve_gameplay(name);
        for _ in 0..args.play_count {
            match registry.play_gameplay(handle) {
                Some(instance) => println!("play {name:?} -> instance {}", instance.0),
                None => println!("play {name:?} -> nothing"),
            }
        }
    }

    let report = registry.report();
    if args.verbose {
        for sound in report.gameplay.iter().chain(&report.interface) {
            println!(
                "  [{}] {} {:?} entries={} priority={:?} limit={:?}",
                sound.index,
                sound.name,
                sound.cycle,
                sound.entries.len(),
                sound.priority,
                sound.limit
            );
        }
    }
    if let Some(path) = args.report_json.as_deref() {
        write_json(path, &report)?;
        println!("report: {}", path.display());
    }
    if let Some(path) = args.events_json.as_deref() {
        write_json(path, registry.device().events())?;
        println!("events: {}", path.display());
    }

    let diagnostics = registry.diagnostics();
    println!(
        "diagnostics: {} warnings, {} errors",
        diagnostics.count(Severity::Warning),
        diagnostics.count(Severity::Error)
    );
    for diagnostic in diagnostics.iter() {
        println!("  {diagnostic}");
    }

    registry.close();
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing JSON output")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
