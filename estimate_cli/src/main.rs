//! # Gryphon Estimator CLI
//!
//! Prompt-driven estimate runner. Asks for the building basics, prices
//! them, prints the breakdown and saves a snapshot when the settings name a
//! storage path.
//!
//! ```text
//! estimate_cli [settings.json]
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use estimate_core::model::{palette_name, BuildingPatch, ConcreteKind, ConcretePatch, LegType};
use estimate_core::units::Feet;
use estimate_core::{load_settings, EstimateStore, EstimatorSettings, FileSnapshotStore};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    prompt_line(prompt).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn prompt_leg_type(default: LegType) -> LegType {
    match prompt_line("Leg type (s)tandard / (c)ertified [s]: ").as_deref() {
        Some("c") | Some("C") | Some("certified") => LegType::Certified,
        Some("s") | Some("S") | Some("standard") => LegType::Standard,
        _ => default,
    }
}

fn prompt_concrete(default: ConcreteKind) -> ConcreteKind {
    match prompt_line("Concrete (n)one / (p)iers / (s)lab / (t)urnkey [n]: ").as_deref() {
        Some("p") | Some("piers") => ConcreteKind::Piers,
        Some("s") | Some("slab") => ConcreteKind::Slab,
        Some("t") | Some("turnkey") => ConcreteKind::Turnkey,
        Some("n") | Some("none") => ConcreteKind::None,
        _ => default,
    }
}

fn init_logging(settings: &EstimatorSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "estimator".to_string())
}

fn format_money(amount: Decimal) -> String {
    format!("${:>12}", amount.round_dp(2))
}

fn main() {
    let settings = match std::env::args().nth(1) {
        Some(path) => match load_settings(Path::new(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => EstimatorSettings::default(),
    };
    init_logging(&settings);
    tracing::debug!(storage = ?settings.storage_path, miles = %settings.delivery_miles, "Settings loaded");

    println!("Gryphon Metal Buildings - Estimator");
    println!("===================================");
    println!();

    let mut store = EstimateStore::new(&settings);
    let mut adapter = settings
        .storage_path
        .as_ref()
        .map(|path| FileSnapshotStore::new(path.clone(), current_user()));

    if let Some(adapter) = &adapter {
        match store.load_estimate(adapter) {
            Ok(true) => println!("Resumed saved estimate from {}", adapter.path().display()),
            Ok(false) => {}
            Err(e) => eprintln!("Could not load saved estimate ({}), starting fresh", e),
        }
        println!();
    }

    let building = store.building().clone();
    let width = prompt_u32(&format!("Width (ft) [{}]: ", building.width.0), building.width.0);
    let length = prompt_u32(&format!("Length (ft) [{}]: ", building.length.0), building.length.0);
    let leg_type = prompt_leg_type(building.leg_type);
    let concrete = prompt_concrete(store.concrete().kind);

    store.set_building_config(BuildingPatch {
        width: Some(Feet(width)),
        length: Some(Feet(length)),
        leg_type: Some(leg_type),
        ..Default::default()
    });
    store.set_concrete_config(ConcretePatch {
        kind: Some(concrete),
        ..Default::default()
    });

    let building = store.building();
    if building.width.0 != width || building.length.0 != length {
        println!();
        println!(
            "Note: {}x{} is not a standard size; keeping {}x{}",
            width, length, building.width, building.length
        );
    }

    println!();
    println!("═══════════════════════════════════════");
    println!("  ESTIMATE");
    println!("═══════════════════════════════════════");
    println!();
    println!("  Building: {} x {} ({})", building.width, building.length, store.square_footage());
    println!("  Frame:    {}", building.leg_type);
    println!("  Concrete: {}", store.concrete().kind);
    let colors = store.colors();
    println!(
        "  Colors:   roof {}, walls {}, trim {}",
        palette_name(&colors.roof),
        palette_name(&colors.walls),
        palette_name(&colors.trim)
    );
    let customer = store.customer();
    if customer.is_complete() {
        println!("  Customer: {}", customer.name);
    } else {
        println!("  Customer: (details incomplete)");
    }
    let contract = if store.contract().is_executed() { "signed" } else { "not signed" };
    println!("  Contract: {}", contract);
    println!();
    for (label, amount) in store.pricing().line_items() {
        println!("  {:<14}{}", label, format_money(amount));
    }
    println!("  {:<14}{}", "Balance Due", format_money(store.pricing().balance_due()));
    println!("═══════════════════════════════════════");

    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(store.pricing()) {
        println!("{}", json);
    }

    if let Some(adapter) = adapter.as_mut() {
        match store.save_estimate(adapter) {
            Ok(()) => println!("Saved to {}", adapter.path().display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
                process::exit(1);
            }
        }
    }
}
