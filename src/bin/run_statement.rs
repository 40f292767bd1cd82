//! Host driver: eligibility, career simulation, and arrears statement CSV
//!
//! Single-profile mode reads a faculty profile JSON, evaluates the next CAS
//! step, reconstructs the drawn basic at the arrears start date, and writes
//! the month-by-month statement to CSV. Batch mode evaluates eligibility
//! for many profiles in parallel (the engines are pure over shared
//! read-only tables).

use anyhow::{Context, Result};
use cas_pay_system::{
    compute_arrears, evaluate_eligibility,
    dates::july_firsts_between,
    fixation::{fix, fix_strict, historical_basic},
    simulator::simulate_career,
    tables::loader,
    ArrearsRequest, DaRateHistory, FacultyProfile, PayMatrix, TaSlabTable,
};
use chrono::NaiveDate;
use clap::Parser;
use rayon::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "CAS eligibility, career simulation and arrears statements")]
struct Args {
    /// Faculty profile JSON file (single-profile mode)
    #[arg(long, conflicts_with = "batch")]
    profile: Option<PathBuf>,

    /// CSV of faculty profiles for parallel eligibility evaluation
    /// (table overrides do not apply; eligibility reads no tables)
    #[arg(long, conflicts_with_all = ["pay_matrix", "da_rates", "ta_slabs"])]
    batch: Option<PathBuf>,

    /// Arrears start date (default: the evaluated due date)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Arrears end date (default: today)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Output CSV path for the arrears statement
    #[arg(long, default_value = "arrears_statement.csv")]
    out: PathBuf,

    /// Pay matrix CSV (default: built-in 7th CPC matrix)
    #[arg(long)]
    pay_matrix: Option<PathBuf>,

    /// DA rate history CSV (default: built-in 7th CPC history)
    #[arg(long)]
    da_rates: Option<PathBuf>,

    /// TA slab CSV (default: built-in 7th CPC slabs)
    #[arg(long)]
    ta_slabs: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(batch) = &args.batch {
        return run_batch(batch);
    }

    let matrix = match &args.pay_matrix {
        Some(path) => loader::load_pay_matrix(path)
            .map_err(|e| anyhow::anyhow!("loading pay matrix: {e}"))?,
        None => PayMatrix::default_7cpc(),
    };
    let da_history = match &args.da_rates {
        Some(path) => loader::load_da_rates(path)
            .map_err(|e| anyhow::anyhow!("loading DA rates: {e}"))?,
        None => DaRateHistory::default_7cpc(),
    };
    let ta_slabs = match &args.ta_slabs {
        Some(path) => loader::load_ta_slabs(path)
            .map_err(|e| anyhow::anyhow!("loading TA slabs: {e}"))?,
        None => TaSlabTable::default_7cpc(),
    };

    let profile_path = args
        .profile
        .as_ref()
        .context("either --profile or --batch is required")?;
    let file = File::open(profile_path)
        .with_context(|| format!("opening profile {}", profile_path.display()))?;
    let profile: FacultyProfile =
        serde_json::from_reader(file).context("parsing profile JSON")?;

    run_single(&profile, &matrix, &da_history, &ta_slabs, &args)
}

fn run_single(
    profile: &FacultyProfile,
    matrix: &PayMatrix,
    da_history: &DaRateHistory,
    ta_slabs: &TaSlabTable,
    args: &Args,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let end = args.end.unwrap_or(today);

    let eligibility = evaluate_eligibility(profile, profile.current_level)?;
    println!(
        "Eligibility {} -> {}: {} (due {})",
        profile.current_level,
        eligibility.target_level,
        if eligibility.eligible { "eligible" } else { "not eligible" },
        eligibility.due_date
    );
    for waiver in &eligibility.waivers {
        println!("  flag: {waiver}");
    }
    if !eligibility.eligible {
        println!("  reason: {}", eligibility.reason);
    }

    // Strict suggestion from the basic on file; off-table basics only warn,
    // the arrears flow below reconstructs the drawn basic tolerantly.
    match fix_strict(
        matrix,
        profile.current_basic,
        profile.current_level,
        eligibility.target_level,
    ) {
        Ok(f) => println!(
            "Fixation from current basic {}: cell {} basic {} (notional {})",
            profile.current_basic, f.new_cell, f.new_basic, f.notional
        ),
        Err(e) => log::warn!("no on-table fixation from current basic: {e}"),
    }

    let simulation = simulate_career(profile, matrix, end)?;
    println!("\nCareer replay ({} promotions):", simulation.events.len());
    for ev in &simulation.events {
        println!(
            "  {} -> {} effective {} at basic {}",
            ev.from_level, ev.to_level, ev.effective_date, ev.fixed_basic
        );
    }
    println!(
        "  final: level {} basic {}",
        simulation.final_level, simulation.final_basic
    );

    let start = args.start.unwrap_or(eligibility.due_date);

    // Roll the current basic back one increment per July 1 between the
    // start date and today to recover the drawn basic at the start date.
    let years_back = july_firsts_between(start, today);
    let drawn_basic = match historical_basic(
        matrix,
        profile.current_level,
        profile.current_basic,
        years_back,
    ) {
        Ok((_, basic)) => basic,
        Err(e) => {
            log::warn!("historical basic reconstruction failed ({e}); using current basic");
            profile.current_basic
        }
    };

    let fixation = fix(matrix, drawn_basic, profile.current_level, eligibility.target_level)?;
    let ta_amount = ta_slabs.amount_for(eligibility.target_level, profile.city_class);

    let request = ArrearsRequest {
        start_date: start,
        end_date: end,
        drawn_start_basic: drawn_basic,
        due_start_basic: fixation.new_basic,
        drawn_level: profile.current_level,
        due_level: eligibility.target_level,
        city_class: profile.city_class,
        ta_amount,
    };
    let statement = compute_arrears(matrix, da_history, &request)?;

    let out = File::create(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    let mut writer = csv::Writer::from_writer(out);
    for record in &statement.records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    println!(
        "\nArrears {} to {}: {} months, total {}",
        start,
        end,
        statement.records.len(),
        statement.total_arrears()
    );
    println!("Statement written to {}", args.out.display());
    Ok(())
}

fn run_batch(batch: &PathBuf) -> Result<()> {
    let start = Instant::now();
    let file = File::open(batch).with_context(|| format!("opening batch {}", batch.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let profiles: Vec<FacultyProfile> = rdr
        .deserialize()
        .collect::<std::result::Result<_, _>>()
        .context("parsing batch CSV")?;
    println!("Loaded {} profiles in {:?}", profiles.len(), start.elapsed());

    let results: Vec<_> = profiles
        .par_iter()
        .map(|p| (p, evaluate_eligibility(p, p.current_level)))
        .collect();

    let mut eligible = 0usize;
    for (profile, result) in &results {
        match result {
            Ok(r) => {
                if r.eligible {
                    eligible += 1;
                }
                println!(
                    "{}: {} -> {} due {} ({})",
                    profile.name,
                    profile.current_level,
                    r.target_level,
                    r.due_date,
                    if r.eligible { "eligible" } else { r.reason.as_str() }
                );
            }
            Err(e) => println!("{}: error: {e}", profile.name),
        }
    }
    println!(
        "\n{} of {} profiles eligible; evaluated in {:?}",
        eligible,
        results.len(),
        start.elapsed()
    );
    Ok(())
}
