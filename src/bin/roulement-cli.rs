#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use roulement::{
    io,
    model::{Roster, Week},
    scheduler::{EnumerationStatus, ScheduleOptions, Scheduler, ViolationKind},
    storage::{JsonStorage, Storage},
};
use std::time::Duration;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification hebdomadaire des shifts
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du roster
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des employés depuis un CSV
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },

    /// Afficher la semaine et les horaires des shifts
    Week,

    /// Calculer plusieurs plannings distincts
    Solve {
        #[arg(long, default_value_t = 5)]
        max_solutions: usize,
        #[arg(long, default_value_t = 6)]
        max_shifts_per_week: u32,
        /// Index du premier jour où les congés demandés sont garantis
        #[arg(long, default_value_t = 4)]
        day_off_lead_days: usize,
        #[arg(long)]
        time_limit_secs: Option<u64>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier des solutions exportées contre le roster
    Check {
        #[arg(long)]
        solutions: String,
        #[arg(long, default_value_t = 6)]
        max_shifts_per_week: u32,
        #[arg(long, default_value_t = 4)]
        day_off_lead_days: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster)?;
    let week = Week::canonical();

    let code = match cli.cmd {
        Commands::ImportEmployees { csv } => {
            let mut roster = if storage.path().exists() {
                storage.load()?
            } else {
                Roster::default()
            };
            let employees = io::import_employees_csv(csv)?;
            let n = employees.len();
            io::merge_employees(&mut roster, employees)?;
            storage.save(&roster)?;
            println!("imported {n} employee(s), roster has {}", roster.len());
            0
        }
        Commands::Week => {
            print!("{week}");
            0
        }
        Commands::Solve {
            max_solutions,
            max_shifts_per_week,
            day_off_lead_days,
            time_limit_secs,
            out_json,
            out_csv,
        } => {
            let roster = storage.load()?;
            if roster.is_empty() {
                bail!("roster is empty, import employees first");
            }
            let opts = ScheduleOptions {
                max_shifts_per_week,
                day_off_lead_days,
                max_solutions,
                time_limit: time_limit_secs.map(Duration::from_secs),
            };
            let scheduler = Scheduler::new(&week, &roster, opts)?;
            let set = scheduler.solve();

            for (i, solution) in set.iter().enumerate() {
                println!("Solution {i}");
                print!("{}", io::render_solution(solution));
                println!();
            }
            if let Some(path) = out_json {
                io::export_solutions_json(path, &set)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &set)?;
            }

            match set.status {
                EnumerationStatus::CapReached => 0,
                EnumerationStatus::Infeasible => {
                    eprintln!("No optimal solution found: constraints cannot be satisfied");
                    2
                }
                status => {
                    eprintln!("Stopped after {} solution(s): {status:?}", set.len());
                    if set.is_empty() {
                        2
                    } else {
                        0
                    }
                }
            }
        }
        Commands::Check {
            solutions,
            max_shifts_per_week,
            day_off_lead_days,
        } => {
            let roster = storage.load()?;
            let set = io::load_solutions_json(solutions)?;
            let opts = ScheduleOptions {
                max_shifts_per_week,
                day_off_lead_days,
                ..ScheduleOptions::default()
            };
            let scheduler = Scheduler::new(&week, &roster, opts)?;
            let mut total = 0usize;
            for (i, solution) in set.iter().enumerate() {
                for v in scheduler.check(solution) {
                    total += 1;
                    let kind = match v.kind {
                        ViolationKind::Uncovered => "uncovered",
                        ViolationKind::UnknownEmployee => "unknown-employee",
                        ViolationKind::DailyCap => "daily-cap",
                        ViolationKind::WeeklyCap => "weekly-cap",
                        ViolationKind::NewHirePairing => "new-hire-pairing",
                        ViolationKind::DayOffIgnored => "day-off",
                        ViolationKind::RestAfterClosing => "rest",
                    };
                    eprintln!(
                        "solution {i}: {kind} day={} shift={} employee={}",
                        v.day.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                        v.shift.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                        v.employee.as_deref().unwrap_or("-"),
                    );
                }
            }
            if total == 0 {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {total} violation(s)");
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
    };

    std::process::exit(code);
}
