#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use crewroster::{
    io,
    model::{parse_date, DateRange, LeaveRequestId, LeaveStatus, PilotId, Rank},
    period::ReferenceAnchor,
    storage::{JsonStorage, Storage},
    EngineConfig, LeaveEngine, Severity, TextAlert,
};

/// CLI du moteur de roster (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de configuration (ancre + effectif minimum)
    #[arg(long, global = true, default_value = "engine.json")]
    config: String,

    /// Fichier JSON de l'instantané pilotes/congés
    #[arg(long, global = true, default_value = "fleet.json")]
    fleet: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Période contenant une date (ou un code RPn/aaaa)
    Period {
        /// YYYY-MM-DD
        #[arg(long, conflicts_with = "code")]
        date: Option<String>,
        #[arg(long)]
        code: Option<String>,
        /// Date de référence pour les jours restants (défaut : aujourd'hui UTC)
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Périodes couvertes par un intervalle
    Periods {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Prochaines périodes à partir d'aujourd'hui
    Upcoming {
        #[arg(long, default_value_t = 6)]
        count: usize,
        #[arg(long)]
        today: Option<String>,
    },

    /// Importer des pilotes depuis un CSV
    ImportPilots {
        #[arg(long)]
        csv: String,
    },

    /// Importer des demandes de congé depuis un CSV
    ImportLeave {
        #[arg(long)]
        csv: String,
    },

    /// Lister et optionnellement exporter l'instantané
    List {
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Conflits d'une demande (même rang, dates qui se chevauchent)
    Conflicts {
        /// identifiant du pilote demandeur
        #[arg(long)]
        pilot: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// demande à ignorer (édition d'une demande existante)
        #[arg(long)]
        exclude: Option<String>,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Vérifier l'effectif minimum sur un intervalle
    Availability {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        exclude: Option<String>,
        #[arg(long)]
        report: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// État de la fenêtre de revue pour la prochaine période
    Review {
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Approuver ou refuser une demande
    Decide {
        #[arg(long)]
        request: String,
        #[arg(value_enum)]
        decision: Decision,
        /// Approuver même si l'effectif minimum n'est plus atteint
        #[arg(long)]
        force: bool,
    },

    /// Nouvelle version de l'ancre (le fichier de config est réécrit, l'historique conservé)
    MigrateAnchor {
        #[arg(long)]
        period_number: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        start: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Decision {
    Approve,
    Deny,
}

fn main() -> Result<()> {
    let Cli {
        log,
        config,
        fleet,
        cmd,
    } = Cli::parse();

    #[cfg(feature = "logging")]
    if log {
        crewroster::logging::init();
    }
    #[cfg(not(feature = "logging"))]
    let _ = log;

    let storage = JsonStorage::open(&fleet)?;

    let code = match cmd {
        Commands::Period {
            date,
            code,
            today,
            json,
        } => {
            let engine = load_engine(&config)?;
            let calc = engine.calculator();
            let today = today_or(today)?;
            let period = match (date, code) {
                (_, Some(code)) => calc.period_by_code(&code)?,
                (Some(date), None) => calc.period_for_date(parse_date(&date)?)?,
                (None, None) => calc.current_period(today)?,
            };
            let overview = period.overview(today);
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                println!(
                    "{} | {} → {} | {} day(s) remaining",
                    period.code, period.start_date, period.end_date, overview.days_remaining
                );
            }
            0
        }
        Commands::Periods {
            start,
            end,
            out_csv,
        } => {
            let engine = load_engine(&config)?;
            let range = DateRange::parse(&start, &end)?;
            let periods: Vec<_> = engine.calculator().periods_in_range(&range)?.collect();
            if let Some(path) = out_csv {
                io::export_periods_csv(path, &periods)?;
            }
            for p in &periods {
                println!("{} | {} → {}", p.code, p.start_date, p.end_date);
            }
            0
        }
        Commands::Upcoming { count, today } => {
            let engine = load_engine(&config)?;
            let today = today_or(today)?;
            for p in engine.calculator().future_periods(count, today)? {
                println!("{} | {} → {}", p.code, p.start_date, p.end_date);
            }
            0
        }
        Commands::ImportPilots { csv } => {
            let mut snapshot = storage.load_or_default()?;
            let pilots = io::import_pilots_csv(csv)?;
            for pilot in pilots {
                if snapshot.find_pilot(&pilot.id).is_some() {
                    bail!("duplicate pilot id: {}", pilot.id.as_str());
                }
                snapshot.pilots.push(pilot);
            }
            let expected = snapshot.revision;
            storage.commit(&snapshot, expected)?;
            0
        }
        Commands::ImportLeave { csv } => {
            let mut snapshot = storage.load_or_default()?;
            let requests = io::import_leave_csv(csv, Utc::now())?;
            for request in requests {
                if snapshot.find_request(&request.id).is_some() {
                    bail!("duplicate leave request id: {}", request.id.as_str());
                }
                snapshot.leave_requests.push(request);
            }
            let expected = snapshot.revision;
            storage.commit(&snapshot, expected)?;
            0
        }
        Commands::List { out_json } => {
            let snapshot = storage.load()?;
            if let Some(path) = out_json {
                io::export_fleet_json(path, &snapshot)?;
            }
            for rank in Rank::ALL {
                let mut pilots: Vec<_> =
                    snapshot.pilots.iter().filter(|p| p.rank == rank).collect();
                pilots.sort_by_key(|p| p.seniority_number);
                for p in pilots {
                    println!(
                        "{} | {} | {} | #{}{}",
                        p.id.as_str(),
                        p.name,
                        p.rank,
                        p.seniority_number,
                        if p.active { "" } else { " (inactive)" }
                    );
                }
            }
            for r in &snapshot.leave_requests {
                println!(
                    "{} | {} | {} → {} | {}",
                    r.id.as_str(),
                    r.pilot_id.as_str(),
                    r.start_date,
                    r.end_date,
                    r.status
                );
            }
            0
        }
        Commands::Conflicts {
            pilot,
            start,
            end,
            exclude,
            report,
            json,
        } => {
            let engine = load_engine(&config)?;
            let snapshot = storage.load()?;
            let range = DateRange::parse(&start, &end)?;
            let exclude = exclude.map(LeaveRequestId::new);
            let result = engine.detect_conflicts(
                &snapshot,
                &PilotId::new(pilot),
                &range,
                exclude.as_ref(),
            )?;
            if let Some(path) = report {
                io::export_conflicts_csv(path, &result)?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if !result.has_conflicts {
                println!("OK: no conflicts ({})", result.roster_periods.join(", "));
            } else {
                eprintln!("Found {} conflict(s)", result.conflict_count);
                for c in &result.conflicts {
                    println!(
                        "{} | {} (#{}) | {} → {} | {}{}",
                        c.request_id.as_str(),
                        c.pilot_name,
                        c.seniority_number,
                        c.start_date,
                        c.end_date,
                        c.status,
                        if c.has_priority { " | priority" } else { "" }
                    );
                }
            }
            // Code 2 = WARNING
            if result.has_conflicts {
                2
            } else {
                0
            }
        }
        Commands::Availability {
            start,
            end,
            exclude,
            report,
            json,
        } => {
            let engine = load_engine(&config)?;
            let snapshot = storage.load()?;
            let range = DateRange::parse(&start, &end)?;
            let exclude = exclude.map(LeaveRequestId::new);
            let result = engine.check_availability(&snapshot, &range, exclude.as_ref())?;
            if let Some(path) = report {
                io::export_availability_csv(path, &result)?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for rank in Rank::ALL {
                    let r = result.for_rank(rank);
                    println!(
                        "{rank}: {}/{} available ({} on leave, minimum {}){}",
                        r.available,
                        r.total,
                        r.on_leave,
                        r.minimum,
                        if r.meets_minimum { "" } else { " BELOW MINIMUM" }
                    );
                }
            }
            if result.is_sufficient() {
                0
            } else {
                2
            }
        }
        Commands::Review { today, json } => {
            let engine = load_engine(&config)?;
            let snapshot = storage.load_or_default()?;
            let today = today_or(today)?;
            let summary = engine.review(&snapshot, today, &TextAlert)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("[{:?}] {}", summary.alert.severity, summary.alert.message);
                for id in &summary.pending_request_ids {
                    println!("pending: {}", id.as_str());
                }
            }
            if summary.alert.severity == Severity::Urgent && !summary.pending_request_ids.is_empty()
            {
                2
            } else {
                0
            }
        }
        Commands::Decide {
            request,
            decision,
            force,
        } => {
            let engine = load_engine(&config)?;
            let mut snapshot = storage.load()?;
            let expected = snapshot.revision;
            let rid = LeaveRequestId::new(request);

            let status = match decision {
                Decision::Approve => {
                    let projection = engine.project_approval(&snapshot, &rid)?;
                    if !projection.is_sufficient() && !force {
                        bail!(
                            "approving {} would leave crew below minimum (captains {}/{}, first officers {}/{}); use --force to override",
                            rid.as_str(),
                            projection.captains.available,
                            projection.captains.minimum,
                            projection.first_officers.available,
                            projection.first_officers.minimum
                        );
                    }
                    let conflicts = engine.conflicts_for_request(&snapshot, &rid)?;
                    for c in conflicts.conflicts.iter().filter(|c| c.has_priority) {
                        eprintln!(
                            "Warning: more senior request {} ({}, #{}) overlaps",
                            c.request_id.as_str(),
                            c.pilot_name,
                            c.seniority_number
                        );
                    }
                    LeaveStatus::Approved
                }
                Decision::Deny => LeaveStatus::Denied,
            };

            snapshot
                .find_request_mut(&rid)
                .with_context(|| format!("unknown leave request: {}", rid.as_str()))?
                .decide(status)?;
            let revision = storage.commit(&snapshot, expected)?;
            println!("{} -> {} (revision {revision})", rid.as_str(), status);
            0
        }
        Commands::MigrateAnchor {
            period_number,
            year,
            start,
            reason,
        } => {
            let current = EngineConfig::load_from_file(&config)?;
            let anchor = ReferenceAnchor {
                period_number,
                year,
                period_start_date: parse_date(&start)?,
            };
            let next = current.migrate_anchor(anchor, reason)?;
            next.save_to_file(&config)?;
            let active = next.active_anchor()?;
            println!(
                "anchor v{}: RP{}/{} starts {}",
                active.version,
                active.anchor.period_number,
                active.anchor.year,
                active.anchor.period_start_date
            );
            0
        }
    };

    std::process::exit(code);
}

fn load_engine(path: &str) -> Result<LeaveEngine> {
    let config = EngineConfig::load_from_file(path)?;
    Ok(LeaveEngine::from_config(&config)?)
}

fn today_or(raw: Option<String>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => Ok(parse_date(&raw)?),
        None => Ok(Utc::now().date_naive()),
    }
}
