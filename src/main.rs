use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;

use site_scout::config::Config;
use site_scout::finance::{payback, project_pl, sales_from_score, CostStructure, Payback, Projection};
use site_scout::huff::{cannibalization_impact, grid_around, CannibalizationReport};
use site_scout::locations::{BrandSite, CandidateLocation};
use site_scout::ranking::{rank_with, RankedCandidate};
use site_scout::scoring::{strategy_for, validate_config, ScoringResult, StrategyKind};

// Exit codes: config problems and input problems are distinguishable in scripts
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank candidate locations by viability score
    Rank {
        /// Path to a JSON file with candidate location records
        #[arg(long)]
        candidates: PathBuf,

        /// Override the scoring strategy from the config
        #[arg(long)]
        strategy: Option<StrategyKind>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show the factor breakdown and P&L projection for one candidate
    Inspect {
        /// Candidate id as it appears in the candidates file
        id: String,

        #[arg(long)]
        candidates: PathBuf,

        #[arg(long)]
        strategy: Option<StrategyKind>,

        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Estimate trade-area cannibalization of existing brand sites
    Impact {
        /// Candidate id as it appears in the candidates file
        id: String,

        #[arg(long)]
        candidates: PathBuf,

        /// Path to a JSON file with existing brand sites
        #[arg(long)]
        sites: PathBuf,

        /// Half-extent of the demand grid around the candidate, km
        #[arg(long, default_value_t = 3.0)]
        grid_km: f64,

        /// Demand grid resolution per axis
        #[arg(long, default_value_t = 9)]
        grid_steps: u32,

        /// Attractiveness assumed for the candidate site
        #[arg(long, default_value_t = 1.0)]
        attractiveness: f64,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "site-scout")]
#[command(about = "Franchise site-selection scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/site-scout/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Everything `inspect --json` emits for one candidate.
#[derive(Serialize)]
struct InspectReport {
    scoring: ScoringResult,
    projection: Projection,
    payback: Payback,
}

fn load_validated_config(path: Option<PathBuf>, verbose: bool) -> Config {
    let config = match site_scout::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            exit(EXIT_CONFIG);
        }
    };

    // Validate the policy at startup; never run a batch on invalid weights
    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        exit(EXIT_CONFIG);
    }

    if verbose {
        eprintln!(
            "Config loaded: strategy={:?}, viable>={}, evaluate>={}",
            config.scoring.strategy,
            config.scoring.thresholds.viable,
            config.scoring.thresholds.evaluate
        );
    }

    config
}

fn load_validated_candidates(path: &PathBuf, verbose: bool) -> Vec<CandidateLocation> {
    let candidates = match site_scout::locations::load_candidates(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Input error: {}", e);
            exit(EXIT_INPUT);
        }
    };

    let mut any_invalid = false;
    for candidate in &candidates {
        if let Err(errors) = site_scout::locations::validate_candidate(candidate) {
            any_invalid = true;
            eprintln!("Invalid candidate '{}':", candidate.id);
            for error in errors {
                eprintln!("  - {}", error);
            }
        }
    }
    if any_invalid {
        exit(EXIT_INPUT);
    }

    if verbose {
        eprintln!("Loaded {} candidates from {}", candidates.len(), path.display());
    }

    candidates
}

fn load_validated_sites(path: &PathBuf, verbose: bool) -> Vec<BrandSite> {
    let sites = match site_scout::locations::load_sites(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {}", e);
            exit(EXIT_INPUT);
        }
    };

    let mut any_invalid = false;
    for site in &sites {
        if let Err(errors) = site_scout::locations::validate_site(site) {
            any_invalid = true;
            eprintln!("Invalid site '{}':", site.id);
            for error in errors {
                eprintln!("  - {}", error);
            }
        }
    }
    if any_invalid {
        exit(EXIT_INPUT);
    }

    if verbose {
        eprintln!("Loaded {} existing sites from {}", sites.len(), path.display());
    }

    sites
}

fn take_candidate(candidates: Vec<CandidateLocation>, id: &str) -> CandidateLocation {
    match candidates.into_iter().find(|c| c.id == id) {
        Some(c) => c,
        None => {
            eprintln!("No candidate with id '{}' in the candidates file.", id);
            exit(EXIT_INPUT);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();
    let config_path = cli.config.clone().map(PathBuf::from);

    match cli.command {
        Commands::Rank {
            candidates,
            strategy,
            tsv,
        } => {
            let mut config = load_validated_config(config_path, cli.verbose);
            if let Some(kind) = strategy {
                config.scoring.strategy = kind;
            }
            let batch = load_validated_candidates(&candidates, cli.verbose);
            let strategy = strategy_for(config.scoring.strategy);

            let ranked = rank_with(batch, &config, strategy);

            if tsv {
                let output = site_scout::output::format_tsv(&ranked);
                if !output.is_empty() {
                    println!("{}", output);
                }
            } else {
                let use_colors = site_scout::output::should_use_colors();
                if cli.verbose && !ranked.is_empty() {
                    for entry in &ranked {
                        println!(
                            "{}",
                            site_scout::output::format_candidate_detail(entry, use_colors)
                        );
                        println!();
                    }
                } else {
                    println!(
                        "{}",
                        site_scout::output::format_ranked_table(&ranked, use_colors)
                    );
                }
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} candidates in {:?}",
                    ranked.len(),
                    start_time.elapsed()
                );
            }
        }
        Commands::Inspect {
            id,
            candidates,
            strategy,
            json,
        } => {
            let mut config = load_validated_config(config_path, cli.verbose);
            if let Some(kind) = strategy {
                config.scoring.strategy = kind;
            }
            let batch = load_validated_candidates(&candidates, cli.verbose);
            let candidate = take_candidate(batch, &id);

            let strategy = strategy_for(config.scoring.strategy);
            let result = strategy.evaluate(&candidate, &config);

            // Projection: score-driven sales, asking rent when known
            let monthly_sales = sales_from_score(result.score, &config.business);
            let monthly_rent = candidate
                .monthly_rent
                .as_ref()
                .map(|rent| rent.value)
                .unwrap_or(0.0);
            let costs = CostStructure::default();
            let projection = project_pl(monthly_sales, monthly_rent, &costs);
            let recovery = payback(config.business.base_investment, projection.net_profit);

            if json {
                let report = InspectReport {
                    scoring: result,
                    projection,
                    payback: recovery,
                };
                match serde_json::to_string_pretty(&report) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {}", e);
                        exit(EXIT_INPUT);
                    }
                }
            } else {
                let use_colors = site_scout::output::should_use_colors();
                let entry = RankedCandidate { candidate, result };
                println!(
                    "{}",
                    site_scout::output::format_candidate_detail(&entry, use_colors)
                );
                if entry.candidate.monthly_rent.is_none() {
                    eprintln!("Note: no rent on record, projection assumes rent 0.");
                }
                println!(
                    "{}",
                    site_scout::output::format_projection(&projection, &recovery, use_colors)
                );
            }
        }
        Commands::Impact {
            id,
            candidates,
            sites,
            grid_km,
            grid_steps,
            attractiveness,
            json,
        } => {
            let config = load_validated_config(config_path, cli.verbose);
            let batch = load_validated_candidates(&candidates, cli.verbose);
            let candidate = take_candidate(batch, &id);
            let existing = load_validated_sites(&sites, cli.verbose);

            if !attractiveness.is_finite() || attractiveness <= 0.0 {
                eprintln!("--attractiveness must be positive, got {}", attractiveness);
                exit(EXIT_INPUT);
            }
            if !grid_km.is_finite() || grid_km <= 0.0 {
                eprintln!("--grid-km must be positive, got {}", grid_km);
                exit(EXIT_INPUT);
            }

            if cli.verbose {
                let coords: Vec<(f64, f64)> =
                    existing.iter().map(|s| (s.lat, s.lon)).collect();
                if let Some(d) =
                    site_scout::geo::nearest_distance_km(candidate.lat, candidate.lon, &coords)
                {
                    eprintln!("Nearest existing site is {:.1} km from the candidate", d);
                }
            }

            let candidate_site = BrandSite {
                id: candidate.id.clone(),
                lat: candidate.lat,
                lon: candidate.lon,
                attractiveness,
            };
            let demand = grid_around((candidate.lat, candidate.lon), grid_km, grid_steps);
            if cli.verbose {
                eprintln!(
                    "Demand grid: {} points, {:.1} km half-extent, lambda {}",
                    demand.len(),
                    grid_km,
                    config.huff.lambda
                );
            }

            let report =
                cannibalization_impact(&existing, &candidate_site, &demand, config.huff.lambda);

            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {}", e);
                        exit(EXIT_INPUT);
                    }
                }
            } else {
                print_impact_report(&candidate.id, &report);
            }
        }
        Commands::Init => {
            if let Err(e) = site_scout::config::run_init_wizard(config_path) {
                eprintln!("Init error: {}", e);
                exit(EXIT_CONFIG);
            }
        }
    }

    exit(EXIT_SUCCESS);
}

fn print_impact_report(candidate_id: &str, report: &CannibalizationReport) {
    println!(
        "Candidate '{}' captures {:.1}% of the trade area",
        candidate_id,
        report.candidate_share * 100.0
    );
    if report.impacts.is_empty() {
        println!("No existing sites in range to cannibalize.");
    } else {
        for impact in &report.impacts {
            println!(
                "  {:<20} {:>5.1}% -> {:>5.1}%  (loses {:.1}% of its demand)",
                impact.id,
                impact.baseline_share * 100.0,
                impact.projected_share * 100.0,
                impact.cannibalization_pct
            );
        }
    }
    if report.undefined_points > 0 {
        println!(
            "({} demand points had no pull from any site and were excluded)",
            report.undefined_points
        );
    }
}
