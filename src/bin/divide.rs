use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use team_divider::config::{self, DividerConfig};
use team_divider::divide::{Division, divide_teams};
use team_divider::player::{PlayerRecord, RankedPlayer};
use team_divider::summary::{self, TeamSummary};
use team_divider::{fake_roster, roster_csv, team_export};

#[derive(Parser)]
#[command(name = "divide")]
#[command(about = "Split a roster into two teams balanced by win ratio", long_about = None)]
struct Cli {
    /// Roster CSV files with name, games_won and games_played columns
    inputs: Vec<PathBuf>,

    /// Divide a generated demo roster of this many players instead
    #[arg(long, conflicts_with = "inputs")]
    demo: Option<usize>,

    /// Seed for the demo roster
    #[arg(long, requires = "demo")]
    seed: Option<u64>,

    /// Write team1.csv and team2.csv here
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Write an XLSX workbook (single roster only)
    #[arg(long)]
    xlsx: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

enum Job {
    File(PathBuf),
    Demo { size: usize, seed: Option<u64> },
}

impl Job {
    fn label(&self) -> String {
        match self {
            Job::File(path) => path.display().to_string(),
            Job::Demo { size, .. } => format!("demo roster ({size})"),
        }
    }

    fn load(&self) -> Result<Vec<PlayerRecord>> {
        match self {
            Job::File(path) => roster_csv::read_roster_path(path)
                .with_context(|| format!("failed reading roster {}", path.display())),
            Job::Demo { size, seed } => Ok(fake_roster::demo_roster(*size, *seed)),
        }
    }
}

fn main() -> ExitCode {
    config::load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when at least one roster could not be divided.
fn run(cli: Cli) -> Result<bool> {
    let cfg = DividerConfig::from_env();
    let jobs = collect_jobs(&cli, &cfg)?;
    if cli.xlsx.is_some() && jobs.len() > 1 {
        bail!("--xlsx needs a single roster, got {}", jobs.len());
    }

    // Each roster is loaded and divided independently; results keep input order.
    let results: Vec<(String, Result<Division>)> = jobs
        .par_iter()
        .map(|job| {
            let label = job.label();
            let division = job.load().and_then(|roster| {
                divide_teams(&roster).with_context(|| format!("cannot divide {label}"))
            });
            (label, division)
        })
        .collect();

    let multiple = results.len() > 1;
    let labels: Vec<&str> = results.iter().map(|(label, _)| label.as_str()).collect();
    let out_dirs = output_dir_names(&labels);

    let mut all_ok = true;
    let mut documents = Vec::new();
    for ((label, result), dir_name) in results.iter().zip(&out_dirs) {
        let division = match result {
            Ok(division) => division,
            Err(err) => {
                eprintln!("error: {err:#}");
                all_ok = false;
                continue;
            }
        };

        if cli.json {
            let doc = team_export::division_value(division)?;
            if multiple {
                documents.push(serde_json::json!({ "roster": label, "division": doc }));
            } else {
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }
        } else {
            print_division(label, division);
        }

        if let Err(err) = export(&cli, label, division, multiple.then_some(dir_name.as_str())) {
            eprintln!("error: {err:#}");
            all_ok = false;
        }
    }

    if cli.json && multiple {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }
    Ok(all_ok)
}

/// Write the requested files for one roster. `sub_dir` splits `--out-dir` per roster.
fn export(cli: &Cli, label: &str, division: &Division, sub_dir: Option<&str>) -> Result<()> {
    if let Some(dir) = &cli.out_dir {
        let dir = match sub_dir {
            Some(name) => dir.join(name),
            None => dir.clone(),
        };
        let report = team_export::write_team_csvs(&dir, division)
            .with_context(|| format!("cannot export teams for {label}"))?;
        info!(
            team1 = %report.team1_path.display(),
            team2 = %report.team2_path.display(),
            rows = report.rows,
            "wrote team csv files"
        );
    }
    if let Some(path) = &cli.xlsx {
        let report = team_export::write_workbook(path, division)
            .with_context(|| format!("cannot write workbook for {label}"))?;
        info!(path = %report.path.display(), sheets = report.sheets, "wrote workbook");
    }
    Ok(())
}

fn collect_jobs(cli: &Cli, cfg: &DividerConfig) -> Result<Vec<Job>> {
    if let Some(size) = cli.demo {
        let seed = cli.seed.or(cfg.demo_seed);
        return Ok(vec![Job::Demo { size, seed }]);
    }

    let inputs = if cli.inputs.is_empty() {
        match &cfg.roster_path {
            Some(path) => vec![path.clone()],
            None => bail!("no roster given: pass CSV files, --demo N, or set DIVIDER_ROSTER"),
        }
    } else {
        cli.inputs.clone()
    };

    Ok(inputs.into_iter().map(Job::File).collect())
}

fn file_stem(label: &str) -> String {
    Path::new(label)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roster".to_string())
}

/// One sub-directory name per roster. Repeated stems get `-2`, `-3`, ... in input order.
fn output_dir_names(labels: &[&str]) -> Vec<String> {
    let mut taken = HashSet::new();
    labels
        .iter()
        .map(|label| {
            let stem = file_stem(label);
            let mut name = stem.clone();
            let mut n = 1;
            while !taken.insert(name.clone()) {
                n += 1;
                name = format!("{stem}-{n}");
            }
            name
        })
        .collect()
}

fn print_division(label: &str, division: &Division) {
    let summary = summary::summarize_division(division);
    println!("== {label}");
    print_team(&summary.team1, &division.team1);
    print_team(&summary.team2, &division.team2);
    println!("Strength gap: {:.3}", summary.strength_gap);
    println!();
}

fn print_team(team: &TeamSummary, members: &[RankedPlayer]) {
    println!(
        "{} ({} players, {} won / {} played, strength {:.3})",
        team.label, team.size, team.total_wins, team.total_games, team.strength
    );
    println!("  {:<22} {:>6} {:>7} {:>7}", "name", "won", "played", "ratio");
    for p in members {
        println!(
            "  {:<22} {:>6} {:>7} {:>7.3}",
            p.name(),
            p.games_won(),
            p.games_played(),
            p.win_ratio()
        );
    }
    if let Some(avg) = &team.averages {
        println!(
            "  avg: {:.2} won, {:.2} played, {:.3} ratio",
            avg.games_won, avg.games_played, avg.win_ratio
        );
    }
}
