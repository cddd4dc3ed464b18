use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::divide::{Division, Side};
use crate::player::RankedPlayer;
use crate::summary::{self, DivisionSummary, TeamSummary};

pub const TEAM1_CSV: &str = "team1.csv";
pub const TEAM2_CSV: &str = "team2.csv";

pub struct CsvExportReport {
    pub team1_path: PathBuf,
    pub team2_path: PathBuf,
    pub rows: usize,
}

pub struct WorkbookReport {
    pub path: PathBuf,
    pub sheets: usize,
    pub rows: usize,
}

/// One team as UTF-8 CSV: `name,games_won,games_played,win_ratio`.
pub fn team_csv_bytes(members: &[RankedPlayer]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if members.is_empty() {
        writer
            .write_record(["name", "games_won", "games_played", "win_ratio"])
            .context("write csv header")?;
    }
    for player in members {
        writer
            .serialize(player)
            .with_context(|| format!("serialize player {}", player.name()))?;
    }
    writer
        .into_inner()
        .map_err(|err| err.into_error())
        .context("flush csv buffer")
}

pub fn write_team_csvs(dir: &Path, division: &Division) -> Result<CsvExportReport> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating export dir {}", dir.display()))?;

    let team1_path = dir.join(TEAM1_CSV);
    let team2_path = dir.join(TEAM2_CSV);
    for (side, path) in [(Side::Team1, &team1_path), (Side::Team2, &team2_path)] {
        let bytes = team_csv_bytes(division.team(side))?;
        fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))?;
    }

    Ok(CsvExportReport {
        team1_path,
        team2_path,
        rows: division.player_count(),
    })
}

enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

pub fn write_workbook(path: &Path, division: &Division) -> Result<WorkbookReport> {
    let summary = summary::summarize_division(division);

    let team1_rows = team_rows(&division.team1);
    let team2_rows = team_rows(&division.team2);

    let mut averages_rows = vec![header(&[
        "Team",
        "Players",
        "Avg Games Won",
        "Avg Games Played",
        "Avg Win Ratio",
        "Strength",
    ])];
    let mut distribution_rows = vec![header(&["Team", "Min", "Q1", "Median", "Q3", "Max"])];
    for team in [&summary.team1, &summary.team2] {
        averages_rows.push(averages_row(team));
        distribution_rows.push(distribution_row(team));
    }

    let sheets: [(&str, &[Vec<Cell>]); 4] = [
        ("Team1", &team1_rows),
        ("Team2", &team2_rows),
        ("Averages", &averages_rows),
        ("Distribution", &distribution_rows),
    ];

    let mut workbook = Workbook::new();
    let mut rows = 0usize;
    for (name, sheet_rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, sheet_rows)?;
        rows += sheet_rows.len().saturating_sub(1);
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(WorkbookReport {
        path: path.to_path_buf(),
        sheets: sheets.len(),
        rows,
    })
}

#[derive(Serialize)]
struct DivisionDocument<'a> {
    generated_at: String,
    team1: &'a [RankedPlayer],
    team2: &'a [RankedPlayer],
    summary: DivisionSummary,
}

pub fn division_json(division: &Division) -> Result<String> {
    serde_json::to_string_pretty(&division_value(division)?).context("serialize division json")
}

/// The document [`division_json`] prints, for callers that combine several.
pub fn division_value(division: &Division) -> Result<serde_json::Value> {
    let doc = DivisionDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        team1: &division.team1,
        team2: &division.team2,
        summary: summary::summarize_division(division),
    };
    serde_json::to_value(&doc).context("serialize division json")
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles.iter().map(|t| Cell::from(*t)).collect()
}

fn team_rows(members: &[RankedPlayer]) -> Vec<Vec<Cell>> {
    let mut rows = vec![header(&["Name", "Games Won", "Games Played", "Win Ratio"])];
    rows.extend(members.iter().map(|p| {
        vec![
            Cell::Text(p.name().to_string()),
            Cell::Number(f64::from(p.games_won())),
            Cell::Number(f64::from(p.games_played())),
            Cell::Number(p.win_ratio()),
        ]
    }));
    rows
}

fn averages_row(team: &TeamSummary) -> Vec<Cell> {
    let mut row = vec![
        Cell::Text(team.label.clone()),
        Cell::Number(team.size as f64),
    ];
    match &team.averages {
        Some(avg) => row.extend([
            Cell::Number(avg.games_won),
            Cell::Number(avg.games_played),
            Cell::Number(avg.win_ratio),
        ]),
        None => row.extend(["-", "-", "-"].map(Cell::from)),
    }
    row.push(Cell::Number(team.strength));
    row
}

fn distribution_row(team: &TeamSummary) -> Vec<Cell> {
    let mut row = vec![Cell::Text(team.label.clone())];
    match &team.games_played {
        Some(d) => row.extend([d.min, d.q1, d.median, d.q3, d.max].map(Cell::Number)),
        None => row.extend(["-", "-", "-", "-", "-"].map(Cell::from)),
    }
    row
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match cell {
                Cell::Text(value) => worksheet.write_string(r, c, value),
                Cell::Number(value) => worksheet.write_number(r, c, *value),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
