use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::warn;

use crate::player::PlayerRecord;

pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "games_won", "games_played"];

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("The CSV file must contain columns named 'name', 'games_won', and 'games_played'")]
    MissingColumns { missing: Vec<&'static str> },
    #[error("line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}

struct ColumnIndex {
    name: usize,
    games_won: usize,
    games_played: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, RosterError> {
        let find = |col: &str| headers.iter().position(|h| h == col);
        let (name, games_won, games_played) = (find("name"), find("games_won"), find("games_played"));
        match (name, games_won, games_played) {
            (Some(name), Some(games_won), Some(games_played)) => Ok(Self {
                name,
                games_won,
                games_played,
            }),
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .copied()
                    .filter(|col| find(*col).is_none())
                    .collect();
                Err(RosterError::MissingColumns { missing })
            }
        }
    }
}

/// Parse a roster CSV with a header row. Extra columns are ignored.
///
/// A header-only file yields an empty roster; rejecting that is left to
/// [`crate::divide::divide_teams`].
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<PlayerRecord>, RosterError> {
    let mut csv = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let columns = ColumnIndex::from_headers(csv.headers()?)?;

    let mut roster = Vec::new();
    for result in csv.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let player = parse_row(&record, &columns, line)?;
        if player.games_won > player.games_played {
            warn!(
                line,
                player = %player.name,
                games_won = player.games_won,
                games_played = player.games_played,
                "player has more wins than games played"
            );
        }
        roster.push(player);
    }
    Ok(roster)
}

pub fn read_roster_path(path: &Path) -> Result<Vec<PlayerRecord>, RosterError> {
    let file = File::open(path)?;
    read_roster(file)
}

fn parse_row(
    record: &StringRecord,
    columns: &ColumnIndex,
    line: u64,
) -> Result<PlayerRecord, RosterError> {
    let cell = |idx: usize, col: &str| {
        record.get(idx).ok_or_else(|| RosterError::InvalidRow {
            line,
            message: format!("missing value for '{col}'"),
        })
    };

    let name = cell(columns.name, "name")?;
    if name.is_empty() {
        return Err(RosterError::InvalidRow {
            line,
            message: "empty player name".to_string(),
        });
    }
    let games_won = parse_count(cell(columns.games_won, "games_won")?, "games_won", line)?;
    let games_played = parse_count(
        cell(columns.games_played, "games_played")?,
        "games_played",
        line,
    )?;

    Ok(PlayerRecord::new(name, games_won, games_played))
}

fn parse_count(raw: &str, col: &str, line: u64) -> Result<u32, RosterError> {
    raw.parse::<u32>().map_err(|_| RosterError::InvalidRow {
        line,
        message: format!("'{col}' must be a non-negative integer, got '{raw}'"),
    })
}
