use serde::{Deserialize, Serialize};

/// One roster row as handed over by the roster reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub games_won: u32,
    pub games_played: u32,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, games_won: u32, games_played: u32) -> Self {
        Self {
            name: name.into(),
            games_won,
            games_played,
        }
    }
}

/// A player with its win ratio fixed at construction.
///
/// Fields are private so the ratio can never drift from the counts it was
/// computed from. Serializes in export column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    name: String,
    games_won: u32,
    games_played: u32,
    win_ratio: f64,
}

impl RankedPlayer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn games_won(&self) -> u32 {
        self.games_won
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn win_ratio(&self) -> f64 {
        self.win_ratio
    }
}

impl From<&PlayerRecord> for RankedPlayer {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            name: record.name.clone(),
            games_won: record.games_won,
            games_played: record.games_played,
            win_ratio: win_ratio(record.games_won, record.games_played),
        }
    }
}

impl From<PlayerRecord> for RankedPlayer {
    fn from(record: PlayerRecord) -> Self {
        let win_ratio = win_ratio(record.games_won, record.games_played);
        Self {
            name: record.name,
            games_won: record.games_won,
            games_played: record.games_played,
            win_ratio,
        }
    }
}

/// `won / played`, or 0.0 for a player without recorded games.
pub fn win_ratio(games_won: u32, games_played: u32) -> f64 {
    if games_played == 0 {
        return 0.0;
    }
    f64::from(games_won) / f64::from(games_played)
}
