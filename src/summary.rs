use serde::Serialize;

use crate::divide::{Division, Side, smoothed_strength};
use crate::player::{PlayerRecord, RankedPlayer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAverages {
    pub games_won: f64,
    pub games_played: f64,
    pub win_ratio: f64,
}

/// Five-number summary, the numbers a box plot is drawn from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub label: String,
    pub size: usize,
    pub total_wins: u64,
    pub total_games: u64,
    pub strength: f64,
    pub averages: Option<TeamAverages>,
    pub games_played: Option<Distribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionSummary {
    pub team1: TeamSummary,
    pub team2: TeamSummary,
    pub strength_gap: f64,
}

impl DivisionSummary {
    pub fn team(&self, side: Side) -> &TeamSummary {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }
}

pub fn side_label(side: Side) -> &'static str {
    match side {
        Side::Team1 => "Team 1",
        Side::Team2 => "Team 2",
    }
}

pub fn summarize_division(division: &Division) -> DivisionSummary {
    let team1 = summarize_team(side_label(Side::Team1), &division.team1);
    let team2 = summarize_team(side_label(Side::Team2), &division.team2);
    let strength_gap = (team1.strength - team2.strength).abs();
    DivisionSummary {
        team1,
        team2,
        strength_gap,
    }
}

pub fn summarize_team(label: &str, members: &[RankedPlayer]) -> TeamSummary {
    let total_wins: u64 = members.iter().map(|p| u64::from(p.games_won())).sum();
    let total_games: u64 = members.iter().map(|p| u64::from(p.games_played())).sum();
    let played: Vec<f64> = members.iter().map(|p| f64::from(p.games_played())).collect();

    TeamSummary {
        label: label.to_string(),
        size: members.len(),
        total_wins,
        total_games,
        strength: smoothed_strength(total_wins, total_games),
        averages: team_averages(members),
        games_played: distribution(&played),
    }
}

pub fn team_averages(members: &[RankedPlayer]) -> Option<TeamAverages> {
    if members.is_empty() {
        return None;
    }
    let n = members.len() as f64;
    let mean = |f: fn(&RankedPlayer) -> f64| members.iter().map(f).sum::<f64>() / n;
    Some(TeamAverages {
        games_won: mean(|p| f64::from(p.games_won())),
        games_played: mean(|p| f64::from(p.games_played())),
        win_ratio: mean(RankedPlayer::win_ratio),
    })
}

pub fn distribution(values: &[f64]) -> Option<Distribution> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(Distribution {
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear interpolation between the closest ranks. `sorted` must be non-empty.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// `(games_played, games_won)` per player, input order.
pub fn scatter_points(roster: &[PlayerRecord]) -> Vec<(f64, f64)> {
    roster
        .iter()
        .map(|p| (f64::from(p.games_played), f64::from(p.games_won)))
        .collect()
}

/// Largest value in either column; the reference diagonal runs from 0 to here.
pub fn diagonal_extent(roster: &[PlayerRecord]) -> u32 {
    roster
        .iter()
        .flat_map(|p| [p.games_played, p.games_won])
        .max()
        .unwrap_or(0)
}

/// Win ratio per member as a whole percentage, for bar charts.
pub fn ratio_bars(members: &[RankedPlayer]) -> Vec<(String, u64)> {
    members
        .iter()
        .map(|p| (p.name().to_string(), (p.win_ratio() * 100.0).round() as u64))
        .collect()
}
