use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::player::{PlayerRecord, RankedPlayer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("roster is empty: there are no players to divide into teams")]
    EmptyRoster,
}

/// Compute win ratios for every record, keeping input order.
pub fn normalize(records: &[PlayerRecord]) -> Result<Vec<RankedPlayer>, ValidationError> {
    if records.is_empty() {
        return Err(ValidationError::EmptyRoster);
    }
    Ok(records.iter().map(RankedPlayer::from).collect())
}

/// Strongest first. `sort_by` is stable, so equal ratios keep input order.
pub fn rank(mut players: Vec<RankedPlayer>) -> Vec<RankedPlayer> {
    players.sort_by(|a, b| b.win_ratio().total_cmp(&a.win_ratio()));
    players
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamState {
    members: Vec<RankedPlayer>,
    total_wins: u64,
    total_games: u64,
}

impl TeamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[RankedPlayer] {
        &self.members
    }

    pub fn into_members(self) -> Vec<RankedPlayer> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn total_wins(&self) -> u64 {
        self.total_wins
    }

    pub fn total_games(&self) -> u64 {
        self.total_games
    }

    /// Smoothed team strength, `wins / (games + 1)`. Finite for an empty team.
    pub fn strength(&self) -> f64 {
        smoothed_strength(self.total_wins, self.total_games)
    }

    /// Append a member and fold its counts into the running totals.
    pub fn with(mut self, player: RankedPlayer) -> Self {
        self.total_wins += u64::from(player.games_won());
        self.total_games += u64::from(player.games_played());
        self.members.push(player);
        self
    }
}

pub fn smoothed_strength(total_wins: u64, total_games: u64) -> f64 {
    total_wins as f64 / (total_games as f64 + 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Team1,
    Team2,
}

/// Which branch of the assignment rule placed a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    SmallerTeam,
    WeakerTeam,
    StrengthTie,
}

/// Size first; on equal sizes the weaker side, and team1 on an exact strength tie.
pub fn choose_side(team1: &TeamState, team2: &TeamState) -> (Side, Rule) {
    match team1.len().cmp(&team2.len()) {
        Ordering::Less => (Side::Team1, Rule::SmallerTeam),
        Ordering::Greater => (Side::Team2, Rule::SmallerTeam),
        Ordering::Equal => match team1.strength().total_cmp(&team2.strength()) {
            Ordering::Less => (Side::Team1, Rule::WeakerTeam),
            Ordering::Equal => (Side::Team1, Rule::StrengthTie),
            Ordering::Greater => (Side::Team2, Rule::WeakerTeam),
        },
    }
}

type Teams = (TeamState, TeamState);

fn place((team1, team2): Teams, player: RankedPlayer) -> (Teams, Side, Rule) {
    let (side, rule) = choose_side(&team1, &team2);
    debug!(
        player = player.name(),
        ratio = player.win_ratio(),
        ?side,
        ?rule,
        "assigning player"
    );
    let teams = match side {
        Side::Team1 => (team1.with(player), team2),
        Side::Team2 => (team1, team2.with(player)),
    };
    (teams, side, rule)
}

/// Greedy streak-balance over an already ranked sequence.
pub fn assign<I>(ranked: I) -> (TeamState, TeamState)
where
    I: IntoIterator<Item = RankedPlayer>,
{
    ranked
        .into_iter()
        .fold((TeamState::new(), TeamState::new()), |teams, player| {
            place(teams, player).0
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentStep {
    pub index: usize,
    pub player: String,
    pub win_ratio: f64,
    pub side: Side,
    pub rule: Rule,
    pub team1_size: usize,
    pub team2_size: usize,
    pub team1_strength: f64,
    pub team2_strength: f64,
}

/// Same result as [`assign`], plus one [`AssignmentStep`] per placed player.
pub fn assign_with_trace<I>(ranked: I) -> (TeamState, TeamState, Vec<AssignmentStep>)
where
    I: IntoIterator<Item = RankedPlayer>,
{
    let mut steps = Vec::new();
    let (team1, team2) = ranked.into_iter().enumerate().fold(
        (TeamState::new(), TeamState::new()),
        |teams, (index, player)| {
            let name = player.name().to_string();
            let win_ratio = player.win_ratio();
            let ((team1, team2), side, rule) = place(teams, player);
            steps.push(AssignmentStep {
                index,
                player: name,
                win_ratio,
                side,
                rule,
                team1_size: team1.len(),
                team2_size: team2.len(),
                team1_strength: team1.strength(),
                team2_strength: team2.strength(),
            });
            (team1, team2)
        },
    );
    (team1, team2, steps)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Division {
    pub team1: Vec<RankedPlayer>,
    pub team2: Vec<RankedPlayer>,
}

impl Division {
    pub fn team(&self, side: Side) -> &[RankedPlayer] {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn player_count(&self) -> usize {
        self.team1.len() + self.team2.len()
    }
}

impl From<(TeamState, TeamState)> for Division {
    fn from((team1, team2): (TeamState, TeamState)) -> Self {
        Self {
            team1: team1.into_members(),
            team2: team2.into_members(),
        }
    }
}

/// Normalize, rank and assign a roster into two teams.
pub fn divide_teams(records: &[PlayerRecord]) -> Result<Division, ValidationError> {
    let ranked = rank(normalize(records)?);
    let (team1, team2) = assign(ranked);
    log_division(&team1, &team2);
    Ok(Division::from((team1, team2)))
}

/// [`divide_teams`] that also returns the assignment trace.
pub fn divide_teams_traced(
    records: &[PlayerRecord],
) -> Result<(Division, Vec<AssignmentStep>), ValidationError> {
    let ranked = rank(normalize(records)?);
    let (team1, team2, steps) = assign_with_trace(ranked);
    log_division(&team1, &team2);
    Ok((Division::from((team1, team2)), steps))
}

fn log_division(team1: &TeamState, team2: &TeamState) {
    info!(
        team1_size = team1.len(),
        team2_size = team2.len(),
        team1_strength = team1.strength(),
        team2_strength = team2.strength(),
        "roster divided"
    );
}
