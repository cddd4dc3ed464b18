use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::divide::{self, AssignmentStep, Division};
use crate::fake_roster;
use crate::player::PlayerRecord;
use crate::roster_csv;
use crate::summary::{self, DivisionSummary};
use crate::team_export;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Roster,
    Teams,
    Charts,
    Steps,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    File(PathBuf),
    Demo { size: usize, seed: Option<u64> },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub source: RosterSource,
    pub roster: Vec<PlayerRecord>,
    pub division: Option<Division>,
    pub summary: Option<DivisionSummary>,
    pub steps: Vec<AssignmentStep>,
    pub error: Option<String>,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export: ExportState,
}

impl AppState {
    pub fn new(source: RosterSource) -> Self {
        Self {
            screen: Screen::Teams,
            source,
            roster: Vec::new(),
            division: None,
            summary: None,
            steps: Vec::new(),
            error: None,
            selected: 0,
            logs: VecDeque::new(),
            help_overlay: false,
            export: ExportState::new(),
        }
    }

    pub fn maybe_clear_export(&mut self, now: Instant) {
        self.export.clear_if_done_for(now, 8);
    }

    /// Read the roster again from its source. Demo rosters are regenerated.
    pub fn reload(&mut self) {
        match &mut self.source {
            RosterSource::File(path) => {
                let path = path.clone();
                match roster_csv::read_roster_path(&path) {
                    Ok(roster) => {
                        self.push_log(format!(
                            "[INFO] Loaded {} players from {}",
                            roster.len(),
                            path.display()
                        ));
                        self.set_roster(roster);
                    }
                    Err(err) => {
                        self.roster.clear();
                        self.selected = 0;
                        self.clear_teams();
                        self.fail(format!("{}: {err}", path.display()));
                    }
                }
            }
            RosterSource::Demo { size, seed } => {
                let roster = fake_roster::demo_roster(*size, *seed);
                if let Some(seed) = seed {
                    *seed = seed.wrapping_add(1);
                }
                self.push_log(format!("[INFO] Generated demo roster of {} players", roster.len()));
                self.set_roster(roster);
            }
        }
    }

    /// Divide a new roster. A rejected roster clears the previous teams.
    pub fn set_roster(&mut self, roster: Vec<PlayerRecord>) {
        self.roster = roster;
        self.selected = 0;
        match divide::divide_teams_traced(&self.roster) {
            Ok((division, steps)) => {
                let summary = summary::summarize_division(&division);
                self.push_log(format!(
                    "[INFO] Teams: {} vs {} players, strength gap {:.3}",
                    division.team1.len(),
                    division.team2.len(),
                    summary.strength_gap
                ));
                self.division = Some(division);
                self.summary = Some(summary);
                self.steps = steps;
                self.error = None;
            }
            Err(err) => {
                self.clear_teams();
                self.fail(err.to_string());
            }
        }
    }

    /// Drop teams from an earlier roster so they can no longer be shown or exported.
    fn clear_teams(&mut self) {
        self.division = None;
        self.summary = None;
        self.steps.clear();
    }

    fn fail(&mut self, message: String) {
        self.push_log(format!("[WARN] {message}"));
        self.error = Some(message);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.clamp_selection();
    }

    /// Rows the selection moves over on the current screen.
    pub fn row_count(&self) -> usize {
        match self.screen {
            Screen::Roster => self.roster.len(),
            Screen::Teams => self
                .division
                .as_ref()
                .map(|d| d.team1.len().max(d.team2.len()))
                .unwrap_or(0),
            Screen::Charts => 0,
            Screen::Steps => self.steps.len(),
        }
    }

    pub fn select_next(&mut self) {
        let total = self.row_count();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        let total = self.row_count();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn export_csv(&mut self, dir: &Path) {
        let Some(division) = &self.division else {
            self.push_log("[INFO] Nothing to export");
            return;
        };
        let result = team_export::write_team_csvs(dir, division);
        match result {
            Ok(report) => {
                self.export.finish(
                    Some(dir.display().to_string()),
                    format!(
                        "Exported {} players to {} and {}",
                        report.rows,
                        report.team1_path.display(),
                        report.team2_path.display()
                    ),
                );
                let msg = format!("[INFO] {}", self.export.message);
                self.push_log(msg);
            }
            Err(err) => {
                self.export.fail(format!("{err:#}"));
                self.push_log(format!("[WARN] CSV export failed: {err:#}"));
            }
        }
    }

    pub fn export_xlsx(&mut self, path: &Path) {
        let Some(division) = &self.division else {
            self.push_log("[INFO] Nothing to export");
            return;
        };
        match team_export::write_workbook(path, division) {
            Ok(report) => {
                self.export.finish(
                    Some(report.path.display().to_string()),
                    format!(
                        "Workbook saved: {} ({} sheets, {} rows)",
                        report.path.display(),
                        report.sheets,
                        report.rows
                    ),
                );
                let msg = format!("[INFO] {}", self.export.message);
                self.push_log(msg);
            }
            Err(err) => {
                self.export.fail(format!("{err:#}"));
                self.push_log(format!("[WARN] Workbook export failed: {err:#}"));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportState {
    pub active: bool,
    pub failed: bool,
    pub path: Option<String>,
    pub message: String,
    pub last_updated: Option<Instant>,
}

impl Default for ExportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportState {
    pub fn new() -> Self {
        Self {
            active: false,
            failed: false,
            path: None,
            message: String::new(),
            last_updated: None,
        }
    }

    fn finish(&mut self, path: Option<String>, message: String) {
        self.active = true;
        self.failed = false;
        self.path = path;
        self.message = message;
        self.last_updated = Some(Instant::now());
    }

    fn fail(&mut self, message: String) {
        self.active = true;
        self.failed = true;
        self.path = None;
        self.message = message;
        self.last_updated = Some(Instant::now());
    }

    pub fn clear_if_done_for(&mut self, now: Instant, keep_secs: u64) {
        if !self.active {
            return;
        }
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::new();
        }
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Roster => "ROSTER",
        Screen::Teams => "TEAMS",
        Screen::Charts => "CHARTS",
        Screen::Steps => "STEPS",
    }
}

pub fn source_label(source: &RosterSource) -> String {
    match source {
        RosterSource::File(path) => path.display().to_string(),
        RosterSource::Demo { size, .. } => format!("demo roster ({size})"),
    }
}
