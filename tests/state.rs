use std::path::PathBuf;

use team_divider::player::PlayerRecord;
use team_divider::state::{AppState, RosterSource, Screen};

fn demo_state() -> AppState {
    let mut state = AppState::new(RosterSource::Demo {
        size: 9,
        seed: Some(11),
    });
    state.reload();
    state
}

#[test]
fn demo_reload_divides_roster() {
    let state = demo_state();
    assert_eq!(state.roster.len(), 9);
    let division = state.division.as_ref().expect("demo roster divides");
    assert_eq!(division.player_count(), 9);
    assert!(division.team1.len().abs_diff(division.team2.len()) <= 1);
    assert_eq!(state.steps.len(), 9);
    assert!(state.summary.is_some());
    assert!(state.error.is_none());
}

#[test]
fn seeded_demo_reload_moves_to_next_seed() {
    let mut state = demo_state();
    let first = state.roster.clone();
    assert_eq!(
        state.source,
        RosterSource::Demo {
            size: 9,
            seed: Some(12)
        }
    );
    state.reload();
    assert_eq!(state.roster.len(), first.len());
}

#[test]
fn empty_roster_shows_error_and_clears_teams() {
    let mut state = demo_state();
    state.set_roster(Vec::new());
    assert!(state.division.is_none());
    assert!(state.summary.is_none());
    assert!(state.steps.is_empty());
    let err = state.error.as_deref().expect("error is shown");
    assert!(err.contains("empty"));
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));
}

#[test]
fn missing_file_source_reports_error() {
    let mut state = AppState::new(RosterSource::File(PathBuf::from(
        "/definitely/not/here/roster.csv",
    )));
    state.reload();
    assert!(state.division.is_none());
    assert!(
        state
            .error
            .as_deref()
            .is_some_and(|e| e.contains("roster.csv"))
    );
}

#[test]
fn selection_is_clamped_per_screen() {
    let mut state = demo_state();
    state.set_screen(Screen::Roster);
    for _ in 0..20 {
        state.select_next();
    }
    assert_eq!(state.selected, 8);

    state.set_screen(Screen::Teams);
    assert_eq!(state.selected, 4);

    state.set_screen(Screen::Charts);
    assert_eq!(state.selected, 0);
    state.select_prev();
    assert_eq!(state.selected, 0);
}

#[test]
fn logs_are_bounded() {
    let mut state = AppState::new(RosterSource::Demo { size: 2, seed: None });
    for i in 0..250 {
        state.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}

#[test]
fn csv_export_updates_export_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut state = AppState::new(RosterSource::Demo { size: 2, seed: None });
    state.set_roster(vec![
        PlayerRecord::new("A", 3, 4),
        PlayerRecord::new("B", 1, 4),
    ]);
    state.export_csv(dir.path());
    assert!(state.export.active);
    assert!(!state.export.failed);
    assert!(dir.path().join("team1.csv").is_file());
    assert!(state.logs.back().is_some_and(|l| l.contains("Exported 2 players")));
}

#[test]
fn export_without_teams_is_a_no_op() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut state = AppState::new(RosterSource::Demo { size: 2, seed: None });
    state.export_csv(dir.path());
    assert!(!state.export.active);
    assert!(!dir.path().join("team1.csv").exists());
}

#[test]
fn unreadable_reload_drops_previous_teams() {
    let dir = tempfile::tempdir().expect("tempdir");
    let roster_path = dir.path().join("roster.csv");
    std::fs::write(&roster_path, "name,games_won,games_played\nA,3,4\nB,1,4\n").unwrap();

    let mut state = AppState::new(RosterSource::File(roster_path.clone()));
    state.reload();
    assert!(state.division.is_some());

    std::fs::write(&roster_path, "name,games_won\nA,3\nB,1\n").unwrap();
    state.reload();
    assert!(
        state
            .error
            .as_deref()
            .is_some_and(|e| e.contains("must contain columns"))
    );
    assert!(state.division.is_none());
    assert!(state.summary.is_none());
    assert!(state.steps.is_empty());
    assert!(state.roster.is_empty());

    let out = dir.path().join("out");
    state.export_csv(&out);
    assert!(!state.export.active);
    assert!(!out.join("team1.csv").exists());
}
