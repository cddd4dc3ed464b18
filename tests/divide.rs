use team_divider::divide::{
    Rule, Side, TeamState, ValidationError, assign, assign_with_trace, divide_teams,
    divide_teams_traced, normalize, rank,
};
use team_divider::fake_roster::demo_roster;
use team_divider::player::{PlayerRecord, RankedPlayer};

fn roster(rows: &[(&str, u32, u32)]) -> Vec<PlayerRecord> {
    rows.iter()
        .map(|(name, won, played)| PlayerRecord::new(*name, *won, *played))
        .collect()
}

fn names(players: &[RankedPlayer]) -> Vec<&str> {
    players.iter().map(|p| p.name()).collect()
}

fn scenario() -> Vec<PlayerRecord> {
    roster(&[("A", 10, 10), ("B", 0, 10), ("C", 5, 10), ("D", 5, 10)])
}

#[test]
fn scenario_ratios_and_rank_order() {
    let normalized = normalize(&scenario()).expect("non-empty roster");
    let ratios: Vec<f64> = normalized.iter().map(|p| p.win_ratio()).collect();
    assert_eq!(ratios, vec![1.0, 0.0, 0.5, 0.5]);

    let ranked = rank(normalized);
    assert_eq!(names(&ranked), vec!["A", "C", "D", "B"]);
}

#[test]
fn scenario_divides_into_expected_teams() {
    let division = divide_teams(&scenario()).expect("non-empty roster");
    assert_eq!(names(&division.team1), vec!["A", "B"]);
    assert_eq!(names(&division.team2), vec!["C", "D"]);
}

#[test]
fn scenario_trace_explains_each_decision() {
    let (_, steps) = divide_teams_traced(&scenario()).expect("non-empty roster");
    let decisions: Vec<(&str, Side, Rule)> = steps
        .iter()
        .map(|s| (s.player.as_str(), s.side, s.rule))
        .collect();
    assert_eq!(
        decisions,
        vec![
            ("A", Side::Team1, Rule::StrengthTie),
            ("C", Side::Team2, Rule::SmallerTeam),
            ("D", Side::Team2, Rule::WeakerTeam),
            ("B", Side::Team1, Rule::SmallerTeam),
        ]
    );

    let after_c = &steps[1];
    assert!((after_c.team1_strength - 10.0 / 11.0).abs() < 1e-12);
    assert!((after_c.team2_strength - 5.0 / 11.0).abs() < 1e-12);
    let last = steps.last().unwrap();
    assert_eq!((last.team1_size, last.team2_size), (2, 2));
    assert!((last.team2_strength - 10.0 / 21.0).abs() < 1e-12);
}

#[test]
fn single_player_goes_to_team1() {
    let division = divide_teams(&roster(&[("Solo", 3, 7)])).expect("one player");
    assert_eq!(names(&division.team1), vec!["Solo"]);
    assert!(division.team2.is_empty());
}

#[test]
fn empty_roster_is_rejected() {
    assert_eq!(divide_teams(&[]), Err(ValidationError::EmptyRoster));
    assert_eq!(normalize(&[]), Err(ValidationError::EmptyRoster));
    assert!(divide_teams_traced(&[]).is_err());
}

#[test]
fn zero_games_yields_zero_ratio() {
    let division = divide_teams(&roster(&[("Fresh", 0, 0), ("Odd", 2, 0)])).expect("two players");
    for p in division.team1.iter().chain(&division.team2) {
        assert_eq!(p.win_ratio(), 0.0);
    }
}

#[test]
fn all_zero_games_roster_still_divides() {
    let players = roster(&[("a", 0, 0), ("b", 0, 0), ("c", 0, 0)]);
    let division = divide_teams(&players).expect("three players");
    assert_eq!(names(&division.team1), vec!["a", "c"]);
    assert_eq!(names(&division.team2), vec!["b"]);
}

#[test]
fn equal_ratios_keep_input_order_and_tie_to_team1() {
    let players = roster(&[("P1", 3, 6), ("P2", 3, 6), ("P3", 3, 6), ("P4", 3, 6)]);
    let ranked = rank(normalize(&players).unwrap());
    assert_eq!(names(&ranked), vec!["P1", "P2", "P3", "P4"]);

    let (_, steps) = divide_teams_traced(&players).unwrap();
    let ties: Vec<&str> = steps
        .iter()
        .filter(|s| s.rule == Rule::StrengthTie)
        .map(|s| s.player.as_str())
        .collect();
    assert_eq!(ties, vec!["P1", "P3"]);
    assert!(
        steps
            .iter()
            .filter(|s| s.rule == Rule::StrengthTie)
            .all(|s| s.side == Side::Team1)
    );

    let division = divide_teams(&players).unwrap();
    assert_eq!(names(&division.team1), vec!["P1", "P3"]);
    assert_eq!(names(&division.team2), vec!["P2", "P4"]);
}

#[test]
fn teams_stay_size_balanced_for_generated_rosters() {
    for seed in 0..40u64 {
        for size in 1..=25usize {
            let players = demo_roster(size, Some(seed));
            let division = divide_teams(&players).expect("non-empty roster");
            assert_eq!(division.player_count(), size);
            assert!(division.team1.len().abs_diff(division.team2.len()) <= 1);
        }
    }
}

#[test]
fn every_prefix_of_the_assignment_is_balanced() {
    let players = demo_roster(31, Some(99));
    let (_, steps) = divide_teams_traced(&players).unwrap();
    assert_eq!(steps.len(), 31);
    for (i, step) in steps.iter().enumerate() {
        assert_eq!(step.index, i);
        assert_eq!(step.team1_size + step.team2_size, i + 1);
        assert!(step.team1_size.abs_diff(step.team2_size) <= 1);
    }
}

#[test]
fn team_members_keep_rank_order() {
    let division = divide_teams(&demo_roster(40, Some(5))).unwrap();
    for team in [&division.team1, &division.team2] {
        assert!(team.windows(2).all(|w| w[0].win_ratio() >= w[1].win_ratio()));
    }
}

#[test]
fn repeated_runs_are_identical() {
    let players = demo_roster(50, Some(2024));
    let first = divide_teams(&players).unwrap();
    for _ in 0..5 {
        assert_eq!(divide_teams(&players).unwrap(), first);
    }
}

#[test]
fn traced_and_plain_assignment_agree() {
    let ranked = rank(normalize(&demo_roster(17, Some(3))).unwrap());
    let (t1, t2) = assign(ranked.clone());
    let (u1, u2, _) = assign_with_trace(ranked);
    assert_eq!(t1, u1);
    assert_eq!(t2, u2);
}

#[test]
fn assignment_can_resume_from_a_prefix() {
    let ranked = rank(normalize(&demo_roster(12, Some(8))).unwrap());
    let (full1, full2) = assign(ranked.clone());

    let (head, tail) = ranked.split_at(5);
    let (mut t1, mut t2) = assign(head.to_vec());
    for player in tail.iter().cloned() {
        match team_divider::divide::choose_side(&t1, &t2).0 {
            Side::Team1 => t1 = t1.with(player),
            Side::Team2 => t2 = t2.with(player),
        }
    }
    assert_eq!((t1, t2), (full1, full2));
}

#[test]
fn team_totals_track_members() {
    let (t1, t2) = assign(rank(normalize(&scenario()).unwrap()));
    let totals = |t: &TeamState| {
        let wins: u64 = t.members().iter().map(|p| u64::from(p.games_won())).sum();
        let games: u64 = t.members().iter().map(|p| u64::from(p.games_played())).sum();
        (wins, games)
    };
    assert_eq!(totals(&t1), (t1.total_wins(), t1.total_games()));
    assert_eq!(totals(&t2), (t2.total_wins(), t2.total_games()));
}

#[test]
fn large_tied_roster_keeps_input_order_within_each_ratio() {
    // Three ratios spread over 200 players, enough to defeat small-slice sorting shortcuts.
    let rates = [(1, 4), (1, 2), (3, 4)];
    let players: Vec<PlayerRecord> = (0..200)
        .map(|i| {
            let (won, played) = rates[(i * 7) % 3];
            PlayerRecord::new(format!("p{i:03}"), won, played)
        })
        .collect();

    let ranked = rank(normalize(&players).unwrap());
    assert_eq!(ranked.len(), 200);
    for pair in ranked.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.win_ratio() >= b.win_ratio());
        if a.win_ratio() == b.win_ratio() {
            assert!(
                a.name() < b.name(),
                "tie order broken: {} before {}",
                a.name(),
                b.name()
            );
        }
    }
}
