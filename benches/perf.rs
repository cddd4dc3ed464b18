use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use team_divider::divide::divide_teams;
use team_divider::fake_roster::demo_roster;
use team_divider::player::PlayerRecord;
use team_divider::roster_csv::read_roster;
use team_divider::summary::summarize_division;

fn roster_csv_text(roster: &[PlayerRecord]) -> String {
    let mut text = String::from("name,games_won,games_played\n");
    for p in roster {
        text.push_str(&format!("{},{},{}\n", p.name, p.games_won, p.games_played));
    }
    text
}

fn bench_divide_small(c: &mut Criterion) {
    let roster = demo_roster(1_000, Some(7));
    c.bench_function("divide_1k", |b| {
        b.iter(|| {
            let division = divide_teams(black_box(&roster)).unwrap();
            black_box(division.team1.len());
        })
    });
}

fn bench_divide_large(c: &mut Criterion) {
    let roster = demo_roster(10_000, Some(7));
    c.bench_function("divide_10k", |b| {
        b.iter(|| {
            let division = divide_teams(black_box(&roster)).unwrap();
            black_box(division.team2.len());
        })
    });
}

fn bench_roster_parse(c: &mut Criterion) {
    let text = roster_csv_text(&demo_roster(1_000, Some(3)));
    c.bench_function("roster_parse_1k", |b| {
        b.iter(|| {
            let roster = read_roster(black_box(text.as_bytes())).unwrap();
            black_box(roster.len());
        })
    });
}

fn bench_summary(c: &mut Criterion) {
    let division = divide_teams(&demo_roster(1_000, Some(11))).unwrap();
    c.bench_function("summarize_1k", |b| {
        b.iter(|| {
            let summary = summarize_division(black_box(&division));
            black_box(summary.strength_gap);
        })
    });
}

criterion_group!(
    perf,
    bench_divide_small,
    bench_divide_large,
    bench_roster_parse,
    bench_summary
);
criterion_main!(perf);
