use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::player::PlayerRecord;

const MAX_GAMES: u32 = 40;

const NAMES: &[&str] = &[
    "Alex", "Bruno", "Carla", "Dani", "Emil", "Fatima", "Gio", "Hana", "Ivan", "Jonas", "Kofi",
    "Lena", "Mateo", "Nia", "Omar", "Priya", "Quinn", "Rui", "Sara", "Tomas", "Uma", "Viktor",
    "Wen", "Ximena", "Yusuf", "Zoe",
];

/// Random roster for demos and benchmarks. A seed makes it reproducible.
pub fn demo_roster(size: usize, seed: Option<u64>) -> Vec<PlayerRecord> {
    match seed {
        Some(seed) => generate(size, &mut StdRng::seed_from_u64(seed)),
        None => generate(size, &mut rand::thread_rng()),
    }
}

fn generate<R: Rng>(size: usize, rng: &mut R) -> Vec<PlayerRecord> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    (0..size)
        .map(|_| {
            let base = NAMES[rng.gen_range(0..NAMES.len())];
            let count = seen.entry(base).or_insert(0);
            *count += 1;
            let name = if *count == 1 {
                base.to_string()
            } else {
                format!("{base} {count}")
            };
            let games_played = rng.gen_range(0..=MAX_GAMES);
            let games_won = rng.gen_range(0..=games_played);
            PlayerRecord::new(name, games_won, games_played)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_roster_is_reproducible() {
        assert_eq!(demo_roster(12, Some(7)), demo_roster(12, Some(7)));
    }

    #[test]
    fn demo_counts_are_consistent() {
        let roster = demo_roster(200, Some(1));
        assert_eq!(roster.len(), 200);
        for p in &roster {
            assert!(p.games_won <= p.games_played);
            assert!(p.games_played <= MAX_GAMES);
        }
        let mut names: Vec<&str> = roster.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 200);
    }
}
