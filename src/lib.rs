pub mod config;
pub mod divide;
pub mod fake_roster;
pub mod player;
pub mod roster_csv;
pub mod state;
pub mod summary;
pub mod team_export;

pub use divide::{Division, ValidationError, divide_teams};
pub use player::{PlayerRecord, RankedPlayer};
