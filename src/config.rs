use std::env;
use std::path::PathBuf;

const DEFAULT_DEMO_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DividerConfig {
    pub roster_path: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub demo_size: usize,
    pub demo_seed: Option<u64>,
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            roster_path: None,
            export_dir: PathBuf::from("."),
            demo_size: DEFAULT_DEMO_SIZE,
            demo_seed: None,
        }
    }
}

impl DividerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key).and_then(|val| {
                let trimmed = val.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let defaults = Self::default();
        Self {
            roster_path: get("DIVIDER_ROSTER").map(PathBuf::from),
            export_dir: get("DIVIDER_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            demo_size: get("DIVIDER_DEMO_SIZE")
                .and_then(|val| val.parse::<usize>().ok())
                .unwrap_or(defaults.demo_size)
                .clamp(2, 64),
            demo_seed: get("DIVIDER_DEMO_SEED").and_then(|val| val.parse::<u64>().ok()),
        }
    }
}

/// Load `.env.local` then `.env`; variables already set win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}
