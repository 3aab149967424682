use std::env;
use std::path::PathBuf;

// Runtime settings, read once at startup. A `.env` file is honoured.

const SCORES_FILE: &str = "minicade.scores";
const LOG_FILE: &str = "minicade.log";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub scores_path: PathBuf,
    pub log_path: PathBuf,
    pub log_json: bool,
    pub sound: bool,
    /// Fixed RNG seed for reproducible rounds.
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let scores_path = lookup("MINICADE_SCORES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_scores_path);
        let log_path = lookup("MINICADE_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(LOG_FILE));
        let log_json = matches!(lookup("MINICADE_LOG_FORMAT").as_deref(), Some("json"));
        let sound = !matches!(lookup("MINICADE_SOUND").as_deref(), Some("0" | "off" | "false"));
        let seed = lookup("MINICADE_SEED").and_then(|v| v.parse().ok());
        Self { scores_path, log_path, log_json, sound, seed }
    }

    /// An explicit seed, or one drawn from the OS.
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

fn default_scores_path() -> PathBuf {
    // Store next to the executable
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SCORES_FILE)))
        .unwrap_or_else(|| PathBuf::from(SCORES_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]);
        assert!(c.scores_path.ends_with(SCORES_FILE));
        assert_eq!(c.log_path, PathBuf::from(LOG_FILE));
        assert!(!c.log_json);
        assert!(c.sound);
        assert_eq!(c.seed, None);
    }

    #[test]
    fn overrides_are_parsed() {
        let c = config(&[
            ("MINICADE_SCORES_PATH", "/tmp/hs.bin"),
            ("MINICADE_LOG_FORMAT", "json"),
            ("MINICADE_SOUND", "0"),
            ("MINICADE_SEED", "42"),
        ]);
        assert_eq!(c.scores_path, PathBuf::from("/tmp/hs.bin"));
        assert!(c.log_json);
        assert!(!c.sound);
        assert_eq!(c.seed_or_random(), 42);
    }

    #[test]
    fn unparsable_seed_is_ignored() {
        assert_eq!(config(&[("MINICADE_SEED", "abc")]).seed, None);
    }
}
