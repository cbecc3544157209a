use serde::{Deserialize, Serialize};
use serde_json::Error as JSONError;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// What identifies a solved search state in the memoization table.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemoKey {
    /// Depth and visited targets only. Two states standing on different cells
    /// share their solution, which can miss better routes.
    DepthAndVisited,
    /// Depth, visited targets, current position and goal. Targets crossed on
    /// the way to a goal also count as visited.
    #[default]
    FullState,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub memo_key: MemoKey,
    /// Seed for the Zobrist masks.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { memo_key: MemoKey::default(), seed: 42 }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed reading the config file ({0})")]
    Io(#[from] std::io::Error),
    #[error("Invalid config ({0})")]
    Parse(#[from] JSONError),
}

impl SearchConfig {
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        SearchConfig::from_json(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.memo_key, MemoKey::FullState);
        assert_eq!(config.seed, 42);
        assert_eq!(SearchConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn test_from_json() {
        let config = SearchConfig::from_json(
            r#"{"memo_key": "depth_and_visited", "seed": 7}"#).unwrap();
        assert_eq!(config.memo_key, MemoKey::DepthAndVisited);
        assert_eq!(config.seed, 7);
        let config = SearchConfig::from_json(r#"{"seed": 3}"#).unwrap();
        assert_eq!(config.memo_key, MemoKey::FullState);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(SearchConfig::from_json(r#"{"memo_key": "nope"}"#),
                         Err(ConfigError::Parse(_))));
        assert!(matches!(SearchConfig::from_json("not json"),
                         Err(ConfigError::Parse(_))));
        assert!(matches!(SearchConfig::from_file(Path::new("/nonexistent/config.json")),
                         Err(ConfigError::Io(_))));
    }
}
