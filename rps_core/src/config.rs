use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, RpsError},
    history::DEFAULT_HISTORY_CAPACITY,
    random_utils::os_seed,
};

pub const DEFAULT_ALPHA: f64 = 0.05;
pub const DEFAULT_BETA: f64 = 0.05;
pub const DEFAULT_P0: f64 = 0.5;
pub const DEFAULT_DELTA: f64 = 0.005;
pub const DEFAULT_MAX_GAMES: u64 = 1_000_000;
pub const DEFAULT_MIN_NON_TIE_GAMES: u64 = 10;

/// Parameters of one sequential test
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprtConfig {
    /// False positive rate
    pub alpha: f64,
    /// False negative rate
    pub beta: f64,
    /// Win proportion under the null hypothesis
    pub p0: f64,
    /// Effect size. The alternatives are p0 + delta and p0 - delta
    pub delta: f64,
    /// Hard cap on total games, ties included
    pub max_games: u64,
    /// Boundaries are not tested before this many decisive games
    pub min_non_tie_games: u64,
    pub history_capacity: usize,
}

impl Default for SprtConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            p0: DEFAULT_P0,
            delta: DEFAULT_DELTA,
            max_games: DEFAULT_MAX_GAMES,
            min_non_tie_games: DEFAULT_MIN_NON_TIE_GAMES,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

fn open_unit(value: f64) -> bool {
    value > 0.0 && value < 1.0
}

impl SprtConfig {
    pub fn p_high(&self) -> f64 {
        self.p0 + self.delta
    }

    pub fn p_low(&self) -> f64 {
        self.p0 - self.delta
    }

    pub fn validate(&self) -> Result<()> {
        let err = |msg: String| Err(RpsError::InvalidConfig(msg));

        if !open_unit(self.alpha) {
            return err(format!("alpha must be in (0, 1), got {}", self.alpha));
        }
        if !open_unit(self.beta) {
            return err(format!("beta must be in (0, 1), got {}", self.beta));
        }
        if self.alpha + self.beta >= 1.0 {
            return err(format!(
                "alpha + beta must be below 1, got {}",
                self.alpha + self.beta
            ));
        }
        if self.delta.is_nan() || self.delta <= 0.0 {
            return err(format!("delta must be positive, got {}", self.delta));
        }
        if !open_unit(self.p_low()) || !open_unit(self.p_high()) {
            return err(format!(
                "p0 +/- delta must stay inside (0, 1), got [{}, {}]",
                self.p_low(),
                self.p_high()
            ));
        }
        if self.max_games == 0 {
            return err("max_games must be positive".to_owned());
        }
        if self.history_capacity == 0 {
            return err("history_capacity must be positive".to_owned());
        }

        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SprtConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Command line overrides for [`SprtConfig`]. Shared by every binary that runs tests.
#[derive(Args, Debug, Clone, Default)]
pub struct SprtArgs {
    /// YAML file with test parameters. Flags below take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub alpha: Option<f64>,
    #[arg(long)]
    pub beta: Option<f64>,
    #[arg(long)]
    pub p0: Option<f64>,
    #[arg(short = 'd', long)]
    pub delta: Option<f64>,
    #[arg(short = 'n', long)]
    pub max_games: Option<u64>,
    #[arg(long)]
    pub min_non_tie: Option<u64>,
    /// Number of recent rounds each player remembers
    #[arg(short = 'k', long)]
    pub history: Option<usize>,

    /// Base seed. Drawn from the OS when omitted
    #[arg(short = 's', long)]
    pub seed: Option<u64>,
}

impl SprtArgs {
    pub fn to_config(&self) -> Result<SprtConfig> {
        let mut config = match &self.config {
            Some(path) => SprtConfig::from_yaml_file(path)?,
            None => SprtConfig::default(),
        };

        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            config.beta = beta;
        }
        if let Some(p0) = self.p0 {
            config.p0 = p0;
        }
        if let Some(delta) = self.delta {
            config.delta = delta;
        }
        if let Some(max_games) = self.max_games {
            config.max_games = max_games;
        }
        if let Some(min_non_tie) = self.min_non_tie {
            config.min_non_tie_games = min_non_tie;
        }
        if let Some(history) = self.history {
            config.history_capacity = history;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn base_seed(&self) -> Result<u64> {
        match self.seed {
            Some(seed) => Ok(seed),
            None => os_seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SprtConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.p_high() - 0.505).abs() < 1e-12);
        assert!((config.p_low() - 0.495).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let bad = [
            SprtConfig {
                alpha: 0.0,
                ..Default::default()
            },
            SprtConfig {
                beta: 1.0,
                ..Default::default()
            },
            SprtConfig {
                alpha: 0.6,
                beta: 0.5,
                ..Default::default()
            },
            SprtConfig {
                delta: 0.0,
                ..Default::default()
            },
            SprtConfig {
                delta: f64::NAN,
                ..Default::default()
            },
            SprtConfig {
                p0: 0.9,
                delta: 0.2,
                ..Default::default()
            },
            SprtConfig {
                max_games: 0,
                ..Default::default()
            },
            SprtConfig {
                history_capacity: 0,
                ..Default::default()
            },
        ];

        for config in bad {
            assert!(
                matches!(config.validate(), Err(RpsError::InvalidConfig(_))),
                "{:?}",
                config
            );
        }
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = SprtConfig::from_yaml_str("alpha: 0.01\nmax_games: 5000\n").unwrap();
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.max_games, 5000);
        assert_eq!(config.beta, DEFAULT_BETA);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = SprtConfig {
            delta: 0.05,
            history_capacity: 3,
            ..Default::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(SprtConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_args_override_defaults() {
        let args = SprtArgs {
            delta: Some(0.05),
            history: Some(3),
            seed: Some(9),
            ..Default::default()
        };
        let config = args.to_config().unwrap();
        assert_eq!(config.delta, 0.05);
        assert_eq!(config.history_capacity, 3);
        assert_eq!(config.alpha, DEFAULT_ALPHA);
        assert_eq!(args.base_seed().unwrap(), 9);
    }

    #[test]
    fn test_args_are_validated() {
        let args = SprtArgs {
            alpha: Some(2.0),
            ..Default::default()
        };
        assert!(args.to_config().is_err());
    }

    fn write_temp_yaml(name: &str, contents: &str) -> PathBuf {
        let file_name = format!("rps_{}_{}.yaml", name, std::process::id());
        let path = std::env::temp_dir().join(file_name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_config_file_with_flag_overrides() {
        let yaml = "alpha: 0.01\ndelta: 0.02\nhistory_capacity: 4\n";
        let path = write_temp_yaml("overrides", yaml);
        let args = SprtArgs {
            config: Some(path.clone()),
            delta: Some(0.05),
            ..Default::default()
        };
        let from_file = SprtConfig::from_yaml_file(&path);
        let merged = args.to_config();
        let _ = std::fs::remove_file(&path);

        let from_file = from_file.unwrap();
        assert_eq!(from_file.alpha, 0.01);
        assert_eq!(from_file.delta, 0.02);
        assert_eq!(from_file.history_capacity, 4);

        let merged = merged.unwrap();
        assert_eq!(merged.alpha, 0.01);
        assert_eq!(merged.delta, 0.05);
        assert_eq!(merged.history_capacity, 4);
        assert_eq!(merged.max_games, DEFAULT_MAX_GAMES);
    }

    #[test]
    fn test_bad_config_files() {
        let path = write_temp_yaml("invalid", "history_capacity: 0\n");
        let args = SprtArgs {
            config: Some(path.clone()),
            ..Default::default()
        };
        let result = args.to_config();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(RpsError::InvalidConfig(_))));

        let path = write_temp_yaml("malformed", "alpha: [not, a, number]\n");
        let result = SprtConfig::from_yaml_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(RpsError::Yaml(_))));

        let missing = std::env::temp_dir().join("rps_config_that_does_not_exist.yaml");
        let result = SprtConfig::from_yaml_file(&missing);
        assert!(matches!(result, Err(RpsError::Io(_))));
    }
}
