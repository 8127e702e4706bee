//! Layered configuration: defaults, then a TOML file named by `HOLDEX_CONFIG`, then
//! `HOLDEX_*` environment variables.

use serde::{Deserialize, Serialize};

use holdex_engine::equity::{EquityConfig, TieShare, MAX_ITERATIONS, MIN_ITERATIONS};
use holdex_engine::game::DEFAULT_BALANCE;

use crate::io_utils::read_text;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_balance: f64,
    pub iterations: u32,
    pub seed: Option<String>,
    pub tie_share: TieShare,
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_BALANCE,
            iterations: holdex_engine::equity::DEFAULT_ITERATIONS,
            seed: None,
            tie_share: TieShare::default(),
            threads: None,
        }
    }
}

impl Config {
    pub fn equity_config(&self) -> EquityConfig {
        EquityConfig::new(self.iterations, self.tie_share)
    }

    /// Worker threads for equity jobs; all cores when unset.
    pub fn worker_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_balance: ValueSource,
    pub iterations: ValueSource,
    pub seed: ValueSource,
    pub tie_share: ValueSource,
    pub threads: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_balance: ValueSource::Default,
            iterations: ValueSource::Default,
            seed: ValueSource::Default,
            tie_share: ValueSource::Default,
            threads: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "cannot read config file: {}", msg),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("HOLDEX_CONFIG")
        && !path.is_empty()
    {
        let s = read_text(&path).map_err(ConfigError::Io)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_balance {
            cfg.starting_balance = v;
            sources.starting_balance = ValueSource::File;
        }
        if let Some(v) = f.iterations {
            cfg.iterations = v;
            sources.iterations = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.tie_share {
            cfg.tie_share = v;
            sources.tie_share = ValueSource::File;
        }
        if let Some(v) = f.threads {
            cfg.threads = Some(v);
            sources.threads = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("HOLDEX_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(seed);
        sources.seed = ValueSource::Env;
    }
    if let Ok(balance) = std::env::var("HOLDEX_BALANCE")
        && !balance.is_empty()
    {
        cfg.starting_balance = balance
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid balance".into()))?;
        sources.starting_balance = ValueSource::Env;
    }
    if let Ok(iters) = std::env::var("HOLDEX_ITERATIONS")
        && !iters.is_empty()
    {
        cfg.iterations = iters
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid iterations".into()))?;
        sources.iterations = ValueSource::Env;
    }
    if let Ok(share) = std::env::var("HOLDEX_TIE_SHARE")
        && !share.is_empty()
    {
        cfg.tie_share =
            parse_tie_share(&share).ok_or_else(|| ConfigError::Invalid("Invalid tie_share".into()))?;
        sources.tie_share = ValueSource::Env;
    }
    if let Ok(threads) = std::env::var("HOLDEX_THREADS")
        && !threads.is_empty()
    {
        cfg.threads = Some(
            threads
                .parse()
                .map_err(|_| ConfigError::Invalid("Invalid threads".into()))?,
        );
        sources.threads = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    starting_balance: Option<f64>,
    #[serde(default)]
    iterations: Option<u32>,
    #[serde(default)]
    seed: Option<String>,
    #[serde(default)]
    tie_share: Option<TieShare>,
    #[serde(default)]
    threads: Option<usize>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(cfg.starting_balance > 0.0) || !cfg.starting_balance.is_finite() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_balance must be >0".into(),
        ));
    }
    if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&cfg.iterations) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: iterations must be within {}..={}",
            MIN_ITERATIONS, MAX_ITERATIONS
        )));
    }
    if cfg.threads == Some(0) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: threads must be >=1".into(),
        ));
    }
    Ok(())
}

pub fn parse_tie_share(s: &str) -> Option<TieShare> {
    match s.to_ascii_lowercase().as_str() {
        "half" => Some(TieShare::Half),
        "exact" => Some(TieShare::Exact),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let bad = [
            Config {
                starting_balance: 0.0,
                ..Config::default()
            },
            Config {
                iterations: 999,
                ..Config::default()
            },
            Config {
                iterations: 200_001,
                ..Config::default()
            },
            Config {
                threads: Some(0),
                ..Config::default()
            },
        ];
        for cfg in bad {
            assert!(validate(&cfg).is_err(), "{cfg:?}");
        }
    }

    #[test]
    fn tie_share_parsing_is_case_insensitive() {
        assert_eq!(parse_tie_share("HALF"), Some(TieShare::Half));
        assert_eq!(parse_tie_share("exact"), Some(TieShare::Exact));
        assert_eq!(parse_tie_share("quarter"), None);
    }

    #[test]
    fn file_config_accepts_partial_tables() {
        let f: FileConfig = toml::from_str("iterations = 2000\ntie_share = \"half\"\n").unwrap();
        assert_eq!(f.iterations, Some(2000));
        assert_eq!(f.tie_share, Some(TieShare::Half));
        assert!(f.seed.is_none());
    }
}
