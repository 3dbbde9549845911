use std::{env, str::FromStr};

use bitmask_enum::bitmask;
use rand::{rngs::StdRng, SeedableRng};

/// Experiment tables the harness can produce.
#[bitmask(u8)]
pub enum Suites {
    Height,
    Build,
    Destroy,
    Walk,
    OsInsert,
    OsDelete,
    OsSelect,
    OsRank,
}

pub const SUITE_NAMES: [(&str, Suites); 8] = [
    ("height", Suites::Height),
    ("build", Suites::Build),
    ("destroy", Suites::Destroy),
    ("walk", Suites::Walk),
    ("os_insert", Suites::OsInsert),
    ("os_delete", Suites::OsDelete),
    ("os_select", Suites::OsSelect),
    ("os_rank", Suites::OsRank),
];

impl Suites {
    pub fn every() -> Self {
        SUITE_NAMES
            .iter()
            .fold(Suites::Height, |acc, &(_, suite)| acc | suite)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SUITE_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, suite)| suite)
    }

    /// Parses a comma separated list such as `height,os_rank`. Unknown names
    /// are skipped with a warning; `None` if nothing valid remains.
    pub fn parse_list(list: &str) -> Option<Self> {
        let mut selected: Option<Self> = None;
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match Self::from_name(name) {
                Some(suite) => selected = Some(selected.map_or(suite, |s| s | suite)),
                None => log::warn!("ignoring unknown suite {:?}", name),
            }
        }
        selected
    }
}

pub const ENV_MIN_SIZE: &str = "TREE_EXP_MIN_SIZE";
pub const ENV_MAX_SIZE: &str = "TREE_EXP_MAX_SIZE";
pub const ENV_GROWTH: &str = "TREE_EXP_GROWTH";
pub const ENV_NUM_SIZES: &str = "TREE_EXP_NUM_SIZES";
pub const ENV_TREES: &str = "TREE_EXP_TREES";
pub const ENV_OS_MAX_SIZE: &str = "TREE_EXP_OS_MAX_SIZE";
pub const ENV_OS_GROWTH: &str = "TREE_EXP_OS_GROWTH";
pub const ENV_OS_NUM_SIZES: &str = "TREE_EXP_OS_NUM_SIZES";
pub const ENV_RUNS: &str = "TREE_EXP_RUNS";
pub const ENV_SEED: &str = "TREE_EXP_SEED";
pub const ENV_SUITES: &str = "TREE_EXP_SUITES";

/// Size sweep and repetition settings for the experiment harness.
///
/// The BST suites and the order-statistic suites sweep separately: both
/// start at `min_size`, the order-statistic sweep grows slower and reaches
/// further.
#[derive(Clone, Debug)]
pub struct ExperimentConfig {
    pub min_size: usize,
    pub max_size: usize,
    /// Factor between consecutive sizes of the sweep.
    pub growth: f64,
    pub num_sizes: usize,
    /// Trees built per size for the largest sizes; small sizes use more.
    pub trees_per_size: usize,
    /// Operations timed per tree by the select and rank suites.
    pub queries_per_tree: usize,
    pub os_max_size: usize,
    pub os_growth: f64,
    pub os_num_sizes: usize,
    /// Repetitions of every order-statistic data point; the row is their mean.
    pub runs: usize,
    pub seed: Option<u64>,
    pub suites: Suites,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            min_size: 10,
            max_size: 10_000,
            growth: 1.3,
            num_sizes: 40,
            trees_per_size: 10,
            queries_per_tree: 100,
            os_max_size: 100_000,
            os_growth: 1.15,
            os_num_sizes: 80,
            runs: 3,
            seed: None,
            suites: Suites::every(),
        }
    }
}

fn env_override<T: FromStr>(name: &str, current: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("{}={:?} is not valid, keeping the default", name, raw);
                current
            }
        },
        Err(_) => current,
    }
}

impl ExperimentConfig {
    /// Defaults overridden by the `TREE_EXP_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut config = Self {
            min_size: env_override(ENV_MIN_SIZE, defaults.min_size),
            max_size: env_override(ENV_MAX_SIZE, defaults.max_size),
            growth: env_override(ENV_GROWTH, defaults.growth),
            num_sizes: env_override(ENV_NUM_SIZES, defaults.num_sizes),
            trees_per_size: env_override(ENV_TREES, defaults.trees_per_size),
            queries_per_tree: defaults.queries_per_tree,
            os_max_size: env_override(ENV_OS_MAX_SIZE, defaults.os_max_size),
            os_growth: env_override(ENV_OS_GROWTH, defaults.os_growth),
            os_num_sizes: env_override(ENV_OS_NUM_SIZES, defaults.os_num_sizes),
            runs: env_override(ENV_RUNS, defaults.runs),
            seed: env::var(ENV_SEED).ok().and_then(|raw| match raw.trim().parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    log::warn!("{}={:?} is not a u64 seed, seeding from entropy", ENV_SEED, raw);
                    None
                }
            }),
            suites: env::var(ENV_SUITES)
                .ok()
                .and_then(|raw| Suites::parse_list(&raw))
                .unwrap_or(defaults.suites),
        };
        config.sanitize();
        config
    }

    /// Clamps settings that would make the sweep empty or endless.
    pub fn sanitize(&mut self) {
        if self.min_size == 0 {
            log::warn!("min_size 0 raised to 1");
            self.min_size = 1;
        }
        if self.max_size < self.min_size {
            log::warn!("max_size {} below min_size, using {}", self.max_size, self.min_size);
            self.max_size = self.min_size;
        }
        if !(self.growth > 1.0) {
            log::warn!("growth {} must exceed 1, using 1.3", self.growth);
            self.growth = 1.3;
        }
        if self.os_max_size < self.min_size {
            log::warn!("os_max_size {} below min_size, using {}", self.os_max_size, self.min_size);
            self.os_max_size = self.min_size;
        }
        if !(self.os_growth > 1.0) {
            log::warn!("os_growth {} must exceed 1, using 1.15", self.os_growth);
            self.os_growth = 1.15;
        }
        self.trees_per_size = self.trees_per_size.max(1);
        self.queries_per_tree = self.queries_per_tree.max(1);
        self.runs = self.runs.max(1);
    }

    /// Random source for shuffles and query picks: seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn sweep(min_size: usize, max_size: usize, growth: f64, num_sizes: usize) -> Vec<usize> {
    let mut sizes: Vec<usize> = Vec::with_capacity(num_sizes);
    for i in 0..num_sizes {
        let n = (min_size as f64 * growth.powi(i as i32)) as usize;
        if n > max_size {
            if sizes.last().map_or(true, |&last| last < max_size) {
                sizes.push(max_size);
            }
            break;
        }
        if sizes.last() == Some(&n) {
            continue;
        }
        sizes.push(n);
    }
    sizes
}

/// Tree sizes of the BST sweep: `min_size * growth^i`, capped by one final
/// `max_size` entry.
pub fn generate_sizes(config: &ExperimentConfig) -> Vec<usize> {
    sweep(config.min_size, config.max_size, config.growth, config.num_sizes)
}

/// Tree sizes of the order-statistic sweep, built like [`generate_sizes`]
/// from the `os_*` settings.
pub fn generate_os_sizes(config: &ExperimentConfig) -> Vec<usize> {
    sweep(
        config.min_size,
        config.os_max_size,
        config.os_growth,
        config.os_num_sizes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sweep_matches_bst_runs() {
        let sizes = generate_sizes(&ExperimentConfig::default());
        assert_eq!(&sizes[..4], &[10, 13, 16, 21]);
        assert_eq!(sizes.last(), Some(&10_000));
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sweep_skips_truncated_duplicates() {
        let config = ExperimentConfig {
            min_size: 1,
            max_size: 20,
            growth: 1.1,
            num_sizes: 100,
            ..ExperimentConfig::default()
        };
        let sizes = generate_sizes(&config);
        assert_eq!(sizes.first(), Some(&1));
        assert_eq!(sizes.last(), Some(&20));
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sweep_stops_at_num_sizes() {
        let config = ExperimentConfig {
            num_sizes: 3,
            ..ExperimentConfig::default()
        };
        assert_eq!(generate_sizes(&config), vec![10, 13, 16]);
    }

    #[test]
    fn default_os_sweep_reaches_further() {
        let config = ExperimentConfig::default();
        let sizes = generate_os_sizes(&config);
        assert_eq!(&sizes[..4], &[10, 11, 13, 15]);
        assert_eq!(sizes.len(), 67);
        assert_eq!(sizes.last(), Some(&100_000));
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn seeded_rng_repeats() {
        use rand::Rng;

        let config = ExperimentConfig {
            seed: Some(5),
            ..ExperimentConfig::default()
        };
        let (mut a, mut b) = (config.rng(), config.rng());
        for _ in 0..4 {
            assert_eq!(a.gen::<u32>(), b.gen::<u32>());
        }
    }

    #[test]
    fn suite_names_parse() {
        let suites = Suites::parse_list("height, OS_RANK,bogus").unwrap();
        assert!(suites.contains(Suites::Height));
        assert!(suites.contains(Suites::OsRank));
        assert!(!suites.contains(Suites::Walk));
        assert!(Suites::parse_list("nope").is_none());
        assert!(Suites::parse_list("").is_none());
    }

    #[test]
    fn every_contains_all_suites() {
        let every = Suites::every();
        for (_, suite) in SUITE_NAMES {
            assert!(every.contains(suite));
        }
    }

    #[test]
    fn sanitize_fixes_degenerate_settings() {
        let mut config = ExperimentConfig {
            min_size: 0,
            max_size: 0,
            growth: 0.5,
            trees_per_size: 0,
            os_max_size: 0,
            os_growth: 1.0,
            runs: 0,
            ..ExperimentConfig::default()
        };
        config.sanitize();
        assert_eq!(config.min_size, 1);
        assert_eq!(config.max_size, 1);
        assert_eq!(config.growth, 1.3);
        assert_eq!(config.trees_per_size, 1);
        assert_eq!(config.os_max_size, 1);
        assert_eq!(config.os_growth, 1.15);
        assert_eq!(config.runs, 1);
    }
}
