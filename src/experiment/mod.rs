//! Height and timing experiments over [`Bst`] and [`OsTree`].
//!
//! Each suite sweeps the sizes from [`generate_sizes`] and emits CSV
//! [`Report`]s. The BST suites run once per [`ShuffleMethod`] plus a
//! comparison table. The order-statistic suites use Fisher-Yates input over
//! the longer [`generate_os_sizes`] sweep, averaging every point over
//! `runs` repetitions. [`demo`] holds the scripted walkthroughs of both
//! trees.

mod config;
pub mod demo;
mod report;

use std::{hint::black_box, io};

use rand::{rngs::StdRng, Rng};

pub use self::{
    config::{
        generate_os_sizes, generate_sizes, ExperimentConfig, Suites, ENV_GROWTH, ENV_MAX_SIZE,
        ENV_MIN_SIZE, ENV_NUM_SIZES, ENV_OS_GROWTH, ENV_OS_MAX_SIZE, ENV_OS_NUM_SIZES, ENV_RUNS,
        ENV_SEED, ENV_SUITES, ENV_TREES, SUITE_NAMES,
    },
    report::Report,
};
use crate::{
    shuffle::{sequence, ShuffleMethod},
    timing::{time_ms, Stopwatch},
    tree_base::{NodeId, SearchTree, TreeNode},
    Bst, OsTree,
};

/// Inserts `keys` in order into a fresh tree.
pub fn build<T>(keys: &[i32]) -> T
where
    T: SearchTree + Default,
    T::Node: TreeNode<Key = i32>,
{
    let mut tree = T::default();
    for &key in keys {
        tree.insert_key(key);
    }
    tree
}

/// Empties `tree` by repeatedly deleting and releasing its root. Returns the
/// number of nodes removed.
pub fn delete_roots<T: SearchTree>(tree: &mut T) -> usize {
    let mut removed = 0;
    while let Some(root) = tree.root() {
        tree.remove(root);
        removed += 1;
    }
    removed
}

fn build_ms<T>(keys: &[i32]) -> f64
where
    T: SearchTree + Default,
    T::Node: TreeNode<Key = i32>,
{
    let (tree, ms) = time_ms(|| build::<T>(keys));
    black_box(tree.len());
    ms
}

fn delete_roots_ms<T>(keys: &[i32]) -> f64
where
    T: SearchTree + Default,
    T::Node: TreeNode<Key = i32>,
{
    let mut tree = build::<T>(keys);
    let (removed, ms) = time_ms(|| delete_roots(&mut tree));
    debug_assert_eq!(removed, keys.len());
    ms
}

/// Trees per data point of the insert and delete comparisons.
pub fn os_update_trees(n: usize) -> usize {
    match n {
        0..=100 => 100,
        101..=1000 => 50,
        1001..=10_000 => 30,
        _ => 15,
    }
}

/// Trees per data point of the select and rank timings.
pub fn os_query_trees(n: usize) -> usize {
    if n <= 1000 {
        20
    } else {
        10
    }
}

fn overhead(bst_ms: f64, os_ms: f64) -> f64 {
    if bst_ms > 0.0 {
        os_ms / bst_ms
    } else {
        f64::NAN
    }
}

struct BstSuite {
    suite: Suites,
    label: &'static str,
    header: &'static [&'static str],
    precision: usize,
}

const BST_SUITES: [BstSuite; 4] = [
    BstSuite {
        suite: Suites::Height,
        label: "Height",
        header: &["n", "avg_height"],
        precision: 2,
    },
    BstSuite {
        suite: Suites::Build,
        label: "Build Time",
        header: &["n", "avg_time_ms"],
        precision: 4,
    },
    BstSuite {
        suite: Suites::Destroy,
        label: "Destroy Time",
        header: &["n", "delete_roots_ms", "destroy_ms"],
        precision: 4,
    },
    BstSuite {
        suite: Suites::Walk,
        label: "Inorder Walk",
        header: &["n", "total_time_ms", "time_per_node_ms"],
        precision: 8,
    },
];

const METHOD_COLUMNS: [&str; 5] = [
    "n",
    "no_shuffle",
    "fisher_yates",
    "randomize_inplace",
    "permute_sort",
];

/// Drives the configured suites with one seeded random source.
pub struct Runner {
    config: ExperimentConfig,
    sizes: Vec<usize>,
    os_sizes: Vec<usize>,
    rng: StdRng,
}

impl Runner {
    pub fn new(mut config: ExperimentConfig) -> Self {
        config.sanitize();
        Self {
            sizes: generate_sizes(&config),
            os_sizes: generate_os_sizes(&config),
            rng: config.rng(),
            config,
        }
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn os_sizes(&self) -> &[usize] {
        &self.os_sizes
    }

    /// Runs every selected suite, handing each finished table to `emit`.
    pub fn run(&mut self, mut emit: impl FnMut(&Report) -> io::Result<()>) -> io::Result<()> {
        log::info!(
            "running suites over {} sizes ({}..={}), order-statistic suites over {} ({}..={})",
            self.sizes.len(),
            self.config.min_size,
            self.config.max_size,
            self.os_sizes.len(),
            self.config.min_size,
            self.config.os_max_size
        );

        for spec in &BST_SUITES {
            if self.config.suites.contains(spec.suite) {
                for report in self.bst_suite(spec) {
                    emit(&report)?;
                }
            }
        }

        let os_suites: [(Suites, fn(&mut Self) -> Report); 4] = [
            (Suites::OsInsert, Self::os_insert),
            (Suites::OsDelete, Self::os_delete),
            (Suites::OsSelect, Self::os_select),
            (Suites::OsRank, Self::os_rank),
        ];
        for (suite, run) in os_suites {
            if self.config.suites.contains(suite) {
                emit(&run(self))?;
            }
        }

        log::info!("all experiments completed");
        Ok(())
    }

    /// Trees averaged per data point. Sorted input is deterministic and slow to
    /// build at large sizes, so it gets few; small random trees get more.
    pub fn trees_for(&self, n: usize, method: ShuffleMethod) -> usize {
        let base = self.config.trees_per_size;
        if !method.is_random() {
            return if n > 1000 { 1 } else { base.min(5) };
        }
        match n {
            0..=100 => base * 3,
            101..=1000 => base * 2,
            _ => base,
        }
    }

    fn keys(&mut self, n: usize, method: ShuffleMethod) -> Vec<i32> {
        let mut keys = sequence(n);
        method.apply(&mut keys, &mut self.rng);
        keys
    }

    fn measure(&mut self, suite: Suites, n: usize, method: ShuffleMethod) -> Vec<f64> {
        let trees = self.trees_for(n, method);
        let mut totals: Vec<f64> = Vec::new();
        for _ in 0..trees {
            let keys = self.keys(n, method);
            let sample = if suite == Suites::Height {
                vec![build::<Bst<i32>>(&keys).height() as f64]
            } else if suite == Suites::Build {
                vec![build_ms::<Bst<i32>>(&keys)]
            } else if suite == Suites::Destroy {
                let delete_ms = delete_roots_ms::<Bst<i32>>(&keys);
                let mut tree = build::<Bst<i32>>(&keys);
                let (released, destroy_ms) = time_ms(|| tree.destroy(|key| {
                    black_box(key);
                }));
                debug_assert_eq!(released, n);
                vec![delete_ms, destroy_ms]
            } else {
                let tree = build::<Bst<i32>>(&keys);
                let runs = if n < 1000 { 100 } else { 10 };
                let watch = Stopwatch::start();
                for _ in 0..runs {
                    black_box(tree.walk_silent());
                }
                let per_walk = watch.elapsed_ms() / runs as f64;
                vec![per_walk, per_walk / n.max(1) as f64]
            };
            totals.resize(sample.len(), 0.0);
            for (total, value) in totals.iter_mut().zip(sample) {
                *total += value;
            }
        }
        totals.iter().map(|total| total / trees as f64).collect()
    }

    fn bst_suite(&mut self, spec: &BstSuite) -> Vec<Report> {
        let sizes = self.sizes.clone();
        let mut reports = Vec::with_capacity(ShuffleMethod::ALL.len() + 1);
        let mut comparison = Report::new(format!("{} Comparison", spec.label), &METHOD_COLUMNS);
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(ShuffleMethod::ALL.len());

        for method in ShuffleMethod::ALL {
            log::info!("{}: {} experiment", method, spec.label);
            let mut report = Report::new(format!("{}: {} Experiment", method, spec.label), spec.header);
            let mut column = Vec::with_capacity(sizes.len());
            for &n in &sizes {
                let values = self.measure(spec.suite, n, method);
                log::debug!("{} {} n={} -> {:?}", spec.label, method, n, values);
                report.push(n, &values, spec.precision);
                column.push(values[0]);
            }
            reports.push(report);
            columns.push(column);
        }

        for (i, &n) in sizes.iter().enumerate() {
            let row: Vec<f64> = columns.iter().map(|column| column[i]).collect();
            comparison.push(n, &row, spec.precision);
        }
        reports.push(comparison);
        reports
    }

    fn os_compare(&mut self, title: &str, timed: fn(&[i32]) -> (f64, f64)) -> Report {
        log::info!("{}", title);
        let mut report = Report::new(
            title,
            &["n", "bst_time_ms", "os_tree_time_ms", "overhead_ratio"],
        );
        let runs = self.config.runs;
        for n in self.os_sizes.clone() {
            let trees = os_update_trees(n);
            let (mut bst_avg, mut os_avg) = (0.0, 0.0);
            for _ in 0..runs {
                let (mut bst_total, mut os_total) = (0.0, 0.0);
                for _ in 0..trees {
                    let keys = self.keys(n, ShuffleMethod::FisherYates);
                    let (bst_ms, os_ms) = timed(&keys);
                    bst_total += bst_ms;
                    os_total += os_ms;
                }
                bst_avg += bst_total / trees as f64;
                os_avg += os_total / trees as f64;
            }
            let bst_ms = bst_avg / runs as f64;
            let os_ms = os_avg / runs as f64;
            report.push(n, &[bst_ms, os_ms, overhead(bst_ms, os_ms)], 4);
        }
        report
    }

    pub fn os_insert(&mut self) -> Report {
        self.os_compare("INSERT Time Comparison (OS-Tree vs BST)", |keys| {
            (build_ms::<Bst<i32>>(keys), build_ms::<OsTree<i32>>(keys))
        })
    }

    pub fn os_delete(&mut self) -> Report {
        self.os_compare("DELETE Time Comparison (OS-Tree vs BST)", |keys| {
            (
                delete_roots_ms::<Bst<i32>>(keys),
                delete_roots_ms::<OsTree<i32>>(keys),
            )
        })
    }

    fn os_queries(&mut self, title: &str, query: fn(&OsTree<i32>, &[NodeId], usize)) -> Report {
        log::info!("{}", title);
        let queries = self.config.queries_per_tree;
        let mut report = Report::new(title, &["n", "avg_time_ms", "time_per_operation_us"]);
        let runs = self.config.runs;
        for n in self.os_sizes.clone() {
            let trees = os_query_trees(n);
            let mut run_total_ms = 0.0;
            for _ in 0..runs {
                let mut total_ms = 0.0;
                for _ in 0..trees {
                    let keys = self.keys(n, ShuffleMethod::FisherYates);
                    let tree = build::<OsTree<i32>>(&keys);
                    let ids: Vec<NodeId> = tree.node_ids().collect();
                    let picks: Vec<usize> =
                        (0..queries).map(|_| self.rng.gen_range(0..n)).collect();

                    let watch = Stopwatch::start();
                    for &pick in &picks {
                        query(&tree, &ids, pick);
                    }
                    total_ms += watch.elapsed_ms();
                }
                run_total_ms += total_ms / trees as f64;
            }
            let avg_ms = run_total_ms / runs as f64;
            report.push(n, &[avg_ms, avg_ms * 1000.0 / queries as f64], 4);
        }
        report
    }

    pub fn os_select(&mut self) -> Report {
        self.os_queries("OS-SELECT Runtime", |tree, _, pick| {
            black_box(tree.select(pick + 1));
        })
    }

    pub fn os_rank(&mut self) -> Report {
        self.os_queries("OS-RANK Runtime", |tree, ids, pick| {
            black_box(tree.rank(ids[pick]));
        })
    }
}
