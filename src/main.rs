//! `tree-experiments`: height and timing sweeps over both trees.
//!
//! Usage:
//!   tree-experiments          run the suites selected by `TREE_EXP_SUITES`
//!   tree-experiments demo     print the BST and order-statistic walkthroughs
//!
//! Settings come from the `TREE_EXP_*` environment variables. CSV tables go
//! to stdout, progress goes to the log.

use std::{
    io::{self, Write},
    process,
};

use order_stat_tree::experiment::{
    demo::{bst_demo, os_demo},
    ExperimentConfig, Runner,
};

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ExperimentConfig::from_env();
    log::info!("experiment config: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => {}
        Some("demo") => {
            bst_demo(&mut out, &mut config.rng())?;
            writeln!(out)?;
            let passed = os_demo(&mut out)?;
            out.flush()?;
            if !passed {
                log::error!("order-statistic walkthrough found wrong answers");
                process::exit(1);
            }
            return Ok(());
        }
        Some(other) => {
            eprintln!("unknown command {:?}, expected `demo` or nothing", other);
            process::exit(2);
        }
    }

    let mut runner = Runner::new(config);
    runner.run(|report| {
        report.write_csv(&mut out)?;
        writeln!(out)?;
        out.flush()
    })
}
