//! Command-line argument handling (boundary contract, spec §1 "out of
//! scope: the command-line surface"). Grounded in the teacher's
//! `solver-cli`/`solver-bench::make_config`, which both build a `clap::App`
//! by hand rather than derive one; `propsat-cli` keeps that builder style
//! since the `clap` dependency pinned in `Cargo.toml` is the 2.x builder API.

use std::path::PathBuf;
use std::time::Duration;

use clap::{App, Arg};

use propsat::{Config, Deadline};

/// Everything `main` needs, parsed once out of `std::env::args()`.
pub struct CliConfig {
    pub input: PathBuf,
    pub dimacs: bool,
    pub return_code: bool,
    pub stats_json: bool,
    pub solver_config: Config,
}

pub fn parse_args() -> CliConfig {
    let matches = App::new("propsat")
        .version("0.1.0")
        .author("Radoslaw Rowicki <radrowicki@gmail.com>, Alexander Lankheit <a.lankheit@campus.lmu.de>, Korbinian Federholzner <k.federholzner@campus.lmu.de>")
        .about("CDCL SAT solver for an infix propositional language, with resolution-proof reconstruction on UNSAT")
        .arg(Arg::with_name("input")
            .help("Formula file, DIMACS file, or directory of either (use '-' for stdin)")
            .required(true)
            .index(1))
        .arg(Arg::with_name("dimacs")
            .long("dimacs")
            .help("Treat input as the lenient DIMACS-like CNF intake format (spec §6) instead of infix"))
        .arg(Arg::with_name("return_code")
            .long("return-code")
            .short("r")
            .help("Exit 1 if any input was UNSAT or failed, 0 otherwise (useful for scripting)"))
        .arg(Arg::with_name("stats_json")
            .long("stats-json")
            .help("Emit the statistics artifact as JSON instead of the default text rendering"))
        .arg(Arg::with_name("no_tseitin")
            .long("no-tseitin")
            .help("Disable the Tseitin encoder (spec §4.2)"))
        .arg(Arg::with_name("no_subsumption")
            .long("no-subsumption")
            .help("Disable the subsumption pre-processor and restart-time sweep (spec §4.3)"))
        .arg(Arg::with_name("no_restart")
            .long("no-restart")
            .help("Disable the restart policy (spec §4.4.6)"))
        .arg(Arg::with_name("tseitin_threshold")
            .long("tseitin-threshold")
            .takes_value(true)
            .help("Structural-complexity threshold that gates Tseitin encoding (default 8)"))
        .arg(Arg::with_name("restart_threshold")
            .long("restart-threshold")
            .takes_value(true)
            .help("Conflicts between restarts (default 5)"))
        .arg(Arg::with_name("vsids_decay")
            .long("vsids-decay")
            .takes_value(true)
            .help("VSIDS activity decay factor in (0,1) (default 0.95)"))
        .arg(Arg::with_name("vsids_bump")
            .long("vsids-bump")
            .takes_value(true)
            .help("VSIDS per-conflict activity bump (default 1.0)"))
        .arg(Arg::with_name("timeout_ms")
            .long("timeout-ms")
            .takes_value(true)
            .help("Cooperative deadline in milliseconds (spec §5); absent means no deadline"))
        .get_matches();

    let mut solver_config = Config::default();
    if matches.is_present("no_tseitin") {
        solver_config.use_tseitin = false;
    }
    if matches.is_present("no_subsumption") {
        solver_config.use_subsumption = false;
    }
    if matches.is_present("no_restart") {
        solver_config.use_restart = false;
    }
    if let Some(v) = matches.value_of("tseitin_threshold") {
        solver_config.tseitin_threshold = v.parse().expect("--tseitin-threshold must be an integer");
    }
    if let Some(v) = matches.value_of("restart_threshold") {
        solver_config.restart_threshold = v.parse().expect("--restart-threshold must be an integer >= 1");
    }
    if let Some(v) = matches.value_of("vsids_decay") {
        solver_config.vsids_decay = v.parse().expect("--vsids-decay must be a float in (0,1)");
    }
    if let Some(v) = matches.value_of("vsids_bump") {
        solver_config.vsids_bump = v.parse().expect("--vsids-bump must be a positive float");
    }
    if let Some(v) = matches.value_of("timeout_ms") {
        let ms: u64 = v.parse().expect("--timeout-ms must be an integer");
        solver_config.deadline = Deadline::after(Duration::from_millis(ms));
    }

    CliConfig {
        input: PathBuf::from(matches.value_of("input").expect("input is required")),
        dimacs: matches.is_present("dimacs"),
        return_code: matches.is_present("return_code"),
        stats_json: matches.is_present("stats_json"),
        solver_config,
    }
}
