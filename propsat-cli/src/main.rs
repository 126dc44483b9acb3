//! The command-line boundary contract (spec §1 "out of scope: the
//! command-line surface ... appear in §6 only as boundary contracts").
//! Grounded in the teacher's `solver-bench::load_files`/`run_tests` for
//! directory iteration over input files, simplified down to spec.md's own
//! batch-failure contract: "one result per input formula; for batch
//! processing, failures in one formula never affect others" (spec §7) — no
//! aggregation, plotting or cross-solver comparison, since none of that is
//! part of the specified core.

mod config;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use log::{info, warn};

use propsat::cnf::Cnf;
use propsat::{dimacs, parser, Solver, SolveOutcome};

use config::CliConfig;

fn main() {
    env_logger::init();
    let cli = config::parse_args();

    let inputs = match collect_inputs(&cli.input) {
        Ok(inputs) => inputs,
        Err(err) => {
            eprintln!("propsat: could not read {}: {}", cli.input.display(), err);
            std::process::exit(1);
        }
    };

    let mut any_unsat_or_failed = false;
    for (name, src) in &inputs {
        if !run_one(name, src, &cli) {
            any_unsat_or_failed = true;
        }
    }

    if cli.return_code && any_unsat_or_failed {
        std::process::exit(1);
    }
}

/// Reads one or more named formula sources from `path`: a single file, a
/// directory of files (teacher's `load_files` pattern), or `-` for stdin.
fn collect_inputs(path: &Path) -> io::Result<Vec<(String, String)>> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(vec![("<stdin>".to_string(), buffer)]);
    }

    if path.is_dir() {
        let mut out = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let entry_path = entry.path();
            if entry_path.is_file() {
                let src = fs::read_to_string(&entry_path)?;
                let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("???").to_string();
                out.push((name, src));
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    } else {
        let src = fs::read_to_string(path)?;
        let name = path.display().to_string();
        Ok(vec![(name, src)])
    }
}

/// Builds the numeric clause model for one input, via the infix parser and
/// normalizer or the lenient DIMACS-like reader depending on `cli.dimacs`
/// (spec §6).
fn build_cnf(name: &str, src: &str, cli: &CliConfig) -> Result<Cnf, String> {
    if cli.dimacs {
        dimacs::parse_dimacs(src).map_err(|e| e.to_string())
    } else {
        let formula = parser::parse(src).map_err(|e| e.to_string())?;
        debug_atom_count(name, &formula);
        propsat::cnf::build_cnf(&formula, &cli.solver_config).map_err(|e| e.to_string())
    }
}

fn debug_atom_count(name: &str, formula: &propsat::ast::Formula) {
    info!("{}: parsed with {} atom(s)", name, formula.atoms().len());
}

/// Solves one formula and prints its result and statistics. Returns `false`
/// for UNSAT, timeout, or a parse/solve failure, so the exit-code policy can
/// treat those uniformly without letting one bad input affect another (spec
/// §7 "failures in one formula never affect others").
fn run_one(name: &str, src: &str, cli: &CliConfig) -> bool {
    let cnf = match build_cnf(name, src, cli) {
        Ok(cnf) => cnf,
        Err(err) => {
            eprintln!("{}: {}", name, err);
            return false;
        }
    };

    info!("{}: solving {} clause(s) over {} variable(s)", name, cnf.clauses.len(), cnf.num_vars);
    let outcome = Solver::new(&cnf, cli.solver_config.clone()).solve();

    match outcome {
        SolveOutcome::Satisfiable(model, stats) => {
            println!("{}: SAT", name);
            println!("{}", model);
            print_stats(&stats, false, cli.stats_json);
            true
        }
        SolveOutcome::Unsatisfiable(proof, stats) => {
            println!("{}: UNSAT", name);
            print!("{}", proof.render(&cnf.atom_names));
            print_stats(&stats, false, cli.stats_json);
            false
        }
        SolveOutcome::Timeout(stats) => {
            warn!("{}: deadline expired before a result was reached", name);
            println!("{}: TIMEOUT", name);
            print_stats(&stats, true, cli.stats_json);
            false
        }
    }
}

fn print_stats(stats: &propsat::Stats, timed_out: bool, as_json: bool) {
    if as_json {
        println!("{}", serde_json::to_string(stats).expect("Stats always serializes"));
    } else {
        println!("{}", stats.render(timed_out));
    }
}
