//! Benchmark harness timing `propsat`'s `solve` entry point, adapted from
//! the teacher's own `solver/benches/bench.rs` (which benchmarks its own
//! `SatisfactionSolver`/`CadicalSolver` over a directory of `.cnf` fixture
//! files). This crate has no fixture directory, so the benchmark groups are
//! generated formulas instead: pigeonhole instances (spec §8 scenario S5,
//! scaled up) and random 3-CNF instances from a small deterministic
//! generator, both fed through the lenient DIMACS intake (spec §6) the same
//! way the teacher feeds `CNF::from_dimacs`.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use propsat::{solve_dimacs, Config};

/// Pigeonhole: `pigeons` pigeons into `pigeons - 1` holes is always UNSAT,
/// and is the classic CDCL worst case that exercises conflict analysis and
/// restarts hardest (spec §8 scenario S5 is the `pigeons = 3` instance).
fn pigeonhole_dimacs(pigeons: usize) -> String {
    let holes = pigeons - 1;
    let var = |p: usize, h: usize| (p - 1) * holes + h;
    let mut out = String::new();
    for p in 1..=pigeons {
        let clause: Vec<String> = (1..=holes).map(|h| var(p, h).to_string()).collect();
        out.push_str(&clause.join(" "));
        out.push_str(" 0\n");
    }
    for h in 1..=holes {
        for p1 in 1..=pigeons {
            for p2 in (p1 + 1)..=pigeons {
                out.push_str(&format!("-{} -{} 0\n", var(p1, h), var(p2, h)));
            }
        }
    }
    out
}

/// A tiny deterministic linear-congruential generator, used only to vary
/// which literals appear in the synthetic random-3-CNF benchmark group —
/// not a substitute for `rand` anywhere real randomness is needed (there is
/// none in `propsat` itself; this is benchmark-fixture generation only).
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0
    }

    fn range(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn random_3cnf_dimacs(num_vars: usize, num_clauses: usize, seed: u64) -> String {
    let mut rng = Lcg(seed);
    let mut out = String::new();
    for _ in 0..num_clauses {
        let lits: Vec<String> = (0..3)
            .map(|_| {
                let var = rng.range(num_vars as u64) + 1;
                if rng.range(2) == 0 { format!("-{}", var) } else { var.to_string() }
            })
            .collect();
        out.push_str(&lits.join(" "));
        out.push_str(" 0\n");
    }
    out
}

fn bench_pigeonhole(c: &mut Criterion) {
    let mut group = c.benchmark_group("pigeonhole");
    for pigeons in [3usize, 4, 5, 6] {
        let dimacs = pigeonhole_dimacs(pigeons);
        group.bench_function(format!("pigeons={}", pigeons), |b| {
            b.iter_batched(
                || dimacs.clone(),
                |src| solve_dimacs(black_box(&src), &Config::default()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_random_3cnf(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_3cnf");
    for (num_vars, num_clauses) in [(20usize, 85usize), (50, 210)] {
        let dimacs = random_3cnf_dimacs(num_vars, num_clauses, 0xC0FFEE);
        group.bench_function(format!("vars={}_clauses={}", num_vars, num_clauses), |b| {
            b.iter_batched(
                || dimacs.clone(),
                |src| solve_dimacs(black_box(&src), &Config::default()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_pigeonhole, bench_random_3cnf
}
criterion_main!(benches);
