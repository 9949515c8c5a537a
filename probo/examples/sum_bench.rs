//! Compare three ways of summing a vector.
//!
//! ```text
//! cargo run --example sum_bench -- --ttest --gui
//! ```

use clap::Parser;
use probo::prelude::*;

fn main() -> anyhow::Result<()> {
    let args = BenchArgs::parse();

    let set: BenchSet<Vec<u64>, u64> = BenchSet::new(|| (0..10_000).collect::<Vec<u64>>())
        .with_title("vector sum")
        .case_checked(
            "iter_sum",
            |v| {
                std::hint::black_box(v.iter().sum::<u64>());
            },
            |v| v.iter().sum(),
        )
        .case_checked(
            "fold",
            |v| {
                std::hint::black_box(v.iter().fold(0u64, |acc, x| acc + x));
            },
            |v| v.iter().fold(0u64, |acc, x| acc + x),
        )
        .case_checked(
            "index_loop",
            |v| {
                let mut total = 0u64;
                for i in 0..v.len() {
                    total += v[i];
                }
                std::hint::black_box(total);
            },
            |v| {
                let mut total = 0u64;
                for i in 0..v.len() {
                    total += v[i];
                }
                total
            },
        );

    let eq = |a: &u64, b: &u64| a == b;
    run_bench(&set, Some(&eq), &args)
}
