//! Bench command: quick timing of showdown evaluation and one equity run.

use std::io::Write;
use std::time::Instant;

use holdex_engine::deck::deal_round;
use holdex_engine::equity::{estimate_equity, MIN_ITERATIONS};
use holdex_engine::hand::evaluate_showdown;

use crate::error::CliError;

const EVAL_ROUNDS: u32 = 2_000;

pub fn handle_bench_command(out: &mut dyn Write) -> Result<(), CliError> {
    // every round yields four 7-card evaluations
    let start = Instant::now();
    let mut cnt = 0u64;
    for i in 0..EVAL_ROUNDS {
        let round = deal_round(&format!("bench-{i}"));
        for hole in &round.hands {
            std::hint::black_box(evaluate_showdown(hole, &round.board));
            cnt += 1;
        }
    }
    writeln!(out, "Benchmark: {} evals in {:?}", cnt, start.elapsed())?;

    let round = deal_round("bench-equity");
    let iterations = MIN_ITERATIONS * 10;
    let start = Instant::now();
    let result = estimate_equity(&round.hands, &[], iterations, "bench-equity")?;
    writeln!(
        out,
        "Benchmark: {} equity trials in {:?}",
        result.total_simulations,
        start.elapsed()
    )?;
    Ok(())
}
