//! Property tests over arbitrary seeds and jump scripts

use proptest::prelude::*;

use stair_runner::consts::{SIM_DT, SIM_DT_MS};
use stair_runner::sim::{ChunkCursor, Rng, generate_chunk};
use stair_runner::{Director, RunPhase, Tuning};

fn run_script(seed: u32, jumps: &[u32], ticks: u32) -> Director {
    let mut director = Director::prepared(Tuning::default(), seed, 0.0).expect("valid tuning");
    director.start(0.0);
    for tick in 0..ticks {
        let now = tick as f64 * SIM_DT_MS;
        if jumps.contains(&tick) {
            director.jump(now);
        }
        director.update(SIM_DT, now);
    }
    director
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn rng_stream_reproducible(seed in any::<u32>()) {
        let mut a = Rng::new(seed);
        let mut b = Rng::new(seed);
        for _ in 0..64 {
            let x = a.next_f64();
            prop_assert!((0.0..1.0).contains(&x));
            prop_assert_eq!(x, b.next_f64());
        }
    }

    #[test]
    fn chunks_contiguous_and_fair(seed in any::<u32>()) {
        let tuning = Tuning::default();
        let mut cursor = ChunkCursor::default();
        let mut expected = 0u32;
        let mut prev_demanding = false;
        for index in 0..12 {
            let chunk = generate_chunk(&tuning, seed, index, cursor);
            prop_assert_eq!(chunk.index, index);
            for step in &chunk.steps {
                prop_assert_eq!(step.index, expected);
                expected += 1;
                let demanding = step.is_demanding(tuning.demanding_rise);
                prop_assert!(!(demanding && prev_demanding), "steps {} and {}", step.index - 1, step.index);
                prev_demanding = demanding;
            }
            cursor = chunk.next;
        }
    }

    #[test]
    fn scripted_runs_reproducible(
        seed in any::<u32>(),
        jumps in prop::collection::vec(0u32..900, 0..12),
    ) {
        let a = run_script(seed, &jumps, 900);
        let b = run_script(seed, &jumps, 900);
        prop_assert_eq!(a.summary(), b.summary());
        prop_assert_eq!(a.death_reason().is_some(), a.phase() == RunPhase::Dead);
        prop_assert!(a.window_len() <= a.tuning().window_capacity());
    }
}
