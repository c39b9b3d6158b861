//! End-to-end runs through the director's public surface

use stair_runner::consts::{SIM_DT, SIM_DT_MS};
use stair_runner::sim::{ChunkCursor, Step, generate_chunk};
use stair_runner::{DeathReason, Director, RunPhase, Tuning};

/// Tuning with a flat, hazard-free path
fn flat_tuning() -> Tuning {
    Tuning {
        safe_start_steps: u32::MAX,
        gem_chance: 0.0,
        ..Default::default()
    }
}

fn generate_steps(tuning: &Tuning, seed: u32, chunks: u32) -> Vec<Step> {
    let mut cursor = ChunkCursor::default();
    let mut steps = Vec::new();
    for index in 0..chunks {
        let chunk = generate_chunk(tuning, seed, index, cursor);
        cursor = chunk.next;
        steps.extend(chunk.steps);
    }
    steps
}

/// Scripted run: `jumps` lists tick numbers at which `jump()` fires
fn scripted_run(seed: u32, ticks: u32, jumps: &[u32]) -> Director {
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

#[test]
fn test_golden_scenario_seed_1337() {
    let director = scripted_run(1337, 600, &[10, 250]);

    assert_eq!(director.phase(), RunPhase::Dead);
    assert_eq!(director.death_reason(), Some(DeathReason::Riser));
    assert_eq!(director.score(), 19);
    assert_eq!(director.steps_cleared(), 9);
    assert_eq!(director.gems(), 2);
    assert_eq!(director.gaps_cleared(), 0);
    assert_eq!(director.spikes_cleared(), 0);
    assert_eq!(director.state().jumps, 2);
    assert_eq!(director.state().ticks, 393);
}

#[test]
fn test_identical_scripts_identical_runs() {
    for seed in [0, 1, 1337, 0xDEAD_BEEF] {
        let a = scripted_run(seed, 900, &[10, 120, 250, 251, 400]);
        let b = scripted_run(seed, 900, &[10, 120, 250, 251, 400]);
        assert_eq!(a.summary(), b.summary());
        let layout_a: Vec<&Step> = a.steps().collect();
        let layout_b: Vec<&Step> = b.steps().collect();
        assert_eq!(layout_a, layout_b);
    }
}

#[test]
fn test_prepare_reuses_director() {
    let mut director = scripted_run(9, 600, &[]);
    director.prepare(1337, 0.0);
    assert_eq!(director.phase(), RunPhase::Menu);
    assert_eq!(director.score(), 0);
    assert!(director.death_reason().is_none());

    let fresh = Director::prepared(Tuning::default(), 1337, 0.0).expect("valid tuning");
    let reused: Vec<&Step> = director.steps().collect();
    let expected: Vec<&Step> = fresh.steps().collect();
    assert_eq!(reused, expected);
}

#[test]
fn test_chunk_continuity() {
    let tuning = Tuning::default();
    let mut cursor = ChunkCursor::default();
    for index in 0..50 {
        let chunk = generate_chunk(&tuning, 1337, index, cursor);
        let first = &chunk.steps[0];
        let start = first.start();
        assert!((start.x - cursor.position.x).abs() < 1e-9, "chunk {index} x seam");
        assert!((start.z - cursor.position.z).abs() < 1e-9, "chunk {index} z seam");
        assert_eq!(first.height, cursor.position.y, "chunk {index} height seam");
        cursor = chunk.next;
    }
}

#[test]
fn test_step_indices_strictly_consecutive() {
    let steps = generate_steps(&Tuning::default(), 4242, 20);
    for (expected, step) in steps.iter().enumerate() {
        assert_eq!(step.index as usize, expected);
    }
}

#[test]
fn test_no_consecutive_demanding_steps() {
    let tuning = Tuning::default();
    for seed in [1, 1337, 42, 99_999] {
        // 160 chunks × 32 = 5,120 steps
        let steps = generate_steps(&tuning, seed, 160);
        assert!(steps.len() >= 5_000);
        let mut demanding = 0;
        for pair in steps.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                !(a.is_demanding(tuning.demanding_rise) && b.is_demanding(tuning.demanding_rise)),
                "seed {seed}: steps {} and {} are both demanding",
                a.index,
                b.index
            );
            if a.is_demanding(tuning.demanding_rise) {
                demanding += 1;
            }
        }
        // The generator must still produce challenge
        assert!(demanding > 100, "seed {seed}: only {demanding} demanding steps");
    }
}

#[test]
fn test_spikes_only_between_calm_transitions() {
    let tuning = Tuning::default();
    let steps = generate_steps(&tuning, 77, 60);
    let mut last_spike: Option<u32> = None;
    for pair in steps.windows(2) {
        let (prev, step) = (&pair[0], &pair[1]);
        if step.spike.is_some() {
            assert!(!prev.is_demanding(tuning.demanding_rise));
            assert!(!step.is_demanding(tuning.demanding_rise));
            if let Some(last) = last_spike {
                assert!(step.index - last > tuning.spike_cooldown_steps);
            }
            last_spike = Some(step.index);
        }
    }
    assert!(last_spike.is_some());
}

#[test]
fn test_window_bound_over_long_run() {
    let tuning = flat_tuning();
    let capacity = tuning.window_capacity();
    let mut director = Director::prepared(tuning, 2, 0.0).expect("valid tuning");
    director.start(0.0);
    for tick in 0..20_000u32 {
        director.update(SIM_DT, tick as f64 * SIM_DT_MS);
        assert!(director.window_len() <= capacity, "tick {tick}: {}", director.window_len());
    }
    assert_eq!(director.phase(), RunPhase::Playing);
    let current = director.state().step_index;
    assert!(director.step(current).is_some());
    // Eviction runs before the tick's own transitions, so allow one step of slack
    assert!(director.steps().all(|s| s.index + 33 >= current));
}

#[test]
fn test_coyote_and_buffer_through_public_api() {
    let mut director = Director::prepared(flat_tuning(), 11, 0.0).expect("valid tuning");
    director.start(0.0);
    director.update(SIM_DT, 0.0);
    assert!(director.can_jump(0.0));
    assert!(director.can_jump(director.tuning().coyote_ms));
    assert!(!director.can_jump(director.tuning().coyote_ms + 1.0));

    director.jump(0.0);
    assert!(director.state().vy > 0.0);
    // Mid-air request waits for landing
    director.jump(SIM_DT_MS);
    assert_eq!(director.state().jumps, 1);
    assert!(director.state().jump_buffer_until_ms.is_some());
}

#[test]
fn test_jump_ignored_unless_playing() {
    let mut director = Director::prepared(Tuning::default(), 3, 0.0).expect("valid tuning");
    director.jump(0.0);
    assert_eq!(director.state().jumps, 0);
    assert!(director.state().jump_buffer_until_ms.is_none());
}

#[test]
fn test_positions_follow_current_step() {
    let mut director = Director::prepared(flat_tuning(), 5, 0.0).expect("valid tuning");
    director.start(0.0);
    for tick in 0..240u32 {
        director.update(SIM_DT, tick as f64 * SIM_DT_MS);
    }
    let step = director.current_step().expect("current step").clone();
    let pos = director.player_position();
    let expected = step.point_at(director.state().along);
    assert!((pos.x - expected.x).abs() < 1e-9);
    assert!((pos.z - expected.z).abs() < 1e-9);
    assert_eq!(pos.y, director.state().y);
}

#[test]
fn test_hazard_positions_on_default_path() {
    let director = Director::prepared(Tuning::default(), 1337, 0.0).expect("valid tuning");
    let mut spikes = 0;
    for step in director.steps() {
        if let Some(pos) = director.spike_position(step) {
            assert_eq!(pos.y, step.height);
            spikes += 1;
        }
        if let Some(pos) = director.gem_position(step) {
            assert!(pos.y > step.height);
        }
    }
    assert!(spikes > 0);
}
