//! Chunk generator
//!
//! Produces a fixed-size batch of steps from `(run_seed, chunk_index)` and the
//! continuation cursor left by the previous chunk. The cursor carries every
//! piece of running state (position, heading, turn segment, calm/tension run,
//! fairness cooldowns), so chunk seams are invisible in the output.
//!
//! Each step always consumes its hazard and reward rolls, whichever branches
//! fire, so one outcome never shifts the draws of later ones.

use glam::DVec3;

use super::rng::{Rng, chunk_seed};
use super::step::{Chunk, ChunkCursor, Gem, Spike, Step};
use crate::tuning::Tuning;
use crate::{heading_vector, horizontal_polar, normalize_angle};

/// Count down the calm/tension run, flipping when it runs out
fn advance_phase(cursor: &mut ChunkCursor, rng: &mut Rng, tuning: &Tuning) {
    if cursor.phase_left == 0 {
        cursor.tension = !cursor.tension;
        cursor.phase_left = if cursor.tension {
            rng.range_u32(tuning.tension_run_steps)
        } else {
            rng.range_u32(tuning.calm_run_steps)
        };
    }
    cursor.phase_left = cursor.phase_left.saturating_sub(1);
}

/// Per-step heading change from the current turn segment
fn advance_turn(cursor: &mut ChunkCursor, rng: &mut Rng, tuning: &Tuning) -> f64 {
    if cursor.turn_left == 0 {
        cursor.turn_left = rng.range_u32(tuning.turn_segment_steps);
        let hard = rng.chance(tuning.hard_turn_chance);
        let magnitude = if hard {
            rng.range(tuning.hard_turn)
        } else {
            rng.range(tuning.gentle_turn)
        };
        cursor.turn_rate = magnitude * rng.signum();
    }
    cursor.turn_left = cursor.turn_left.saturating_sub(1);
    cursor.turn_rate
}

/// Proportional nudge keeping the path inside the spiral corridor
fn radial_steer(tuning: &Tuning, position: DVec3, heading: f64) -> f64 {
    let (r, bearing) = horizontal_polar(position);
    if r > tuning.band_max_radius {
        let inward = normalize_angle(bearing + std::f64::consts::PI);
        tuning.steer_gain * normalize_angle(inward - heading)
    } else if r < tuning.band_min_radius {
        let tangent = normalize_angle(bearing + std::f64::consts::FRAC_PI_2);
        tuning.steer_gain * normalize_angle(tangent - heading)
    } else {
        0.0
    }
}

/// Generate chunk `chunk_index` continuing from `cursor`
pub fn generate_chunk(tuning: &Tuning, run_seed: u32, chunk_index: u32, cursor: ChunkCursor) -> Chunk {
    let mut rng = Rng::new(chunk_seed(run_seed, chunk_index));
    let mut cursor = cursor;

    let count = tuning.steps_per_chunk;
    let first_index = chunk_index * count;
    let mut steps = Vec::with_capacity(count as usize);
    let mut demanding_count = 0u32;

    for index in first_index..first_index + count {
        let progress = (index as f64 / tuning.difficulty_ramp_steps as f64).min(1.0);
        let safe = index < tuning.safe_start_steps;

        advance_phase(&mut cursor, &mut rng, tuning);
        let tension = cursor.tension;

        // Heading: turn segment, jitter, then radial steering
        let turn = advance_turn(&mut cursor, &mut rng, tuning);
        let jitter = (rng.next_f64() * 2.0 - 1.0) * tuning.heading_jitter;
        let mut heading = cursor.heading + turn + jitter;
        heading += radial_steer(tuning, cursor.position, heading);
        let heading = normalize_angle(heading);
        let dir = heading_vector(heading);

        let length = rng.range(tuning.tread_length);
        let width = rng.range(tuning.tread_width);
        let height = cursor.position.y;
        let position = cursor.position + dir * (length * 0.5);

        let can_demand = !safe && cursor.demand_cooldown == 0;

        // Rise
        let calm_rise = rng.range(tuning.calm_rise);
        let tension_rise = rng.range(tuning.tension_rise);
        let rise = if safe {
            0.0
        } else if tension {
            if can_demand {
                tension_rise
            } else {
                tension_rise.min(tuning.demanding_rise)
            }
        } else {
            calm_rise
        };
        let steep = rise > tuning.demanding_rise;

        // Gap
        let gap_chance = ((tuning.gap_base_chance + tuning.gap_ramp_chance * progress)
            * if tension { tuning.tension_gap_multiplier } else { 1.0 })
        .min(tuning.gap_max_chance);
        let gap_roll = rng.next_f64();
        let gap_len_roll = rng.range(tuning.gap_length);
        let gap_after = can_demand && !steep && gap_roll < gap_chance;
        let gap_length = if gap_after { gap_len_roll } else { 0.0 };

        let demanding = gap_after || steep;

        // Spike
        let spike_chance = tuning.spike_base_chance + tuning.spike_ramp_chance * progress;
        let spike_roll = rng.next_f64();
        let spike_along = rng.range((tuning.spike_edge_margin, length - tuning.spike_edge_margin));
        let spike_allowed =
            !safe && !cursor.incoming_demanding && !demanding && cursor.spike_cooldown == 0;
        let spike = (spike_allowed && spike_roll < spike_chance).then_some(Spike {
            along: spike_along,
            clearance: tuning.spike_clearance,
            hit: false,
        });

        // Gem
        let gem_roll = rng.next_f64();
        let gem_lateral = (rng.next_f64() * 2.0 - 1.0) * tuning.gem_lateral_fraction * width * 0.5;
        let gem_vertical = rng.range(tuning.gem_height);
        let gem = (gem_roll < tuning.gem_chance).then_some(Gem {
            lateral: gem_lateral,
            vertical: gem_vertical,
            collected: false,
        });

        // Fairness bookkeeping
        cursor.spike_cooldown = if spike.is_some() {
            tuning.spike_cooldown_steps
        } else {
            cursor.spike_cooldown.saturating_sub(1)
        };
        cursor.demand_cooldown = if demanding || spike.is_some() {
            tuning.demanding_cooldown_steps
        } else {
            cursor.demand_cooldown.saturating_sub(1)
        };
        cursor.incoming_demanding = demanding;
        if demanding {
            demanding_count += 1;
        }

        let mut next = position + dir * (length * 0.5 + gap_length);
        next.y = height + rise;
        cursor.position = next;
        cursor.heading = heading;

        steps.push(Step {
            index,
            position,
            heading: dir,
            length,
            width,
            height,
            rise,
            gap_after,
            gap_length,
            spike,
            gem,
            tension,
        });
    }

    log::debug!(
        "Chunk {}: steps {}..{}, demanding={}, end height={:.2}",
        chunk_index,
        first_index,
        first_index + count,
        demanding_count,
        cursor.position.y
    );

    Chunk {
        index: chunk_index,
        steps,
        next: cursor,
    }
}
