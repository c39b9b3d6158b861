//! Data-driven game balance
//!
//! Every physics constant and generation probability lives in [`Tuning`].
//! It is pure data: loading a JSON overlay only replaces the fields it names,
//! everything else keeps its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected tuning values
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} must be non-zero")]
    Zero { name: &'static str },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} probability {value} must be between 0.0 and 1.0")]
    Probability { name: &'static str, value: f64 },
    #[error("{name} range is inverted: {min} > {max}")]
    InvertedRange { name: &'static str, min: f64, max: f64 },
    #[error("calm rise max {calm_max} must not exceed the demanding threshold {threshold}")]
    CalmRiseTooSteep { calm_max: f64, threshold: f64 },
}

/// Physics, streaming, scoring and generation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Streaming window ===
    /// Steps generated together per chunk
    pub steps_per_chunk: u32,
    /// Chunks kept generated ahead of the player
    pub ahead_chunks: u32,
    /// Chunks kept behind the player before eviction
    pub behind_chunks: u32,

    // === Player physics ===
    /// Downward acceleration (units/s²)
    pub gravity: f64,
    /// Vertical launch velocity of a jump (units/s)
    pub jump_velocity: f64,
    /// Forward speed at zero score (units/s)
    pub base_speed: f64,
    /// Extra forward speed per point of score
    pub speed_per_score: f64,
    /// Forward speed ceiling
    pub max_speed: f64,
    /// Grace period after leaving ground during which a jump still counts
    pub coyote_ms: f64,
    /// How long an early jump request is remembered before landing
    pub jump_buffer_ms: f64,
    /// How far below the next tread top the player may be and still land
    pub landing_slack: f64,
    /// Distance below the current tread top that kills the run
    pub fall_kill_offset: f64,
    /// Step transitions processed per tick at most
    pub max_transitions_per_tick: u32,
    /// Height of the player's pickup center above the feet
    pub player_center_height: f64,
    /// Gem collection radius around the player's center
    pub gem_pickup_radius: f64,
    /// Steps behind the current one scanned for gems
    pub gem_scan_behind: u32,
    /// Steps ahead of the current one scanned for gems
    pub gem_scan_ahead: u32,

    // === Scoring ===
    pub points_per_step: u32,
    pub points_per_gap: u32,
    pub points_per_spike: u32,
    pub points_per_gem: u32,

    // === Tread shape ===
    pub tread_length: (f64, f64),
    pub tread_width: (f64, f64),

    // === Heading ===
    /// Turn segment length in steps (inclusive)
    pub turn_segment_steps: (u32, u32),
    /// Per-step turn rate of a gentle segment (radians)
    pub gentle_turn: (f64, f64),
    /// Per-step turn rate of a hard segment (radians)
    pub hard_turn: (f64, f64),
    pub hard_turn_chance: f64,
    /// Per-step heading noise amplitude (radians)
    pub heading_jitter: f64,
    /// Inside this horizontal radius the path is steered tangentially
    pub band_min_radius: f64,
    /// Outside this horizontal radius the path is steered inward
    pub band_max_radius: f64,
    /// Proportional gain of the radial steering controller
    pub steer_gain: f64,

    // === Rise and pacing ===
    pub calm_rise: (f64, f64),
    pub tension_rise: (f64, f64),
    /// Calm run length in steps (inclusive)
    pub calm_run_steps: (u32, u32),
    /// Tension run length in steps (inclusive)
    pub tension_run_steps: (u32, u32),
    /// A rise above this is a demanding transition
    pub demanding_rise: f64,
    /// Steps after a demanding or hazardous step that must stay undemanding
    pub demanding_cooldown_steps: u32,
    /// Steps over which difficulty ramps from 0 to 1
    pub difficulty_ramp_steps: u32,
    /// Leading steps that are flat with no gaps or spikes
    pub safe_start_steps: u32,

    // === Gaps ===
    pub gap_base_chance: f64,
    pub gap_ramp_chance: f64,
    pub gap_max_chance: f64,
    pub tension_gap_multiplier: f64,
    /// Must exceed the distance covered at `max_speed` while falling
    /// `landing_slack`, or the gap can be walked over
    pub gap_length: (f64, f64),

    // === Spikes ===
    pub spike_base_chance: f64,
    pub spike_ramp_chance: f64,
    /// Steps after a spike before another may be placed
    pub spike_cooldown_steps: u32,
    /// Feet height above the tread needed to pass a spike
    pub spike_clearance: f64,
    /// Distance kept between a spike and either tread edge
    pub spike_edge_margin: f64,

    // === Gems ===
    pub gem_chance: f64,
    /// Fraction of the half-width a gem may sit off-center
    pub gem_lateral_fraction: f64,
    /// Gem height above the tread top
    pub gem_height: (f64, f64),
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            steps_per_chunk: 32,
            ahead_chunks: 2,
            behind_chunks: 1,

            gravity: 30.0,
            jump_velocity: 9.0,
            base_speed: 6.0,
            speed_per_score: 0.02,
            max_speed: 11.0,
            coyote_ms: 90.0,
            jump_buffer_ms: 120.0,
            landing_slack: 0.25,
            fall_kill_offset: 4.0,
            max_transitions_per_tick: 4,
            player_center_height: 0.5,
            gem_pickup_radius: 1.0,
            gem_scan_behind: 1,
            gem_scan_ahead: 2,

            points_per_step: 1,
            points_per_gap: 2,
            points_per_spike: 3,
            points_per_gem: 5,

            tread_length: (1.6, 2.4),
            tread_width: (1.8, 2.6),

            turn_segment_steps: (4, 12),
            gentle_turn: (0.02, 0.08),
            hard_turn: (0.12, 0.25),
            hard_turn_chance: 0.25,
            heading_jitter: 0.02,
            band_min_radius: 6.0,
            band_max_radius: 18.0,
            steer_gain: 0.15,

            calm_rise: (0.0, 0.2),
            tension_rise: (0.3, 0.9),
            calm_run_steps: (6, 14),
            tension_run_steps: (3, 8),
            demanding_rise: 0.6,
            demanding_cooldown_steps: 2,
            difficulty_ramp_steps: 2000,
            safe_start_steps: 8,

            gap_base_chance: 0.06,
            gap_ramp_chance: 0.14,
            gap_max_chance: 0.35,
            tension_gap_multiplier: 1.6,
            gap_length: (1.5, 2.4),

            spike_base_chance: 0.08,
            spike_ramp_chance: 0.10,
            spike_cooldown_steps: 5,
            spike_clearance: 0.5,
            spike_edge_margin: 0.3,

            gem_chance: 0.15,
            gem_lateral_fraction: 0.6,
            gem_height: (0.5, 1.2),
        }
    }
}

impl Tuning {
    /// Parse a JSON overlay on top of the defaults and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Most steps the streaming window may retain at once
    pub fn window_capacity(&self) -> usize {
        ((self.behind_chunks + self.ahead_chunks + 1) * self.steps_per_chunk) as usize
    }

    /// Check the values that the simulation's invariants depend on
    pub fn validate(&self) -> Result<(), TuningError> {
        nonzero("steps_per_chunk", self.steps_per_chunk)?;
        nonzero("ahead_chunks", self.ahead_chunks)?;
        nonzero("demanding_cooldown_steps", self.demanding_cooldown_steps)?;
        nonzero("max_transitions_per_tick", self.max_transitions_per_tick)?;
        nonzero("difficulty_ramp_steps", self.difficulty_ramp_steps)?;

        positive("gravity", self.gravity)?;
        positive("jump_velocity", self.jump_velocity)?;
        positive("base_speed", self.base_speed)?;
        positive("max_speed", self.max_speed)?;
        positive("band_max_radius", self.band_max_radius)?;

        probability("hard_turn_chance", self.hard_turn_chance)?;
        probability("gap_max_chance", self.gap_max_chance)?;
        probability("gem_chance", self.gem_chance)?;
        probability("spike_base_chance", self.spike_base_chance)?;

        ordered("tread_length", self.tread_length)?;
        ordered("tread_width", self.tread_width)?;
        ordered("gentle_turn", self.gentle_turn)?;
        ordered("hard_turn", self.hard_turn)?;
        ordered("calm_rise", self.calm_rise)?;
        ordered("tension_rise", self.tension_rise)?;
        ordered("gap_length", self.gap_length)?;
        ordered("gem_height", self.gem_height)?;
        ordered("band radius", (self.band_min_radius, self.band_max_radius))?;
        ordered_steps("turn_segment_steps", self.turn_segment_steps)?;
        ordered_steps("calm_run_steps", self.calm_run_steps)?;
        ordered_steps("tension_run_steps", self.tension_run_steps)?;

        if self.tread_length.0 <= 2.0 * self.spike_edge_margin {
            return Err(TuningError::InvertedRange {
                name: "spike placement",
                min: 2.0 * self.spike_edge_margin,
                max: self.tread_length.0,
            });
        }
        if self.calm_rise.1 > self.demanding_rise {
            return Err(TuningError::CalmRiseTooSteep {
                calm_max: self.calm_rise.1,
                threshold: self.demanding_rise,
            });
        }
        Ok(())
    }
}

fn nonzero(name: &'static str, value: u32) -> Result<(), TuningError> {
    if value == 0 {
        return Err(TuningError::Zero { name });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), TuningError> {
    if !(value > 0.0) {
        return Err(TuningError::NotPositive { name, value });
    }
    Ok(())
}

fn probability(name: &'static str, value: f64) -> Result<(), TuningError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TuningError::Probability { name, value });
    }
    Ok(())
}

fn ordered(name: &'static str, (min, max): (f64, f64)) -> Result<(), TuningError> {
    if min > max {
        return Err(TuningError::InvertedRange { name, min, max });
    }
    Ok(())
}

fn ordered_steps(name: &'static str, (min, max): (u32, u32)) -> Result<(), TuningError> {
    ordered(name, (min as f64, max as f64))
}
