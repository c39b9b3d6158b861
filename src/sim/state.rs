//! Run state and core simulation types
//!
//! Everything that changes while a run is in progress lives in [`RunState`],
//! owned by the director.

use serde::{Deserialize, Serialize};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Path prepared, waiting for start; no physics
    #[default]
    Menu,
    /// Active run
    Playing,
    /// Run ended; terminal until the next prepare/start
    Dead,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathReason {
    /// Dropped into a gap or below the fall-kill line
    Fell,
    /// Ran into the face of a rise without enough height
    Riser,
    /// Crossed a spike below its clearance
    Spike,
}

impl DeathReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathReason::Fell => "fell",
            DeathReason::Riser => "riser",
            DeathReason::Spike => "spike",
        }
    }
}

/// Per-run simulation state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub death_reason: Option<DeathReason>,

    /// Index of the step the player is on
    pub step_index: u32,
    /// Distance traveled along the current step from its tread start
    pub along: f64,
    /// Feet height
    pub y: f64,
    /// Vertical velocity
    pub vy: f64,

    pub score: u32,
    pub gems: u32,
    pub gaps_cleared: u32,
    pub steps_cleared: u32,
    pub spikes_cleared: u32,
    pub jumps: u32,
    /// Total distance traveled along the path
    pub distance: f64,
    /// Ticks simulated while playing
    pub ticks: u64,

    /// Last time the player touched ground; cleared when a jump launches
    pub last_grounded_ms: Option<f64>,
    /// A jump request waiting for the next landing
    pub jump_buffer_until_ms: Option<f64>,
}

impl RunState {
    /// Fresh state for a run standing at the start of step 0
    pub fn at_start(ground: f64, now_ms: f64) -> Self {
        Self {
            y: ground,
            last_grounded_ms: Some(now_ms),
            ..Default::default()
        }
    }
}

/// End-of-run record for a persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u32,
    pub phase: RunPhase,
    pub death_reason: Option<DeathReason>,
    pub score: u32,
    pub gems: u32,
    pub gaps_cleared: u32,
    pub steps_cleared: u32,
    pub spikes_cleared: u32,
    pub jumps: u32,
    pub distance: f64,
    pub ticks: u64,
}
