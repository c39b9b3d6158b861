//! Simulation director
//!
//! Owns the run state machine, streams chunks in and out of the window, and
//! advances the player one tick at a time. Tuning is validated once at
//! construction; after that the director never returns errors, and anything
//! that should not happen ends the run as `Fell`.

use glam::DVec3;

use super::generator::generate_chunk;
use super::state::{DeathReason, RunPhase, RunState, RunSummary};
use super::step::{ChunkCursor, Step};
use super::window::StepWindow;
use crate::tuning::{Tuning, TuningError};

/// Drives one run over a seeded, streamed path
#[derive(Debug, Clone)]
pub struct Director {
    tuning: Tuning,
    seed: u32,
    window: StepWindow,
    /// Next chunk to generate
    next_chunk: u32,
    /// Continuation left by the last generated chunk
    cursor: ChunkCursor,
    state: RunState,
}

impl Director {
    /// Director with an empty path; call [`Director::prepare`] before use
    ///
    /// Rejects tuning that would stall streaming or break generation.
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            seed: 0,
            window: StepWindow::new(),
            next_chunk: 0,
            cursor: ChunkCursor::default(),
            state: RunState::default(),
        })
    }

    /// New director already prepared for `seed`
    pub fn prepared(tuning: Tuning, seed: u32, now_ms: f64) -> Result<Self, TuningError> {
        let mut director = Self::new(tuning)?;
        director.prepare(seed, now_ms);
        Ok(director)
    }

    /// Fully reset for `seed`: regenerate the initial window and go to menu
    pub fn prepare(&mut self, seed: u32, now_ms: f64) {
        self.seed = seed;
        self.rebuild_path();
        self.state = RunState::at_start(self.ground_at(0), now_ms);
        log::info!(
            "Prepared seed {} ({} steps in window)",
            seed,
            self.window.len()
        );
    }

    /// Begin a run on the prepared path
    pub fn start(&mut self, now_ms: f64) {
        if self.window.first_index() == Some(0) {
            self.window.reset_flags();
        } else {
            // Step 0 was evicted during the last run; the same seed yields the same path
            self.rebuild_path();
        }
        self.state = RunState::at_start(self.ground_at(0), now_ms);
        self.state.phase = RunPhase::Playing;
        log::info!("Run started (seed {})", self.seed);
    }

    /// Jump intent: applied now when grounded or within coyote time,
    /// otherwise remembered until the next landing
    pub fn jump(&mut self, now_ms: f64) {
        if self.state.phase != RunPhase::Playing {
            return;
        }
        if self.can_jump(now_ms) {
            self.apply_jump();
        } else {
            self.state.jump_buffer_until_ms = Some(now_ms + self.tuning.jump_buffer_ms);
        }
    }

    /// Advance the run by `dt` seconds
    pub fn update(&mut self, dt: f64, now_ms: f64) {
        if self.state.phase != RunPhase::Playing {
            return;
        }
        self.state.ticks += 1;

        self.maintain_window(self.state.step_index);

        let index = self.state.step_index;
        let Some(step) = self.window.get(index) else {
            log::warn!("Step {} missing from window", index);
            self.die(DeathReason::Fell);
            return;
        };
        let (length, ground) = (step.length, step.height);

        // Integrate
        let speed = self.speed();
        let prev_along = self.state.along;
        let prev_y = self.state.y;
        self.state.along += speed * dt;
        self.state.distance += speed * dt;
        self.state.vy -= self.tuning.gravity * dt;
        self.state.y += self.state.vy * dt;

        // Landing: crossed down through the current tread top
        if self.state.along <= length
            && self.state.vy <= 0.0
            && prev_y >= ground
            && self.state.y <= ground
        {
            self.land(ground, now_ms);
        }

        if !self.resolve_spike(index, prev_along, self.state.along) {
            return;
        }

        if !self.advance_steps(now_ms) {
            return;
        }

        // Numeric safety net below the current tread
        let ground = self.ground_at(self.state.step_index);
        if self.state.y < ground - self.tuning.fall_kill_offset {
            self.die(DeathReason::Fell);
            return;
        }

        self.collect_gems();
    }

    /// End the run; only the first reason sticks
    pub(crate) fn die(&mut self, reason: DeathReason) {
        if self.state.phase != RunPhase::Playing {
            return;
        }
        self.state.phase = RunPhase::Dead;
        self.state.death_reason = Some(reason);
        log::info!(
            "Run over: {} at step {} (score {}, gems {})",
            reason.as_str(),
            self.state.step_index,
            self.state.score,
            self.state.gems
        );
    }

    /// Generate ahead of and evict behind `current`
    fn maintain_window(&mut self, current: u32) {
        let per_chunk = self.tuning.steps_per_chunk;
        let horizon = current + self.tuning.ahead_chunks * per_chunk;
        while self.next_chunk * per_chunk <= horizon {
            let chunk = generate_chunk(&self.tuning, self.seed, self.next_chunk, self.cursor);
            self.cursor = chunk.next;
            self.next_chunk += 1;
            self.window.push_chunk(chunk);
        }
        let floor = current.saturating_sub(self.tuning.behind_chunks * per_chunk);
        self.window.evict_below(floor);
    }

    fn rebuild_path(&mut self) {
        self.window.clear();
        self.next_chunk = 0;
        self.cursor = ChunkCursor::default();
        self.maintain_window(0);
    }

    fn ground_at(&self, index: u32) -> f64 {
        self.window.get(index).map(|s| s.height).unwrap_or(0.0)
    }

    /// Single path for launching a jump so it can never apply twice
    fn apply_jump(&mut self) {
        self.state.vy = self.tuning.jump_velocity;
        self.state.jump_buffer_until_ms = None;
        self.state.last_grounded_ms = None;
        self.state.jumps += 1;
    }

    /// Snap onto a tread top, then honor a buffered jump
    fn land(&mut self, ground: f64, now_ms: f64) {
        self.state.y = ground;
        self.state.vy = 0.0;
        self.state.last_grounded_ms = Some(now_ms);
        match self.state.jump_buffer_until_ms {
            Some(deadline) if now_ms <= deadline => self.apply_jump(),
            Some(_) => self.state.jump_buffer_until_ms = None,
            None => {}
        }
    }

    /// Interval test over `(from, to]`; returns false if the run ended
    fn resolve_spike(&mut self, index: u32, from: f64, to: f64) -> bool {
        let y = self.state.y;
        let Some(step) = self.window.get_mut(index) else {
            return true;
        };
        let ground = step.height;
        let Some(spike) = step.spike.as_mut() else {
            return true;
        };
        if spike.hit || !(from < spike.along && spike.along <= to) {
            return true;
        }
        spike.hit = true;
        if y - ground >= spike.clearance {
            self.state.spikes_cleared += 1;
            self.state.score += self.tuning.points_per_spike;
            true
        } else {
            self.die(DeathReason::Spike);
            false
        }
    }

    /// Carry the player across tread boundaries; returns false if the run ended
    fn advance_steps(&mut self, now_ms: f64) -> bool {
        let mut transitions = 0;
        loop {
            let index = self.state.step_index;
            let Some(step) = self.window.get(index) else {
                self.die(DeathReason::Fell);
                return false;
            };
            let footprint = step.footprint();
            let gap_after = step.gap_after;
            if self.state.along <= footprint {
                return true;
            }
            if transitions >= self.tuning.max_transitions_per_tick {
                log::warn!(
                    "Transition cap {} hit at step {}; deferring to next tick",
                    transitions,
                    index
                );
                return true;
            }
            let Some(next) = self.window.get(index + 1) else {
                return true;
            };
            let (next_height, next_length) = (next.height, next.length);

            if self.state.y < next_height - self.tuning.landing_slack {
                self.die(if gap_after {
                    DeathReason::Fell
                } else {
                    DeathReason::Riser
                });
                return false;
            }

            self.state.along -= footprint;
            self.state.step_index = index + 1;
            transitions += 1;

            self.state.steps_cleared += 1;
            self.state.score += self.tuning.points_per_step;
            if gap_after {
                self.state.gaps_cleared += 1;
                self.state.score += self.tuning.points_per_gap;
            }

            if self.state.along <= next_length && self.state.y <= next_height {
                if self.state.vy <= 0.0 {
                    self.land(next_height, now_ms);
                } else {
                    self.state.y = next_height;
                }
            }

            if !self.resolve_spike(index + 1, 0.0, self.state.along) {
                return false;
            }
        }
    }

    fn collect_gems(&mut self) {
        let center = self.player_position() + DVec3::Y * self.tuning.player_center_height;
        let radius = self.tuning.gem_pickup_radius;
        let current = self.state.step_index;
        let first = current.saturating_sub(self.tuning.gem_scan_behind);
        let last = current + self.tuning.gem_scan_ahead;

        let mut picked = 0;
        for index in first..=last {
            let Some(step) = self.window.get_mut(index) else {
                continue;
            };
            let Some(pos) = step.gem_world_position() else {
                continue;
            };
            if let Some(gem) = step.gem.as_mut() {
                if !gem.collected && pos.distance(center) <= radius {
                    gem.collected = true;
                    picked += 1;
                }
            }
        }
        self.state.gems += picked;
        self.state.score += picked * self.tuning.points_per_gem;
    }

    // === Queries ===

    /// Forward speed for the current score
    pub fn speed(&self) -> f64 {
        (self.tuning.base_speed + self.tuning.speed_per_score * self.state.score as f64)
            .min(self.tuning.max_speed)
    }

    /// Whether a jump issued at `now_ms` would launch immediately
    pub fn can_jump(&self, now_ms: f64) -> bool {
        self.state
            .last_grounded_ms
            .is_some_and(|t| now_ms - t <= self.tuning.coyote_ms)
    }

    /// Standing on the current tread after the last tick
    pub fn is_grounded(&self) -> bool {
        self.state.vy == 0.0
            && self
                .current_step()
                .is_some_and(|s| self.state.along <= s.length && self.state.y == s.height)
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.window.get(self.state.step_index)
    }

    pub fn step(&self, index: u32) -> Option<&Step> {
        self.window.get(index)
    }

    /// Steps currently held in the streaming window, in index order
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.window.iter()
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Player feet position in world space
    pub fn player_position(&self) -> DVec3 {
        match self.current_step() {
            Some(step) => {
                let mut pos = step.point_at(self.state.along);
                pos.y = self.state.y;
                pos
            }
            None => DVec3::new(0.0, self.state.y, 0.0),
        }
    }

    pub fn gem_position(&self, step: &Step) -> Option<DVec3> {
        step.gem_world_position()
    }

    pub fn spike_position(&self, step: &Step) -> Option<DVec3> {
        step.spike_world_position()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn death_reason(&self) -> Option<DeathReason> {
        self.state.death_reason
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn gems(&self) -> u32 {
        self.state.gems
    }

    pub fn gaps_cleared(&self) -> u32 {
        self.state.gaps_cleared
    }

    pub fn steps_cleared(&self) -> u32 {
        self.state.steps_cleared
    }

    pub fn spikes_cleared(&self) -> u32 {
        self.state.spikes_cleared
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            phase: self.state.phase,
            death_reason: self.state.death_reason,
            score: self.state.score,
            gems: self.state.gems,
            gaps_cleared: self.state.gaps_cleared,
            steps_cleared: self.state.steps_cleared,
            spikes_cleared: self.state.spikes_cleared,
            jumps: self.state.jumps,
            distance: self.state.distance,
            ticks: self.state.ticks,
        }
    }

    /// Mutable access for scripted scenarios in tests
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    #[cfg(test)]
    pub(crate) fn step_mut(&mut self, index: u32) -> Option<&mut Step> {
        self.window.get_mut(index)
    }
}
