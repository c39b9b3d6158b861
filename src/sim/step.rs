//! Path data model
//!
//! A [`Step`] is one tread of the endless path. Hazards and rewards are
//! explicit `Option`s so callers always check presence.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A spike standing on a tread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    /// Distance from the tread start along the heading
    pub along: f64,
    /// Feet height above the tread top needed to pass
    pub clearance: f64,
    /// Resolved this run (either cleared or fatal)
    pub hit: bool,
}

/// A collectible gem floating over a tread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    /// Offset from the tread center along the right-hand axis
    pub lateral: f64,
    /// Height above the tread top
    pub vertical: f64,
    pub collected: bool,
}

/// One tread of the path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Globally unique, strictly increasing
    pub index: u32,
    /// Center of the tread top (y = height)
    pub position: DVec3,
    /// Unit horizontal heading
    pub heading: DVec3,
    pub length: f64,
    pub width: f64,
    /// Height of the tread top plane
    pub height: f64,
    /// Height added to get the following tread's top
    pub rise: f64,
    pub gap_after: bool,
    /// Empty distance between this tread's end and the next tread's start
    pub gap_length: f64,
    pub spike: Option<Spike>,
    pub gem: Option<Gem>,
    /// Generated during a tension run
    pub tension: bool,
}

impl Step {
    /// Point where the tread begins (center line, tread top)
    pub fn start(&self) -> DVec3 {
        self.position - self.heading * (self.length * 0.5)
    }

    /// Tread plus trailing gap
    #[inline]
    pub fn footprint(&self) -> f64 {
        self.length + self.gap_length
    }

    /// Center-line point at `along` from the tread start, at tread height
    pub fn point_at(&self, along: f64) -> DVec3 {
        self.start() + self.heading * along
    }

    /// Horizontal axis pointing to the right of the heading
    pub fn lateral_axis(&self) -> DVec3 {
        DVec3::new(-self.heading.z, 0.0, self.heading.x)
    }

    /// Whether leaving this step needs precise play
    pub fn is_demanding(&self, rise_threshold: f64) -> bool {
        self.gap_after || self.rise > rise_threshold
    }

    pub fn spike_world_position(&self) -> Option<DVec3> {
        self.spike.map(|spike| self.point_at(spike.along))
    }

    pub fn gem_world_position(&self) -> Option<DVec3> {
        self.gem.map(|gem| {
            self.position + self.lateral_axis() * gem.lateral + DVec3::Y * gem.vertical
        })
    }

    /// Forget per-run resolution of the spike and gem
    pub fn reset_flags(&mut self) {
        if let Some(spike) = self.spike.as_mut() {
            spike.hit = false;
        }
        if let Some(gem) = self.gem.as_mut() {
            gem.collected = false;
        }
    }
}

/// Continuation state threaded from one chunk into the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkCursor {
    /// Where the next tread begins (y = its height)
    pub position: DVec3,
    /// Yaw of the last generated tread (radians)
    pub heading: f64,
    /// Steps left before another demanding step is allowed
    pub demand_cooldown: u32,
    /// Steps left before another spike is allowed
    pub spike_cooldown: u32,
    /// Whether the last generated step was demanding
    pub incoming_demanding: bool,
    /// Current calm/tension run
    pub tension: bool,
    /// Steps left in the current run; zero flips the run on the next step
    pub phase_left: u32,
    /// Heading change per step in the current turn segment (radians)
    pub turn_rate: f64,
    /// Steps left in the current turn segment
    pub turn_left: u32,
}

impl Default for ChunkCursor {
    /// Path origin facing +X; the spent tension run makes the path open calm
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            heading: 0.0,
            demand_cooldown: 0,
            spike_cooldown: 0,
            incoming_demanding: false,
            tension: true,
            phase_left: 0,
            turn_rate: 0.0,
            turn_left: 0,
        }
    }
}

/// A batch of consecutive steps generated from one chunk seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub index: u32,
    pub steps: Vec<Step>,
    /// Continuation for chunk `index + 1`
    pub next: ChunkCursor,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_step() -> Step {
        Step {
            index: 0,
            position: DVec3::new(1.0, 2.0, 0.0),
            heading: DVec3::X,
            length: 2.0,
            width: 2.0,
            height: 2.0,
            rise: 0.0,
            gap_after: false,
            gap_length: 0.0,
            spike: Some(Spike {
                along: 0.5,
                clearance: 0.5,
                hit: true,
            }),
            gem: Some(Gem {
                lateral: 0.4,
                vertical: 1.0,
                collected: true,
            }),
            tension: false,
        }
    }

    #[test]
    fn test_start_and_point_at() {
        let step = flat_step();
        assert_eq!(step.start(), DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(step.point_at(1.5), DVec3::new(1.5, 2.0, 0.0));
    }

    #[test]
    fn test_hazard_world_positions() {
        let step = flat_step();
        assert_eq!(step.spike_world_position(), Some(DVec3::new(0.5, 2.0, 0.0)));
        // Right of +X heading is +Z
        assert_eq!(step.gem_world_position(), Some(DVec3::new(1.0, 3.0, 0.4)));
    }

    #[test]
    fn test_demanding() {
        let mut step = flat_step();
        assert!(!step.is_demanding(0.6));
        step.rise = 0.7;
        assert!(step.is_demanding(0.6));
        step.rise = 0.0;
        step.gap_after = true;
        step.gap_length = 1.0;
        assert!(step.is_demanding(0.6));
        assert_eq!(step.footprint(), 3.0);
    }

    #[test]
    fn test_reset_flags() {
        let mut step = flat_step();
        step.reset_flags();
        assert!(!step.spike.is_some_and(|s| s.hit));
        assert!(!step.gem.is_some_and(|g| g.collected));
    }
}
