//! Demo mode: a simple jump policy that plays the run by itself
//!
//! Reads only the director's public query surface, the same way an input
//! layer would, and answers "jump now?" once per tick.

use super::director::Director;
use super::state::RunPhase;

#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Seconds before a tread edge at which to take off
    pub edge_lead_s: f64,
    /// Seconds before reaching a spike at which to take off
    pub spike_lead_s: f64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            edge_lead_s: 0.1,
            spike_lead_s: 0.2,
        }
    }
}

impl Autopilot {
    /// Whether to issue `jump()` this tick
    pub fn decide(&self, director: &Director, now_ms: f64) -> bool {
        if director.phase() != RunPhase::Playing || !director.can_jump(now_ms) {
            return false;
        }
        let Some(step) = director.current_step() else {
            return false;
        };
        let tuning = director.tuning();
        let speed = director.speed();
        let along = director.state().along;

        // Spike still ahead on this tread
        if let Some(spike) = step.spike {
            let ahead = spike.along - along;
            if !spike.hit && ahead > 0.0 && ahead <= speed * self.spike_lead_s {
                return true;
            }
        }

        // Edge into a gap or up a rise that walking cannot take
        let to_edge = step.length - along;
        let risky_edge = step.gap_after || step.rise > tuning.landing_slack;
        if risky_edge && to_edge <= speed * self.edge_lead_s {
            return true;
        }

        // A spike right at the start of the next tread
        if let Some(spike) = director.step(step.index + 1).and_then(|s| s.spike) {
            let ahead = to_edge + step.gap_length + spike.along;
            if ahead <= speed * self.spike_lead_s {
                return true;
            }
        }
        false
    }
}
