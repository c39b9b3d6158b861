//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, one generator per chunk
//! - Fixed draw order inside the chunk generator
//! - No rendering, audio, storage or platform dependencies

pub mod autopilot;
pub mod director;
pub mod generator;
pub mod rng;
pub mod state;
pub mod step;
pub mod window;

pub use autopilot::Autopilot;
pub use director::Director;
pub use generator::generate_chunk;
pub use rng::{Rng, chunk_seed};
pub use state::{DeathReason, RunPhase, RunState, RunSummary};
pub use step::{Chunk, ChunkCursor, Gem, Spike, Step};
pub use window::StepWindow;
