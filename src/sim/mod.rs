//! Simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Seeded RNG only (the world owns it)
//! - Simulation time only, never the wall clock
//! - No rendering, audio or storage dependencies

pub mod boss;
pub mod camera;
pub mod collision;
pub mod context;
pub mod effect;
pub mod enemy;
pub mod entity;
pub mod events;
pub mod particle;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod schedule;
pub mod state;
pub mod tick;

pub use boss::{Archetype, Boss};
pub use camera::{Background, Camera};
pub use context::SimContext;
pub use effect::{Effect, EffectKind};
pub use enemy::{AiState, Enemy, Personality};
pub use entity::Entity;
pub use events::{GameEvent, MusicTrack, SoundCue};
pub use particle::{Particle, Spray};
pub use player::{ATTACK_STYLES, AttackStyle, Player};
pub use powerup::{Powerup, PowerupKind, Rarity};
pub use projectile::{Owner, Projectile};
pub use schedule::Schedule;
pub use state::{GameMode, LevelConfig, RunStats, World};
pub use tick::{TickInput, clamp_dt, step};
