//! Achievements
//!
//! Checked by the host after each step against the run counters and the
//! step's events. Unlocks are permanent and persisted as a list of keys.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::{KeyValueStore, load_json, save_json};
use crate::sim::events::GameEvent;
use crate::sim::state::World;

/// Kills needed inside the streak window for Speed Demon
pub const SPEED_DEMON_KILLS: usize = 10;
/// Level that unlocks Level Master
pub const LEVEL_MASTER_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Achievement {
    FirstKill,
    SpeedDemon,
    Untouchable,
    BossSlayer,
    LevelMaster,
}

impl Achievement {
    pub const ALL: [Achievement; 5] = [
        Achievement::FirstKill,
        Achievement::SpeedDemon,
        Achievement::Untouchable,
        Achievement::BossSlayer,
        Achievement::LevelMaster,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Achievement::FirstKill => "First Strike",
            Achievement::SpeedDemon => "Speed Demon",
            Achievement::Untouchable => "Untouchable",
            Achievement::BossSlayer => "Boss Slayer",
            Achievement::LevelMaster => "Level Master",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Achievement::FirstKill => "Defeat your first enemy",
            Achievement::SpeedDemon => "Kill 10 enemies in 30 seconds",
            Achievement::Untouchable => "Complete a level without taking damage",
            Achievement::BossSlayer => "Defeat your first boss",
            Achievement::LevelMaster => "Reach level 10",
        }
    }

    fn earned(self, world: &World, events: &[GameEvent]) -> bool {
        match self {
            Achievement::FirstKill => world.stats.kills >= 1,
            Achievement::SpeedDemon => world.stats.streak() >= SPEED_DEMON_KILLS,
            Achievement::Untouchable => events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelComplete { untouched: true, .. })),
            Achievement::BossSlayer => world.stats.bosses_defeated >= 1,
            Achievement::LevelMaster => world.level >= LEVEL_MASTER_LEVEL,
        }
    }
}

/// Unlocked achievements, in unlock order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Achievements {
    unlocked: Vec<Achievement>,
}

impl Achievements {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "exBattle_achievements";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    pub fn unlocked(&self) -> &[Achievement] {
        &self.unlocked
    }

    /// Unlock everything newly earned; returns the new unlocks
    pub fn check(&mut self, world: &World, events: &[GameEvent]) -> Vec<Achievement> {
        let fresh: Vec<Achievement> = Achievement::ALL
            .into_iter()
            .filter(|a| !self.is_unlocked(*a) && a.earned(world, events))
            .collect();
        for a in &fresh {
            log::info!("Achievement unlocked: {}", a.name());
        }
        self.unlocked.extend_from_slice(&fresh);
        fresh
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut loaded: Self = load_json(store, Self::STORAGE_KEY);
        let mut seen = Vec::with_capacity(loaded.unlocked.len());
        loaded.unlocked.retain(|a| {
            let first = !seen.contains(a);
            seen.push(*a);
            first
        });
        loaded
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)
    }
}
