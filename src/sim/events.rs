//! Outbound notifications produced by a simulation step
//!
//! The simulation never talks to audio or UI directly; it queues these and the
//! host drains them after each frame.

use serde::{Deserialize, Serialize};

use super::boss::Archetype;
use super::powerup::PowerupKind;

/// Named sound effects the simulation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    AttackHairWhip,
    AttackPurseSwing,
    AttackWittyComeback,
    AttackDanceMove,
    EnemyHit,
    EnemyDeath,
    PlayerHurt,
    PowerupCollect,
    LevelComplete,
    AbilityGlowUp,
    AbilityCallBestie,
    AchievementUnlock,
    UiClick,
}

impl SoundCue {
    /// Stable name understood by the audio collaborator
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::AttackHairWhip => "attack_hair_whip",
            SoundCue::AttackPurseSwing => "attack_purse_swing",
            SoundCue::AttackWittyComeback => "attack_witty_comeback",
            SoundCue::AttackDanceMove => "attack_dance_move",
            SoundCue::EnemyHit => "enemy_hit",
            SoundCue::EnemyDeath => "enemy_death",
            SoundCue::PlayerHurt => "player_hurt",
            SoundCue::PowerupCollect => "powerup_collect",
            SoundCue::LevelComplete => "level_complete",
            SoundCue::AbilityGlowUp => "ability_glow_up",
            SoundCue::AbilityCallBestie => "ability_call_bestie",
            SoundCue::AchievementUnlock => "achievement_unlock",
            SoundCue::UiClick => "ui_click",
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Level1,
    Level2,
    Level3,
    Boss,
    Victory,
}

impl MusicTrack {
    pub fn name(self) -> &'static str {
        match self {
            MusicTrack::Level1 => "level_1",
            MusicTrack::Level2 => "level_2",
            MusicTrack::Level3 => "level_3",
            MusicTrack::Boss => "boss_theme",
            MusicTrack::Victory => "victory_theme",
        }
    }

    /// Gameplay track for a level (levels past 3 keep the last track)
    pub fn for_level(level: u32) -> Self {
        match level {
            0 | 1 => MusicTrack::Level1,
            2 => MusicTrack::Level2,
            _ => MusicTrack::Level3,
        }
    }

    /// Whether the track should loop
    pub fn looped(self) -> bool {
        !matches!(self, MusicTrack::Victory)
    }
}

/// Gameplay notifications for the HUD / meta systems
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An enemy died and its score was credited
    EnemyKilled { boss: bool, score: u64 },
    /// The player took damage (after invulnerability checks)
    PlayerHurt { amount: i32, health: i32 },
    PowerupCollected { kind: PowerupKind },
    AbilityActivated { ability: &'static str },
    /// The player's attack style upgraded
    AttackStyleUnlocked { name: &'static str },
    /// Level `completed` finished; the run continues at `completed + 1`
    LevelComplete { completed: u32, untouched: bool },
    BossIntro { archetype: Archetype },
    BossPhase { archetype: Archetype, phase: u8 },
    BossDefeated { archetype: Archetype },
    /// Background music should change
    Music { track: MusicTrack },
    GameOver { score: u64, level: u32 },
    Victory { score: u64, level: u32 },
}
