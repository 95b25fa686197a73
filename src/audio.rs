//! Audio collaborator
//!
//! The simulation only names sounds. This module maps those names to small
//! procedural recipes and plays them through Web Audio oscillators in the
//! browser; native builds use a silent sink. Audio failures are never fatal.

use crate::error::AudioError;

/// What the game needs from an audio backend
pub trait AudioSink {
    /// Fire-and-forget sound effect. `volume` and `pitch` are multipliers.
    fn play_sound(&mut self, name: &str, volume: f32, pitch: f32) -> Result<(), AudioError>;
    /// Replace the current music track
    fn play_music(&mut self, track: &str, looped: bool) -> Result<(), AudioError>;
    fn stop_music(&mut self);
    /// Effective gains (0.0 - 1.0)
    fn set_volumes(&mut self, sfx: f32, music: f32);
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// A single swept, decaying tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundRecipe {
    pub wave: Wave,
    /// Start frequency (Hz)
    pub pitch: f32,
    /// Frequency at the end of the sweep (Hz)
    pub end_pitch: f32,
    /// Seconds
    pub duration: f32,
    /// Peak gain before the master/sfx volume
    pub gain: f32,
}

const fn tone(wave: Wave, pitch: f32, end_pitch: f32, duration: f32, gain: f32) -> SoundRecipe {
    SoundRecipe {
        wave,
        pitch,
        end_pitch,
        duration,
        gain,
    }
}

/// Recipe for a named sound effect
pub fn sound_recipe(name: &str) -> Option<SoundRecipe> {
    let recipe = match name {
        "attack_hair_whip" => tone(Wave::Sawtooth, 440.0, 220.0, 0.3, 0.4),
        "attack_purse_swing" => tone(Wave::Triangle, 330.0, 200.0, 0.2, 0.5),
        "attack_witty_comeback" => tone(Wave::Square, 550.0, 880.0, 0.15, 0.3),
        "attack_dance_move" => tone(Wave::Sine, 660.0, 990.0, 0.4, 0.4),
        "enemy_hit" => tone(Wave::Triangle, 200.0, 120.0, 0.2, 0.5),
        "enemy_death" => tone(Wave::Sawtooth, 150.0, 40.0, 0.8, 0.5),
        "player_hurt" => tone(Wave::Square, 300.0, 150.0, 0.3, 0.4),
        "powerup_collect" => tone(Wave::Sine, 800.0, 1600.0, 0.3, 0.4),
        "level_complete" => tone(Wave::Triangle, 500.0, 1000.0, 1.0, 0.4),
        "ability_glow_up" => tone(Wave::Sine, 600.0, 1200.0, 0.6, 0.4),
        "ability_call_bestie" => tone(Wave::Triangle, 450.0, 675.0, 0.5, 0.4),
        "achievement_unlock" => tone(Wave::Sine, 523.0, 1046.0, 0.8, 0.4),
        "ui_click" => tone(Wave::Square, 400.0, 400.0, 0.1, 0.2),
        "ui_hover" => tone(Wave::Sine, 350.0, 350.0, 0.05, 0.1),
        _ => return None,
    };
    Some(recipe)
}

/// Sustained chord for a music track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicRecipe {
    pub wave: Wave,
    /// Chord tones (Hz)
    pub notes: &'static [f32],
    /// Tremolo rate (Hz), zero for none
    pub tremolo: f32,
}

/// Recipe for a named music track
pub fn music_recipe(track: &str) -> Option<MusicRecipe> {
    let recipe = match track {
        "level_1" => MusicRecipe {
            wave: Wave::Sine,
            notes: &[261.63, 329.63, 392.0],
            tremolo: 0.0,
        },
        "level_2" => MusicRecipe {
            wave: Wave::Triangle,
            notes: &[293.66, 369.99],
            tremolo: 2.0,
        },
        "level_3" => MusicRecipe {
            wave: Wave::Triangle,
            notes: &[329.63, 415.3, 493.88],
            tremolo: 4.0,
        },
        "boss_theme" => MusicRecipe {
            wave: Wave::Sawtooth,
            notes: &[220.0, 130.81],
            tremolo: 6.0,
        },
        "victory_theme" => MusicRecipe {
            wave: Wave::Sine,
            notes: &[392.0, 493.88, 587.33],
            tremolo: 0.0,
        },
        _ => return None,
    };
    Some(recipe)
}

/// Silent backend that still validates names (native runs, tests)
#[derive(Debug, Clone, Default)]
pub struct NullAudio {
    music: Option<String>,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track that would be playing
    pub fn current_music(&self) -> Option<&str> {
        self.music.as_deref()
    }
}

impl AudioSink for NullAudio {
    fn play_sound(&mut self, name: &str, _volume: f32, _pitch: f32) -> Result<(), AudioError> {
        sound_recipe(name).map(|_| ()).ok_or_else(|| AudioError::UnknownSound(name.to_owned()))
    }

    fn play_music(&mut self, track: &str, _looped: bool) -> Result<(), AudioError> {
        music_recipe(track).ok_or_else(|| AudioError::UnknownTrack(track.to_owned()))?;
        self.music = Some(track.to_owned());
        Ok(())
    }

    fn stop_music(&mut self) {
        self.music = None;
    }

    fn set_volumes(&mut self, _sfx: f32, _music: f32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Wave, music_recipe, sound_recipe};
    use crate::error::AudioError;

    fn osc_type(wave: Wave) -> OscillatorType {
        match wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Triangle => OscillatorType::Triangle,
            Wave::Square => OscillatorType::Square,
            Wave::Sawtooth => OscillatorType::Sawtooth,
        }
    }

    fn backend(e: wasm_bindgen::JsValue) -> AudioError {
        AudioError::Backend(format!("{:?}", e))
    }

    /// Web Audio backend built from oscillators, no asset files
    pub struct WebAudio {
        ctx: AudioContext,
        sfx_volume: f32,
        music_volume: f32,
        music_gain: Option<GainNode>,
        music_nodes: Vec<OscillatorNode>,
    }

    impl WebAudio {
        pub fn new() -> Result<Self, AudioError> {
            let ctx = AudioContext::new().map_err(|_| AudioError::Unavailable)?;
            Ok(Self {
                ctx,
                sfx_volume: 0.4,
                music_volume: 0.35,
                music_gain: None,
                music_nodes: Vec::new(),
            })
        }

        /// Browsers start the context suspended until a user gesture
        fn wake(&self) {
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
        }

        fn create_osc(&self, freq: f32, wave: Wave) -> Result<(OscillatorNode, GainNode), AudioError> {
            let osc = self.ctx.create_oscillator().map_err(backend)?;
            let gain = self.ctx.create_gain().map_err(backend)?;
            osc.set_type(osc_type(wave));
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(backend)?;
            gain.connect_with_audio_node(&self.ctx.destination()).map_err(backend)?;
            Ok((osc, gain))
        }
    }

    impl AudioSink for WebAudio {
        fn play_sound(&mut self, name: &str, volume: f32, pitch: f32) -> Result<(), AudioError> {
            let recipe = sound_recipe(name).ok_or_else(|| AudioError::UnknownSound(name.to_owned()))?;
            let vol = self.sfx_volume * volume * recipe.gain;
            if vol <= 0.0 {
                return Ok(());
            }
            self.wake();
            let (osc, gain) = self.create_osc(recipe.pitch * pitch, recipe.wave)?;
            let t = self.ctx.current_time();
            let end = t + recipe.duration as f64;

            gain.gain().set_value_at_time(vol, t).map_err(backend)?;
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).map_err(backend)?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(recipe.end_pitch * pitch, end)
                .map_err(backend)?;
            osc.start().map_err(backend)?;
            osc.stop_with_when(end + 0.02).map_err(backend)?;
            Ok(())
        }

        fn play_music(&mut self, track: &str, _looped: bool) -> Result<(), AudioError> {
            let recipe = music_recipe(track).ok_or_else(|| AudioError::UnknownTrack(track.to_owned()))?;
            self.stop_music();
            self.wake();

            let master = self.ctx.create_gain().map_err(backend)?;
            master.gain().set_value(self.music_volume * 0.15);
            master.connect_with_audio_node(&self.ctx.destination()).map_err(backend)?;

            for &note in recipe.notes {
                let osc = self.ctx.create_oscillator().map_err(backend)?;
                osc.set_type(osc_type(recipe.wave));
                osc.frequency().set_value(note);
                osc.connect_with_audio_node(&master).map_err(backend)?;
                osc.start().map_err(backend)?;
                self.music_nodes.push(osc);
            }
            if recipe.tremolo > 0.0 {
                let lfo = self.ctx.create_oscillator().map_err(backend)?;
                let depth = self.ctx.create_gain().map_err(backend)?;
                lfo.frequency().set_value(recipe.tremolo);
                depth.gain().set_value(self.music_volume * 0.05);
                lfo.connect_with_audio_node(&depth).map_err(backend)?;
                depth.connect_with_audio_param(&master.gain()).map_err(backend)?;
                lfo.start().map_err(backend)?;
                self.music_nodes.push(lfo);
            }
            self.music_gain = Some(master);
            log::debug!("Music: {}", track);
            Ok(())
        }

        fn stop_music(&mut self) {
            for osc in self.music_nodes.drain(..) {
                let _ = osc.stop();
            }
            if let Some(gain) = self.music_gain.take() {
                let _ = gain.disconnect();
            }
        }

        fn set_volumes(&mut self, sfx: f32, music: f32) {
            self.sfx_volume = sfx.clamp(0.0, 1.0);
            self.music_volume = music.clamp(0.0, 1.0);
            if let Some(gain) = &self.music_gain {
                gain.gain().set_value(self.music_volume * 0.15);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::{MusicTrack, SoundCue};

    #[test]
    fn test_every_cue_has_a_recipe() {
        let cues = [
            SoundCue::AttackHairWhip,
            SoundCue::AttackPurseSwing,
            SoundCue::AttackWittyComeback,
            SoundCue::AttackDanceMove,
            SoundCue::EnemyHit,
            SoundCue::EnemyDeath,
            SoundCue::PlayerHurt,
            SoundCue::PowerupCollect,
            SoundCue::LevelComplete,
            SoundCue::AbilityGlowUp,
            SoundCue::AbilityCallBestie,
            SoundCue::AchievementUnlock,
            SoundCue::UiClick,
        ];
        for cue in cues {
            assert!(sound_recipe(cue.name()).is_some(), "{}", cue.name());
        }
        let tracks = [
            MusicTrack::Level1,
            MusicTrack::Level2,
            MusicTrack::Level3,
            MusicTrack::Boss,
            MusicTrack::Victory,
        ];
        for track in tracks {
            assert!(music_recipe(track.name()).is_some(), "{}", track.name());
        }
    }

    #[test]
    fn test_null_audio_reports_unknown_names() {
        let mut audio = NullAudio::new();
        assert!(audio.play_sound("enemy_hit", 1.0, 1.0).is_ok());
        assert!(matches!(audio.play_sound("kazoo", 1.0, 1.0), Err(AudioError::UnknownSound(_))));
        assert!(audio.play_music("boss_theme", true).is_ok());
        assert_eq!(audio.current_music(), Some("boss_theme"));
        assert!(audio.play_music("elevator", true).is_err());
        audio.stop_music();
        assert_eq!(audio.current_music(), None);
    }
}
