//! Sound cues for simulation events
//!
//! The simulation only emits named events. This module maps them to short
//! synthesized cues (a few oscillator tones each) and queues them with the
//! current volume for whatever backend plays audio.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, PersistError};
use crate::sim::GameEvent;

/// Storage key for the mute toggle ("1" muted, "0" audible)
pub const MUTE_KEY: &str = "goblins-inferno:muted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// One oscillator beep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub freq: f32,
    /// Seconds
    pub duration: f32,
    pub wave: Waveform,
    pub gain: f32,
}

const fn tone(freq: f32, duration: f32, wave: Waveform, gain: f32) -> Tone {
    Tone {
        freq,
        duration,
        wave,
        gain,
    }
}

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Regular enemy killed
    EnemyDie,
    /// Currency picked up
    Pickup,
    /// Heal orb picked up
    Heal,
    /// Player took damage
    Hurt,
    BossSpawn,
    /// Hit absorbed by a shield or absorb window
    BossBlock,
    BossDown,
    /// Level up or upgrade chosen
    Upgrade,
    Loan,
    GameOver,
    Victory,
}

impl SoundCue {
    /// Cue for an event, if the event is audible
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let cue = match event {
            GameEvent::EnemyDied { .. } => SoundCue::EnemyDie,
            GameEvent::CoinCollected { .. } => SoundCue::Pickup,
            GameEvent::HealCollected { .. } => SoundCue::Heal,
            GameEvent::PlayerHurt { .. } => SoundCue::Hurt,
            GameEvent::PlayerDied => SoundCue::GameOver,
            GameEvent::BossSpawned { .. } => SoundCue::BossSpawn,
            GameEvent::BossHitBlocked { .. } => SoundCue::BossBlock,
            GameEvent::BossDefeated { .. } => SoundCue::BossDown,
            GameEvent::AllBossesDefeated => SoundCue::Victory,
            GameEvent::LevelUp { .. } | GameEvent::UpgradeChosen { .. } => SoundCue::Upgrade,
            GameEvent::LoanTaken { .. } => SoundCue::Loan,
            GameEvent::EnemySpawned { .. } | GameEvent::BossAbility { .. } => return None,
        };
        Some(cue)
    }

    /// Tones played back to back
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundCue::EnemyDie => ENEMY_DIE,
            SoundCue::Pickup => PICKUP,
            SoundCue::Heal => HEAL,
            SoundCue::Hurt => HURT,
            SoundCue::BossSpawn => BOSS_SPAWN,
            SoundCue::BossBlock => BOSS_BLOCK,
            SoundCue::BossDown => BOSS_DOWN,
            SoundCue::Upgrade => UPGRADE,
            SoundCue::Loan => LOAN,
            SoundCue::GameOver => GAME_OVER,
            SoundCue::Victory => VICTORY,
        }
    }
}

use Waveform::*;

const ENEMY_DIE: &[Tone] = &[tone(220.0, 0.06, Sawtooth, 0.03)];
const PICKUP: &[Tone] = &[tone(880.0, 0.03, Sine, 0.02)];
const HEAL: &[Tone] = &[tone(600.0, 0.05, Sine, 0.03), tone(800.0, 0.04, Sine, 0.02)];
const HURT: &[Tone] = &[tone(180.0, 0.05, Square, 0.03)];
const BOSS_SPAWN: &[Tone] = &[tone(320.0, 0.12, Square, 0.04), tone(160.0, 0.12, Square, 0.04)];
const BOSS_BLOCK: &[Tone] = &[tone(1200.0, 0.02, Triangle, 0.02)];
const BOSS_DOWN: &[Tone] = &[tone(480.0, 0.08, Sine, 0.04), tone(360.0, 0.1, Sine, 0.03)];
const UPGRADE: &[Tone] = &[tone(520.0, 0.05, Triangle, 0.03)];
const LOAN: &[Tone] = &[tone(400.0, 0.05, Triangle, 0.03)];
const GAME_OVER: &[Tone] = &[
    tone(400.0, 0.1, Sine, 0.04),
    tone(300.0, 0.1, Sine, 0.04),
    tone(200.0, 0.2, Sine, 0.04),
];
const VICTORY: &[Tone] = &[
    tone(500.0, 0.08, Triangle, 0.04),
    tone(700.0, 0.08, Triangle, 0.04),
    tone(1000.0, 0.16, Triangle, 0.04),
];

/// A cue ready for playback at a final volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedCue {
    pub cue: SoundCue,
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    queue: Vec<QueuedCue>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AudioManager {
    pub fn new(muted: bool) -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted,
            queue: Vec::new(),
        }
    }

    /// Restore the persisted mute toggle (muted when nothing is stored)
    pub fn load(store: &impl KeyValueStore) -> Self {
        let muted = match store.get(MUTE_KEY) {
            Ok(Some(v)) => v.trim() == "1",
            Ok(None) => true,
            Err(e) => {
                log::warn!("Could not read mute setting ({e}), starting muted");
                true
            }
        };
        Self::new(muted)
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), PersistError> {
        store.set(MUTE_KEY, if self.muted { "1" } else { "0" })
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a cue; silent cues are dropped
    pub fn play(&mut self, cue: SoundCue) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.queue.push(QueuedCue { cue, volume });
    }

    /// Queue the cues for a batch of events. Returns how many were queued.
    pub fn handle_events(&mut self, events: &[GameEvent]) -> usize {
        let before = self.queue.len();
        for cue in events.iter().filter_map(SoundCue::for_event) {
            self.play(cue);
        }
        self.queue.len() - before
    }

    pub fn drain(&mut self) -> Vec<QueuedCue> {
        std::mem::take(&mut self.queue)
    }
}
