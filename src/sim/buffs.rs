//! Temporary buffs
//!
//! A buff is a plain record; what it does is looked up from its kind, so
//! expiry never needs a closure over outer state. Each buff is applied once
//! on insertion and reverted once on expiry or removal.

use serde::{Deserialize, Serialize};

use super::progression::{StatKey, StatMultipliers};

/// Named temporary effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    /// Fizzle potion: faster movement
    SwiftPotion,
    /// Fizzle potion: harder hits
    FuryPotion,
    /// Fizzle potion: faster firing
    FrenzyPotion,
    /// Cursed loan: slower movement
    CursedSlow,
}

impl BuffKind {
    pub fn stat(&self) -> StatKey {
        match self {
            BuffKind::SwiftPotion | BuffKind::CursedSlow => StatKey::Speed,
            BuffKind::FuryPotion => StatKey::Damage,
            BuffKind::FrenzyPotion => StatKey::FireRate,
        }
    }

    /// Potion picked by a draw in [0, 1)
    pub fn potion_from_roll(roll: f32) -> Self {
        match (roll * 3.0) as u32 {
            0 => BuffKind::SwiftPotion,
            1 => BuffKind::FuryPotion,
            _ => BuffKind::FrenzyPotion,
        }
    }
}

fn apply(kind: BuffKind, magnitude: f32, stats: &mut StatMultipliers) -> bool {
    stats.scale(kind.stat(), 1.0 + magnitude)
}

fn revert(kind: BuffKind, magnitude: f32, stats: &mut StatMultipliers) {
    stats.scale(kind.stat(), 1.0 / (1.0 + magnitude));
}

/// An active temporary effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub id: u32,
    pub kind: BuffKind,
    /// Fractional change: +0.25 means x1.25, -0.25 means x0.75
    pub magnitude: f32,
    pub remaining_ticks: u32,
}

/// Buffs currently in effect
#[derive(Debug, Clone, Default)]
pub struct BuffList {
    buffs: Vec<Buff>,
    next_id: u32,
}

impl BuffList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    /// Apply a buff now and track it. Returns its id, or `None` if the
    /// magnitude would make the stat non-positive or the duration is zero.
    pub fn add(
        &mut self,
        stats: &mut StatMultipliers,
        kind: BuffKind,
        magnitude: f32,
        ticks: u32,
    ) -> Option<u32> {
        if ticks == 0 || !apply(kind, magnitude, stats) {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.buffs.push(Buff {
            id,
            kind,
            magnitude,
            remaining_ticks: ticks,
        });
        Some(id)
    }

    /// Count every buff down one tick and revert the expired ones
    pub fn tick(&mut self, stats: &mut StatMultipliers) -> Vec<Buff> {
        let mut expired = Vec::new();
        self.buffs.retain_mut(|b| {
            b.remaining_ticks = b.remaining_ticks.saturating_sub(1);
            if b.remaining_ticks == 0 {
                revert(b.kind, b.magnitude, stats);
                expired.push(*b);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Remove a buff early. Removing an unknown id is a no-op.
    pub fn remove(&mut self, stats: &mut StatMultipliers, id: u32) -> bool {
        match self.buffs.iter().position(|b| b.id == id) {
            Some(idx) => {
                let b = self.buffs.remove(idx);
                revert(b.kind, b.magnitude, stats);
                true
            }
            None => false,
        }
    }
}
