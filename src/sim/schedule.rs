//! Deadline list for timed effects
//!
//! Timed buffs, debuffs and periodic ticks are entries keyed on simulation
//! time. They are checked once per step, so they pause with the game and die
//! with the world that owns them. Targets are looked up by id when an entry
//! fires; an entry whose target is gone is skipped.

use super::player::ModifierKey;

/// What a scheduled action touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Player(u32),
    Enemy(u32),
    World,
}

/// Deferred work
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Drop a timed stat modifier from the player
    EndModifier(ModifierKey),
    EndShield,
    EndConfusion,
    EndMultishot,
    /// Restore the default power-up magnet radius
    ResetMagnet,
    /// Lift an enemy's slow
    EndSlow,
    /// Boss stops halving incoming damage
    EndMirrorShield,
    /// Heal `amount`, then repeat every `period` seconds while ticks remain
    Regen { amount: i32, period: f32, remaining: u32 },
}

impl Action {
    /// Same kind of effect (used to refresh instead of stacking)
    fn same_kind(&self, other: &Action) -> bool {
        match (self, other) {
            (Action::EndModifier(a), Action::EndModifier(b)) => a == b,
            (Action::Regen { .. }, Action::Regen { .. }) => true,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// A pending entry
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled {
    /// Simulation time (seconds) at which it fires
    pub due: f32,
    pub target: Target,
    pub action: Action,
}

/// Pending timed effects, fired in deadline order
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<Scheduled>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` at absolute time `due`
    pub fn at(&mut self, due: f32, target: Target, action: Action) {
        self.entries.push(Scheduled { due, target, action });
    }

    /// Refresh-or-start a timed effect.
    ///
    /// If the same kind of effect is already pending for `target` its deadline is
    /// pushed back by `duration` (regen gains the extra ticks instead) and false is
    /// returned, so the caller must not apply the effect a second time. Otherwise a
    /// new entry is queued at `now + duration` and true is returned.
    pub fn extend_or_insert(&mut self, now: f32, duration: f32, target: Target, action: Action) -> bool {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.target == target && e.action.same_kind(&action))
        {
            match (&mut existing.action, action) {
                (Action::Regen { remaining, .. }, Action::Regen { remaining: extra, .. }) => {
                    *remaining += extra;
                }
                _ => existing.due += duration,
            }
            return false;
        }
        self.at(now + duration, target, action);
        true
    }

    /// Whether a matching entry is pending
    pub fn is_pending(&self, target: Target, action: Action) -> bool {
        self.entries
            .iter()
            .any(|e| e.target == target && e.action.same_kind(&action))
    }

    /// Remove and return every entry due by `now`, earliest first
    pub fn take_due(&mut self, now: f32) -> Vec<Scheduled> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].due <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due.partial_cmp(&b.due).unwrap_or(std::cmp::Ordering::Equal));
        due
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_orders_and_leaves_future() {
        let mut s = Schedule::new();
        s.at(3.0, Target::World, Action::ResetMagnet);
        s.at(1.0, Target::Player(1), Action::EndShield);
        s.at(2.0, Target::Enemy(4), Action::EndSlow);
        let due = s.take_due(2.5);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].action, Action::EndShield);
        assert_eq!(due[1].action, Action::EndSlow);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_extend_refreshes_instead_of_stacking() {
        let mut s = Schedule::new();
        let key = Action::EndModifier(ModifierKey::SpeedBoost);
        assert!(s.extend_or_insert(0.0, 10.0, Target::Player(1), key));
        assert!(!s.extend_or_insert(4.0, 10.0, Target::Player(1), key));
        assert_eq!(s.len(), 1);
        assert!(s.take_due(19.9).is_empty());
        assert_eq!(s.take_due(20.0).len(), 1);
    }

    #[test]
    fn test_distinct_modifiers_do_not_merge() {
        let mut s = Schedule::new();
        assert!(s.extend_or_insert(0.0, 5.0, Target::Player(1), Action::EndModifier(ModifierKey::SpeedBoost)));
        assert!(s.extend_or_insert(0.0, 5.0, Target::Player(1), Action::EndModifier(ModifierKey::QuickWit)));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_regen_refresh_adds_ticks() {
        let mut s = Schedule::new();
        let regen = |n| Action::Regen { amount: 5, period: 1.0, remaining: n };
        assert!(s.extend_or_insert(0.0, 1.0, Target::Player(1), regen(30)));
        assert!(!s.extend_or_insert(0.5, 1.0, Target::Player(1), regen(30)));
        let due = s.take_due(1.0);
        assert_eq!(due[0].action, regen(60));
    }
}
