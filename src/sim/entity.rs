//! Shared capability contract for simulated objects
//!
//! Drawing lives in `renderer::draw` so this module stays platform-free.

use glam::Vec2;

use crate::error::EntityFault;

/// Anything with a position that the world steps and culls
pub trait Entity {
    /// Short type name for diagnostics
    fn kind(&self) -> &'static str;
    fn id(&self) -> u32;
    fn pos(&self) -> Vec2;
    fn vel(&self) -> Vec2;
    /// Collision extent
    fn radius(&self) -> f32;
    /// True once the entity should be dropped from its collection
    fn should_remove(&self) -> bool;

    /// Current health, for entities that have one
    fn health(&self) -> Option<f32> {
        None
    }

    /// Reject states the simulation can't recover from (NaN/inf)
    fn check_finite(&self) -> Result<(), EntityFault> {
        let fault = |field| EntityFault::NonFinite {
            kind: self.kind(),
            id: self.id(),
            field,
        };
        if !self.pos().is_finite() {
            return Err(fault("position"));
        }
        if !self.vel().is_finite() {
            return Err(fault("velocity"));
        }
        if self.health().is_some_and(|h| !h.is_finite()) {
            return Err(fault("health"));
        }
        Ok(())
    }
}

/// Drop every entity whose state went non-finite, logging each one.
/// Returns how many were quarantined.
pub fn quarantine<E: Entity>(items: &mut Vec<E>) -> usize {
    let before = items.len();
    items.retain(|e| match e.check_finite() {
        Ok(()) => true,
        Err(fault) => {
            log::warn!("Quarantined entity: {}", fault);
            false
        }
    });
    before - items.len()
}

/// Index and distance of the entity closest to `from`
pub fn nearest<E: Entity>(items: &[E], from: Vec2) -> Option<(usize, f32)> {
    items
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.should_remove())
        .map(|(i, e)| (i, e.pos().distance(from)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot {
        id: u32,
        pos: Vec2,
        dead: bool,
    }

    impl Entity for Dot {
        fn kind(&self) -> &'static str {
            "dot"
        }
        fn id(&self) -> u32 {
            self.id
        }
        fn pos(&self) -> Vec2 {
            self.pos
        }
        fn vel(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn radius(&self) -> f32 {
            1.0
        }
        fn should_remove(&self) -> bool {
            self.dead
        }
    }

    #[test]
    fn test_quarantine_drops_only_broken() {
        let mut dots = vec![
            Dot { id: 1, pos: Vec2::ZERO, dead: false },
            Dot { id: 2, pos: Vec2::new(f32::NAN, 0.0), dead: false },
            Dot { id: 3, pos: Vec2::ONE, dead: false },
        ];
        assert_eq!(quarantine(&mut dots), 1);
        assert_eq!(dots.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_nearest_skips_removed() {
        let dots = vec![
            Dot { id: 1, pos: Vec2::new(1.0, 0.0), dead: true },
            Dot { id: 2, pos: Vec2::new(5.0, 0.0), dead: false },
            Dot { id: 3, pos: Vec2::new(9.0, 0.0), dead: false },
        ];
        let (idx, dist) = nearest(&dots, Vec2::ZERO).unwrap();
        assert_eq!(idx, 1);
        assert!((dist - 5.0).abs() < 1e-6);
    }
}
