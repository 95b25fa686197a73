//! Circle queries over entity collections
//!
//! Every collider in the game is a circle, so these are all centre-distance
//! tests. Entities already flagged for removal never match.

use glam::Vec2;

use super::entity::Entity;
use crate::circle_collision;

/// Indices of live entities whose centres lie within `range` of `center` (inclusive)
pub fn in_range<E: Entity>(items: &[E], center: Vec2, range: f32) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.should_remove() && e.pos().distance(center) <= range)
        .map(|(i, _)| i)
        .collect()
}

/// First live entity (in collection order) overlapping the circle
pub fn first_overlap<E: Entity>(items: &[E], pos: Vec2, radius: f32) -> Option<usize> {
    items
        .iter()
        .position(|e| !e.should_remove() && circle_collision(pos, radius, e.pos(), e.radius()))
}

/// Whether a single entity overlaps the circle
pub fn overlaps<E: Entity>(entity: &E, pos: Vec2, radius: f32) -> bool {
    circle_collision(pos, radius, entity.pos(), entity.radius())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blob(Vec2, f32, bool);

    impl Entity for Blob {
        fn kind(&self) -> &'static str {
            "blob"
        }
        fn id(&self) -> u32 {
            0
        }
        fn pos(&self) -> Vec2 {
            self.0
        }
        fn vel(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn radius(&self) -> f32 {
            self.1
        }
        fn should_remove(&self) -> bool {
            self.2
        }
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let blobs = [
            Blob(Vec2::new(80.0, 0.0), 10.0, false),
            Blob(Vec2::new(81.0, 0.0), 10.0, false),
        ];
        assert_eq!(in_range(&blobs, Vec2::ZERO, 80.0), vec![0]);
    }

    #[test]
    fn test_first_overlap_skips_removed() {
        let blobs = [
            Blob(Vec2::ZERO, 10.0, true),
            Blob(Vec2::new(5.0, 0.0), 10.0, false),
        ];
        assert_eq!(first_overlap(&blobs, Vec2::ZERO, 4.0), Some(1));
        assert_eq!(first_overlap(&blobs, Vec2::new(100.0, 0.0), 4.0), None);
    }
}
