//! Collision resolution policy
//!
//! The smaller character loses. Between equal sizes the newer character
//! (higher id) loses, so the incumbent survives.

use std::cmp::Ordering;

use super::registry::Character;

/// Total order on "which character survives": `Less` means `a` loses
pub fn survival_order(a: &Character, b: &Character) -> Ordering {
    a.size()
        .total_cmp(&b.size())
        .then_with(|| b.id().cmp(&a.id()))
}

/// The character to delete when `a` and `b` collide
pub fn resolve<'a>(a: &'a Character, b: &'a Character) -> &'a Character {
    match survival_order(a, b) {
        Ordering::Less => a,
        _ => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::mock::RecordingWorld;
    use crate::sim::Registry;
    use glam::Vec2;
    use proptest::prelude::*;

    fn registry_with(sizes: &[f32]) -> Registry {
        let mut world = RecordingWorld::new();
        let mut registry = Registry::new();
        for size in sizes {
            registry.spawn(&mut world, *size, Vec2::ZERO);
        }
        registry
    }

    fn pair(registry: &Registry) -> (&Character, &Character) {
        let mut iter = registry.iter();
        (iter.next().unwrap(), iter.next().unwrap())
    }

    #[test]
    fn test_smaller_loses() {
        let registry = registry_with(&[500.0, 11.25]);
        let (big, small) = pair(&registry);

        for _ in 0..3 {
            assert_eq!(resolve(big, small).id(), small.id());
            assert_eq!(resolve(small, big).id(), small.id());
        }
    }

    #[test]
    fn test_equal_size_newer_loses() {
        let registry = registry_with(&[75.0, 75.0]);
        let (older, newer) = pair(&registry);

        assert_eq!(resolve(older, newer).id(), newer.id());
        assert_eq!(resolve(newer, older).id(), newer.id());
    }

    proptest! {
        #[test]
        fn prop_resolve_is_symmetric(a in 1.0f32..1000.0, b in 1.0f32..1000.0) {
            let registry = registry_with(&[a, b]);
            let (first, second) = pair(&registry);

            let loser = resolve(first, second).id();
            prop_assert_eq!(loser, resolve(second, first).id());

            let loser_size = registry.get(loser).unwrap().size();
            prop_assert_eq!(loser_size, a.min(b));
        }
    }
}
