//! Animal arena
//!
//! Animals live in a generational slot map so handles stay valid (or become
//! detectably stale) across spawn/remove cycles. Freed slots are reused by
//! the next spawn. On top of the arena the registry keeps two ordered id
//! lists, the field set and the group set; every live animal is in exactly
//! one of them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use super::geometry::{PositionSampler, random_in_disk};
use super::movement::Motion;
use crate::error::SimResult;
use crate::settings::AnimalType;

new_key_type! {
    /// Stable handle to an animal slot
    pub struct AnimalId;
}

/// Which set an animal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    /// Wandering, waiting to be picked up
    Field,
    /// Following the herdsman
    Group,
}

/// A single animal
#[derive(Debug, Clone)]
pub struct Animal {
    /// Index into the configured animal types
    pub kind: usize,
    pub motion: Motion,
    pub membership: Membership,
    /// Fixed offset from the herdsman while grouped, so the flock spreads out
    pub offset: Vec2,
}

impl Animal {
    pub fn new(kind: usize, animal_type: &AnimalType, pos: Vec2, offset: Vec2) -> Self {
        Self {
            kind,
            motion: Motion::at(pos, animal_type.speed),
            membership: Membership::Field,
            offset,
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.membership == Membership::Group
    }
}

#[derive(Debug, Default)]
pub struct AnimalRegistry {
    animals: SlotMap<AnimalId, Animal>,
    field: Vec<AnimalId>,
    group: Vec<AnimalId>,
}

impl AnimalRegistry {
    /// Registry with `capacity` slots reserved; grows past it on demand
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            animals: SlotMap::with_capacity_and_key(capacity),
            field: Vec::with_capacity(capacity),
            group: Vec::with_capacity(capacity),
        }
    }

    /// Create an animal of a random type at a random position outside the
    /// pen and put it on the field.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        types: &[AnimalType],
        sampler: &PositionSampler,
        offset_radius: f32,
        rng: &mut R,
    ) -> SimResult<AnimalId> {
        let kind = rng.random_range(0..types.len());
        let pos = sampler.sample(rng)?;
        let offset = random_in_disk(rng, offset_radius);
        let id = self.insert(Animal::new(kind, &types[kind], pos, offset));
        log::debug!("Spawned {} at ({:.2}, {:.2})", types[kind].name, pos.x, pos.y);
        Ok(id)
    }

    /// Put a prepared animal on the field
    pub fn insert(&mut self, mut animal: Animal) -> AnimalId {
        animal.membership = Membership::Field;
        let id = self.animals.insert(animal);
        self.field.push(id);
        id
    }

    /// Release an animal's slot. Unknown or already removed ids are ignored.
    pub fn remove(&mut self, id: AnimalId) -> Option<Animal> {
        let animal = self.animals.remove(id)?;
        let set = match animal.membership {
            Membership::Field => &mut self.field,
            Membership::Group => &mut self.group,
        };
        if let Some(index) = set.iter().position(|&other| other == id) {
            set.remove(index);
        }
        Some(animal)
    }

    /// Move an animal from the field to the group. Returns false if it is
    /// not on the field.
    pub fn let_follow(&mut self, id: AnimalId) -> bool {
        let Some(animal) = self.animals.get_mut(id) else {
            return false;
        };
        if animal.membership != Membership::Field {
            return false;
        }
        let Some(index) = self.field.iter().position(|&other| other == id) else {
            return false;
        };
        self.field.remove(index);
        animal.membership = Membership::Group;
        self.group.push(id);
        true
    }

    /// Remove every grouped animal, returning them in group order
    pub fn drain_group(&mut self) -> Vec<Animal> {
        let ids = std::mem::take(&mut self.group);
        ids.into_iter()
            .filter_map(|id| self.animals.remove(id))
            .collect()
    }

    /// Remove every animal
    pub fn clear(&mut self) {
        self.animals.clear();
        self.field.clear();
        self.group.clear();
    }

    pub fn get(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.get(id)
    }

    pub fn get_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.animals.get_mut(id)
    }

    pub fn contains(&self, id: AnimalId) -> bool {
        self.animals.contains_key(id)
    }

    /// Field set in spawn order
    pub fn field(&self) -> &[AnimalId] {
        &self.field
    }

    /// Group set in capture order
    pub fn group(&self) -> &[AnimalId] {
        &self.group
    }

    /// Every live animal
    pub fn iter(&self) -> impl Iterator<Item = (AnimalId, &Animal)> {
        self.animals.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AnimalId, &mut Animal)> {
        self.animals.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// Every live animal is in exactly one set and its flag agrees
    pub fn membership_consistent(&self) -> bool {
        if self.field.len() + self.group.len() != self.animals.len() {
            return false;
        }
        let check = |ids: &[AnimalId], expected: Membership| {
            ids.iter().all(|&id| {
                self.animals
                    .get(id)
                    .is_some_and(|animal| animal.membership == expected)
            })
        };
        check(&self.field, Membership::Field) && check(&self.group, Membership::Group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn types() -> Vec<AnimalType> {
        vec![
            AnimalType::new("sheep", 1, 2.0, 1.0),
            AnimalType::new("cow", 3, 1.0, 0.5),
        ]
    }

    fn sampler() -> PositionSampler {
        PositionSampler::new(
            Rect::new(Vec2::ZERO, Vec2::new(8.0, 4.5)),
            Rect::new(Vec2::ZERO, Vec2::new(1.5, 1.5)),
        )
    }

    fn spawn_n(registry: &mut AnimalRegistry, n: usize, rng: &mut Pcg32) -> Vec<AnimalId> {
        (0..n)
            .map(|_| registry.spawn(&types(), &sampler(), 0.8, rng).unwrap())
            .collect()
    }

    #[test]
    fn test_spawn_adds_to_field() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut registry = AnimalRegistry::with_capacity(4);
        let ids = spawn_n(&mut registry, 3, &mut rng);

        assert_eq!(registry.field(), ids.as_slice());
        assert!(registry.group().is_empty());
        for id in ids {
            let animal = registry.get(id).unwrap();
            assert!(!sampler().pen().contains(animal.motion.pos));
            assert!(animal.offset.length() <= 0.8 + 1e-5);
            assert_eq!(animal.motion.speed, types()[animal.kind].speed);
        }
        assert!(registry.membership_consistent());
    }

    #[test]
    fn test_let_follow_moves_between_sets() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut registry = AnimalRegistry::with_capacity(4);
        let ids = spawn_n(&mut registry, 3, &mut rng);

        assert!(registry.let_follow(ids[1]));
        assert_eq!(registry.field(), &[ids[0], ids[2]]);
        assert_eq!(registry.group(), &[ids[1]]);
        assert!(registry.get(ids[1]).unwrap().is_grouped());

        // Already grouped
        assert!(!registry.let_follow(ids[1]));
        assert!(registry.membership_consistent());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut registry = AnimalRegistry::with_capacity(4);
        let ids = spawn_n(&mut registry, 2, &mut rng);

        assert!(registry.remove(ids[0]).is_some());
        assert!(registry.remove(ids[0]).is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.field(), &[ids[1]]);
        assert!(registry.membership_consistent());
    }

    #[test]
    fn test_freed_slot_is_reused_with_new_generation() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut registry = AnimalRegistry::with_capacity(1);
        let first = spawn_n(&mut registry, 1, &mut rng)[0];
        registry.remove(first);

        let second = spawn_n(&mut registry, 1, &mut rng)[0];
        assert_ne!(first, second);
        assert!(!registry.contains(first));
        assert!(registry.remove(first).is_none());
        assert!(registry.contains(second));
    }

    #[test]
    fn test_drain_group_takes_every_member() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut registry = AnimalRegistry::with_capacity(8);
        let ids = spawn_n(&mut registry, 5, &mut rng);
        for &id in &ids[..4] {
            registry.let_follow(id);
        }

        let drained = registry.drain_group();
        assert_eq!(drained.len(), 4);
        assert!(registry.group().is_empty());
        assert_eq!(registry.field(), &[ids[4]]);
        assert!(registry.membership_consistent());
    }

    #[test]
    fn test_clear_empties_both_sets() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut registry = AnimalRegistry::with_capacity(8);
        let ids = spawn_n(&mut registry, 4, &mut rng);
        registry.let_follow(ids[0]);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.field().is_empty());
        assert!(registry.group().is_empty());
    }
}
