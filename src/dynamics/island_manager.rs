use crate::dynamics::{needs_response, ActivationState, ManifoldSet, RigidBodyHandle, RigidBodySet};
use crate::query::PersistentManifold;
use alloc::vec::Vec;
use ena::unify::{InPlaceUnificationTable, UnifyKey};

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
struct IslandKey(u32);

impl UnifyKey for IslandKey {
    type Value = ();
    fn index(&self) -> u32 {
        self.0
    }
    fn from_index(u: u32) -> IslandKey {
        IslandKey(u)
    }
    fn tag() -> &'static str {
        "IslandKey"
    }
}

/// Groups bodies touching each other, or attached by joints, into simulation islands.
///
/// Islands are the unit of sleeping: an island falls asleep only once all of its bodies
/// want to, and wakes up as a whole. When islands are split, each of them is also solved
/// separately.
pub struct SimulationIslandManager {
    union_find: InPlaceUnificationTable<IslandKey>,
    /// The body handles, indexed by union-find key.
    handles: Vec<RigidBodyHandle>,
    /// `(island id, key)` of every dynamic body, sorted by island.
    elements: Vec<(usize, usize)>,
}

impl Default for SimulationIslandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SimulationIslandManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulationIslandManager")
            .field("num_bodies", &self.handles.len())
            .field("elements", &self.elements)
            .finish()
    }
}

impl SimulationIslandManager {
    /// Creates a new island manager.
    pub fn new() -> Self {
        Self {
            union_find: InPlaceUnificationTable::new(),
            handles: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Resets the islands so that each body is its own island, and unites the bodies
    /// connected by manifolds with contacts.
    pub fn update_activation_state(&mut self, bodies: &mut RigidBodySet, manifolds: &ManifoldSet) {
        self.union_find = InPlaceUnificationTable::new();
        self.handles.clear();

        for (handle, body) in bodies.iter_mut() {
            let key = self.union_find.new_key(());
            body.island_tag = Some(key.0 as usize);
            self.handles.push(handle);
        }

        for (_, manifold) in manifolds.iter() {
            if manifold.num_contacts() == 0 {
                continue;
            }

            if let (Some(b0), Some(b1)) = (bodies.get(manifold.body0), bodies.get(manifold.body1)) {
                if b0.merges_simulation_islands() && b1.merges_simulation_islands() {
                    if let (Some(t0), Some(t1)) = (b0.island_tag, b1.island_tag) {
                        self.union_find.union(IslandKey(t0 as u32), IslandKey(t1 as u32));
                    }
                }
            }
        }
    }

    /// Merges the islands of two bodies.
    ///
    /// Must be called between [`Self::update_activation_state`] and
    /// [`Self::store_island_activation_state`].
    pub fn unite_bodies(&mut self, bodies: &RigidBodySet, body1: RigidBodyHandle, body2: RigidBodyHandle) {
        let tag = |h| bodies.get(h).and_then(|b| b.island_tag);
        if let (Some(t1), Some(t2)) = (tag(body1), tag(body2)) {
            self.union_find.union(IslandKey(t1 as u32), IslandKey(t2 as u32));
        }
    }

    /// Assigns its final island tag to each body. Static and kinematic bodies don't belong to
    /// any island.
    pub fn store_island_activation_state(&mut self, bodies: &mut RigidBodySet) {
        for (_, body) in bodies.iter_mut() {
            body.island_tag = match body.island_tag {
                Some(key) if !body.is_static_or_kinematic() => {
                    Some(self.union_find.find(IslandKey(key as u32)).0 as usize)
                }
                _ => None,
            };
        }
    }

    /// Updates the sleep state of each island, and collects the manifolds to solve.
    ///
    /// An island where no body is active and none has sleeping disabled falls asleep. An
    /// island containing a body that was woken up wakes up completely. Returns the
    /// manifolds of the pairs where at least one body is awake and both respond to contacts.
    fn build_islands<'a>(
        &mut self,
        bodies: &mut RigidBodySet,
        manifolds: &'a mut ManifoldSet,
    ) -> Vec<&'a mut PersistentManifold> {
        self.elements.clear();
        for (key, handle) in self.handles.iter().enumerate() {
            if let Some(island) = bodies.get(*handle).and_then(|b| b.island_tag) {
                self.elements.push((island, key));
            }
        }
        self.elements.sort();

        for group in self.elements.chunk_by(|a, b| a.0 == b.0) {
            let island_id = group[0].0;
            let island_bodies = || group.iter().map(|(_, key)| self.handles[*key]);

            let all_sleeping = island_bodies().all(|h| {
                let state = bodies[h].activation_state();
                state != ActivationState::Active && state != ActivationState::DisableDeactivation
            });

            for handle in island_bodies() {
                let body = &mut bodies[handle];
                if all_sleeping {
                    body.set_activation_state(ActivationState::IslandSleeping);
                } else if body.activation_state() == ActivationState::IslandSleeping {
                    body.set_activation_state(ActivationState::WantsDeactivation);
                }
            }

            if all_sleeping {
                log::trace!("Island {} fell asleep ({} bodies).", island_id, group.len());
            }
        }

        let mut island_manifolds = Vec::new();

        for (_, manifold) in manifolds.iter_mut() {
            manifold.island_id = None;

            let Some((b0, b1)) = bodies.get_pair_mut(manifold.body0, manifold.body1) else {
                continue;
            };

            let sleeping0 = b0.activation_state() == ActivationState::IslandSleeping;
            let sleeping1 = b1.activation_state() == ActivationState::IslandSleeping;

            if sleeping0 && sleeping1 {
                continue;
            }

            // Kinematic bodies don't merge islands, but wake up the bodies they touch.
            if manifold.num_contacts() > 0 {
                if b0.is_kinematic() && !sleeping0 {
                    b1.activate(false);
                }
                if b1.is_kinematic() && !sleeping1 {
                    b0.activate(false);
                }
            }

            if needs_response(b0, b1) {
                manifold.island_id = b0.island_tag.or(b1.island_tag);
                island_manifolds.push(manifold);
            }
        }

        island_manifolds
    }

    /// Updates the sleep state of each island, and calls `callback` with the bodies and
    /// manifolds to solve.
    ///
    /// If `split_islands` is set, `callback` is called once per awake island with its id.
    /// Otherwise it is called once for the whole world with a `None` island id.
    pub fn build_and_process_islands<F>(
        &mut self,
        bodies: &mut RigidBodySet,
        manifolds: &mut ManifoldSet,
        split_islands: bool,
        mut callback: F,
    ) where
        F: FnMut(&mut RigidBodySet, &[RigidBodyHandle], &mut [&mut PersistentManifold], Option<usize>),
    {
        let mut island_manifolds = self.build_islands(bodies, manifolds);

        if !split_islands {
            let all_bodies: Vec<_> = bodies.iter().map(|(h, _)| h).collect();
            callback(bodies, &all_bodies, &mut island_manifolds, None);
            return;
        }

        island_manifolds.sort_by_key(|m| m.island_id);

        let mut island_bodies = Vec::new();
        let mut start_manifold = 0;

        for group in self.elements.chunk_by(|a, b| a.0 == b.0) {
            let island_id = group[0].0;

            island_bodies.clear();
            island_bodies.extend(group.iter().map(|(_, key)| self.handles[*key]));
            let island_sleeping = island_bodies.iter().any(|h| !bodies[*h].is_active());

            // Skip the manifolds without island, or belonging to islands without bodies.
            while start_manifold < island_manifolds.len()
                && island_manifolds[start_manifold]
                    .island_id
                    .map(|id| id < island_id)
                    .unwrap_or(true)
            {
                start_manifold += 1;
            }

            let mut end_manifold = start_manifold;
            while end_manifold < island_manifolds.len()
                && island_manifolds[end_manifold].island_id == Some(island_id)
            {
                end_manifold += 1;
            }

            if !island_sleeping {
                callback(
                    bodies,
                    &island_bodies,
                    &mut island_manifolds[start_manifold..end_manifold],
                    Some(island_id),
                );
            }

            start_manifold = end_manifold;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::{RigidBody, RigidBodyConstructionInfo};
    use crate::math::{Point, Vector};
    use crate::query::ManifoldPoint;
    use crate::shape::SharedShape;

    fn ball(mass: f32) -> RigidBody {
        RigidBody::new(RigidBodyConstructionInfo::from_shape(mass, SharedShape::ball(0.5)))
    }

    fn touch(manifolds: &mut ManifoldSet, b0: RigidBodyHandle, b1: RigidBodyHandle) {
        let handle = manifolds.get_new_manifold(b0, b1);
        let pt = ManifoldPoint::new(Point::origin(), Point::origin(), Vector::y(), 0.0);
        let _ = manifolds.get_mut(handle).unwrap().add_manifold_point(pt);
    }

    fn islands(
        manager: &mut SimulationIslandManager,
        bodies: &mut RigidBodySet,
        manifolds: &mut ManifoldSet,
    ) -> Vec<(Vec<RigidBodyHandle>, usize)> {
        manager.update_activation_state(bodies, manifolds);
        manager.store_island_activation_state(bodies);

        let mut result = Vec::new();
        manager.build_and_process_islands(bodies, manifolds, true, |_, bodies, manifolds, _| {
            result.push((bodies.to_vec(), manifolds.len()));
        });
        result
    }

    #[test]
    fn static_bodies_do_not_merge_islands() {
        let mut bodies = RigidBodySet::new();
        let mut manifolds = ManifoldSet::new();
        let mut manager = SimulationIslandManager::new();

        let ground = bodies.insert(ball(0.0));
        let a = bodies.insert(ball(1.0));
        let b = bodies.insert(ball(1.0));
        let c = bodies.insert(ball(1.0));

        touch(&mut manifolds, a, ground);
        touch(&mut manifolds, b, ground);
        touch(&mut manifolds, b, c);

        let islands = islands(&mut manager, &mut bodies, &mut manifolds);
        assert_eq!(islands.len(), 2);
        assert!(islands.contains(&(vec![a], 1)));
        assert!(islands
            .iter()
            .any(|(bodies, n)| *n == 2 && bodies.contains(&b) && bodies.contains(&c)));
        assert_eq!(bodies[ground].island_tag(), None);
        assert_eq!(bodies[b].island_tag(), bodies[c].island_tag());
    }

    #[test]
    fn islands_sleep_as_a_whole() {
        let mut bodies = RigidBodySet::new();
        let mut manifolds = ManifoldSet::new();
        let mut manager = SimulationIslandManager::new();

        let a = bodies.insert(ball(1.0));
        let b = bodies.insert(ball(1.0));
        touch(&mut manifolds, a, b);

        bodies[a].set_activation_state(ActivationState::WantsDeactivation);
        let _ = islands(&mut manager, &mut bodies, &mut manifolds);
        assert_eq!(bodies[a].activation_state(), ActivationState::WantsDeactivation);
        assert_eq!(bodies[b].activation_state(), ActivationState::Active);

        bodies[b].set_activation_state(ActivationState::WantsDeactivation);
        let solved = islands(&mut manager, &mut bodies, &mut manifolds);
        assert!(solved.is_empty());
        assert_eq!(bodies[a].activation_state(), ActivationState::IslandSleeping);
        assert_eq!(bodies[b].activation_state(), ActivationState::IslandSleeping);

        // Waking up one body wakes up its island.
        bodies[a].activate(false);
        let _ = islands(&mut manager, &mut bodies, &mut manifolds);
        assert_eq!(bodies[b].activation_state(), ActivationState::WantsDeactivation);
    }

    #[test]
    fn unsplit_islands_are_processed_once() {
        let mut bodies = RigidBodySet::new();
        let mut manifolds = ManifoldSet::new();
        let mut manager = SimulationIslandManager::new();

        let a = bodies.insert(ball(1.0));
        let b = bodies.insert(ball(1.0));
        let c = bodies.insert(ball(1.0));
        touch(&mut manifolds, a, b);
        let _ = c;

        manager.update_activation_state(&mut bodies, &manifolds);
        manager.store_island_activation_state(&mut bodies);

        let mut calls = 0;
        manager.build_and_process_islands(&mut bodies, &mut manifolds, false, |_, bodies, manifolds, id| {
            calls += 1;
            assert_eq!(id, None);
            assert_eq!(bodies.len(), 3);
            assert_eq!(manifolds.len(), 1);
        });
        assert_eq!(calls, 1);
    }
}
