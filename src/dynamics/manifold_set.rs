use crate::dynamics::RigidBodyHandle;
use crate::math::Real;
use crate::query::{ContactDestroyedCallback, PersistentManifold, DEFAULT_CONTACT_BREAKING_THRESHOLD};
use crate::utils::ObjectPool;
use slab::Slab;

/// The identifier of a persistent manifold inserted into a [`ManifoldSet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ManifoldHandle(pub(crate) usize);

/// The persistent manifolds of all the body pairs currently overlapping.
///
/// Released manifolds are recycled for the next overlapping pairs.
#[derive(Debug)]
pub struct ManifoldSet {
    manifolds: Slab<PersistentManifold>,
    pool: ObjectPool<PersistentManifold>,
    contact_breaking_threshold: Real,
    contact_destroyed: Option<ContactDestroyedCallback>,
}

impl Default for ManifoldSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifoldSet {
    /// An empty manifold set.
    pub fn new() -> Self {
        Self {
            manifolds: Slab::new(),
            pool: ObjectPool::new(),
            contact_breaking_threshold: DEFAULT_CONTACT_BREAKING_THRESHOLD,
            contact_destroyed: None,
        }
    }

    /// The breaking threshold given to new manifolds.
    pub fn contact_breaking_threshold(&self) -> Real {
        self.contact_breaking_threshold
    }

    /// Sets the breaking threshold of all the current and future manifolds.
    pub fn set_contact_breaking_threshold(&mut self, threshold: Real) {
        self.contact_breaking_threshold = threshold;
        for (_, manifold) in self.manifolds.iter_mut() {
            manifold.set_contact_breaking_threshold(threshold);
        }
    }

    /// Sets the callback called with the user handles of the contacts that are destroyed.
    pub fn set_contact_destroyed_callback(&mut self, callback: Option<ContactDestroyedCallback>) {
        self.contact_destroyed = callback;
        for (_, manifold) in self.manifolds.iter_mut() {
            manifold.set_contact_destroyed_callback(callback);
        }
    }

    /// The number of manifolds.
    pub fn len(&self) -> usize {
        self.manifolds.len()
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.manifolds.is_empty()
    }

    /// Creates an empty manifold for the given pair of bodies.
    pub fn get_new_manifold(
        &mut self,
        body0: RigidBodyHandle,
        body1: RigidBodyHandle,
    ) -> ManifoldHandle {
        let mut manifold = self.pool.get();
        manifold.init(body0, body1);
        manifold.set_contact_breaking_threshold(self.contact_breaking_threshold);
        manifold.set_contact_destroyed_callback(self.contact_destroyed);
        ManifoldHandle(self.manifolds.insert(manifold))
    }

    /// Destroys a manifold, notifying the contact-destroyed callback of its points.
    pub fn release_manifold(&mut self, handle: ManifoldHandle) {
        if let Some(mut manifold) = self.manifolds.try_remove(handle.0) {
            manifold.clear_manifold();
            self.pool.release(manifold);
        }
    }

    /// Removes all the points of a manifold, keeping the manifold itself.
    pub fn clear_manifold(&mut self, handle: ManifoldHandle) {
        if let Some(manifold) = self.manifolds.get_mut(handle.0) {
            manifold.clear_manifold();
        }
    }

    /// Destroys all the manifolds involving `body`.
    pub fn release_body_manifolds(&mut self, body: RigidBodyHandle) {
        let to_release: alloc::vec::Vec<_> = self
            .iter()
            .filter(|(_, m)| m.body0 == body || m.body1 == body)
            .map(|(h, _)| h)
            .collect();

        for handle in to_release {
            self.release_manifold(handle);
        }
    }

    /// The manifold between two bodies, in any order.
    pub fn find(&self, body0: RigidBodyHandle, body1: RigidBodyHandle) -> Option<ManifoldHandle> {
        self.iter()
            .find(|(_, m)| {
                (m.body0 == body0 && m.body1 == body1) || (m.body0 == body1 && m.body1 == body0)
            })
            .map(|(h, _)| h)
    }

    /// The manifold with the given handle.
    pub fn get(&self, handle: ManifoldHandle) -> Option<&PersistentManifold> {
        self.manifolds.get(handle.0)
    }

    /// The manifold with the given handle, mutably.
    pub fn get_mut(&mut self, handle: ManifoldHandle) -> Option<&mut PersistentManifold> {
        self.manifolds.get_mut(handle.0)
    }

    /// Iterates through all the manifolds.
    pub fn iter(&self) -> impl Iterator<Item = (ManifoldHandle, &PersistentManifold)> {
        self.manifolds.iter().map(|(i, m)| (ManifoldHandle(i), m))
    }

    /// Iterates mutably through all the manifolds.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ManifoldHandle, &mut PersistentManifold)> {
        self.manifolds.iter_mut().map(|(i, m)| (ManifoldHandle(i), m))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point, Vector};
    use crate::query::{ContactUserHandle, ManifoldPoint};
    use core::sync::atomic::{AtomicU64, Ordering};

    static DESTROYED: AtomicU64 = AtomicU64::new(0);

    fn on_destroyed(handle: ContactUserHandle) {
        let _ = DESTROYED.fetch_add(handle.0, Ordering::SeqCst);
    }

    #[test]
    fn released_manifolds_are_recycled() {
        let mut set = ManifoldSet::new();
        set.set_contact_destroyed_callback(Some(on_destroyed));
        let b0 = RigidBodyHandle::from_raw_parts(0);
        let b1 = RigidBodyHandle::from_raw_parts(1);

        let handle = set.get_new_manifold(b0, b1);
        assert_eq!(set.find(b1, b0), Some(handle));

        let mut pt = ManifoldPoint::new(Point::origin(), Point::origin(), Vector::y(), 0.0);
        pt.user_handle = Some(ContactUserHandle(5));
        let _ = set.get_mut(handle).unwrap().add_manifold_point(pt);

        set.release_body_manifolds(b1);
        assert!(set.is_empty());
        assert_eq!(DESTROYED.load(Ordering::SeqCst), 5);

        let handle = set.get_new_manifold(b1, b0);
        assert_eq!(set.get(handle).unwrap().num_contacts(), 0);
        assert_eq!(set.get(handle).unwrap().body0, b1);
    }
}
