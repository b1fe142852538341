use crate::dynamics::RigidBodyHandle;
use crate::math::{Isometry, Real};
use crate::query::contact_manifolds::{ContactUserHandle, ManifoldPoint};
use arrayvec::ArrayVec;

/// The maximum number of contact points a persistent manifold can hold.
pub const MANIFOLD_CACHE_SIZE: usize = 4;

/// The default distance beyond which cached contact points are discarded.
pub const DEFAULT_CONTACT_BREAKING_THRESHOLD: Real = 0.02;

/// A function called with the user handle of every contact point leaving a manifold.
pub type ContactDestroyedCallback = fn(ContactUserHandle);

/// A frame-persistent cache of up to four contact points between two bodies.
///
/// New points close to a cached one (in the local-space of the first body) replace it and
/// inherit its lifetime, user handle, and solver impulses. Once the cache is full, the point
/// dropped to make room is the one maximizing the area spanned by the remaining points, and
/// never the deepest one.
#[derive(Clone, Debug)]
pub struct PersistentManifold {
    /// The first body of the pair.
    pub body0: RigidBodyHandle,
    /// The second body of the pair.
    pub body1: RigidBodyHandle,
    points: ArrayVec<ManifoldPoint, MANIFOLD_CACHE_SIZE>,
    contact_breaking_threshold: Real,
    contact_destroyed: Option<ContactDestroyedCallback>,
    /// Scratch value used by the island manager to sort manifolds.
    pub(crate) island_id: Option<usize>,
}

impl Default for PersistentManifold {
    fn default() -> Self {
        Self::new(RigidBodyHandle::invalid(), RigidBodyHandle::invalid())
    }
}

impl PersistentManifold {
    /// Creates an empty manifold between the given bodies.
    pub fn new(body0: RigidBodyHandle, body1: RigidBodyHandle) -> Self {
        Self {
            body0,
            body1,
            points: ArrayVec::new(),
            contact_breaking_threshold: DEFAULT_CONTACT_BREAKING_THRESHOLD,
            contact_destroyed: None,
            island_id: None,
        }
    }

    /// Re-initializes this manifold for a new pair of bodies.
    ///
    /// The contact points must have been cleared beforehand.
    pub fn init(&mut self, body0: RigidBodyHandle, body1: RigidBodyHandle) {
        debug_assert!(self.points.is_empty());
        self.body0 = body0;
        self.body1 = body1;
        self.island_id = None;
    }

    /// The number of cached points.
    #[inline]
    pub fn num_contacts(&self) -> usize {
        self.points.len()
    }

    /// The cached points.
    #[inline]
    pub fn points(&self) -> &[ManifoldPoint] {
        &self.points
    }

    /// The cached points, mutably.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [ManifoldPoint] {
        &mut self.points
    }

    /// The `i`-th cached point.
    #[inline]
    pub fn contact_point(&self, i: usize) -> &ManifoldPoint {
        &self.points[i]
    }

    /// The distance beyond which contacts are discarded by [`Self::refresh_contact_points`].
    pub fn contact_breaking_threshold(&self) -> Real {
        self.contact_breaking_threshold
    }

    /// Sets the distance beyond which contacts are discarded.
    pub fn set_contact_breaking_threshold(&mut self, threshold: Real) {
        self.contact_breaking_threshold = threshold;
    }

    /// Sets the function called whenever a contact carrying a user handle leaves this manifold.
    pub fn set_contact_destroyed_callback(&mut self, callback: Option<ContactDestroyedCallback>) {
        self.contact_destroyed = callback;
    }

    /// Is `distance` close enough for a contact to be kept?
    #[inline]
    pub fn valid_contact_distance(&self, distance: Real) -> bool {
        distance <= self.contact_breaking_threshold
    }

    /// Finds the cached point whose local position on the first body is the closest to
    /// `new_point`'s, among those closer than the breaking threshold.
    pub fn cache_entry(&self, new_point: &ManifoldPoint) -> Option<usize> {
        let mut shortest_dist = self.contact_breaking_threshold * self.contact_breaking_threshold;
        let mut nearest = None;

        for (i, pt) in self.points.iter().enumerate() {
            let dist = (pt.local_point_a - new_point.local_point_a).norm_squared();
            if dist < shortest_dist {
                shortest_dist = dist;
                nearest = Some(i);
            }
        }

        nearest
    }

    /// Adds a new point to this manifold, evicting a cached one if it is full.
    ///
    /// Returns the index the point was inserted at.
    pub fn add_manifold_point(&mut self, new_point: ManifoldPoint) -> usize {
        if self.points.is_full() {
            let insert_index = self.sort_cached_points(&new_point);
            log::trace!("Manifold full, evicting contact {}.", insert_index);
            self.clear_user_cache(insert_index);
            self.points[insert_index] = new_point;
            insert_index
        } else {
            self.points.push(new_point);
            self.points.len() - 1
        }
    }

    /// Overwrites the point at `index` with `new_point`.
    ///
    /// The lifetime, user handle, and applied impulses of the replaced point are kept.
    pub fn replace_contact_point(&mut self, new_point: ManifoldPoint, index: usize) {
        let old = &self.points[index];
        let replaced = ManifoldPoint {
            lifetime: old.lifetime,
            user_handle: old.user_handle,
            applied_impulse: old.applied_impulse,
            applied_impulse_lateral1: old.applied_impulse_lateral1,
            applied_impulse_lateral2: old.applied_impulse_lateral2,
            ..new_point
        };
        self.points[index] = replaced;
    }

    /// Removes the point at `index`, moving the last point into its slot.
    pub fn remove_contact_point(&mut self, index: usize) {
        self.clear_user_cache(index);
        let _ = self.points.swap_remove(index);
    }

    /// Removes all the points of this manifold.
    pub fn clear_manifold(&mut self) {
        for i in 0..self.points.len() {
            self.clear_user_cache(i);
        }
        self.points.clear();
    }

    /// Drops the user handle of the point at `index`, notifying the contact-destroyed callback.
    pub fn clear_user_cache(&mut self, index: usize) {
        if let Some(handle) = self.points[index].user_handle.take() {
            if let Some(callback) = self.contact_destroyed {
                callback(handle);
            }
        }
    }

    /// Updates the world-space positions and distances of the cached points, and removes
    /// the ones that separated or slid apart by more than the breaking threshold.
    pub fn refresh_contact_points(&mut self, pos_a: &Isometry<Real>, pos_b: &Isometry<Real>) {
        for pt in self.points.iter_mut() {
            pt.position_world_on_a = pos_a * pt.local_point_a;
            pt.position_world_on_b = pos_b * pt.local_point_b;
            pt.distance = (pt.position_world_on_a - pt.position_world_on_b)
                .dot(&pt.normal_world_on_b);
            pt.lifetime += 1;
        }

        let threshold2 = self.contact_breaking_threshold * self.contact_breaking_threshold;

        for i in (0..self.points.len()).rev() {
            let pt = &self.points[i];

            if !self.valid_contact_distance(pt.distance) {
                self.remove_contact_point(i);
            } else {
                let projected_point = pt.position_world_on_a - pt.normal_world_on_b * pt.distance;
                let drift = pt.position_world_on_b - projected_point;

                if drift.norm_squared() > threshold2 {
                    self.remove_contact_point(i);
                }
            }
        }
    }

    /// Selects the cached point to replace by `pt` so that the remaining points span the
    /// largest area. The deepest point is never selected.
    fn sort_cached_points(&self, pt: &ManifoldPoint) -> usize {
        let mut deepest = None;
        let mut max_penetration = pt.distance;

        for (i, cached) in self.points.iter().enumerate() {
            if cached.distance < max_penetration {
                deepest = Some(i);
                max_penetration = cached.distance;
            }
        }

        let p = |i: usize| self.points[i].local_point_a;
        let new = pt.local_point_a;
        let candidates = [
            (new - p(1)).cross(&(p(3) - p(2))),
            (new - p(0)).cross(&(p(3) - p(2))),
            (new - p(0)).cross(&(p(3) - p(1))),
            (new - p(0)).cross(&(p(2) - p(1))),
        ];

        let mut best = None;
        let mut best_area = -1.0;

        for (i, diagonals) in candidates.iter().enumerate() {
            if Some(i) == deepest {
                continue;
            }

            let area = diagonals.norm_squared();
            if area > best_area {
                best_area = area;
                best = Some(i);
            }
        }

        // At most one slot is exempt so there is always a candidate.
        best.unwrap_or(0)
    }
}
