use crate::dynamics::RigidBody;
use core::ops::{Index, IndexMut};
use slab::Slab;

/// The identifier of a rigid body inserted into a [`RigidBodySet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodyHandle(pub(crate) usize);

impl RigidBodyHandle {
    /// A handle that doesn't refer to any body.
    pub fn invalid() -> Self {
        Self(usize::MAX)
    }

    /// The raw index of this handle.
    pub fn into_raw_parts(self) -> usize {
        self.0
    }

    /// Rebuilds a handle from its raw index.
    pub fn from_raw_parts(index: usize) -> Self {
        Self(index)
    }
}

/// A set of rigid bodies, iterated in a stable order.
#[derive(Debug, Default)]
pub struct RigidBodySet {
    bodies: Slab<RigidBody>,
}

impl RigidBodySet {
    /// Creates an empty set of rigid bodies.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of bodies in this set.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Is `handle` a body of this set?
    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Inserts a body and returns its handle.
    pub fn insert(&mut self, body: RigidBody) -> RigidBodyHandle {
        RigidBodyHandle(self.bodies.insert(body))
    }

    /// Removes a body from this set.
    pub fn remove(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        self.bodies.try_remove(handle.0)
    }

    /// The body with the given handle.
    pub fn get(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0)
    }

    /// The body with the given handle, mutably.
    pub fn get_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.0)
    }

    /// Two distinct bodies, mutably. Returns `None` if they are the same or one of them
    /// doesn't exist.
    pub fn get_pair_mut(
        &mut self,
        handle1: RigidBodyHandle,
        handle2: RigidBodyHandle,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        if handle1 == handle2 {
            None
        } else {
            self.bodies.get2_mut(handle1.0, handle2.0)
        }
    }

    /// Iterates through all the bodies and their handles.
    pub fn iter(&self) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody)> {
        self.bodies.iter().map(|(i, b)| (RigidBodyHandle(i), b))
    }

    /// Iterates mutably through all the bodies and their handles.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RigidBodyHandle, &mut RigidBody)> {
        self.bodies.iter_mut().map(|(i, b)| (RigidBodyHandle(i), b))
    }
}

impl Index<RigidBodyHandle> for RigidBodySet {
    type Output = RigidBody;

    fn index(&self, handle: RigidBodyHandle) -> &RigidBody {
        &self.bodies[handle.0]
    }
}

impl IndexMut<RigidBodyHandle> for RigidBodySet {
    fn index_mut(&mut self, handle: RigidBodyHandle) -> &mut RigidBody {
        &mut self.bodies[handle.0]
    }
}
