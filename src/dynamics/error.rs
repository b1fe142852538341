use crate::dynamics::RigidBodyHandle;

/// Errors returned when an object can't be added to a dynamics world.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorldError {
    /// The object references a body that isn't part of the world.
    #[error("the rigid body {0:?} is not part of this world")]
    UnknownBody(RigidBodyHandle),
    /// A vehicle chassis must be a dynamic body.
    #[error("the vehicle chassis {0:?} is static or kinematic")]
    StaticChassis(RigidBodyHandle),
    /// A constraint can't attach a body to itself.
    #[error("the constraint attaches the rigid body {0:?} to itself")]
    SelfConstraint(RigidBodyHandle),
}
