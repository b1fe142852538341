//! Rigid bodies and the discrete dynamics world simulating them.

pub use self::activation::ActivationState;
pub use self::constraint::{
    ConstraintHandle, ConstraintSetting, Point2PointConstraint, TypedConstraint,
};
pub use self::debug_draw::{DebugDrawModes, DebugRenderBackend};
pub use self::dispatcher::{needs_collision, needs_response, BruteForceDispatcher, CollisionDispatcher};
pub use self::error::WorldError;
pub use self::integration_parameters::IntegrationParameters;
pub use self::island_manager::SimulationIslandManager;
pub use self::manifold_set::{ManifoldHandle, ManifoldSet};
pub use self::motion_state::{DefaultMotionState, MotionState};
pub use self::rigid_body::{CollisionFlags, RigidBody, RigidBodyConstructionInfo, MAX_ANGVEL};
pub use self::rigid_body_set::{RigidBodyHandle, RigidBodySet};
pub use self::solver::{ConstraintSolver, SequentialImpulseConstraintSolver};
pub use self::world::DiscreteDynamicsWorld;

mod activation;
pub mod constraint;
mod debug_draw;
mod dispatcher;
mod error;
mod integration_parameters;
mod island_manager;
mod manifold_set;
mod motion_state;
mod rigid_body;
mod rigid_body_set;
pub mod solver;
mod world;
